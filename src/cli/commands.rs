use crate::cli::args::{Cli, Commands};
use crate::config::AtlasConfig;
use crate::index::{IndexScan, Manifest, ScanMode};
use crate::processors::{
    ChartOutcome, ChartRequest, CsvSplitter, IntegrityChecker, IntegrityReport,
};
use crate::readers::WeatherReader;
use crate::session::AtlasSession;
use crate::utils::progress::ProgressReporter;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = AtlasConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let mut session = AtlasSession::new(config);

    match cli.command {
        Commands::Split { input, output_dir } => {
            let output_dir = output_dir.unwrap_or_else(|| session.config().split_output_path());
            println!("Splitting {}", input.display());
            println!("Output directory: {}", output_dir.display());

            // Pre-flight so a missing file reads as a message rather than a CSV error
            if !input.is_file() {
                println!("No data: '{}' does not exist", input.display());
                return Ok(());
            }

            let splitter = CsvSplitter::new(&output_dir);
            let records = WeatherReader::new()
                .read_master(&input)
                .with_context(|| format!("reading {}", input.display()))?;

            // Debug output would tear the progress bar
            let silent = cli.verbose;
            let progress = ProgressReporter::new(
                records.len() as u64,
                "Writing regional files...",
                silent,
            );
            let report = splitter
                .split_records(records, Some(&progress))
                .context("splitting weather table")?;
            progress.finish_with_message("Done");

            println!("{}", report.summary());
        }

        Commands::Index { dir, mode, json } => {
            let scan = session.scan(&dir, mode);
            report_issues(&scan);

            if json {
                let output = match mode {
                    ScanMode::Quality => serde_json::json!({
                        "base": scan.variable_index(),
                        "percentiles": scan.percentile_index(),
                    }),
                    ScanMode::Csv | ScanMode::Image => serde_json::to_value(scan.variable_index())?,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_index(&scan);
            }
        }

        Commands::Manifest { dir, mode } => {
            let (manifest, path) = Manifest::export(&dir, mode)
                .with_context(|| format!("writing manifest for {}", dir.display()))?;
            println!(
                "Wrote {} entries to {}",
                manifest.entries.len(),
                path.display()
            );
        }

        Commands::Chart {
            source,
            state,
            district_block,
            variables,
            since,
            json,
        } => {
            let source = source.unwrap_or_else(|| session.config().met_path());
            let mut request = ChartRequest::new(variables);
            request.since_year = since;

            let outcome = session
                .region_chart(&source, &state, &district_block, &request)
                .with_context(|| format!("loading {}", source.display()))?;
            print_outcome(&outcome, json)?;
        }

        Commands::Variable { file, since, json } => {
            if !file.is_file() {
                println!("No data: '{}' does not exist", file.display());
                return Ok(());
            }

            let outcome = session
                .variable_chart(&file, since)
                .with_context(|| format!("reading {}", file.display()))?;
            print_outcome(&outcome, json)?;
        }

        Commands::Validate { input } => {
            println!("Validating {}", input.display());

            let checker = IntegrityChecker::new();
            match validate(&checker, &input)? {
                None => println!("No data: '{}' does not exist", input.display()),
                Some(report) => {
                    println!("\n{}", checker.generate_summary(&report));

                    if report.is_clean() {
                        println!("✅ All rows passed validation checks");
                    } else {
                        println!("⚠️  Found {} validation issues", report.violations.len());
                    }
                }
            }
        }
    }

    Ok(())
}

/// Integrity report for a master CSV; `None` when the file does not exist
fn validate(checker: &IntegrityChecker, input: &Path) -> Result<Option<IntegrityReport>> {
    if !input.is_file() {
        return Ok(None);
    }

    let records = WeatherReader::new()
        .read_master(input)
        .with_context(|| format!("reading {}", input.display()))?;
    Ok(Some(checker.check_integrity(&records)))
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

fn report_issues(scan: &IndexScan) {
    for issue in &scan.issues {
        println!("⚠️  {}", issue);
    }
}

fn print_index(scan: &IndexScan) {
    println!("{}", scan.summary());

    let base = scan.variable_index();
    let percentiles = scan.percentile_index();

    let mut regions: BTreeSet<(&String, &String)> = BTreeSet::new();
    for (state, blocks) in &base {
        regions.extend(blocks.keys().map(|db| (state, db)));
    }
    for (state, blocks) in &percentiles {
        regions.extend(blocks.keys().map(|db| (state, db)));
    }

    let mut current_state: Option<&String> = None;
    for (state, district_block) in regions {
        if current_state != Some(state) {
            println!("{}", state);
            current_state = Some(state);
        }
        println!("  {}", district_block);

        if let Some(labels) = base.get(state).and_then(|b| b.get(district_block)) {
            for (label, path) in labels {
                println!("    {:<32} {}", label, path.display());
            }
        }
        if let Some(parameters) = percentiles.get(state).and_then(|b| b.get(district_block)) {
            for (parameter, buckets) in parameters {
                let names: Vec<&str> = buckets.keys().map(String::as_str).collect();
                println!("    {:<32} percentiles: {}", parameter, names.join(", "));
            }
        }
    }
}

fn print_outcome(outcome: &ChartOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    match outcome {
        ChartOutcome::NoData { message } => println!("{}", message),
        ChartOutcome::Ready(chart) => {
            println!("{}", chart.title);
            println!("Date range: {} to {}", chart.domain.start, chart.domain.end);
            for series in &chart.series {
                let units = series.units.as_deref().unwrap_or("");
                println!("\n{} ({} points) {}", series.name, series.points.len(), units);
                for (date, value) in &series.points {
                    println!("  {}  {:>8.2}", date, value);
                }
            }
        }
    }

    Ok(())
}
