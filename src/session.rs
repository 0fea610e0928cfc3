use crate::config::AtlasConfig;
use crate::error::Result;
use crate::index::{Manifest, IndexScan, ScanMode, SourceCache};
use crate::models::{RegionCatalog, Variable};
use crate::processors::{ChartOutcome, ChartPreparer, ChartRequest, GroupedLoader};
use crate::readers::{VariableReader, VariableSeries};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// One dashboard session: every selection recomputes from disk unless the
/// source path is cached and unchanged.
pub struct AtlasSession {
    config: AtlasConfig,
    loader: GroupedLoader,
    catalogs: SourceCache<RegionCatalog>,
    variables: SourceCache<VariableSeries>,
    scans: HashMap<ScanMode, SourceCache<IndexScan>>,
}

impl AtlasSession {
    pub fn new(config: AtlasConfig) -> Self {
        Self {
            config,
            loader: GroupedLoader::new(),
            catalogs: SourceCache::new(),
            variables: SourceCache::new(),
            scans: HashMap::new(),
        }
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Region catalog from a master CSV, or from a directory of split files.
    /// A missing source is an empty catalog.
    pub fn catalog(&mut self, source: &Path) -> Result<Arc<RegionCatalog>> {
        let loader = &self.loader;
        self.catalogs.get_or_load(source, |path| {
            if path.is_file() {
                loader.load_master(path)
            } else {
                loader.load_split_dir(path)
            }
        })
    }

    /// Catalog rebuilt from the configured `Met/` directory
    pub fn met_catalog(&mut self) -> Result<Arc<RegionCatalog>> {
        let met = self.config.met_path();
        self.catalog(&met)
    }

    /// Directory index, preferring a manifest sidecar when present
    pub fn scan(&mut self, dir: &Path, mode: ScanMode) -> Arc<IndexScan> {
        let cache = self.scans.entry(mode).or_default();
        match cache.get_or_load(dir, |d| Ok(Manifest::load_index(d, mode))) {
            Ok(scan) => scan,
            Err(_) => Arc::new(Manifest::load_index(dir, mode)),
        }
    }

    pub fn market_images(&mut self) -> Arc<IndexScan> {
        let dir = self.config.market_path();
        self.scan(&dir, ScanMode::Image)
    }

    pub fn quality_images(&mut self) -> Arc<IndexScan> {
        let dir = self.config.quality_path();
        self.scan(&dir, ScanMode::Quality)
    }

    pub fn met_variable_files(&mut self) -> Arc<IndexScan> {
        let dir = self.config.met_variables_path();
        self.scan(&dir, ScanMode::Csv)
    }

    /// Chart data for one region; an unknown region is reported as no data
    pub fn region_chart(
        &mut self,
        source: &Path,
        state: &str,
        district_block: &str,
        request: &ChartRequest,
    ) -> Result<ChartOutcome> {
        let catalog = self.catalog(source)?;
        Ok(match catalog.series(state, district_block) {
            Some(series) => ChartPreparer::prepare(series, request),
            None => ChartOutcome::NoData {
                message: format!("No data for {} / {}", state, district_block),
            },
        })
    }

    /// Chart data for a generic meteorological-variable CSV
    pub fn variable_chart(&mut self, file: &Path, since_year: Option<i32>) -> Result<ChartOutcome> {
        let series = self.variables.get_or_load(file, VariableReader::read)?;
        Ok(ChartPreparer::prepare_points(
            &series.name,
            &series.points,
            since_year,
        ))
    }

    pub fn default_request() -> ChartRequest {
        ChartRequest::new(Variable::ALL.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MASTER: &str = "State,District,Block,Date,Rainfall,Max_Temperature,Min_Temperature\n\
        Punjab,Amritsar,Ajnala,05-03-1995,12.5,30.1,18.4\n\
        Punjab,Amritsar,Ajnala,06-03-1995,0.0,31.0,18.0\n";

    #[test]
    fn test_region_chart_from_master() -> Result<()> {
        let dir = TempDir::new()?;
        let master = dir.path().join("weather_data.csv");
        fs::write(&master, MASTER)?;

        let mut session = AtlasSession::new(AtlasConfig::default());
        let request = ChartRequest::single(Variable::Rainfall);

        let outcome = session.region_chart(&master, "Punjab", "Amritsar-Ajnala", &request)?;
        assert!(outcome.is_ready());

        let outcome = session.region_chart(&master, "Punjab", "Amritsar-Verka", &request)?;
        assert!(!outcome.is_ready());
        Ok(())
    }

    #[test]
    fn test_configured_directories() -> Result<()> {
        let dir = TempDir::new()?;
        let quality = dir.path().join("Quality");
        fs::create_dir(&quality)?;
        fs::write(quality.join("Punjab_Amritsar_Ajnala_Aroma_P90.png"), b"")?;

        let config = AtlasConfig {
            data_root: dir.path().to_path_buf(),
            ..AtlasConfig::default()
        };
        let mut session = AtlasSession::new(config);

        assert_eq!(session.quality_images().percentile_index().len(), 1);
        assert!(session.market_images().is_empty());
        assert!(session.met_catalog()?.is_empty());
        Ok(())
    }
}
