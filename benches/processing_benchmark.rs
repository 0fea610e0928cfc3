use basmati_atlas::models::{FileDescriptor, Variable, WeatherRecord};
use basmati_atlas::processors::{ChartPreparer, ChartRequest, GroupedLoader};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// Create test data for benchmarking
fn create_test_records(block_count: usize, days: usize) -> Vec<WeatherRecord> {
    let base_date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    let mut records = Vec::with_capacity(block_count * days);

    for day in 0..days {
        for block in 0..block_count {
            let date = base_date + chrono::Duration::days(day as i64);
            records.push(WeatherRecord::new(
                "Punjab",
                "Amritsar",
                format!("Block{}", block),
                date,
                (day % 17) as f64 * 0.5,
                30.0 + (day % 11) as f64,
                18.0 + (day % 7) as f64,
            ));
        }
    }

    records
}

fn benchmark_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_records");

    for block_count in [1, 10, 50].iter() {
        let records = create_test_records(*block_count, 365);
        group.bench_with_input(
            BenchmarkId::from_parameter(block_count),
            &records,
            |b, records| b.iter(|| GroupedLoader::group_records(black_box(records.clone()))),
        );
    }

    group.finish();
}

fn benchmark_filename_decoding(c: &mut Criterion) {
    let names = [
        "Punjab_Amritsar_Ajnala_Rainfall.csv",
        "Punjab_Amritsar_Ajnala_MaxTemp_since2000.png",
        "Haryana_Karnal_Nilokheri_Wholesale_Price_Index.jpg",
    ];

    c.bench_function("decode_variable", |b| {
        b.iter(|| {
            for name in &names {
                let descriptor = FileDescriptor::decode_variable(black_box(name)).unwrap();
                black_box(descriptor.label());
            }
        })
    });

    c.bench_function("decode_quality", |b| {
        b.iter(|| FileDescriptor::decode_quality(black_box("Punjab_Amritsar_Ajnala_Aroma_P90.png")))
    });
}

fn benchmark_chart_preparation(c: &mut Criterion) {
    let catalog = GroupedLoader::group_records(create_test_records(1, 3650));
    let series = catalog.iter().next().unwrap().clone();
    let request = ChartRequest::new(Variable::ALL.to_vec()).since(2005);

    c.bench_function("prepare_chart_10y", |b| {
        b.iter(|| ChartPreparer::prepare(black_box(&series), black_box(&request)))
    });
}

criterion_group!(
    benches,
    benchmark_grouping,
    benchmark_filename_decoding,
    benchmark_chart_preparation
);
criterion_main!(benches);
