//! Benchmarks for the Healthboard query path
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use healthboard::dataset::{parse_document, Dataset, FieldMapping, Record};
use healthboard::query::{project, query, QueryOptions, Selection, YearRange};

const LOCATIONS: [&str; 5] = ["AL", "AK", "AZ", "GA", "WY"];
const TOPICS: [&str; 3] = ["Obesity", "Physical Activity", "Fruits and Vegetables"];

fn create_test_records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            Record::new(
                LOCATIONS[i % LOCATIONS.len()],
                TOPICS[(i / LOCATIONS.len()) % TOPICS.len()],
                2025 - (i % 15) as i32,
            )
            .with_value("Weighted_Data_Value", 20.0 + (i % 100) as f64 / 10.0)
            .with_value("Weighted_Low_Confidence_Limit", 18.0)
            .with_value("Weighted_High_Confidence_Limit", 32.0)
            .with_value("Total_Sample_Size", 1000.0 + i as f64)
        })
        .collect()
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let selection = Selection::new("GA", "Obesity");

    for size in [1_000, 10_000, 100_000] {
        let dataset = Dataset::new(create_test_records(size)).unwrap();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("filter_sort_{}", size), |b| {
            b.iter(|| query(black_box(&dataset), &selection, &QueryOptions::new()))
        });

        let ranged = QueryOptions::new().with_year_range(YearRange::new(2011, 2021).unwrap());
        group.bench_function(format!("filter_sort_ranged_{}", size), |b| {
            b.iter(|| query(black_box(&dataset), &selection, &ranged))
        });
    }

    group.finish();
}

fn bench_project(c: &mut Criterion) {
    let dataset = Dataset::new(create_test_records(10_000)).unwrap();
    let result = query(&dataset, &Selection::new("GA", "Obesity"), &QueryOptions::new());
    let specs = FieldMapping::nutrition().series;

    c.bench_function("project_nutrition", |b| {
        b.iter(|| project(black_box(&result), &specs))
    });
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let mapping = FieldMapping::nutrition();

    for size in [1_000, 10_000] {
        let rows: Vec<_> = create_test_records(size)
            .iter()
            .map(|r| {
                let mut row = r.fields().clone();
                row.insert("State".into(), r.location.clone().into());
                row.insert("Question".into(), r.topic.clone().into());
                row.insert("Year".into(), r.year.into());
                serde_json::Value::Object(row)
            })
            .collect();
        let bytes = serde_json::to_vec(&rows).unwrap();

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_function(format!("document_{}", size), |b| {
            b.iter(|| parse_document(black_box(&bytes), &mapping).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_query, bench_project, bench_parse);
criterion_main!(benches);
