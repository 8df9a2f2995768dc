use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mina_model::IdGenerator;
use mina_parser::{is_markdown_table, parse_markdown_table};

fn wide_table(columns: usize, rows: usize) -> String {
    let header: Vec<String> = (0..columns).map(|c| format!("col {}", c)).collect();
    let mut source = format!("| {} |\n", header.join(" | "));
    source.push_str(&format!("|{}\n", "---|".repeat(columns)));
    for r in 0..rows {
        let cells: Vec<String> = (0..columns).map(|c| format!("r{}c{}", r, c)).collect();
        source.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    source
}

fn parse_small_table(c: &mut Criterion) {
    let source = "| a | b |\n|---|:-:|\n| 1 | 2 |\n| 3 | 4 |";

    c.bench_function("parse_small_table", |b| {
        b.iter(|| {
            let mut ids = IdGenerator::from_seed("bench");
            parse_markdown_table(black_box(source), &mut ids)
        })
    });
}

fn parse_large_table(c: &mut Criterion) {
    let source = wide_table(12, 500);

    c.bench_function("parse_large_table", |b| {
        b.iter(|| {
            let mut ids = IdGenerator::from_seed("bench");
            parse_markdown_table(black_box(&source), &mut ids)
        })
    });
}

fn detect_table(c: &mut Criterion) {
    let source = wide_table(6, 50);

    c.bench_function("detect_table", |b| b.iter(|| is_markdown_table(black_box(&source))));
}

criterion_group!(benches, parse_small_table, parse_large_table, detect_table);
criterion_main!(benches);
