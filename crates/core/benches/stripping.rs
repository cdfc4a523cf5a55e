use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use htmlstrip_core::{strip_comments, strip_element, strip_entities, strip_html, strip_tags};

fn bench_strip_html(c: &mut Criterion) {
    let small = std::fs::read_to_string("../../tests/fixtures/hello.html").unwrap();
    let medium = std::fs::read_to_string("../../tests/fixtures/pangrams.html").unwrap();
    let large = medium.repeat(200);

    let mut group = c.benchmark_group("strip_html");

    group.bench_with_input(BenchmarkId::new("small", "hello"), &small, |b, html| {
        b.iter(|| strip_html(black_box(html)))
    });

    group.bench_with_input(BenchmarkId::new("medium", "pangrams"), &medium, |b, html| {
        b.iter(|| strip_html(black_box(html)))
    });

    group.bench_with_input(BenchmarkId::new("large", "pangrams x200"), &large, |b, html| {
        b.iter(|| strip_html(black_box(html)))
    });

    group.finish();
}

fn bench_passes(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/pangrams.html").unwrap().repeat(50);

    c.bench_function("strip_element", |b| b.iter(|| strip_element(black_box(&html), "script")));
    c.bench_function("strip_comments", |b| b.iter(|| strip_comments(black_box(&html))));
    c.bench_function("strip_tags", |b| b.iter(|| strip_tags(black_box(&html))));
    c.bench_function("strip_entities", |b| b.iter(|| strip_entities(black_box(&html))));
}

fn bench_pathological(c: &mut Criterion) {
    let unclosed = "<".repeat(10_000);
    let ampersands = "&".repeat(10_000);

    c.bench_function("unclosed_tags", |b| b.iter(|| strip_tags(black_box(&unclosed))));
    c.bench_function("bare_ampersands", |b| b.iter(|| strip_entities(black_box(&ampersands))));
}

criterion_group!(benches, bench_strip_html, bench_passes, bench_pathological);
criterion_main!(benches);
