//! Benchmarks for outline inference performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks run synthetic span sets through the pipeline stages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pdftoc::pipeline::FragmentCombiner;
use pdftoc::{extract_outline, BBox, ExtractOptions, Span};

fn span(text: &str, page: usize, x: f32, y: f32, size: f32, order: usize) -> Span {
    let width = text.chars().count() as f32 * size * 0.5;
    Span::new(
        text,
        BBox::new(x, y, x + width, y + size),
        page,
        size,
        "Helvetica",
        order,
    )
}

/// Synthetic document: a title, numbered section heads, paragraph text.
fn synthetic_spans(pages: usize) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut order = 0;
    for page in 0..pages {
        if page == 0 {
            spans.push(span("Benchmark Corpus Report", 0, 72.0, 40.0, 24.0, order));
            order += 1;
        }
        spans.push(span(
            &format!("{}. Section heading", page + 1),
            page,
            72.0,
            90.0,
            16.0,
            order,
        ));
        order += 1;

        // Four-line paragraphs separated by wider breaks.
        let mut y = 130.0;
        for line in 0..36 {
            spans.push(span(
                "a running line of ordinary paragraph text for the benchmark",
                page,
                72.0,
                y,
                12.0,
                order,
            ));
            order += 1;
            y += if line % 4 == 3 { 30.0 } else { 16.0 };
        }
    }
    spans
}

/// Every line picked apart into same-line fragments, worst case for merging.
fn fragmented_spans(pages: usize) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut order = 0;
    for page in 0..pages {
        let mut y = 100.0;
        for _ in 0..40 {
            let mut x = 72.0;
            for part in ["frag", "ments of", "a line", "of text"] {
                let width = part.chars().count() as f32 * 6.0;
                spans.push(Span::new(
                    part,
                    BBox::new(x, y, x + width, y + 12.0),
                    page,
                    12.0,
                    "Helvetica",
                    order,
                ));
                order += 1;
                x += width + 2.0;
            }
            y += 20.0;
        }
    }
    spans
}

/// Benchmark the full pipeline at various document sizes.
fn bench_outline_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline_extraction");
    let options = ExtractOptions::default();

    for pages in [1usize, 10, 50] {
        let spans = synthetic_spans(pages);
        group.bench_function(format!("{}_pages", pages), |b| {
            b.iter(|| extract_outline(black_box(&spans), &options));
        });
    }

    group.finish();
}

/// Benchmark span merging over heavily fragmented input.
fn bench_fragment_combination(c: &mut Criterion) {
    let options = ExtractOptions::default();
    let spans = fragmented_spans(10);

    c.bench_function("combine_fragmented_spans", |b| {
        b.iter(|| FragmentCombiner::new(&options).combine(black_box(&spans)));
    });
}

/// Benchmark options builder overhead.
fn bench_options_builder(c: &mut Criterion) {
    c.bench_function("options_builder", |b| {
        b.iter(|| {
            ExtractOptions::new()
                .with_max_heading_levels(black_box(4))
                .with_max_heading_words(16)
                .with_body_size_tolerance(0.12)
        });
    });
}

criterion_group!(
    benches,
    bench_outline_extraction,
    bench_fragment_combination,
    bench_options_builder,
);
criterion_main!(benches);
