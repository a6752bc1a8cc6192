use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use emberdown::{Extensions, render_html};

fn gen_heading_doc(n: usize) -> String {
    (1..=n)
        .map(|i| format!("# Heading {i}\n\nSome paragraph text under heading {i}.\n"))
        .collect()
}

fn gen_nested_quotes(depth: usize) -> String {
    let mut s = String::new();
    for i in 0..depth {
        s.push_str(&"> ".repeat(i + 1));
        s.push_str(&format!("level {i}\n"));
    }
    s
}

fn gen_table(rows: usize, cols: usize) -> String {
    let mut s = String::new();
    s.push('|');
    for c in 0..cols {
        s.push_str(&format!(" col{c} |"));
    }
    s.push('\n');
    s.push('|');
    for _ in 0..cols {
        s.push_str(" --- |");
    }
    s.push('\n');
    for r in 0..rows {
        s.push('|');
        for c in 0..cols {
            s.push_str(&format!(" r{r}c{c} |"));
        }
        s.push('\n');
    }
    s
}

fn gen_inline_heavy() -> String {
    let mut s = String::new();
    for i in 0..200 {
        s.push_str(&format!(
            "This has **bold**, *italic*, `code`, ~~strike~~, [link](http://x.com/{i}), and <b@x{i}.me>.\n\n"
        ));
    }
    s
}

fn gen_reference_heavy(n: usize) -> String {
    let mut s = String::new();
    for i in 0..n {
        s.push_str(&format!("use [ref {i}][r{i}] here\n\n"));
    }
    for i in 0..n {
        s.push_str(&format!("[r{i}]: http://example.com/{i} \"title {i}\"\n"));
    }
    s
}

fn bench_parse(c: &mut Criterion) {
    let exts = Extensions::all();

    let mut group = c.benchmark_group("render");

    let headings = gen_heading_doc(500);
    group.bench_function("headings", |b| {
        b.iter(|| render_html(black_box(headings.as_bytes()), &exts))
    });

    let quotes = gen_nested_quotes(12);
    group.bench_function("nested_quotes", |b| {
        b.iter(|| render_html(black_box(quotes.as_bytes()), &exts))
    });

    let table = gen_table(200, 6);
    group.bench_function("table", |b| {
        b.iter(|| render_html(black_box(table.as_bytes()), &exts))
    });

    let inline = gen_inline_heavy();
    group.bench_function("inline_heavy", |b| {
        b.iter(|| render_html(black_box(inline.as_bytes()), &exts))
    });

    let refs = gen_reference_heavy(200);
    group.bench_function("reference_heavy", |b| {
        b.iter(|| render_html(black_box(refs.as_bytes()), &exts))
    });

    group.finish();

    let mut sizes = c.benchmark_group("document_size");
    for n in [10usize, 100, 1000] {
        let doc = gen_heading_doc(n);
        sizes.bench_with_input(BenchmarkId::from_parameter(n), &doc, |b, doc| {
            b.iter(|| render_html(black_box(doc.as_bytes()), &exts))
        });
    }
    sizes.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
