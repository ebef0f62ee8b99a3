//! Benchmarks for tree composition.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sw_compose::{BoxError, Composer, FactoryRenderer, RendererRegistry};

/// Generate a document with `cards` marker elements among generic markup.
fn generate_document(cards: usize) -> String {
    let mut html = String::from("<main>");
    for i in 0..cards {
        html.push_str(&format!(
            r#"<section id="s{i}"><h2>Section {i}</h2><x-card class="c"><p>Body {i}</p></x-card></section>"#
        ));
    }
    html.push_str("</main>");
    html
}

fn registry() -> RendererRegistry {
    let card = FactoryRenderer::new((), |_: &()| async {
        Ok::<_, BoxError>(r#"<article class="card"><header>Card</header><slot></slot></article>"#.to_owned())
    });
    RendererRegistry::builder()
        .register("x-card", card)
        .build()
        .unwrap()
}

fn bench_compose_varying_sizes(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let composer = Composer::xml();
    let registry = registry();

    let mut group = c.benchmark_group("compose_markup");
    for cards in [10, 100, 1000] {
        let html = generate_document(cards);
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(cards), &html, |b, html| {
            b.to_async(&runtime)
                .iter(|| composer.compose_markup(html, &registry));
        });
    }
    group.finish();
}

fn bench_identity(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let composer = Composer::xml();
    let registry = RendererRegistry::default();
    let html = generate_document(100);

    c.bench_function("compose_unregistered_100", |b| {
        b.to_async(&runtime)
            .iter(|| composer.compose_markup(&html, &registry));
    });
}

criterion_group!(benches, bench_compose_varying_sizes, bench_identity);
criterion_main!(benches);
