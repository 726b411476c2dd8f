//! Rewrite Benchmark
//!
//! Measures parse + rewrite + print throughput on generated class files.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use extsuper::{RewriteOptions, rewrite_source};
use extsuper::emitter::print_to_string;
use extsuper::parser::ParserState;

/// `classes` define calls, each with one async and one sync method.
fn generate_source(classes: usize) -> String {
    let mut source = String::new();
    for i in 0..classes {
        source.push_str(&format!(
            "Ext.define('App.view.Panel{i}', {{\n    extend: 'App.view.Base',\n    title: 'Panel {i}',\n\n    load: async function (options) {{\n        const records = await this.store.load(options);\n        await this.callParent(arguments);\n        return records.filter((r) => r.get('visible'));\n    }},\n\n    init: function () {{\n        this.callParent(arguments);\n    }}\n}});\n\n"
        ));
    }
    source
}

fn bench_rewrite(c: &mut Criterion) {
    let options = RewriteOptions::default();
    let mut group = c.benchmark_group("rewrite");

    for classes in [1, 10, 100] {
        let source = generate_source(classes);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(classes), &source, |b, source| {
            b.iter(|| rewrite_source("bench.js", black_box(source), &options));
        });
    }
    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let source = generate_source(100);
    let mut group = c.benchmark_group("parse_print");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("unmodified", |b| {
        b.iter(|| {
            let mut parser = ParserState::new("bench.js".to_string(), black_box(&source).clone());
            let root = parser.parse_source_file();
            print_to_string(parser.get_arena(), root)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_rewrite, bench_round_trip);
criterion_main!(benches);
