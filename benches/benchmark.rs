use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use stock_selector::catalog::FilterCatalog;
use stock_selector::compiler::{Compiler, SelectionRequest};
use stock_selector::subquery::{split_statements, BaseQuery};

fn criterion_benchmark(c: &mut Criterion) {
    let catalog = FilterCatalog::cn_stock().unwrap();
    let compiler = Compiler::new(&catalog);

    let defaults = SelectionRequest::new();
    c.bench_function("compile defaults", |b| b.iter(|| compiler.compile(black_box(&defaults)).unwrap()));

    let industries: Vec<String> = catalog
        .dimension("sw2021_industries")
        .unwrap()
        .all_labels()
        .into_iter()
        .step_by(2)
        .collect();
    let busy = SelectionRequest::new()
        .select("exchanges", ["上交所", "深交所"])
        .select("indexes", ["沪深300", "中证500", "中证1000"])
        .select("st_statuses", ["正常"])
        .select("sw2021_industries", industries)
        .drop_suspended(true);
    c.bench_function("compile all dimensions", |b| b.iter(|| compiler.compile(black_box(&busy)).unwrap()));

    let script: String = (0..200)
        .map(|i| format!("CREATE TEMP VIEW v{i} AS SELECT date, instrument, 'x;{i}' AS tag FROM cn_stock_bar1d;\n"))
        .collect();
    c.bench_function("split 200 statements", |b| b.iter(|| split_statements(black_box(&script)).unwrap()));

    let composed = busy.clone().base_query(BaseQuery::Sql(script.clone()));
    c.bench_function("compile onto base query", |b| b.iter(|| compiler.compile(black_box(&composed)).unwrap()));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
