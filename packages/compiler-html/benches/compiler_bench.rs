use criterion::{black_box, criterion_group, criterion_main, Criterion};
use maily_compiler_html::{compile, compile_with_options, Bindings, CompileOptions};
use maily_parser::{Node, NodeType};
use serde_json::json;

fn catalog(rows: usize) -> Node {
    let mut content = vec![Node::heading(1, vec![Node::text("Catalog")])];
    for row in 0..rows {
        content.push(Node::section(vec![Node::columns(vec![
            Node::column(format!("a{}", row), Some(50.0)),
            Node::column(format!("b{}", row), Some(50.0)),
        ])]));
    }
    content.push(Node::for_each(
        "products",
        vec![Node::paragraph(vec![Node::text("Product: "), Node::variable("name")])],
    ));
    content.push(Node::new(NodeType::Spacer));
    Node::doc(content)
}

fn product_bindings(count: usize) -> Bindings {
    let products: Vec<_> = (0..count).map(|i| json!({ "name": format!("Product {}", i) })).collect();
    Bindings::new().with("products", products)
}

fn compile_small_template(c: &mut Criterion) {
    let doc = catalog(1);
    let bindings = Bindings::new();
    c.bench_function("compile_small_template", |b| b.iter(|| compile(black_box(&doc), &bindings)));
}

fn compile_large_template(c: &mut Criterion) {
    let doc = catalog(100);
    let bindings = product_bindings(100);
    c.bench_function("compile_large_template", |b| b.iter(|| compile(black_box(&doc), &bindings)));
}

fn compile_full_document_pretty(c: &mut Criterion) {
    let doc = catalog(20);
    let bindings = product_bindings(20);
    let options = CompileOptions {
        pretty: true,
        full_document: true,
        ..Default::default()
    };
    c.bench_function("compile_full_document_pretty", |b| {
        b.iter(|| compile_with_options(black_box(&doc), &bindings, &options))
    });
}

criterion_group!(
    benches,
    compile_small_template,
    compile_large_template,
    compile_full_document_pretty
);
criterion_main!(benches);
