use criterion::{black_box, criterion_group, criterion_main, Criterion};
use maily_parser::{parse, serialize, Node};

fn newsletter_html(rows: usize) -> String {
    let mut html = String::from(r#"<h1 style="text-align: center">Weekly digest</h1>"#);
    for row in 0..rows {
        html.push_str(&format!(
            r#"<div data-type="section" style="background-color: transparent;--bg-color: #ffffff; padding-top: 16px">
                <div data-type="columns">
                    <div data-type="column" data-column-id="a{row}" style="width: 50%;max-width:50%; padding-left: 8px">
                        <p>Left <strong>column</strong> {row}</p>
                    </div>
                    <div data-type="column" data-column-id="b{row}" style="width: 50%;max-width:50%">
                        <p>Hello <span data-type="variable" data-id="name">{{{{name}}}}</span></p>
                    </div>
                </div>
            </div>"#,
            row = row
        ));
    }
    html
}

fn parse_small_template(c: &mut Criterion) {
    let html = newsletter_html(1);
    c.bench_function("parse_small_template", |b| b.iter(|| parse(black_box(&html))));
}

fn parse_large_template(c: &mut Criterion) {
    let html = newsletter_html(100);
    c.bench_function("parse_large_template", |b| b.iter(|| parse(black_box(&html))));
}

fn serialize_large_template(c: &mut Criterion) {
    let doc: Node = match parse(&newsletter_html(100)) {
        Ok(doc) => doc,
        Err(err) => panic!("fixture failed to parse: {}", err),
    };
    c.bench_function("serialize_large_template", |b| b.iter(|| serialize(black_box(&doc)).unwrap()));
}

criterion_group!(benches, parse_small_template, parse_large_template, serialize_large_template);
criterion_main!(benches);
