use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mina_compiler_html::{compile_to_html, serialize_to_html, CompileOptions};
use mina_model::{builders, ContainerNode, EditorNode, Formats, IdGenerator, NodeType, TextNode};

fn large_document(blocks: usize) -> EditorNode {
    let mut ids = IdGenerator::from_seed("bench");
    let mut children = Vec::with_capacity(blocks * 2);
    for i in 0..blocks {
        let block = TextNode::new(ids.new_id(), NodeType::P, "").with_runs(vec![
            TextNode::new(ids.new_id(), NodeType::Span, format!("Paragraph {} ", i)),
            TextNode::new(ids.new_id(), NodeType::Span, "with bold").with_formats(Formats::bold()),
            builders::link(&mut ids, "/next", " & a link"),
        ]);
        children.push(block.into());
        children.push(builders::list(&mut ids, NodeType::Ol, vec!["one", "two"]));
    }
    children.push(builders::table(&mut ids, 4, 20));
    ContainerNode::new("root", NodeType::Container, children).into()
}

fn compact(c: &mut Criterion) {
    let doc = large_document(500);
    c.bench_function("serialize_compact_500", |b| {
        b.iter(|| serialize_to_html(black_box(&doc)))
    });
}

fn pretty(c: &mut Criterion) {
    let doc = large_document(500);
    c.bench_function("serialize_pretty_500", |b| {
        b.iter(|| compile_to_html(black_box(&doc), CompileOptions::default()))
    });
}

criterion_group!(benches, compact, pretty);
criterion_main!(benches);
