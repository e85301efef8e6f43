use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use quire_editor::{
    DeleteOptions, Distance, Editor, NodeOptions, NodesOptions, TextOptions, Unit,
};
use quire_model::{Document, Element, Matcher, Node, Path, Point, Text};

fn paragraph(text: &str) -> Node {
    Element::of_type("paragraph").with_child(Text::new(text)).into()
}

fn document(blocks: usize) -> Document {
    Document::new(
        (0..blocks)
            .map(|i| paragraph(&format!("Paragraph {} with a few words in it", i)))
            .collect(),
    )
}

fn normalized(blocks: usize) -> Editor {
    let mut editor = Editor::new(document(blocks));
    editor.normalize().unwrap();
    editor
}

fn type_a_sentence(c: &mut Criterion) {
    c.bench_function("type_a_sentence", |b| {
        b.iter_batched(
            || {
                let mut editor = normalized(10);
                editor.select(Point::new([5, 0], 0)).unwrap();
                editor
            },
            |mut editor| {
                for ch in "The quick brown fox jumps over the lazy dog".chars() {
                    editor
                        .insert_text(&ch.to_string(), TextOptions::default())
                        .unwrap();
                }
                editor
            },
            BatchSize::SmallInput,
        )
    });
}

fn enter_and_backspace(c: &mut Criterion) {
    c.bench_function("enter_and_backspace_100_blocks", |b| {
        b.iter_batched(
            || {
                let mut editor = normalized(100);
                editor.select(Point::new([50, 0], 9)).unwrap();
                editor
            },
            |mut editor| {
                editor.split_nodes(NodeOptions::default().always()).unwrap();
                editor.delete(DeleteOptions::default().reversed()).unwrap();
                editor
            },
            BatchSize::SmallInput,
        )
    });
}

fn normalize_messy_document(c: &mut Criterion) {
    // every paragraph is split into single-char texts that have to merge
    let messy = Document::new(
        (0..50)
            .map(|_| {
                Node::from(
                    "abcdefghij"
                        .chars()
                        .fold(Element::of_type("paragraph"), |block, ch| {
                            block.with_child(Text::new(ch.to_string()))
                        }),
                )
            })
            .collect(),
    );

    c.bench_function("normalize_messy_50_blocks", |b| {
        b.iter_batched(
            || Editor::new(messy.clone()),
            |mut editor| {
                editor.normalize().unwrap();
                editor
            },
            BatchSize::SmallInput,
        )
    });
}

fn query_nodes(c: &mut Criterion) {
    let editor = normalized(500);

    c.bench_function("nodes_all_texts_500_blocks", |b| {
        b.iter(|| {
            editor
                .nodes(black_box(&NodesOptions::at(Path::default()).matching(Matcher::Text)))
                .unwrap()
                .len()
        })
    });

    c.bench_function("after_word_500_blocks", |b| {
        b.iter(|| {
            editor
                .after(
                    black_box(Point::new([250, 0], 0)),
                    Distance::new(5, Unit::Word),
                )
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    type_a_sentence,
    enter_and_backspace,
    normalize_messy_document,
    query_nodes
);
criterion_main!(benches);
