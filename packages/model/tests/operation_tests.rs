//! Operation algebra tests: apply, invert, and location transforms together

use pretty_assertions::assert_eq;
use quire_model::{
    Affinity, Document, Element, Node, Operation, Path, Point, Properties, Range, RangeAffinity,
    Text,
};
use serde_json::json;

fn paragraph(text: &str) -> Node {
    Element::of_type("paragraph").with_child(Text::new(text)).into()
}

fn props(pairs: &[(&str, serde_json::Value)]) -> Properties {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// Applies `op`, then its inverse, and checks the tree came back
fn assert_round_trip(doc: &Document, op: &Operation) -> Document {
    let applied = doc.apply_to(op).unwrap();
    let restored = applied.apply_to(&op.inverse()).unwrap();
    assert_eq!(restored.children, doc.children, "inverse of {} did not restore", op.kind());
    applied
}

#[test]
fn test_remove_then_invert_restores_order() {
    let doc = Document::new(vec![paragraph("A"), paragraph("B")]);
    let op = Operation::RemoveNode {
        path: [0].into(),
        node: paragraph("A"),
    };

    let removed = doc.apply_to(&op).unwrap();
    assert_eq!(removed.children, vec![paragraph("B")]);

    let restored = removed.apply_to(&op.inverse()).unwrap();
    assert_eq!(restored.children, vec![paragraph("A"), paragraph("B")]);
}

#[test]
fn test_insert_text_shifts_point_after_it() {
    let doc = Document::new(vec![paragraph("word")]);
    let op = Operation::InsertText {
        path: [0, 0].into(),
        offset: 2,
        text: "X".into(),
    };
    let next = doc.apply_to(&op).unwrap();
    assert_eq!(next.leaf(&[0, 0].into()).unwrap().text, "woXrd");
    assert_eq!(
        Point::new([0, 0], 4).transform(&op, Some(Affinity::Forward)),
        Some(Point::new([0, 0], 5))
    );
}

#[test]
fn test_merge_texts_and_split_back() {
    let doc = Document::new(vec![Element::of_type("paragraph")
        .with_child(Text::new("one"))
        .with_child(Text::new("two"))
        .into()]);
    let op = Operation::MergeNode {
        path: [0, 1].into(),
        position: 3,
        properties: Properties::new(),
    };
    let merged = assert_round_trip(&doc, &op);
    assert_eq!(merged.children, vec![paragraph("onetwo")]);

    let split = merged.apply_to(&op.inverse()).unwrap();
    assert_eq!(split.node(&[0].into()).unwrap().children().unwrap().len(), 2);
}

#[test]
fn test_split_text_moves_range_into_new_leaf() {
    let doc = Document::new(vec![Text::new("hello").into()]);
    let op = Operation::SplitNode {
        path: [0].into(),
        position: 2,
        properties: Properties::new(),
    };
    let split = assert_round_trip(&doc, &op);
    assert_eq!(split.children, vec![Node::text("he"), Node::text("llo")]);

    let range = Range::collapsed(Point::new([0], 4));
    assert_eq!(
        range.transform(&op, Some(RangeAffinity::Inward)),
        Some(Range::collapsed(Point::new([1], 2)))
    );
}

#[test]
fn test_split_carries_properties_and_merge_restores() {
    let doc = Document::new(vec![Element::of_type("paragraph")
        .with_prop("align", "center")
        .with_child(Text::new("a"))
        .with_child(Text::new("b"))
        .into()]);
    let op = Operation::SplitNode {
        path: [0].into(),
        position: 1,
        properties: props(&[("type", json!("paragraph")), ("align", json!("center"))]),
    };
    let split = assert_round_trip(&doc, &op);
    assert_eq!(split.children.len(), 2);
    assert_eq!(
        split.node(&[1].into()).unwrap().properties(),
        Some(&props(&[("type", json!("paragraph")), ("align", json!("center"))]))
    );
}

#[test]
fn test_every_kind_inverts() {
    let doc = Document::new(vec![
        Element::of_type("paragraph")
            .with_prop("align", "left")
            .with_child(Text::new("one"))
            .with_child(Text::new("two").with_prop("bold", true))
            .into(),
        Element::of_type("quote")
            .with_child(paragraph("three"))
            .with_child(paragraph("four"))
            .into(),
        paragraph("five"),
    ]);

    let ops = vec![
        Operation::InsertNode {
            path: [1, 1].into(),
            node: paragraph("new"),
        },
        Operation::RemoveNode {
            path: [1, 0].into(),
            node: paragraph("three"),
        },
        Operation::SetNode {
            path: [0].into(),
            properties: props(&[("align", json!("left"))]),
            new_properties: props(&[("align", json!("right")), ("indent", json!(1))]),
        },
        Operation::SetNode {
            path: [0, 1].into(),
            properties: props(&[("bold", json!(true))]),
            new_properties: Properties::new(),
        },
        Operation::InsertText {
            path: [2, 0].into(),
            offset: 4,
            text: "!".into(),
        },
        Operation::RemoveText {
            path: [0, 0].into(),
            offset: 1,
            text: "ne".into(),
        },
        Operation::SplitNode {
            path: [1].into(),
            position: 1,
            properties: props(&[("type", json!("quote"))]),
        },
        Operation::MergeNode {
            path: [1, 1].into(),
            position: 1,
            properties: props(&[("type", json!("paragraph"))]),
        },
    ];

    for op in &ops {
        assert_round_trip(&doc, op);
    }
}

#[test]
fn test_move_node_inverts_for_every_prefix_relation() {
    let doc = Document::new(vec![
        Element::of_type("list")
            .with_child(paragraph("a"))
            .with_child(paragraph("b"))
            .with_child(paragraph("c"))
            .into(),
        Element::of_type("list")
            .with_child(paragraph("d"))
            .with_child(paragraph("e"))
            .into(),
        paragraph("f"),
    ]);

    let moves: Vec<(Path, Path)> = vec![
        // siblings, forwards and backwards
        ([0, 0].into(), [0, 2].into()),
        ([0, 2].into(), [0, 0].into()),
        // out of a list into a later one
        ([0, 1].into(), [1, 1].into()),
        // from a later list into an earlier one
        ([1, 0].into(), [0, 3].into()),
        // a top-level node into a later subtree whose index shifts
        ([0].into(), [1, 1].into()),
        // a top-level node into an earlier subtree
        ([2].into(), [0, 0].into()),
        // out of its parent to the top level
        ([1, 1].into(), [0].into()),
    ];

    for (path, new_path) in moves {
        let op = Operation::MoveNode { path, new_path };
        assert_round_trip(&doc, &op);
    }
}

#[test]
fn test_move_into_later_subtree_lands_under_shifted_parent() {
    let doc = Document::new(vec![paragraph("x"), paragraph("y"), paragraph("z")]);
    let op = Operation::MoveNode {
        path: [0].into(),
        new_path: [2, 1].into(),
    };
    let moved = doc.apply_to(&op).unwrap();
    // [2] shifted to [1] when [0] was removed
    assert_eq!(moved.string(&[1].into()).unwrap(), "zx");
    assert_eq!(
        Path::from([0]).transform(&op, None),
        Some(Path::from([1, 1]))
    );
}

#[test]
fn test_failed_operation_leaves_document_unchanged() {
    let doc = Document::new(vec![paragraph("a")]);
    let bad = vec![
        Operation::RemoveNode {
            path: [3].into(),
            node: paragraph("a"),
        },
        Operation::MergeNode {
            path: [0].into(),
            position: 0,
            properties: Properties::new(),
        },
        Operation::SplitNode {
            path: Path::root(),
            position: 0,
            properties: Properties::new(),
        },
        Operation::RemoveText {
            path: [0, 0].into(),
            offset: 0,
            text: "abc".into(),
        },
        Operation::InsertText {
            path: [0].into(),
            offset: 0,
            text: "x".into(),
        },
    ];
    for op in bad {
        let mut copy = doc.clone();
        assert!(copy.apply(&op).is_err(), "{} should fail", op.kind());
        assert_eq!(copy, doc);
    }
}

#[test]
fn test_selection_round_trips_through_json() {
    let doc: Document = serde_json::from_value(json!({
        "children": [{"type": "paragraph", "children": [{"text": "hi", "bold": true}]}],
        "selection": {
            "anchor": {"path": [0, 0], "offset": 0},
            "focus": {"path": [0, 0], "offset": 2}
        }
    }))
    .unwrap();
    assert_eq!(
        doc.selection,
        Some(Range::new(Point::new([0, 0], 0), Point::new([0, 0], 2)))
    );
    assert_eq!(
        doc.leaf(&[0, 0].into()).unwrap().properties,
        props(&[("bold", json!(true))])
    );
}
