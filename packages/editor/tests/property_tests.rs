//! Property-based tests for the operation algebra and normalization
//!
//! Uses proptest to check the invert law, that transformed points keep
//! their character, and that normalized documents stay normalized, across
//! generated trees of nested elements.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use quire_editor::Editor;
use quire_model::{
    Affinity, Document, Element, Node, NodeRef, Operation, Path, Point, Properties, Text, Walk,
};
use serde_json::json;

const KINDS: [&str; 3] = ["quote", "list", "item"];

fn paragraph(text: &str) -> Node {
    Element::of_type("paragraph").with_child(Text::new(text)).into()
}

/// Generate arbitrary leaf text, multi-byte chars included
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,8}",
        "[a-zé€😀]{1,4}",
        Just(String::new()),
    ]
}

/// Generate top-level nodes: elements nested up to three deep over texts
fn arb_forest() -> impl Strategy<Value = Vec<Node>> {
    let leaf = (arb_text(), any::<bool>()).prop_map(|(text, bold)| {
        let text = Text::new(text);
        Node::from(if bold { text.with_prop("bold", true) } else { text })
    });
    let tree = leaf.prop_recursive(3, 32, 4, |inner| {
        (0..KINDS.len(), prop::collection::vec(inner, 0..4))
            .prop_map(|(kind, children)| Element::of_type(KINDS[kind]).with_children(children).into())
    });
    prop::collection::vec(tree, 1..4)
}

/// Rewrites every leaf so that no char appears twice in the tree
fn relabel(nodes: &mut [Node], next: &mut u32) {
    for node in nodes {
        match node {
            Node::Text(text) => {
                let len = text.len();
                text.text = (0..len)
                    .map(|_| {
                        *next += 1;
                        char::from_u32(0x4E00 + *next).unwrap_or('?')
                    })
                    .collect();
            }
            Node::Element(element) => relabel(&mut element.children, next),
        }
    }
}

/// Builds an operation that applies cleanly to `doc`, at any depth.
///
/// Kinds 0-4 are text and structural edits (insert_text, remove_text,
/// split_node, merge_node, move_node); 5-7 remove, insert and set nodes.
/// `picks` seed the choice of paths and offsets.
fn build_op(doc: &Document, kind: u8, picks: [usize; 3], s: &str) -> Option<Operation> {
    let [a, b, c] = picks;
    let entries = doc.nodes(&Walk::default());
    let nodes: Vec<&(NodeRef<'_>, Path)> = entries.iter().filter(|(_, path)| !path.is_root()).collect();
    let containers: Vec<(usize, &Path)> = entries
        .iter()
        .filter_map(|(node, path)| node.children().map(|children| (children.len(), path)))
        .collect();
    let texts = doc.texts();

    let op = match kind % 8 {
        0 => {
            let (text, path) = texts.get(a % texts.len().max(1))?;
            Operation::InsertText {
                path: path.clone(),
                offset: b % (text.len() + 1),
                text: s.to_string(),
            }
        }
        1 => {
            let (text, path) = texts.get(a % texts.len().max(1))?;
            let len = text.len();
            if len == 0 {
                return None;
            }
            let offset = b % len;
            let count = 1 + c % (len - offset);
            Operation::RemoveText {
                path: path.clone(),
                offset,
                text: text.text.chars().skip(offset).take(count).collect(),
            }
        }
        2 => {
            let (node, path) = nodes.get(a % nodes.len().max(1))?;
            let position = match node {
                NodeRef::Text(text) => b % (text.len() + 1),
                NodeRef::Element(element) => b % (element.children.len() + 1),
                NodeRef::Root(_) => return None,
            };
            Operation::SplitNode {
                path: path.clone(),
                position,
                properties: node.properties().cloned().unwrap_or_default(),
            }
        }
        3 => {
            let (node, path) = nodes.get(a % nodes.len().max(1))?;
            let previous = doc.node(&path.previous().ok()?).ok()?;
            let position = match (previous, node) {
                (NodeRef::Text(prev), NodeRef::Text(_)) => prev.len(),
                (NodeRef::Element(prev), NodeRef::Element(_)) => prev.children.len(),
                _ => return None,
            };
            Operation::MergeNode {
                path: path.clone(),
                position,
                properties: node.properties().cloned().unwrap_or_default(),
            }
        }
        4 => {
            let (_, path) = nodes.get(a % nodes.len().max(1))?;
            let targets: Vec<&(usize, &Path)> = containers
                .iter()
                .filter(|(_, target)| *target != path && !target.is_descendant_of(path))
                .collect();
            let (count, parent) = targets.get(b % targets.len().max(1))?;
            // within its own parent the node is counted before it is removed
            let index = if parent.is_parent_of(path) {
                c % count
            } else {
                c % (count + 1)
            };
            Operation::MoveNode {
                path: path.clone(),
                new_path: parent.child(index),
            }
        }
        5 => {
            let (node, path) = nodes.get(a % nodes.len().max(1))?;
            Operation::RemoveNode {
                path: path.clone(),
                node: node.to_node()?,
            }
        }
        6 => {
            let (count, parent) = containers.get(a % containers.len().max(1))?;
            let node = if c % 2 == 0 {
                Text::new(s).into()
            } else {
                paragraph(s)
            };
            Operation::InsertNode {
                path: parent.child(b % (count + 1)),
                node,
            }
        }
        _ => {
            let (node, path) = nodes.get(a % nodes.len().max(1))?;
            let properties: Properties = node
                .properties()
                .and_then(|own| own.get("mark"))
                .map(|old| ("mark".to_string(), old.clone()))
                .into_iter()
                .collect();
            Operation::SetNode {
                path: path.clone(),
                properties,
                new_properties: [("mark".to_string(), json!(s))].into_iter().collect(),
            }
        }
    };
    Some(op)
}

fn is_inline_or_text(node: &Node) -> bool {
    match node {
        Node::Text(_) => true,
        Node::Element(element) => element.is_inline(),
    }
}

/// Fails unless `doc` holds every invariant a normalization pass restores
fn check_normalized(doc: &Document) -> Result<(), TestCaseError> {
    prop_assert!(!doc.children.is_empty(), "root has no children");
    prop_assert!(
        !doc.children.iter().any(is_inline_or_text),
        "inline content at the root"
    );

    for (node, path) in doc.nodes(&Walk::default()) {
        let NodeRef::Element(element) = node else {
            continue;
        };
        prop_assert!(!element.children.is_empty(), "empty element at {}", path);

        let inline = element.children.iter().filter(|child| is_inline_or_text(child)).count();
        prop_assert!(
            inline == 0 || inline == element.children.len(),
            "blocks mixed with inline content at {}",
            path
        );
        for pair in element.children.windows(2) {
            if let (Node::Text(left), Node::Text(right)) = (&pair[0], &pair[1]) {
                prop_assert_ne!(&left.properties, &right.properties, "mergeable texts at {}", path);
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
enum Piece {
    Text(String, bool),
    Link(String),
    Block(String),
}

fn arb_piece() -> impl Strategy<Value = Piece> {
    prop_oneof![
        3 => (arb_text(), any::<bool>()).prop_map(|(text, bold)| Piece::Text(text, bold)),
        1 => arb_text().prop_map(Piece::Link),
        1 => arb_text().prop_map(Piece::Block),
    ]
}

fn build_block(pieces: Vec<Piece>) -> Node {
    let mut block = Element::of_type("paragraph");
    for piece in pieces {
        block = match piece {
            Piece::Text(text, true) => block.with_child(Text::new(text).with_prop("bold", true)),
            Piece::Text(text, false) => block.with_child(Text::new(text)),
            Piece::Link(text) => block.with_child(
                Element::of_type("link")
                    .inline()
                    .with_child(Text::new(text)),
            ),
            Piece::Block(text) => block.with_child(paragraph(&text)),
        };
    }
    block.into()
}

fn arb_messy_document() -> impl Strategy<Value = Document> {
    prop::collection::vec(prop::collection::vec(arb_piece(), 0..5), 0..4)
        .prop_map(|blocks| Document::new(blocks.into_iter().map(build_block).collect()))
}

proptest! {
    #[test]
    fn prop_inverse_restores_tree(
        forest in arb_forest(),
        kind in any::<u8>(),
        picks in any::<[usize; 3]>(),
        s in arb_text(),
    ) {
        let doc = Document::new(forest);
        let Some(op) = build_op(&doc, kind, picks, &s) else {
            return Ok(());
        };

        let applied = doc.apply_to(&op);
        prop_assert!(applied.is_ok(), "{:?} was rejected: {:?}", op, applied);
        let restored = applied.unwrap().apply_to(&op.inverse());
        prop_assert!(restored.is_ok(), "inverse of {:?} was rejected: {:?}", op, restored);
        prop_assert_eq!(restored.unwrap().children, doc.children);
    }

    #[test]
    fn prop_transformed_point_keeps_its_character(
        forest in arb_forest(),
        kind in 0u8..5,
        picks in any::<[usize; 3]>(),
        at in any::<[usize; 2]>(),
    ) {
        let mut children = forest;
        relabel(&mut children, &mut 0);
        let doc = Document::new(children);

        let leaves: Vec<(Text, Path)> = doc
            .texts()
            .into_iter()
            .filter(|(text, _)| !text.is_empty())
            .map(|(text, path)| (text.clone(), path))
            .collect();
        let Some((leaf, path)) = leaves.get(at[0] % leaves.len().max(1)) else {
            return Ok(());
        };
        let point = Point::new(path.clone(), at[1] % leaf.len());
        let expected = leaf.text.chars().nth(point.offset);
        let Some(op) = build_op(&doc, kind, picks, "#") else {
            return Ok(());
        };

        let after = doc.apply_to(&op);
        prop_assert!(after.is_ok(), "{:?} was rejected: {:?}", op, after);
        let after = after.unwrap();
        let moved = point.transform(&op, Some(Affinity::Forward));
        prop_assert!(moved.is_some(), "{:?} lost {:?}", op, point);
        let moved = moved.unwrap();

        match &op {
            // the char itself is gone: the point lands where the removal started
            Operation::RemoveText { path, offset, text }
                if *path == point.path
                    && (*offset..offset + text.chars().count()).contains(&point.offset) =>
            {
                prop_assert_eq!(moved, Point::new(path.clone(), *offset));
            }
            _ => {
                let found = after
                    .leaf(&moved.path)
                    .ok()
                    .and_then(|text| text.text.chars().nth(moved.offset));
                prop_assert_eq!(found, expected, "{:?} moved {:?} to {:?}", op, point, moved);
            }
        }
    }

    #[test]
    fn prop_insert_text_transform_is_undone_by_its_inverse(
        text in "[a-z]{0,10}",
        offset in any::<usize>(),
        at in any::<usize>(),
        inserted in "[a-z]{1,5}",
    ) {
        let len = text.chars().count();
        let op = Operation::InsertText {
            path: Path::from([0, 0]),
            offset: offset % (len + 1),
            text: inserted,
        };
        let point = Point::new([0, 0], at % (len + 1));

        let moved = point.transform(&op, Some(Affinity::Forward)).unwrap();
        prop_assert!(moved.offset >= point.offset);
        let back = moved.transform(&op.inverse(), Some(Affinity::Forward)).unwrap();
        prop_assert_eq!(back, point);
    }

    #[test]
    fn prop_normalize_is_idempotent(doc in arb_messy_document()) {
        let mut editor = Editor::new(doc);
        prop_assert!(editor.normalize().is_ok());
        editor.take_operations();

        editor.normalize_with(true).unwrap();
        prop_assert!(editor.operations().is_empty());
        check_normalized(editor.document())?;
    }

    #[test]
    fn prop_edits_keep_the_document_normalized(
        forest in arb_forest(),
        edits in prop::collection::vec((any::<u8>(), any::<[usize; 3]>(), arb_text()), 1..8),
    ) {
        let mut editor = Editor::new(Document::new(forest));
        prop_assert!(editor.normalize().is_ok());
        check_normalized(editor.document())?;

        for (kind, picks, s) in edits {
            let Some(op) = build_op(editor.document(), kind, picks, &s) else {
                continue;
            };
            let label = format!("{:?}", op);
            let applied = editor.apply(op);
            prop_assert!(applied.is_ok(), "{} failed: {:?}", label, applied);
            check_normalized(editor.document())?;
        }
    }
}
