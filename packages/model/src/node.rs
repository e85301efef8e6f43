//! # Node tree
//!
//! The document is a value-typed tree: a root [`Document`] owning ordered
//! children, [`Element`] ancestors and [`Text`] leaves. There are no parent
//! pointers; a node's parent is always derived from its [`Path`].
//!
//! Elements and texts carry an open property bag. The keys `text` and
//! `children` are reserved for structure; `void` and `inline` are boolean
//! flags the default schema reads.

use crate::error::{LocationError, LocationResult};
use crate::path::Path;
use crate::range::Range;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Open map of named node properties
pub type Properties = BTreeMap<String, Value>;

pub const VOID_KEY: &str = "void";
pub const INLINE_KEY: &str = "inline";
pub const RESERVED_KEYS: [&str; 2] = ["text", "children"];

/// A descendant of the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Text(Text),
    Element(Element),
}

/// Leaf node holding string content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
    #[serde(flatten)]
    pub properties: Properties,
}

/// Ancestor node with ordered children
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub children: Vec<Node>,
    #[serde(flatten)]
    pub properties: Properties,
}

/// The root ancestor: top-level children plus the current selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Range>,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            properties: Properties::new(),
        }
    }

    /// Sets a property. The reserved keys `text` and `children` are
    /// ignored, since they would change which kind of node the JSON form
    /// reads back as.
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        insert_prop(&mut self.properties, key.into(), value.into());
        self
    }

    /// Length in chars, the unit point offsets are measured in
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Content between two char offsets
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let from = byte_offset(&self.text, start);
        let to = byte_offset(&self.text, end.max(start));
        &self.text[from..to]
    }
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element with a `type` property, the usual way blocks are named
    pub fn of_type(kind: impl Into<String>) -> Self {
        let kind: String = kind.into();
        Self::new().with_prop("type", kind)
    }

    /// Sets a property, ignoring the reserved keys like [`Text::with_prop`]
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        insert_prop(&mut self.properties, key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn void(self) -> Self {
        self.with_prop(VOID_KEY, true)
    }

    pub fn inline(self) -> Self {
        self.with_prop(INLINE_KEY, true)
    }

    pub fn is_void(&self) -> bool {
        flag(&self.properties, VOID_KEY)
    }

    pub fn is_inline(&self) -> bool {
        flag(&self.properties, INLINE_KEY)
    }

    pub fn kind(&self) -> Option<&str> {
        self.properties.get("type").and_then(Value::as_str)
    }
}

fn insert_prop(properties: &mut Properties, key: String, value: Value) {
    if RESERVED_KEYS.contains(&key.as_str()) {
        debug!(%key, "ignoring reserved property");
        return;
    }
    properties.insert(key, value);
}

fn flag(properties: &Properties, key: &str) -> bool {
    matches!(properties.get(key), Some(Value::Bool(true)))
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(Text::new(text))
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn properties(&self) -> &Properties {
        match self {
            Node::Text(text) => &text.properties,
            Node::Element(element) => &element.properties,
        }
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        match self {
            Node::Text(text) => &mut text.properties,
            Node::Element(element) => &mut element.properties,
        }
    }

    /// Copy of the property bag, without the text or children
    pub fn extract_properties(&self) -> Properties {
        self.properties().clone()
    }

    /// Borrowed view used by the tree queries
    pub fn view(&self) -> NodeRef<'_> {
        match self {
            Node::Text(text) => NodeRef::Text(text),
            Node::Element(element) => NodeRef::Element(element),
        }
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// Borrowed view of any node in the tree, root included
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Root(&'a Document),
    Element(&'a Element),
    Text(&'a Text),
}

impl<'a> NodeRef<'a> {
    pub fn children(self) -> Option<&'a [Node]> {
        match self {
            NodeRef::Root(doc) => Some(&doc.children),
            NodeRef::Element(element) => Some(&element.children),
            NodeRef::Text(_) => None,
        }
    }

    pub fn as_text(self) -> Option<&'a Text> {
        match self {
            NodeRef::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_element(self) -> Option<&'a Element> {
        match self {
            NodeRef::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_root(self) -> bool {
        matches!(self, NodeRef::Root(_))
    }

    pub fn is_text(self) -> bool {
        matches!(self, NodeRef::Text(_))
    }

    pub fn is_element(self) -> bool {
        matches!(self, NodeRef::Element(_))
    }

    /// The root has no property bag
    pub fn properties(self) -> Option<&'a Properties> {
        match self {
            NodeRef::Root(_) => None,
            NodeRef::Element(element) => Some(&element.properties),
            NodeRef::Text(text) => Some(&text.properties),
        }
    }

    pub fn child(self, index: usize) -> Option<NodeRef<'a>> {
        self.children()?.get(index).map(Node::view)
    }

    /// Descend along `path` relative to this node
    pub fn get(self, path: &Path) -> LocationResult<NodeRef<'a>> {
        let mut node = self;
        for &index in path.iter() {
            node = node
                .child(index)
                .ok_or_else(|| LocationError::not_found(path))?;
        }
        Ok(node)
    }

    /// Owned copy of the node; `None` for the root
    pub fn to_node(self) -> Option<Node> {
        match self {
            NodeRef::Root(_) => None,
            NodeRef::Element(element) => Some(Node::Element(element.clone())),
            NodeRef::Text(text) => Some(Node::Text(text.clone())),
        }
    }

    /// Concatenated text content in document order
    pub fn string(self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Shallow match: every key in `props` is present with an equal value
    pub fn matches_props(self, props: &Properties) -> bool {
        match self.properties() {
            Some(own) => props.iter().all(|(key, value)| own.get(key) == Some(value)),
            None => props.is_empty(),
        }
    }
}

fn collect_text(node: NodeRef<'_>, out: &mut String) {
    match node {
        NodeRef::Text(text) => out.push_str(&text.text),
        _ => {
            for child in node.children().unwrap_or_default() {
                collect_text(child.view(), out);
            }
        }
    }
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children,
            selection: None,
        }
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::Root(self)
    }

    pub fn node(&self, path: &Path) -> LocationResult<NodeRef<'_>> {
        self.root().get(path)
    }

    pub fn has(&self, path: &Path) -> bool {
        self.node(path).is_ok()
    }

    /// The text leaf at `path`
    pub fn leaf(&self, path: &Path) -> LocationResult<&Text> {
        self.node(path)?
            .as_text()
            .ok_or_else(|| LocationError::not_text(path))
    }

    /// Mutable access to a non-root node
    pub fn node_mut(&mut self, path: &Path) -> LocationResult<&mut Node> {
        let Some((&last, parent)) = path.split_last() else {
            return Err(LocationError::Root { relation: "node" });
        };
        let children = self.children_mut(&Path::from(parent))?;
        children
            .get_mut(last)
            .ok_or_else(|| LocationError::not_found(path))
    }

    pub fn leaf_mut(&mut self, path: &Path) -> LocationResult<&mut Text> {
        match self.node_mut(path)? {
            Node::Text(text) => Ok(text),
            Node::Element(_) => Err(LocationError::not_text(path)),
        }
    }

    /// Mutable children of the ancestor at `path` (root or element)
    pub fn children_mut(&mut self, path: &Path) -> LocationResult<&mut Vec<Node>> {
        let mut children = &mut self.children;
        for (depth, &index) in path.iter().enumerate() {
            match children.get_mut(index) {
                Some(Node::Element(element)) => children = &mut element.children,
                Some(Node::Text(_)) => {
                    return Err(LocationError::not_ancestor(&path.truncate(depth + 1)))
                }
                None => return Err(LocationError::not_found(path)),
            }
        }
        Ok(children)
    }
}

/// Byte index of the `offset`-th char, clamped to the end of the string
pub fn byte_offset(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}
