//! Node matching
//!
//! Queries and transforms pick their targets with a [`Matcher`]. Whether an
//! element counts as void or inline is decided by a [`Schema`], so editors
//! with their own notion of inline elements can plug one in.

use crate::node::{Element, NodeRef, Properties};
use crate::path::Path;
use std::fmt;
use std::rc::Rc;

/// Classifies elements for matching and normalization
pub trait Schema {
    fn is_void(&self, element: &Element) -> bool {
        element.is_void()
    }

    fn is_inline(&self, element: &Element) -> bool {
        element.is_inline()
    }
}

/// Reads the `void` and `inline` property flags
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSchema;

impl Schema for DefaultSchema {}

pub type Predicate = Rc<dyn Fn(NodeRef<'_>, &Path, &dyn Schema) -> bool>;

#[derive(Clone, Default)]
pub enum Matcher {
    #[default]
    Any,
    Text,
    /// Any element; the root is not an element
    Element,
    Block,
    Inline,
    Void,
    /// Shallow property match
    Props(Properties),
    Predicate(Predicate),
    /// Every matcher in the list matches
    All(Vec<Matcher>),
}

impl Matcher {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(NodeRef<'_>, &Path, &dyn Schema) -> bool + 'static,
    {
        Matcher::Predicate(Rc::new(f))
    }

    /// Elements whose `type` property equals `kind`
    pub fn kind(kind: &str) -> Self {
        let mut props = Properties::new();
        props.insert("type".to_string(), kind.into());
        Matcher::All(vec![Matcher::Element, Matcher::Props(props)])
    }

    /// Matches exactly the node at `target`
    pub fn at(target: Path) -> Self {
        Matcher::predicate(move |_, path, _| *path == target)
    }

    pub fn and(self, other: Matcher) -> Self {
        match self {
            Matcher::All(mut all) => {
                all.push(other);
                Matcher::All(all)
            }
            this => Matcher::All(vec![this, other]),
        }
    }

    pub fn matches(&self, node: NodeRef<'_>, path: &Path, schema: &dyn Schema) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Text => node.is_text(),
            Matcher::Element => node.is_element(),
            Matcher::Block => node
                .as_element()
                .is_some_and(|element| !schema.is_inline(element)),
            Matcher::Inline => node
                .as_element()
                .is_some_and(|element| schema.is_inline(element)),
            Matcher::Void => node
                .as_element()
                .is_some_and(|element| schema.is_void(element)),
            Matcher::Props(props) => !node.is_root() && node.matches_props(props),
            Matcher::Predicate(predicate) => predicate(node, path, schema),
            Matcher::All(matchers) => matchers.iter().all(|m| m.matches(node, path, schema)),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Any => write!(f, "Any"),
            Matcher::Text => write!(f, "Text"),
            Matcher::Element => write!(f, "Element"),
            Matcher::Block => write!(f, "Block"),
            Matcher::Inline => write!(f, "Inline"),
            Matcher::Void => write!(f, "Void"),
            Matcher::Props(props) => f.debug_tuple("Props").field(props).finish(),
            Matcher::Predicate(_) => write!(f, "Predicate(..)"),
            Matcher::All(all) => f.debug_tuple("All").field(all).finish(),
        }
    }
}

impl From<Properties> for Matcher {
    fn from(props: Properties) -> Self {
        Matcher::Props(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Document, Text};

    struct EverythingInline;

    impl Schema for EverythingInline {
        fn is_inline(&self, _: &Element) -> bool {
            true
        }
    }

    #[test]
    fn test_shorthand_matchers() {
        let doc = Document::new(vec![Element::of_type("p")
            .with_child(Text::new("a"))
            .with_child(Element::of_type("link").inline().with_child(Text::new("b")))
            .into()]);
        let schema = DefaultSchema;
        let p = doc.node(&[0].into()).unwrap();
        let link = doc.node(&[0, 1].into()).unwrap();
        let text = doc.node(&[0, 0].into()).unwrap();

        assert!(Matcher::Block.matches(p, &[0].into(), &schema));
        assert!(!Matcher::Block.matches(link, &[0, 1].into(), &schema));
        assert!(Matcher::Inline.matches(link, &[0, 1].into(), &schema));
        assert!(!Matcher::Inline.matches(text, &[0, 0].into(), &schema));
        assert!(Matcher::Text.matches(text, &[0, 0].into(), &schema));
        assert!(!Matcher::Element.matches(doc.root(), &Path::root(), &schema));
        assert!(Matcher::kind("link").matches(link, &[0, 1].into(), &schema));
        assert!(!Matcher::kind("link").matches(p, &[0].into(), &schema));
        assert!(Matcher::Inline.matches(p, &[0].into(), &EverythingInline));
    }

    #[test]
    fn test_path_matcher() {
        let doc = Document::new(vec![Element::of_type("p").with_child(Text::new("a")).into()]);
        let matcher = Matcher::at([0, 0].into()).and(Matcher::Text);
        assert!(matcher.matches(doc.node(&[0, 0].into()).unwrap(), &[0, 0].into(), &DefaultSchema));
        assert!(!matcher.matches(doc.node(&[0].into()).unwrap(), &[0].into(), &DefaultSchema));
    }
}
