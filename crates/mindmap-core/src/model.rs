//! The mind map tree: nodes, detail items and the root aggregate.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

// =============================================================================
// Identifiers
// =============================================================================

/// Stable identifier of a node, unique across one tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Detail items
// =============================================================================

/// A structured reference to an inline image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    /// Image URL.
    pub src: String,
    /// Alternative text shown when the image is unavailable.
    pub alt_text: String,
    /// Presentation class carried through untouched.
    pub style_class: String,
}

impl ImageRef {
    pub fn new(
        src: impl Into<String>,
        alt_text: impl Into<String>,
        style_class: impl Into<String>,
    ) -> Self {
        Self {
            src: src.into(),
            alt_text: alt_text.into(),
            style_class: style_class.into(),
        }
    }
}

/// One leaf-level annotation under a node.
///
/// On the wire every item is a single string; see [`crate::codec`] for the
/// image marker form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DetailItem {
    /// Plain text, possibly containing `**bold**` markers.
    Text(String),
    /// An inline image reference.
    Image(ImageRef),
}

impl DetailItem {
    pub fn text(text: impl Into<String>) -> Self {
        DetailItem::Text(text.into())
    }

    pub fn image(
        src: impl Into<String>,
        alt_text: impl Into<String>,
        style_class: impl Into<String>,
    ) -> Self {
        DetailItem::Image(ImageRef::new(src, alt_text, style_class))
    }

    pub fn is_image(&self) -> bool {
        matches!(self, DetailItem::Image(_))
    }
}

// =============================================================================
// Nodes
// =============================================================================

/// One entry in the mind map tree.
///
/// A node may carry `details`, `children`, both, or neither. Empty
/// sequences are treated as absent and are omitted from the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<DetailItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            details: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_details(mut self, details: impl IntoIterator<Item = DetailItem>) -> Self {
        self.details = details.into_iter().collect();
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn has_details(&self) -> bool {
        !self.details.is_empty()
    }

    /// Neither details nor children: only the header is ever shown.
    pub fn is_terminal(&self) -> bool {
        self.details.is_empty() && self.children.is_empty()
    }
}

// =============================================================================
// Root aggregate
// =============================================================================

/// The unit of synchronization: a title plus an ordered forest of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MindMap {
    pub title: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl MindMap {
    pub fn new(title: impl Into<String>, nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            title: title.into(),
            nodes: nodes.into_iter().collect(),
        }
    }

    /// Depth-first, pre-order walk in stored order, yielding `(depth, node)`.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.nodes.iter().rev().map(|node| (0, node)).collect(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        self.walk().map(|(_, node)| node).find(|node| node.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Deepest level present in the tree (roots are depth 0).
    pub fn max_depth(&self) -> Option<usize> {
        self.walk().map(|(depth, _)| depth).max()
    }

    /// Check that no two nodes share an id.
    pub fn validate(&self) -> CodecResult<()> {
        let mut seen = HashSet::new();
        for (_, node) in self.walk() {
            if !seen.insert(node.id.as_str()) {
                return Err(CodecError::DuplicateNodeId {
                    id: node.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Iterator returned by [`MindMap::walk`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> MindMap {
        MindMap::new(
            "Carte",
            [
                Node::new("a", "A").with_children([
                    Node::new("a1", "A1").with_children([Node::new("a1x", "A1x")]),
                    Node::new("a2", "A2"),
                ]),
                Node::new("b", "B").with_details([DetailItem::text("note")]),
            ],
        )
    }

    #[test]
    fn walk_is_depth_first_in_stored_order() {
        let map = tree();
        let order: Vec<(usize, &str)> = map
            .walk()
            .map(|(depth, node)| (depth, node.id.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![(0, "a"), (1, "a1"), (2, "a1x"), (1, "a2"), (0, "b")]
        );
    }

    #[test]
    fn find_and_counts() {
        let map = tree();
        assert_eq!(map.find("a1x").map(|n| n.label.as_str()), Some("A1x"));
        assert!(map.contains("b"));
        assert!(!map.contains("missing"));
        assert_eq!(map.node_count(), 5);
        assert_eq!(map.max_depth(), Some(2));
        assert_eq!(MindMap::default().max_depth(), None);
    }

    #[test]
    fn validate_rejects_duplicate_ids_anywhere_in_the_tree() {
        let mut map = tree();
        assert!(map.validate().is_ok());

        map.nodes[1].children.push(Node::new("a1x", "again"));
        match map.validate() {
            Err(CodecError::DuplicateNodeId { id }) => assert_eq!(id.as_str(), "a1x"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn terminal_nodes_have_neither_details_nor_children() {
        let map = tree();
        assert!(map.find("a2").unwrap().is_terminal());
        assert!(!map.find("b").unwrap().is_terminal());
        assert!(map.find("a").unwrap().has_children());
    }
}
