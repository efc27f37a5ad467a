//! Deterministic walk from `(MindMap, ExpandState)` to a nested visual tree.
//!
//! The output carries no presentation details beyond a depth-keyed style
//! variant; front ends map variants to colours however they like.

use crate::expand::ExpandState;
use crate::markup::{self, Span};
use crate::model::{DetailItem, ImageRef, MindMap, Node, NodeId};

/// Number of distinct depth styles before they cycle.
pub const STYLE_VARIANTS: usize = 8;

/// Cosmetic style chosen by `depth % STYLE_VARIANTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleVariant {
    Blue,
    Purple,
    Green,
    Red,
    Indigo,
    Yellow,
    Teal,
    Orange,
}

impl StyleVariant {
    pub const ALL: [StyleVariant; STYLE_VARIANTS] = [
        StyleVariant::Blue,
        StyleVariant::Purple,
        StyleVariant::Green,
        StyleVariant::Red,
        StyleVariant::Indigo,
        StyleVariant::Yellow,
        StyleVariant::Teal,
        StyleVariant::Orange,
    ];

    pub fn for_depth(depth: usize) -> Self {
        Self::ALL[depth % STYLE_VARIANTS]
    }
}

/// Expand indicator, shown only on nodes that have children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Expanded,
    Collapsed,
}

impl Indicator {
    pub fn glyph(self) -> &'static str {
        match self {
            Indicator::Expanded => "🔽",
            Indicator::Collapsed => "▶️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedDetail {
    Text(Vec<Span>),
    Image(ImageRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNode {
    pub id: NodeId,
    pub label: String,
    pub icon: Option<String>,
    pub depth: usize,
    pub style: StyleVariant,
    pub indicator: Option<Indicator>,
    pub expanded: bool,
    /// Empty unless the node is expanded.
    pub details: Vec<RenderedDetail>,
    /// Empty unless the node is expanded.
    pub children: Vec<RenderedNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTree {
    pub title: String,
    pub roots: Vec<RenderedNode>,
}

impl RenderedTree {
    /// Look up a visible node by id.
    pub fn find(&self, id: &str) -> Option<&RenderedNode> {
        fn search<'a>(nodes: &'a [RenderedNode], id: &str) -> Option<&'a RenderedNode> {
            nodes.iter().find_map(|node| {
                if node.id.as_str() == id {
                    Some(node)
                } else {
                    search(&node.children, id)
                }
            })
        }
        search(&self.roots, id)
    }

    /// Number of node headers that would be drawn.
    pub fn visible_count(&self) -> usize {
        fn count(nodes: &[RenderedNode]) -> usize {
            nodes.iter().map(|node| 1 + count(&node.children)).sum()
        }
        count(&self.roots)
    }
}

/// Render the whole map. Pure; identical inputs give identical output.
pub fn render(map: &MindMap, expand: &ExpandState) -> RenderedTree {
    RenderedTree {
        title: map.title.clone(),
        roots: map
            .nodes
            .iter()
            .map(|node| render_node(node, 0, expand))
            .collect(),
    }
}

fn render_node(node: &Node, depth: usize, expand: &ExpandState) -> RenderedNode {
    let expanded = expand.is_expanded(node.id.as_str());

    let indicator = node.has_children().then_some(if expanded {
        Indicator::Expanded
    } else {
        Indicator::Collapsed
    });

    let (details, children) = if expanded {
        (
            node.details.iter().map(render_detail).collect(),
            node.children
                .iter()
                .map(|child| render_node(child, depth + 1, expand))
                .collect(),
        )
    } else {
        (Vec::new(), Vec::new())
    };

    RenderedNode {
        id: node.id.clone(),
        label: node.label.clone(),
        icon: node.icon.clone(),
        depth,
        style: StyleVariant::for_depth(depth),
        indicator,
        expanded,
        details,
        children,
    }
}

fn render_detail(item: &DetailItem) -> RenderedDetail {
    match item {
        DetailItem::Text(text) => RenderedDetail::Text(markup::spans(text)),
        DetailItem::Image(image) => RenderedDetail::Image(image.clone()),
    }
}
