//! Core domain types shared across the mind map workspace.
//!
//! - [`model`]: the rooted tree of labeled nodes and their detail items
//! - [`codec`]: conversion to and from the transport text payload
//! - [`expand`]: client-local expand/collapse state
//! - [`render`]: deterministic walk producing the nested visual structure
//! - [`sample`]: the built-in default mind map

pub mod codec;
pub mod error;
pub mod expand;
pub mod markup;
pub mod model;
pub mod render;
pub mod sample;

pub use codec::{decode, encode, image_to_marker, parse_image_marker};
pub use error::{CodecError, CodecResult};
pub use expand::ExpandState;
pub use markup::Span;
pub use model::{DetailItem, ImageRef, MindMap, Node, NodeId};
pub use render::{render, Indicator, RenderedDetail, RenderedNode, RenderedTree, StyleVariant};
