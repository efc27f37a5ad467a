//! Native egui front end for the shared mind map.
//!
//! [`InteractionController`] holds the client-local UI state (expand
//! state, busy and ready flags, status text) and decides whether a save
//! may be issued. [`MindMapApp`] draws the rendered tree and forwards
//! accepted saves to the sync task.

mod app;
pub mod controller;
mod theme;

pub use app::MindMapApp;
pub use controller::{InteractionController, SaveRejected};
pub use theme::DepthColors;
