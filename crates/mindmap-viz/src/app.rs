//! Main application state and rendering logic.

use std::time::Duration;

use eframe::App;
use egui::{Color32, Context, RichText, ScrollArea, Sense, Stroke, Ui};
use mindmap_core::{render, RenderedDetail, RenderedNode, RenderedTree, Span};
use mindmap_sync::{SyncHandle, SyncStatus, SyncView};
use tracing::{debug, warn};

use crate::controller::InteractionController;
use crate::theme::DepthColors;

/// How often to look for a new view while nothing else triggers a repaint.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

const ERROR_COLOR: Color32 = Color32::from_rgb(255, 68, 102);
const SUCCESS_COLOR: Color32 = Color32::from_rgb(0, 255, 136);
const LOADING_COLOR: Color32 = Color32::from_rgb(0, 212, 255);

/// The mind map viewer window.
pub struct MindMapApp {
    sync: SyncHandle,
    controller: InteractionController,
    view: SyncView,
}

impl MindMapApp {
    pub fn new(sync: SyncHandle, controller: InteractionController) -> Self {
        let view = sync.view();
        let mut app = Self {
            sync,
            controller,
            view,
        };
        app.controller.observe(&app.view);
        app
    }

    fn save(&mut self) {
        match self.controller.request_save(&self.view.mind_map) {
            Ok(command) => {
                if !self.sync.send(command) {
                    warn!("sync_task_stopped");
                }
            }
            Err(reason) => debug!(%reason, "save_ignored"),
        }
    }

    // =========================================================================
    // Panels
    // =========================================================================

    fn ui_top_bar(&mut self, ctx: &Context, title: &str) {
        egui::TopBottomPanel::top("top_bar")
            .frame(
                egui::Frame::new()
                    .fill(Color32::from_rgb(12, 12, 16))
                    .stroke(Stroke::new(1.0, Color32::from_rgb(26, 26, 40)))
                    .inner_margin(8.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(title).strong().size(18.0));

                    ui.separator();

                    let can_save = self.controller.can_save();
                    let save = ui
                        .add_enabled(can_save, egui::Button::new("💾 Save"))
                        .on_hover_text("Write the current mind map to the shared document");
                    if save.clicked() {
                        self.save();
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let caller = self.controller.caller_id().unwrap_or("Connecting…");
                        ui.label(
                            RichText::new(format!("User: {caller}"))
                                .size(12.0)
                                .color(Color32::GRAY),
                        );
                    });
                });

                self.ui_status(ui);
            });
    }

    fn ui_status(&self, ui: &mut Ui) {
        let message = self.controller.message();
        if self.controller.is_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new(message).size(12.0).color(LOADING_COLOR));
            });
            return;
        }
        if message.is_empty() {
            return;
        }

        let (fill, color) = match self.controller.status() {
            SyncStatus::Error => (Color32::from_rgb(60, 16, 24), ERROR_COLOR),
            SyncStatus::Success => (Color32::from_rgb(14, 40, 28), SUCCESS_COLOR),
            SyncStatus::Idle | SyncStatus::Loading => (Color32::from_rgb(20, 20, 28), LOADING_COLOR),
        };
        egui::Frame::new()
            .fill(fill)
            .corner_radius(4.0)
            .inner_margin(6.0)
            .show(ui, |ui| {
                let prefix = if self.controller.status() == SyncStatus::Error {
                    "❌ "
                } else {
                    ""
                };
                ui.label(RichText::new(format!("{prefix}{message}")).size(12.0).color(color));
            });
    }

    fn ui_tree(&self, ui: &mut Ui, tree: &RenderedTree) -> Vec<String> {
        let mut toggled = Vec::new();
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for node in &tree.roots {
                    draw_node(ui, node, &mut toggled);
                    ui.add_space(6.0);
                }
            });
        toggled
    }
}

// =============================================================================
// Tree drawing
// =============================================================================

fn draw_node(ui: &mut Ui, node: &RenderedNode, toggled: &mut Vec<String>) {
    let colors = DepthColors::for_style(node.style);

    egui::Frame::new()
        .fill(colors.fill)
        .stroke(Stroke::new(1.0, colors.accent))
        .corner_radius(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            let mut header = String::new();
            if let Some(icon) = &node.icon {
                header.push_str(icon);
                header.push(' ');
            }
            header.push_str(&node.label);
            if let Some(indicator) = node.indicator {
                header.push(' ');
                header.push_str(indicator.glyph());
            }

            let response = ui.add(
                egui::Label::new(RichText::new(header).strong().color(colors.accent))
                    .sense(Sense::click()),
            );
            if response.clicked() {
                toggled.push(node.id.to_string());
            }

            if !node.details.is_empty() {
                ui.add_space(4.0);
                for (index, detail) in node.details.iter().enumerate() {
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing.x = 0.0;
                        ui.label(format!("{}. ", index + 1));
                        draw_detail(ui, detail);
                    });
                }
            }

            if !node.children.is_empty() {
                ui.add_space(4.0);
                ui.indent(node.id.as_str(), |ui| {
                    for child in &node.children {
                        draw_node(ui, child, toggled);
                        ui.add_space(4.0);
                    }
                });
            }
        });
}

fn draw_detail(ui: &mut Ui, detail: &RenderedDetail) {
    match detail {
        RenderedDetail::Text(spans) => {
            for Span { text, bold } in spans {
                let text = RichText::new(text);
                ui.label(if *bold { text.strong() } else { text });
            }
        }
        RenderedDetail::Image(image) => {
            ui.hyperlink_to(format!("🖼 {}", image.alt_text), &image.src)
                .on_hover_text(image.src.as_str());
        }
    }
}

// =============================================================================
// App Implementation
// =============================================================================

impl App for MindMapApp {
    fn update(&mut self, ctx: &Context, _: &mut eframe::Frame) {
        self.view = self.sync.view();
        self.controller.observe(&self.view);

        let tree = render(&self.view.mind_map, self.controller.expand());

        self.ui_top_bar(ctx, &tree.title);

        let toggled = egui::CentralPanel::default()
            .show(ctx, |ui| self.ui_tree(ui, &tree))
            .inner;
        for id in toggled {
            self.controller.toggle(&id);
        }

        ctx.request_repaint_after(POLL_INTERVAL);
    }
}
