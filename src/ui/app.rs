//! Main application struct and eframe integration
//!
//! This module contains the main OmniApp that implements eframe::App.

use crate::modes::Tool;
use crate::ui::components::{AlertDialog, ChatView, ImageView, Sidebar, SpeechView};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};
use std::time::Duration;
use tracing::info;

/// Repaint interval while a request or playback is in flight
const BUSY_REPAINT: Duration = Duration::from_millis(100);

/// Main OmniMind application
pub struct OmniApp {
    state: AppState,
    theme: Theme,
}

impl OmniApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self { state, theme }
    }

    /// Lay out one frame; shared with the UI tests
    pub fn show(state: &mut AppState, theme: &Theme, ctx: &egui::Context) {
        state.poll_events();

        SidePanel::left("sidebar")
            .resizable(false)
            .exact_width(220.0)
            .frame(
                egui::Frame::none()
                    .fill(theme.bg_secondary)
                    .inner_margin(theme.spacing),
            )
            .show(ctx, |ui| {
                Sidebar::new(state, theme).show(ui);
            });

        Self::show_header(state, theme, ctx);

        CentralPanel::default()
            .frame(egui::Frame::none().fill(theme.bg_primary).inner_margin(theme.spacing))
            .show(ctx, |ui| match state.active_tool {
                Tool::Chat => ChatView::new(state, theme).show(ui),
                Tool::Image => ImageView::new(state, theme).show(ui),
                Tool::Speech => SpeechView::new(state, theme).show(ui),
            });

        AlertDialog::new(state, theme).show(ctx);

        // Histories change off the UI thread
        if state.any_busy() {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
    }

    fn show_header(state: &AppState, theme: &Theme, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(theme.bg_primary)
                    .inner_margin(egui::Margin::symmetric(theme.spacing_lg, theme.spacing)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let response = ui.label(
                        RichText::new(state.active_tool.title())
                            .size(22.0)
                            .strong()
                            .color(theme.text_primary),
                    );
                    let title = state.active_tool.title();
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, title)
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let (text, color) = if state.any_busy() {
                            ("Working", theme.primary)
                        } else {
                            ("Ready", theme.success)
                        };

                        egui::Frame::none()
                            .fill(color.gamma_multiply(0.15))
                            .rounding(theme.card_rounding)
                            .inner_margin(egui::Margin::symmetric(10.0, 4.0))
                            .show(ui, |ui| {
                                ui.label(RichText::new(text).size(12.0).color(color));
                            });
                    });
                });
            });
    }
}

impl eframe::App for OmniApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        Self::show(&mut self.state, &self.theme, ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!(
            "Session ended with {} messages, {} images, {} recordings",
            self.state.chat.history().len(),
            self.state.image.history().len(),
            self.state.speech.history().len()
        );
    }
}
