//! Navigation sidebar
//!
//! Lists the three tools and shows whether an API key is configured.

use crate::modes::Tool;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct Sidebar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> Sidebar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.vertical(|ui| {
            ui.add_space(self.theme.spacing);

            ui.horizontal(|ui| {
                egui::Frame::none()
                    .fill(self.theme.secondary)
                    .rounding(self.theme.button_rounding)
                    .inner_margin(egui::Margin::symmetric(10.0, 6.0))
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new("Ω")
                                .size(18.0)
                                .strong()
                                .color(self.theme.text_primary),
                        );
                    });
                ui.label(
                    RichText::new("OmniMind")
                        .size(20.0)
                        .strong()
                        .color(self.theme.text_primary),
                );
            });

            ui.add_space(self.theme.spacing_lg);

            for tool in Tool::ALL {
                self.show_tool_button(ui, tool);
                ui.add_space(self.theme.spacing_sm / 2.0);
            }

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                ui.add_space(self.theme.spacing);
                self.show_connection_status(ui);
            });
        });
    }

    fn show_tool_button(&mut self, ui: &mut egui::Ui, tool: Tool) {
        let selected = self.state.active_tool == tool;

        let (fill, text_color) = if selected {
            (self.theme.primary.gamma_multiply(0.2), self.theme.primary)
        } else {
            (egui::Color32::TRANSPARENT, self.theme.text_secondary)
        };

        let button = egui::Button::new(
            RichText::new(format!("{}  {}", tool.icon(), tool.label()))
                .size(15.0)
                .color(text_color),
        )
        .fill(fill)
        .rounding(self.theme.button_rounding)
        .min_size(Vec2::new(ui.available_width(), 40.0));

        let response = ui.add(button);
        response.widget_info(|| {
            egui::WidgetInfo::selected(egui::WidgetType::Button, true, selected, tool.label())
        });

        if response.clicked() {
            self.state.select_tool(tool);
        }
    }

    fn show_connection_status(&self, ui: &mut egui::Ui) {
        let (dot, text) = if self.state.api_key_configured {
            (self.theme.success, "Gemini API connected")
        } else {
            (self.theme.error, "No API key configured")
        };

        egui::Frame::none()
            .fill(self.theme.bg_tertiary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let (rect, _) = ui.allocate_exact_size(Vec2::splat(8.0), egui::Sense::hover());
                    ui.painter().circle_filled(rect.center(), 4.0, dot);
                    ui.label(RichText::new(text).size(12.0).color(self.theme.text_muted));
                });
            });
    }
}
