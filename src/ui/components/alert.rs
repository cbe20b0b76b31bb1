//! Blocking alert dialog for failed image and speech requests

use crate::modes::ModeEvent;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct AlertDialog<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> AlertDialog<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// Show the oldest pending alert, if any
    pub fn show(self, ctx: &egui::Context) {
        let Some(ModeEvent::Alert { tool, message }) = self.state.current_alert().cloned() else {
            return;
        };

        let mut dismissed = false;

        egui::Window::new(tool.title())
            .id(egui::Id::new("alert_dialog"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(&message).color(self.theme.text_primary));
                ui.add_space(self.theme.spacing_sm);
                ui.vertical_centered(|ui| {
                    let response = ui.button("OK");
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Dismiss alert")
                    });
                    if response.clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.state.dismiss_alert();
        }
    }
}
