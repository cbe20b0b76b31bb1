//! Image view component
//!
//! Prompt box with a generate button, and the gallery of results, newest first.

use crate::session::GeneratedImage;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Color32, RichText, Vec2};

/// Width of one gallery card
const CARD_WIDTH: f32 = 260.0;

pub struct ImageView<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> ImageView<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_salt("image_gallery")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);
                self.show_prompt(ui);
                ui.add_space(self.theme.spacing_lg);
                self.show_gallery(ui);
            });
    }

    fn show_prompt(&mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                let busy = self.state.image.is_busy();

                let text_edit = egui::TextEdit::multiline(&mut self.state.image_prompt)
                    .hint_text("Describe the image you want to create...")
                    .desired_rows(3)
                    .desired_width(f32::INFINITY);
                let response = ui.add_enabled(!busy, text_edit);
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, !busy, "Image prompt")
                });

                ui.add_space(self.theme.spacing_sm);

                ui.horizontal(|ui| {
                    let enabled = self.state.can_generate_image();
                    let label = if busy { "Creating..." } else { "Generate" };
                    let button = egui::Button::new(RichText::new(label).color(Color32::WHITE))
                        .fill(self.theme.primary)
                        .rounding(self.theme.button_rounding)
                        .min_size(Vec2::new(110.0, 32.0));

                    let response = ui.add_enabled(enabled, button);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(
                            egui::WidgetType::Button,
                            enabled,
                            "Generate image",
                        )
                    });
                    if response.clicked() {
                        self.state.generate_image();
                    }

                    if busy {
                        ui.spinner();
                    }
                });
            });
    }

    fn show_gallery(&mut self, ui: &mut egui::Ui) {
        let images = self.state.image.history().all();
        let busy = self.state.image.is_busy();

        if images.is_empty() && !busy {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.label(
                    RichText::new("Generated images will appear here.")
                        .size(14.0)
                        .color(self.theme.text_muted),
                );
            });
            return;
        }

        let mut to_save = None;

        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = Vec2::splat(self.theme.spacing);
            if busy {
                self.show_pending_card(ui);
            }
            for record in &images {
                if self.show_card(ui, record) {
                    to_save = Some(record.clone());
                }
            }
        });

        if let Some(record) = to_save {
            self.state.save_image(&record);
        }
    }

    fn show_pending_card(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_tertiary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.set_width(CARD_WIDTH);
                ui.set_min_height(CARD_WIDTH);
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            });
    }

    /// Returns true when the save button was clicked
    fn show_card(&mut self, ui: &mut egui::Ui, record: &GeneratedImage) -> bool {
        let texture = self.state.texture_for(ui.ctx(), record);
        let mut save_clicked = false;

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.set_width(CARD_WIDTH);
                ui.vertical(|ui| {
                    match &texture {
                        Some(texture) => {
                            ui.add(
                                egui::Image::from_texture(egui::load::SizedTexture::from_handle(
                                    texture,
                                ))
                                .max_width(CARD_WIDTH)
                                .rounding(self.theme.button_rounding),
                            );
                        }
                        None => {
                            ui.label(
                                RichText::new("Image unavailable").color(self.theme.error),
                            );
                        }
                    }

                    let response = ui.label(
                        RichText::new(&record.prompt)
                            .size(12.0)
                            .color(self.theme.text_secondary),
                    );
                    let label = format!("Generated image: {}", record.prompt);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
                    });

                    ui.horizontal(|ui| {
                        let time_str = record
                            .timestamp
                            .with_timezone(&chrono::Local)
                            .format("%H:%M")
                            .to_string();
                        ui.label(RichText::new(time_str).size(10.0).color(self.theme.text_muted));

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let save = ui
                                .small_button("⬇ Save")
                                .on_hover_text("Save to downloads");
                            if save.clicked() {
                                save_clicked = true;
                            }
                        });
                    });
                });
            });

        save_clicked
    }
}
