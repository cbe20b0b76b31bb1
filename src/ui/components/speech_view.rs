//! Speech view component
//!
//! Text to synthesize, a voice picker, and the list of past recordings.

use crate::session::GeneratedAudio;
use crate::transport::Voice;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Color32, RichText, Vec2};

pub struct SpeechView<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> SpeechView<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_salt("speech_recordings")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);
                self.show_composer(ui);
                ui.add_space(self.theme.spacing_lg);
                self.show_recordings(ui);
            });
    }

    fn show_composer(&mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                let busy = self.state.speech.is_busy();

                let text_edit = egui::TextEdit::multiline(&mut self.state.speech_text)
                    .hint_text("Enter the text you want to hear...")
                    .desired_rows(4)
                    .desired_width(f32::INFINITY);
                let response = ui.add_enabled(!busy, text_edit);
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, !busy, "Speech text")
                });

                ui.add_space(self.theme.spacing_sm);

                ui.horizontal(|ui| {
                    ui.label(RichText::new("Speaker").color(self.theme.text_secondary));
                    egui::ComboBox::from_id_salt("voice_picker")
                        .selected_text(self.state.voice.label())
                        .show_ui(ui, |ui| {
                            for voice in Voice::ALL {
                                ui.selectable_value(&mut self.state.voice, voice, voice.label());
                            }
                        });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let enabled = self.state.can_synthesize();
                        let label = if busy { "Synthesizing..." } else { "Synthesize" };
                        let button = egui::Button::new(RichText::new(label).color(Color32::WHITE))
                            .fill(self.theme.primary)
                            .rounding(self.theme.button_rounding)
                            .min_size(Vec2::new(110.0, 32.0));

                        let response = ui.add_enabled(enabled, button);
                        response.widget_info(|| {
                            egui::WidgetInfo::labeled(
                                egui::WidgetType::Button,
                                enabled,
                                "Generate speech",
                            )
                        });
                        if response.clicked() {
                            self.state.synthesize_speech();
                        }

                        if busy {
                            ui.spinner();
                        }
                    });
                });

                ui.label(
                    RichText::new(format!("Output: {}", self.state.speech.sink_name()))
                        .size(11.0)
                        .color(self.theme.text_muted),
                );
            });
    }

    fn show_recordings(&mut self, ui: &mut egui::Ui) {
        let recordings = self.state.speech.history().all();

        if recordings.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.label(
                    RichText::new("Synthesized speech will appear here.")
                        .size(14.0)
                        .color(self.theme.text_muted),
                );
            });
            return;
        }

        ui.label(
            RichText::new("Recent Utterances")
                .size(16.0)
                .strong()
                .color(self.theme.text_primary),
        );
        ui.add_space(self.theme.spacing_sm);

        let mut to_replay = None;

        for record in &recordings {
            if self.show_recording(ui, record) {
                to_replay = Some(record.clone());
            }
            ui.add_space(self.theme.spacing_sm);
        }

        if let Some(record) = to_replay {
            self.state.replay(&record);
        }
    }

    /// Returns true when the replay button was clicked
    fn show_recording(&self, ui: &mut egui::Ui, record: &GeneratedAudio) -> bool {
        let mut replay_clicked = false;
        let can_replay = record.audio_url.is_some() && !self.state.speech.is_busy();

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let button = egui::Button::new(RichText::new("▶").size(16.0))
                        .rounding(self.theme.button_rounding)
                        .min_size(Vec2::splat(32.0));
                    let response = ui.add_enabled(can_replay, button);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Button, can_replay, "Replay")
                    });
                    if response.clicked() {
                        replay_clicked = true;
                    }

                    ui.vertical(|ui| {
                        ui.label(RichText::new(&record.text).color(self.theme.text_primary));
                        let time_str = record
                            .timestamp
                            .with_timezone(&chrono::Local)
                            .format("%H:%M")
                            .to_string();
                        ui.label(RichText::new(time_str).size(10.0).color(self.theme.text_muted));
                    });
                });
            });

        replay_clicked
    }
}
