//! Chat view component
//!
//! Transcript of the conversation above a single-line input bar.

use crate::session::{Message, Role};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, Key, RichText, Vec2};

pub struct ChatView<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> ChatView<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::TopBottomPanel::bottom("chat_input")
            .frame(egui::Frame::none().inner_margin(self.theme.spacing))
            .show_inside(ui, |ui| {
                self.show_input_bar(ui);
            });

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .inner_margin(egui::Margin::symmetric(self.theme.spacing, 0.0)),
            )
            .show_inside(ui, |ui| {
                self.show_transcript(ui);
            });
    }

    fn show_transcript(&self, ui: &mut egui::Ui) {
        let messages = self.state.chat.history().all();
        let thinking = self.state.chat.is_busy();

        egui::ScrollArea::vertical()
            .id_salt("chat_transcript")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);

                for message in &messages {
                    self.show_message(ui, message);
                    ui.add_space(self.theme.spacing_sm);
                }

                if thinking {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(
                            RichText::new("Thinking...")
                                .italics()
                                .color(self.theme.text_muted),
                        );
                    });
                }

                ui.add_space(self.theme.spacing);
            });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        let is_user = message.role == Role::User;

        let (bubble_color, text_color, align, sender) = if is_user {
            (self.theme.user_bubble, Color32::WHITE, Align::RIGHT, "You")
        } else {
            (self.theme.assistant_bubble, self.theme.text_primary, Align::LEFT, "OmniMind")
        };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(RichText::new(sender).size(12.0).color(self.theme.text_muted));
            ui.add_space(2.0);

            let max_width = ui.available_width() * 0.75;

            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.card_rounding)
                .inner_margin(egui::Margin::symmetric(14.0, 10.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    let response = ui.label(RichText::new(&message.content).color(text_color));
                    let label = format!("{} message: {}", sender, message.content);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
                    });
                });

            let time_str = message
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%H:%M")
                .to_string();
            ui.label(RichText::new(time_str).size(10.0).color(self.theme.text_muted));
        });
    }

    fn show_input_bar(&mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let busy = self.state.chat.is_busy();

                    let text_edit = egui::TextEdit::singleline(&mut self.state.chat_input)
                        .hint_text("Ask anything...")
                        .desired_width(ui.available_width() - 90.0)
                        .frame(false)
                        .id(egui::Id::new("chat_input_text"));

                    let response = ui.add_enabled(!busy, text_edit);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(
                            egui::WidgetType::TextEdit,
                            !busy,
                            "Message input",
                        )
                    });

                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

                    let enabled = self.state.can_send_chat();
                    let send = egui::Button::new(RichText::new("Send").color(Color32::WHITE))
                        .fill(self.theme.primary)
                        .rounding(self.theme.button_rounding)
                        .min_size(Vec2::new(72.0, 32.0));
                    let send_response = ui.add_enabled(enabled, send);
                    send_response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, "Send message")
                    });

                    if send_response.clicked() || (submitted && enabled) {
                        self.state.send_chat();
                        response.request_focus();
                    }
                });
            });
    }
}
