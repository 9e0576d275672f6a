use crate::{
    app::{
        render::{ProfileCard, RenderedMessage, TranscriptPanel, TranscriptView, UserHeader},
        view_sync::ViewSyncController,
    },
    events::app_event::UiAction,
    models::chat::{Role, Sentiment},
    utils::text_processing::ContentSpan,
};
use eframe::egui::{self, Align, Color32, Frame, Margin, RichText, ScrollArea};

const USER_BADGE: Color32 = Color32::from_rgb(13, 110, 253);
const BOT_BADGE: Color32 = Color32::from_rgb(108, 117, 125);
const TAG_BADGE: Color32 = Color32::from_rgb(13, 202, 240);

pub fn draw_transcript(
    ui: &mut egui::Ui,
    controller: &mut ViewSyncController,
    show_timestamps: bool,
    actions: &mut Vec<UiAction>,
) {
    let scroll_to_newest = controller.take_scroll_request();

    ui.horizontal(|ui| {
        let title = match controller.panel() {
            TranscriptPanel::Open(view) => format!("💬 Chat with {}", view.title),
            _ => "💬 Chat".to_string(),
        };
        ui.heading(title);
        if let Some(identity) = controller.loading() {
            ui.spinner();
            ui.label(RichText::new(format!("Loading {}…", identity)).weak());
        }
        ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
            if ui
                .add_enabled(controller.open_chat().is_some(), egui::Button::new("⟳ Refresh"))
                .clicked()
            {
                actions.push(UiAction::RefreshChat);
            }
        });
    });
    ui.separator();

    match controller.panel() {
        TranscriptPanel::Hidden => {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Select a chat to view the conversation.").weak());
            });
        }
        TranscriptPanel::Error(reason) => {
            ui.colored_label(Color32::from_rgb(220, 53, 69), reason.as_str());
        }
        TranscriptPanel::Open(view) => draw_view(ui, view, show_timestamps, scroll_to_newest),
    }
}

fn draw_view(ui: &mut egui::Ui, view: &TranscriptView, show_timestamps: bool, scroll: bool) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            draw_header(ui, &view.header);
            ui.separator();

            if view.messages.is_empty() {
                ui.label(RichText::new("No messages yet.").weak());
            }
            for message in &view.messages {
                draw_message(ui, message, show_timestamps);
            }
            if scroll {
                ui.scroll_to_cursor(Some(Align::BOTTOM));
            }
        });
}

fn draw_header(ui: &mut egui::Ui, header: &UserHeader) {
    ui.label(RichText::new(header.summary.as_str()).strong());
    match &header.profile {
        Some(ProfileCard::Ready {
            temperament,
            emotional_tone,
            communication_style,
            needs,
            summary,
        }) => {
            ui.group(|ui| {
                ui.strong("🧠 Psychological profile");
                ui.label(format!("Temperament: {}", temperament));
                ui.label(format!("Emotional tone: {}", emotional_tone));
                ui.label(format!("Communication style: {}", communication_style));
                ui.horizontal_wrapped(|ui| {
                    ui.label("Needs:");
                    if needs.is_empty() {
                        ui.label("—");
                    }
                    for need in needs {
                        badge(ui, need, TAG_BADGE);
                    }
                });
                ui.label(format!("Summary: {}", summary));
            });
        }
        Some(ProfileCard::Unavailable(reason)) => {
            ui.colored_label(
                Color32::from_rgb(255, 193, 7),
                format!("Psychological profile not generated: {}", reason),
            );
        }
        None => {}
    }
}

fn badge(ui: &mut egui::Ui, text: &str, color: Color32) {
    Frame::new()
        .fill(color)
        .corner_radius(4.0)
        .inner_margin(Margin::symmetric(4, 1))
        .show(ui, |ui| {
            ui.label(RichText::new(text).small().color(Color32::WHITE));
        });
}

fn sentiment_color(sentiment: Sentiment) -> Color32 {
    match sentiment {
        Sentiment::Positive => Color32::from_rgb(74, 222, 128),
        Sentiment::Negative => Color32::from_rgb(248, 113, 113),
        Sentiment::Neutral => Color32::from_rgb(148, 163, 184),
    }
}

fn draw_message(ui: &mut egui::Ui, message: &RenderedMessage, show_timestamps: bool) {
    ui.add_space(6.0);
    ui.horizontal(|ui| {
        let color = match message.role {
            Role::User => USER_BADGE,
            Role::Bot => BOT_BADGE,
        };
        badge(ui, &message.sender, color);
        if show_timestamps && !message.timestamp.is_empty() {
            ui.label(RichText::new(message.timestamp.as_str()).small().weak());
        }
        ui.label(RichText::new(message.sentiment.glyph()).color(sentiment_color(message.sentiment)))
            .on_hover_text(message.sentiment.as_str());
    });

    if !message.tags.is_empty() {
        ui.horizontal_wrapped(|ui| {
            for tag in &message.tags {
                badge(ui, tag, TAG_BADGE);
            }
        });
    }

    Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .corner_radius(6.0)
        .inner_margin(Margin::same(8))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing.x = 0.0;
                for span in &message.content {
                    match span {
                        ContentSpan::Text(text) => {
                            ui.label(text.as_str());
                        }
                        ContentSpan::Link(url) => {
                            ui.hyperlink_to(url.as_str(), url.as_str());
                        }
                    }
                }
            });
        });
}
