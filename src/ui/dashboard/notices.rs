use crate::{
    app::notifications::NotificationPresenter,
    events::app_event::UiAction,
    models::{chat::Sentiment, notice::Severity},
};
use eframe::egui::{self, Align2, Area, Color32, Frame, Id, Margin, RichText, vec2};

fn colors(severity: Severity) -> (Color32, Color32) {
    match severity {
        Severity::Info => (Color32::from_rgb(13, 202, 240), Color32::WHITE),
        Severity::Danger => (Color32::from_rgb(220, 53, 69), Color32::WHITE),
    }
}

fn sentiment_badge(sentiment: Sentiment) -> Color32 {
    match sentiment {
        Sentiment::Positive => Color32::from_rgb(25, 135, 84),
        Sentiment::Negative => Color32::from_rgb(220, 53, 69),
        Sentiment::Neutral => Color32::from_rgb(108, 117, 125),
    }
}

/// Stacks banners in the bottom-right corner, newest at the bottom.
pub fn draw_notices(ctx: &egui::Context, tray: &NotificationPresenter, actions: &mut Vec<UiAction>) {
    if tray.visible().is_empty() {
        return;
    }

    Area::new(Id::new("notice_tray"))
        .anchor(Align2::RIGHT_BOTTOM, vec2(-12.0, -12.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.set_max_width(360.0);
            for banner in tray.visible() {
                let (fill, text) = colors(banner.severity());
                Frame::new()
                    .fill(fill)
                    .corner_radius(6.0)
                    .inner_margin(Margin::same(10))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.label(RichText::new(banner.notice.title()).strong().color(text));
                                ui.label(RichText::new(banner.notice.body()).color(text));
                                if let Some((sentiment, tags)) = banner.notice.annotations() {
                                    ui.horizontal_wrapped(|ui| {
                                        ui.label(
                                            RichText::new(sentiment.as_str())
                                                .small()
                                                .background_color(sentiment_badge(sentiment))
                                                .color(Color32::WHITE),
                                        );
                                        for tag in tags {
                                            ui.label(
                                                RichText::new(tag.as_str())
                                                    .small()
                                                    .background_color(Color32::LIGHT_GRAY)
                                                    .color(Color32::BLACK),
                                            );
                                        }
                                    });
                                }
                                ui.label(
                                    RichText::new(banner.received_at.format("%H:%M:%S").to_string())
                                        .small()
                                        .color(text),
                                );
                            });
                            if ui.small_button("✕").clicked() {
                                actions.push(UiAction::DismissNotice(banner.id));
                            }
                        });
                    });
                ui.add_space(8.0);
            }
        });
}
