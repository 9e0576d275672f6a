use crate::{
    app::state::{Loadable, StatsPanel},
    utils::format::{format_percent, format_rub},
};
use eframe::egui::{self, Color32, RichText};

fn stat(ui: &mut egui::Ui, label: &str, value: String) {
    ui.group(|ui| {
        ui.vertical(|ui| {
            ui.label(RichText::new(label).small().weak());
            ui.label(RichText::new(value).heading().strong());
        });
    });
}

fn value_or<T>(loadable: &Loadable<T>, show: impl Fn(&T) -> String) -> String {
    match loadable {
        Loadable::Ready(value) => show(value),
        Loadable::Loading => "…".to_string(),
        Loadable::Failed(_) => "—".to_string(),
    }
}

pub fn draw_stats(ui: &mut egui::Ui, panel: &StatsPanel) {
    ui.horizontal_wrapped(|ui| {
        stat(ui, "Users", value_or(&panel.stats, |s| s.users.to_string()));
        stat(ui, "Payments", value_or(&panel.stats, |s| s.paid.to_string()));
        stat(ui, "Active subscriptions", value_or(&panel.stats, |s| s.active.to_string()));
        stat(ui, "DAU", value_or(&panel.advanced, |s| s.dau.to_string()));
        stat(ui, "MAU", value_or(&panel.advanced, |s| s.mau.to_string()));
        stat(
            ui,
            "Retention",
            value_or(&panel.advanced, |s| format_percent(s.retention_rate)),
        );
        stat(ui, "LTV", value_or(&panel.advanced, |s| format_rub(s.ltv)));
    });

    for failure in [panel.stats.failure(), panel.advanced.failure()]
        .into_iter()
        .flatten()
    {
        ui.colored_label(Color32::from_rgb(248, 113, 113), failure);
    }
    if let Some(updated_at) = panel.updated_at {
        ui.label(
            RichText::new(format!("Updated {}", updated_at.format("%H:%M:%S")))
                .small()
                .weak(),
        );
    }
}
