use crate::{app::state::ChartsPanel, models::stats::SentimentDistribution};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, vec2};
use std::f32::consts::TAU;

const POSITIVE: Color32 = Color32::from_rgb(74, 222, 128);
const NEGATIVE: Color32 = Color32::from_rgb(248, 113, 113);
const NEUTRAL: Color32 = Color32::from_rgb(148, 163, 184);
const BAR: Color32 = Color32::from_rgb(129, 140, 248);

pub fn draw_charts(ui: &mut egui::Ui, panel: &ChartsPanel) {
    if panel.placeholder {
        ui.label(RichText::new("Sample data: analytics not available yet").small().weak());
    }
    ui.horizontal_top(|ui| {
        ui.vertical(|ui| {
            ui.strong("Message sentiment");
            draw_doughnut(ui, &panel.analytics.sentiment_distribution);
        });
        ui.vertical(|ui| {
            ui.strong("Popular topics");
            let tags: Vec<(&str, u64)> = panel
                .analytics
                .popular_tags
                .iter()
                .map(|(tag, count)| (tag.as_str(), *count))
                .collect();
            draw_bars(ui, &tags);
        });
    });
}

fn draw_doughnut(ui: &mut egui::Ui, distribution: &SentimentDistribution) {
    let size = 140.0;
    let (response, painter) = ui.allocate_painter(vec2(size, size), Sense::hover());
    let center = response.rect.center();
    let radius = size * 0.38;
    let thickness = size * 0.18;

    let slices = [
        ("Positive", distribution.positive, POSITIVE),
        ("Negative", distribution.negative, NEGATIVE),
        ("Neutral", distribution.neutral, NEUTRAL),
    ];
    let total = distribution.total();
    if total == 0 {
        painter.circle_stroke(center, radius, Stroke::new(thickness, NEUTRAL.gamma_multiply(0.3)));
    } else {
        let mut start = -TAU / 4.0;
        for (_, value, color) in slices {
            let sweep = TAU * value as f32 / total as f32;
            if sweep > 0.0 {
                painter.add(Shape::line(arc(center, radius, start, sweep), Stroke::new(thickness, color)));
            }
            start += sweep;
        }
    }

    ui.horizontal(|ui| {
        for (label, value, color) in slices {
            ui.colored_label(color, format!("■ {} {}", label, value));
        }
    });
}

fn arc(center: Pos2, radius: f32, start: f32, sweep: f32) -> Vec<Pos2> {
    let steps = ((sweep / TAU) * 64.0).ceil().max(2.0) as usize;
    (0..=steps)
        .map(|i| {
            let angle = start + sweep * i as f32 / steps as f32;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

fn draw_bars(ui: &mut egui::Ui, tags: &[(&str, u64)]) {
    let size = vec2(260.0, 140.0);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let area = response.rect.shrink2(vec2(4.0, 16.0));
    let max = tags.iter().map(|(_, count)| *count).max().unwrap_or(0).max(1);
    let font = FontId::proportional(10.0);
    let text_color = ui.visuals().text_color();

    if tags.is_empty() {
        painter.text(area.center(), Align2::CENTER_CENTER, "No data", font, text_color);
        return;
    }

    let slot = area.width() / tags.len() as f32;
    for (i, (tag, count)) in tags.iter().enumerate() {
        let height = area.height() * *count as f32 / max as f32;
        let left = area.left() + slot * i as f32 + slot * 0.15;
        let bar = Rect::from_min_max(
            Pos2::new(left, area.bottom() - height),
            Pos2::new(left + slot * 0.7, area.bottom()),
        );
        painter.rect_filled(bar, 2.0, BAR);
        painter.text(
            Pos2::new(bar.center().x, bar.top() - 2.0),
            Align2::CENTER_BOTTOM,
            count.to_string(),
            font.clone(),
            text_color,
        );
        painter.text(
            Pos2::new(bar.center().x, area.bottom() + 2.0),
            Align2::CENTER_TOP,
            *tag,
            font.clone(),
            text_color,
        );
    }
}
