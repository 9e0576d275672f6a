use eframe::egui::{self, FontDefinitions};
use std::borrow::Cow;

/// System fonts with Cyrillic coverage, in order of preference. Transcripts
/// are mostly Russian, which egui's bundled fonts do not cover well.
const PREFERRED_FONTS: [&str; 8] = [
    "Segoe UI",
    "Noto Sans",
    "DejaVu Sans",
    "PT Sans",
    "Ubuntu",
    "Cantarell",
    "Arial",
    "Helvetica",
];

pub fn install_system_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let mut loaded_font_count = 0;
    for font_name in PREFERRED_FONTS {
        let query = fontdb::Query {
            families: &[fontdb::Family::Name(font_name)],
            ..Default::default()
        };

        let Some(font_id) = db.query(&query) else {
            continue;
        };
        let Some((source, _)) = db.face_source(font_id) else {
            continue;
        };
        let font_data: Option<Cow<[u8]>> = match source {
            fontdb::Source::Binary(data) => Some(Cow::Owned(data.as_ref().as_ref().to_vec())),
            fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
                std::fs::read(path).ok().map(Cow::Owned)
            }
        };
        let Some(font_data) = font_data else {
            continue;
        };

        let egui_font_name = format!("system-{}", font_name.to_lowercase().replace(' ', "_"));
        fonts.font_data.insert(
            egui_font_name.clone(),
            egui::FontData::from_owned(font_data.into_owned()).into(),
        );
        // Behind egui's own font so its emoji and symbols still win.
        fonts
            .families
            .entry(egui::FontFamily::Proportional)
            .or_default()
            .push(egui_font_name);

        tracing::info!("Loaded system font: {}", font_name);
        loaded_font_count += 1;
    }

    if loaded_font_count == 0 {
        tracing::warn!("No Cyrillic-capable system fonts found. Default fonts will be used.");
    }
    ctx.set_fonts(fonts);
}
