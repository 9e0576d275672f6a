use crate::{
    app::chat_table::{ChatTable, SortColumn, SortOrder, TableStatus},
    core::asset_cache::TableLocale,
    events::app_event::UiAction,
    models::chat::ChatIdentity,
};
use eframe::egui::{self, Color32, RichText};
use egui_extras::{Column, TableBuilder};

pub fn draw_chat_table(
    ui: &mut egui::Ui,
    table: &ChatTable,
    locale: &TableLocale,
    open_chat: Option<&ChatIdentity>,
    actions: &mut Vec<UiAction>,
) {
    ui.horizontal(|ui| {
        ui.heading("Chats");
        if ui.button("⟳").on_hover_text("Reload").clicked() {
            actions.push(UiAction::ReloadChats);
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let mut query = table.query().to_string();
            if ui.text_edit_singleline(&mut query).changed() {
                actions.push(UiAction::SearchChats(query));
            }
            ui.label(locale.search.as_str());
        });
    });

    match &table.status {
        TableStatus::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(locale.loading.as_str());
            });
            return;
        }
        TableStatus::Failed(reason) => {
            ui.colored_label(Color32::from_rgb(248, 113, 113), reason.as_str());
            return;
        }
        TableStatus::Ready => {}
    }

    let (sort_column, sort_order) = table.sort();
    let (rows, first, last) = table.visible();

    TableBuilder::new(ui)
        .id_salt("chats_table")
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(48.0))
        .column(Column::auto())
        .column(Column::auto().at_least(100.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for column in SortColumn::ALL {
                header.col(|ui| {
                    let arrow = match (column == sort_column, sort_order) {
                        (true, SortOrder::Ascending) => " ▲",
                        (true, SortOrder::Descending) => " ▼",
                        (false, _) => "",
                    };
                    if ui
                        .selectable_label(column == sort_column, format!("{}{}", column.label(), arrow))
                        .clicked()
                    {
                        actions.push(UiAction::SortChats(column));
                    }
                });
            }
            header.col(|ui| {
                ui.strong("Actions");
            });
        })
        .body(|mut body| {
            for row in &rows {
                let identity = row.identity();
                let is_open = open_chat == Some(&identity);
                body.row(22.0, |mut table_row| {
                    table_row.set_selected(is_open);
                    table_row.col(|ui| {
                        ui.label(row.user_id.as_str());
                    });
                    table_row.col(|ui| {
                        ui.label(row.bot_type.display_name());
                    });
                    table_row.col(|ui| {
                        ui.label(row.full_name());
                    });
                    table_row.col(|ui| {
                        ui.label(format!("@{}", row.username.as_deref().unwrap_or("—")));
                    });
                    table_row.col(|ui| {
                        ui.label(row.relationship_mode.as_deref().unwrap_or("—"));
                    });
                    table_row.col(|ui| {
                        ui.label(row.language.as_deref().unwrap_or("—"));
                    });
                    table_row.col(|ui| {
                        if ui.small_button("👁 View").clicked() {
                            actions.push(UiAction::OpenChat(identity.clone()));
                        }
                        if ui.small_button("📥 Export").clicked() {
                            actions.push(UiAction::Export(identity.clone()));
                        }
                    });
                });
            }
        });

    if rows.is_empty() {
        let text = if table.total() == 0 {
            locale.empty_table.as_str()
        } else {
            locale.zero_records.as_str()
        };
        ui.label(RichText::new(text).weak());
    }

    let matching = table.matching();
    ui.horizontal(|ui| {
        ui.label(locale.info_line(first, last, matching));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button(locale.paginate.next.as_str()).clicked() {
                actions.push(UiAction::NextPage);
            }
            ui.label(format!("{}/{}", table.page() + 1, table.page_count()));
            if ui.button(locale.paginate.previous.as_str()).clicked() {
                actions.push(UiAction::PreviousPage);
            }
        });
    });
}
