use crate::{
    app::{
        config::{self, Config},
        effects::Effects,
        reducer,
        state::{AppState, Dashboard},
    },
    events::app_event::{AppEvent, ConnectionStatus, UiAction},
    ui::{
        dashboard::{charts, chat_table, notices, stats, transcript},
        fonts,
    },
};
use eframe::egui::{self, Align, Color32, Layout, SidePanel, TopBottomPanel};
use std::time::{Duration, Instant};
use tokio::{runtime::Handle, sync::mpsc};

pub struct App {
    state: AppState,
    event_rx: mpsc::Receiver<AppEvent>,
    event_tx: mpsc::Sender<AppEvent>,
    config: Config,
    runtime: Handle,
    effects: Option<Effects>,
    show_settings_window: bool,
    startup_task_spawned: bool,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, runtime: Handle) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        fonts::install_system_fonts(&cc.egui_ctx);

        let (event_tx, event_rx) = mpsc::channel(256);

        Self {
            state: AppState::LoadingConfig,
            event_rx,
            event_tx,
            config: Config::default(),
            runtime,
            effects: None,
            show_settings_window: false,
            startup_task_spawned: false,
        }
    }

    fn dispatch(&mut self, event: AppEvent) {
        let commands = reducer::reduce(&mut self.state, event, &mut self.config, Instant::now());
        if commands.is_empty() {
            return;
        }

        if self.effects.is_none() {
            match Effects::new(self.runtime.clone(), &self.config, self.event_tx.clone()) {
                Ok(effects) => self.effects = Some(effects),
                Err(e) => {
                    tracing::error!("Cannot reach the admin server: {:#}", e);
                    if let AppState::Ready(dashboard) = &mut self.state {
                        dashboard.alert = Some(format!("Invalid server settings: {:#}", e));
                    }
                    return;
                }
            }
        }
        if let Some(effects) = &mut self.effects {
            effects.run_all(commands);
        }
    }

    fn spawn_startup_task(&mut self) {
        self.startup_task_spawned = true;
        let tx = self.event_tx.clone();
        self.runtime.spawn(async move {
            let result = config::load().await;
            tx.send(AppEvent::ConfigLoaded(result)).await.ok();
        });
    }

    fn apply_settings(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        style.text_styles.iter_mut().for_each(|(_, font_id)| {
            font_id.size = self.config.font_size;
        });
        ctx.set_style(style);
    }

    fn draw_loading_ui(&self, ctx: &egui::Context, message: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.with_layout(Layout::top_down(Align::Center), |ui| {
                    ui.heading(message);
                    ui.add_space(10.0);
                    ui.spinner();
                });
            });
        });
    }

    fn draw_dashboard(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let AppState::Ready(dashboard) = &mut self.state else {
            return;
        };
        let dashboard: &mut Dashboard = dashboard;

        TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("botwatch");
                ui.label("operator console");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("⚙ Settings").clicked() {
                        self.show_settings_window = true;
                    }
                    let (color, text) = match dashboard.connection {
                        ConnectionStatus::Connected => (Color32::from_rgb(74, 222, 128), "● Live"),
                        ConnectionStatus::Connecting => (Color32::from_rgb(255, 193, 7), "● Connecting"),
                        ConnectionStatus::Disconnected => {
                            (Color32::from_rgb(248, 113, 113), "● Offline")
                        }
                    };
                    ui.colored_label(color, text);
                });
            });
            ui.separator();
            stats::draw_stats(ui, &dashboard.stats);
            ui.add_space(4.0);
        });

        SidePanel::left("chats_panel")
            .resizable(true)
            .default_width(620.0)
            .min_width(380.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    chat_table::draw_chat_table(
                        ui,
                        &dashboard.chats,
                        &dashboard.locale,
                        dashboard.chat_view.open_chat(),
                        actions,
                    );
                    ui.separator();
                    charts::draw_charts(ui, &dashboard.charts);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            transcript::draw_transcript(
                ui,
                &mut dashboard.chat_view,
                self.config.show_timestamps,
                actions,
            );
        });

        notices::draw_notices(ctx, &dashboard.notices, actions);

        if let Some(alert) = &dashboard.alert {
            egui::Window::new("⚠ Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(alert.as_str());
                    if ui.button("OK").clicked() {
                        actions.push(UiAction::DismissAlert);
                    }
                });
        }
    }

    fn draw_settings_window(&mut self, ctx: &egui::Context) {
        let mut config_changed = false;
        egui::Window::new("Settings")
            .open(&mut self.show_settings_window)
            .show(ctx, |ui| {
                ui.heading("Appearance");
                config_changed |= ui
                    .add(egui::Slider::new(&mut self.config.font_size, 8.0..=24.0).text("Font Size"))
                    .changed();
                config_changed |= ui
                    .checkbox(&mut self.config.show_timestamps, "Show message timestamps")
                    .changed();

                ui.separator();
                ui.heading("Dashboard");
                config_changed |= ui
                    .add(egui::Slider::new(&mut self.config.page_size, 5..=100).text("Chats per page"))
                    .changed();
                config_changed |= ui
                    .add(
                        egui::Slider::new(&mut self.config.notice_lifetime_secs, 3..=60)
                            .text("Notice lifetime (s)"),
                    )
                    .changed();

                ui.separator();
                ui.label(format!("Server: {}", self.config.server_url));
                ui.label(format!("Push: {}", self.config.push_url));
                ui.label(
                    egui::RichText::new("Server addresses apply after a restart.")
                        .small()
                        .weak(),
                );
            });

        if config_changed {
            self.dispatch(AppEvent::Ui(UiAction::SettingsChanged));
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_settings(ctx);

        while let Ok(event) = self.event_rx.try_recv() {
            self.dispatch(event);
        }
        reducer::tick(&mut self.state, Instant::now());

        let mut actions = Vec::new();
        if matches!(self.state, AppState::LoadingConfig) {
            if !self.startup_task_spawned {
                self.spawn_startup_task();
            }
            self.draw_loading_ui(ctx, "Starting...");
        } else {
            self.draw_dashboard(ctx, &mut actions);
            self.draw_settings_window(ctx);
        }

        for action in actions {
            self.dispatch(AppEvent::Ui(action));
        }

        // Wake up for the next banner expiry even when nothing else happens.
        let mut repaint_after = Duration::from_millis(250);
        if let AppState::Ready(dashboard) = &self.state {
            if let Some(expiry) = dashboard.notices.next_expiry() {
                repaint_after = repaint_after.min(expiry.saturating_duration_since(Instant::now()));
            }
        }
        ctx.request_repaint_after(repaint_after);
    }
}
