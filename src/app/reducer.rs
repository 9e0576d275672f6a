use super::{
    chat_table::TableStatus,
    command::Command,
    config::Config,
    state::{AppState, Dashboard, Loadable},
    view_sync::DOWNLOAD_FAILED,
};
use crate::events::{
    app_event::{AppEvent, ConnectionStatus, UiAction},
    push_event::{OutboundSignal, PushEvent},
};
use chrono::Local;
use std::time::{Duration, Instant};

/// Applies one event to the state and returns the side effects it asks for.
/// All data and table state changes go through here; the UI only consumes
/// one-shot view flags such as the transcript's scroll request.
pub fn reduce(
    state: &mut AppState,
    event: AppEvent,
    config: &mut Config,
    now: Instant,
) -> Vec<Command> {
    match state {
        AppState::Ready(dashboard) => reduce_dashboard(dashboard, event, config, now),
        AppState::LoadingConfig => match event {
            AppEvent::ConfigLoaded(result) => handle_config_loaded(state, result, config),
            event => {
                tracing::debug!("Dropping {:?} received before startup finished", event);
                Vec::new()
            }
        },
    }
}

/// Housekeeping run once per frame.
pub fn tick(state: &mut AppState, now: Instant) {
    if let AppState::Ready(dashboard) = state {
        let expired = dashboard.notices.expire(now);
        if expired > 0 {
            tracing::trace!("{} banner(s) expired", expired);
        }
    }
}

fn handle_config_loaded(
    state: &mut AppState,
    result: Result<Config, eyre::Report>,
    config: &mut Config,
) -> Vec<Command> {
    match result {
        Ok(loaded) => *config = loaded,
        Err(e) => tracing::error!("Failed to load config, using defaults: {:#}", e),
    }

    *state = AppState::Ready(Box::new(Dashboard::new(config)));
    vec![
        Command::ConnectPush,
        Command::LoadLocale,
        Command::FetchStats,
        Command::FetchAdvancedStats,
        Command::FetchAnalytics,
        Command::FetchChats,
    ]
}

fn reduce_dashboard(
    dashboard: &mut Dashboard,
    event: AppEvent,
    config: &Config,
    now: Instant,
) -> Vec<Command> {
    match event {
        AppEvent::ConfigLoaded(_) => {
            tracing::warn!("Ignoring config reload after startup");
            Vec::new()
        }
        AppEvent::Push(event) => {
            handle_push_event(dashboard, event, now);
            Vec::new()
        }
        AppEvent::PushStatus(status) => handle_push_status(dashboard, status),
        AppEvent::StatsLoaded(result) => {
            dashboard.stats.stats = loaded("stats", result);
            dashboard.stats.updated_at = Some(Local::now());
            Vec::new()
        }
        AppEvent::AdvancedStatsLoaded(result) => {
            dashboard.stats.advanced = loaded("advanced stats", result);
            Vec::new()
        }
        AppEvent::AnalyticsLoaded(result) => {
            match result {
                Ok(analytics) => {
                    dashboard.charts.analytics = analytics;
                    dashboard.charts.placeholder = false;
                }
                Err(e) => tracing::warn!("Analytics unavailable, keeping placeholder data: {}", e),
            }
            Vec::new()
        }
        AppEvent::ChatsLoaded(result) => {
            match result {
                Ok(rows) => {
                    tracing::info!("Loaded {} chats", rows.len());
                    dashboard.chats.set_rows(rows);
                }
                Err(e) => {
                    tracing::error!("Failed to load chats: {}", e);
                    dashboard.chats.status =
                        TableStatus::Failed("Failed to load chats.".into());
                }
            }
            Vec::new()
        }
        AppEvent::TranscriptLoaded {
            identity,
            ticket,
            result,
        } => dashboard
            .chat_view
            .on_transcript_loaded(identity, ticket, result),
        AppEvent::ExportLoaded { identity, result } => {
            match dashboard.chat_view.on_export_loaded(&identity, result) {
                Ok(command) => vec![command],
                Err(alert) => {
                    dashboard.alert = Some(alert.to_string());
                    Vec::new()
                }
            }
        }
        AppEvent::LocaleLoaded(result) => {
            match result {
                Ok(locale) => dashboard.locale = locale,
                Err(e) => tracing::warn!("Localization bundle unavailable: {}", e),
            }
            Vec::new()
        }
        AppEvent::DownloadFailed(e) => {
            tracing::warn!("Export download failed: {}", e);
            dashboard.alert = Some(DOWNLOAD_FAILED.to_string());
            Vec::new()
        }
        AppEvent::StatsTick => match dashboard.connection {
            ConnectionStatus::Connected => vec![Command::Send(OutboundSignal::RequestStatsUpdate)],
            // Without the push channel, poll the data channel instead.
            _ => vec![Command::FetchStats, Command::FetchAdvancedStats],
        },
        AppEvent::Ui(action) => handle_ui_action(dashboard, action, config),
    }
}

fn loaded<T>(what: &str, result: Result<T, String>) -> Loadable<T> {
    match result {
        Ok(value) => Loadable::Ready(value),
        Err(e) => {
            tracing::error!("Failed to load {}: {}", what, e);
            Loadable::Failed(format!("Failed to load {}.", what))
        }
    }
}

fn handle_push_event(dashboard: &mut Dashboard, event: PushEvent, now: Instant) {
    match event {
        PushEvent::ChatSnapshot { .. } | PushEvent::ChatMessage { .. } => {
            dashboard.chat_view.on_push_event(&event);
        }
        PushEvent::Alert(notice) => {
            dashboard.notices.present(notice, now);
        }
        PushEvent::StatsUpdate(update) => dashboard.stats.apply_update(update),
        PushEvent::ServerGreeting(_) => {}
    }
}

fn handle_push_status(dashboard: &mut Dashboard, status: ConnectionStatus) -> Vec<Command> {
    dashboard.connection = status;
    if status != ConnectionStatus::Connected {
        return Vec::new();
    }

    let mut commands = vec![Command::Send(OutboundSignal::RequestStatsUpdate)];
    // A fresh connection has no subscription yet.
    if let Some(identity) = dashboard.chat_view.open_chat() {
        commands.push(Command::Send(OutboundSignal::subscribe(identity)));
    }
    commands
}

fn handle_ui_action(dashboard: &mut Dashboard, action: UiAction, config: &Config) -> Vec<Command> {
    match action {
        UiAction::OpenChat(identity) => dashboard.chat_view.open_chat_view(identity),
        UiAction::RefreshChat => dashboard.chat_view.refresh_open_chat(),
        UiAction::Export(identity) => dashboard.chat_view.export(identity),
        UiAction::ReloadChats => {
            dashboard.chats.status = TableStatus::Loading;
            vec![Command::FetchChats]
        }
        UiAction::SearchChats(query) => {
            dashboard.chats.set_query(query);
            Vec::new()
        }
        UiAction::SortChats(column) => {
            dashboard.chats.toggle_sort(column);
            Vec::new()
        }
        UiAction::NextPage => {
            dashboard.chats.next_page();
            Vec::new()
        }
        UiAction::PreviousPage => {
            dashboard.chats.previous_page();
            Vec::new()
        }
        UiAction::DismissNotice(id) => {
            dashboard.notices.dismiss(id);
            Vec::new()
        }
        UiAction::DismissAlert => {
            dashboard.alert = None;
            Vec::new()
        }
        UiAction::SettingsChanged => {
            dashboard.chats.set_page_size(config.page_size);
            dashboard
                .notices
                .set_lifetime(Duration::from_secs(config.notice_lifetime_secs));
            vec![Command::SaveConfig(config.clone())]
        }
    }
}
