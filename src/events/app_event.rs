use super::push_event::PushEvent;
use crate::{
    app::{chat_table::SortColumn, config::Config, notifications::NoticeId},
    core::asset_cache::TableLocale,
    models::{
        chat::{ChatIdentity, ChatSummary, ExportResponse, Transcript},
        stats::{AdvancedStats, Analytics, Stats},
    },
};

#[derive(Debug)]
pub enum AppEvent {
    ConfigLoaded(Result<Config, eyre::Report>),
    Push(PushEvent),
    PushStatus(ConnectionStatus),
    StatsLoaded(Result<Stats, String>),
    AdvancedStatsLoaded(Result<AdvancedStats, String>),
    AnalyticsLoaded(Result<Analytics, String>),
    ChatsLoaded(Result<Vec<ChatSummary>, String>),
    TranscriptLoaded {
        identity: ChatIdentity,
        ticket: u64,
        result: Result<Transcript, String>,
    },
    ExportLoaded {
        identity: ChatIdentity,
        result: Result<ExportResponse, String>,
    },
    LocaleLoaded(Result<TableLocale, String>),
    /// An export download could not be handed to the browser.
    DownloadFailed(String),
    /// Periodic stats refresh timer.
    StatsTick,
    Ui(UiAction),
}

/// Operator intents raised by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    OpenChat(ChatIdentity),
    RefreshChat,
    Export(ChatIdentity),
    ReloadChats,
    SearchChats(String),
    SortChats(SortColumn),
    NextPage,
    PreviousPage,
    DismissNotice(NoticeId),
    DismissAlert,
    /// The settings window edited the shared `Config`.
    SettingsChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}
