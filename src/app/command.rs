use super::config::Config;
use crate::{events::push_event::OutboundSignal, models::chat::ChatIdentity};

/// Side effects requested by the state machine. The reducer never performs
/// I/O itself; `Effects` runs these on the tokio runtime and feeds the
/// results back as events.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ConnectPush,
    LoadLocale,
    FetchStats,
    FetchAdvancedStats,
    FetchAnalytics,
    FetchChats,
    FetchTranscript { identity: ChatIdentity, ticket: u64 },
    FetchExport(ChatIdentity),
    Send(OutboundSignal),
    /// Opens a server-relative or absolute location in the system browser.
    OpenUrl(String),
    SaveConfig(Config),
}
