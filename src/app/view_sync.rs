//! Keeps the transcript panel in step with the chat the operator has open.
//!
//! The open chat is set only when a transcript fetch started by
//! [`ViewSyncController::open_chat_view`] completes successfully. Push events
//! for any other chat are dropped, and fetch responses that were superseded
//! by a newer `open_chat_view` call are ignored.

use super::{
    command::Command,
    render::{TranscriptPanel, TranscriptView, render_message, render_user_header},
};
use crate::{
    events::push_event::{OutboundSignal, PushEvent},
    models::chat::{ChatIdentity, ExportResponse, Transcript},
};

pub const CHAT_LOAD_ERROR: &str = "Failed to load chat.";
pub const EXPORT_FAILED: &str = "Export failed.";
pub const EXPORT_REQUEST_FAILED: &str = "Export request failed.";
pub const DOWNLOAD_FAILED: &str = "Could not open the export download.";

#[derive(Debug, Default)]
pub struct ViewSyncController {
    open_chat: Option<ChatIdentity>,
    /// Ticket of the newest transcript fetch still in flight.
    pending: Option<(u64, ChatIdentity)>,
    next_ticket: u64,
    panel: TranscriptPanel,
    scroll_to_newest: bool,
}

impl ViewSyncController {
    pub fn open_chat(&self) -> Option<&ChatIdentity> {
        self.open_chat.as_ref()
    }

    pub fn panel(&self) -> &TranscriptPanel {
        &self.panel
    }

    pub fn loading(&self) -> Option<&ChatIdentity> {
        self.pending.as_ref().map(|(_, identity)| identity)
    }

    /// Returns true once after the panel gained content that should be
    /// scrolled into view.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_newest)
    }

    pub fn open_chat_view(&mut self, identity: ChatIdentity) -> Vec<Command> {
        if identity.user_id.trim().is_empty() {
            tracing::warn!("Refusing to open a chat without a user id");
            return Vec::new();
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        tracing::info!("Loading chat {} (request {})", identity, ticket);
        self.pending = Some((ticket, identity.clone()));
        vec![Command::FetchTranscript { identity, ticket }]
    }

    pub fn refresh_open_chat(&mut self) -> Vec<Command> {
        match self.open_chat.clone() {
            Some(identity) => self.open_chat_view(identity),
            None => Vec::new(),
        }
    }

    /// Completes an `open_chat_view` call.
    pub fn on_transcript_loaded(
        &mut self,
        identity: ChatIdentity,
        ticket: u64,
        result: Result<Transcript, String>,
    ) -> Vec<Command> {
        match &self.pending {
            Some((pending, _)) if *pending == ticket => self.pending = None,
            _ => {
                tracing::debug!(
                    "Discarding stale transcript for {} (request {})",
                    identity,
                    ticket
                );
                return Vec::new();
            }
        }

        match result {
            Ok(transcript) => {
                let header = render_user_header(&transcript.user_info);
                self.panel = TranscriptPanel::Open(TranscriptView::render(
                    &identity,
                    header,
                    &transcript.messages,
                ));
                self.scroll_to_newest = true;
                let subscribe = OutboundSignal::subscribe(&identity);
                self.open_chat = Some(identity);
                vec![Command::Send(subscribe)]
            }
            Err(e) => {
                tracing::error!("Failed to load chat {}: {}", identity, e);
                self.open_chat = None;
                self.panel = TranscriptPanel::Error(CHAT_LOAD_ERROR.to_string());
                Vec::new()
            }
        }
    }

    /// Reconciles a chat push event with the open chat. Events for other
    /// chats, and alert events, leave the controller untouched.
    pub fn on_push_event(&mut self, event: &PushEvent) {
        let Some(identity) = event.identity() else {
            return;
        };
        if self.open_chat.as_ref() != Some(identity) {
            tracing::debug!("Dropping push update for {}, not the open chat", identity);
            return;
        }

        match event {
            PushEvent::ChatSnapshot {
                identity,
                messages,
                user_info,
            } => {
                let header = match (user_info, &self.panel) {
                    (Some(info), _) => render_user_header(info),
                    (None, TranscriptPanel::Open(view)) => view.header.clone(),
                    (None, _) => render_user_header(&Default::default()),
                };
                self.panel =
                    TranscriptPanel::Open(TranscriptView::render(identity, header, messages));
                self.scroll_to_newest = true;
            }
            PushEvent::ChatMessage { identity, message } => {
                if let TranscriptPanel::Open(view) = &mut self.panel {
                    view.messages.push(render_message(message, identity.bot_type));
                    self.scroll_to_newest = true;
                }
            }
            _ => {}
        }
    }

    pub fn export(&self, identity: ChatIdentity) -> Vec<Command> {
        if identity.user_id.trim().is_empty() {
            tracing::warn!("Refusing to export a chat without a user id");
            return Vec::new();
        }
        tracing::info!("Requesting export of {}", identity);
        vec![Command::FetchExport(identity)]
    }

    /// Turns an export response into a navigation command, or the alert text
    /// to show the operator.
    pub fn on_export_loaded(
        &self,
        identity: &ChatIdentity,
        result: Result<ExportResponse, String>,
    ) -> Result<Command, &'static str> {
        match result {
            Ok(ExportResponse {
                download_url: Some(url),
            }) if !url.trim().is_empty() => {
                tracing::info!("Export of {} ready at {}", identity, url);
                Ok(Command::OpenUrl(url))
            }
            Ok(_) => {
                tracing::warn!("Export of {} returned no download location", identity);
                Err(EXPORT_FAILED)
            }
            Err(e) => {
                tracing::error!("Export of {} failed: {}", identity, e);
                Err(EXPORT_REQUEST_FAILED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        chat::{BotType, Message, Role, Sentiment, UserInfo},
        notice::Notice,
    };

    fn msg(role: Role, content: &str) -> Message {
        Message {
            role,
            content: content.to_string(),
            timestamp: "2025-09-25 10:00:00".to_string(),
            sentiment: Sentiment::Neutral,
            tags: Vec::new(),
        }
    }

    fn transcript(messages: Vec<Message>) -> Transcript {
        Transcript {
            user_info: UserInfo {
                first_name: Some("Ann".into()),
                ..UserInfo::default()
            },
            messages,
        }
    }

    fn ticket_of(commands: &[Command]) -> u64 {
        match commands {
            [Command::FetchTranscript { ticket, .. }] => *ticket,
            other => panic!("expected a single fetch, got {:?}", other),
        }
    }

    /// Opens `identity` and completes the fetch with `messages`.
    fn opened(identity: &ChatIdentity, messages: Vec<Message>) -> ViewSyncController {
        let mut controller = ViewSyncController::default();
        let ticket = ticket_of(&controller.open_chat_view(identity.clone()));
        controller.on_transcript_loaded(identity.clone(), ticket, Ok(transcript(messages)));
        controller
    }

    fn view(controller: &ViewSyncController) -> &TranscriptView {
        match controller.panel() {
            TranscriptPanel::Open(view) => view,
            other => panic!("panel not open: {:?}", other),
        }
    }

    #[test]
    fn opening_a_chat_renders_and_subscribes() {
        let identity = ChatIdentity::new("42", BotType::Evg);
        let mut controller = ViewSyncController::default();
        let ticket = ticket_of(&controller.open_chat_view(identity.clone()));
        assert_eq!(controller.open_chat(), None);
        assert_eq!(controller.loading(), Some(&identity));

        let commands = controller.on_transcript_loaded(
            identity.clone(),
            ticket,
            Ok(transcript(vec![msg(Role::User, "hi"), msg(Role::Bot, "hello")])),
        );

        assert_eq!(commands, vec![Command::Send(OutboundSignal::subscribe(&identity))]);
        assert_eq!(controller.open_chat(), Some(&identity));
        assert_eq!(controller.loading(), None);
        let view = view(&controller);
        assert_eq!(view.title, "42 (evg)");
        assert_eq!(view.messages.len(), 2);
        assert!(controller.take_scroll_request());
        assert!(!controller.take_scroll_request());
    }

    #[test]
    fn empty_user_id_is_rejected() {
        let mut controller = ViewSyncController::default();
        assert!(controller.open_chat_view(ChatIdentity::new("  ", BotType::Evg)).is_empty());
        assert!(controller.export(ChatIdentity::new("", BotType::Evg)).is_empty());
        assert_eq!(controller.loading(), None);
    }

    #[test]
    fn failed_fetch_shows_error_and_clears_open_chat() {
        let identity = ChatIdentity::new("42", BotType::Evg);
        let mut controller = opened(&identity, vec![msg(Role::User, "hi")]);

        let ticket = ticket_of(&controller.refresh_open_chat());
        let commands =
            controller.on_transcript_loaded(identity, ticket, Err("500".to_string()));

        assert!(commands.is_empty());
        assert_eq!(controller.open_chat(), None);
        assert_eq!(
            controller.panel(),
            &TranscriptPanel::Error(CHAT_LOAD_ERROR.to_string())
        );
    }

    #[test]
    fn refresh_without_open_chat_is_a_no_op() {
        let mut controller = ViewSyncController::default();
        assert!(controller.refresh_open_chat().is_empty());
    }

    #[test]
    fn stale_fetch_does_not_overwrite_newer_chat() {
        let first = ChatIdentity::new("42", BotType::Evg);
        let second = ChatIdentity::new("99", BotType::Damon);
        let mut controller = ViewSyncController::default();

        let old_ticket = ticket_of(&controller.open_chat_view(first.clone()));
        let new_ticket = ticket_of(&controller.open_chat_view(second.clone()));

        let commands = controller.on_transcript_loaded(
            first,
            old_ticket,
            Ok(transcript(vec![msg(Role::User, "old")])),
        );
        assert!(commands.is_empty());
        assert_eq!(controller.open_chat(), None);
        assert_eq!(controller.panel(), &TranscriptPanel::Hidden);

        controller.on_transcript_loaded(
            second.clone(),
            new_ticket,
            Ok(transcript(vec![msg(Role::User, "new")])),
        );
        assert_eq!(controller.open_chat(), Some(&second));
        assert_eq!(view(&controller).title, "99 (damon)");
    }

    #[test]
    fn events_for_other_chats_change_nothing() {
        let open = ChatIdentity::new("42", BotType::Evg);
        let mut controller = opened(&open, vec![msg(Role::User, "a"), msg(Role::Bot, "b")]);
        controller.take_scroll_request();
        let before = controller.panel().clone();

        let others = [
            ChatIdentity::new("99", BotType::Damon),
            ChatIdentity::new("42", BotType::Damon),
            ChatIdentity::new("99", BotType::Evg),
        ];
        for other in others {
            controller.on_push_event(&PushEvent::ChatMessage {
                identity: other.clone(),
                message: msg(Role::User, "intruder"),
            });
            controller.on_push_event(&PushEvent::ChatSnapshot {
                identity: other,
                messages: vec![msg(Role::User, "intruder")],
                user_info: None,
            });
        }

        assert_eq!(controller.panel(), &before);
        assert_eq!(controller.open_chat(), Some(&open));
        assert!(!controller.take_scroll_request());
    }

    #[test]
    fn events_without_open_chat_are_dropped() {
        let mut controller = ViewSyncController::default();
        controller.on_push_event(&PushEvent::ChatSnapshot {
            identity: ChatIdentity::new("42", BotType::Evg),
            messages: vec![msg(Role::User, "a")],
            user_info: None,
        });
        assert_eq!(controller.panel(), &TranscriptPanel::Hidden);
        assert_eq!(controller.open_chat(), None);
    }

    #[test]
    fn incremental_append_matches_snapshot_replace() {
        let identity = ChatIdentity::new("42", BotType::Evg);
        let history = vec![msg(Role::User, "hi"), msg(Role::Bot, "hello")];
        let mut next = msg(Role::Bot, "see https://example.com");
        next.sentiment = Sentiment::Positive;
        next.tags = vec!["fun".into()];

        let mut appended = opened(&identity, history.clone());
        appended.on_push_event(&PushEvent::ChatMessage {
            identity: identity.clone(),
            message: next.clone(),
        });

        let mut replaced = opened(&identity, history.clone());
        let mut full = history;
        full.push(next);
        replaced.on_push_event(&PushEvent::ChatSnapshot {
            identity,
            messages: full,
            user_info: None,
        });

        assert_eq!(appended.panel(), replaced.panel());
        assert_eq!(view(&appended).messages.len(), 3);
        assert!(appended.take_scroll_request());
    }

    #[test]
    fn replaying_a_snapshot_is_idempotent() {
        let identity = ChatIdentity::new("42", BotType::Evg);
        let mut controller = opened(&identity, vec![]);
        let snapshot = PushEvent::ChatSnapshot {
            identity,
            messages: vec![msg(Role::User, "a"), msg(Role::Bot, "b")],
            user_info: Some(UserInfo::default()),
        };

        controller.on_push_event(&snapshot);
        let once = controller.panel().clone();
        controller.on_push_event(&snapshot);
        assert_eq!(controller.panel(), &once);
    }

    #[test]
    fn push_events_never_change_the_open_chat() {
        let identity = ChatIdentity::new("42", BotType::Evg);
        let mut controller = opened(&identity, vec![]);
        let events = [
            PushEvent::ChatMessage {
                identity: ChatIdentity::new("1", BotType::Damon),
                message: msg(Role::User, "x"),
            },
            PushEvent::ChatSnapshot {
                identity: identity.clone(),
                messages: vec![],
                user_info: None,
            },
            PushEvent::Alert(Notice::Emergency {
                sender_name: "A".into(),
                sender_handle: "a".into(),
                text: "help".into(),
            }),
        ];
        for event in &events {
            controller.on_push_event(event);
            assert_eq!(controller.open_chat(), Some(&identity));
        }
    }

    #[test]
    fn snapshot_keeps_header_when_user_info_is_absent() {
        let identity = ChatIdentity::new("42", BotType::Evg);
        let mut controller = opened(&identity, vec![]);
        let header = view(&controller).header.clone();

        controller.on_push_event(&PushEvent::ChatSnapshot {
            identity,
            messages: vec![msg(Role::User, "a")],
            user_info: None,
        });
        assert_eq!(view(&controller).header, header);
    }

    #[test]
    fn export_outcomes() {
        let controller = ViewSyncController::default();
        let identity = ChatIdentity::new("42", BotType::Evg);

        assert_eq!(
            controller.on_export_loaded(
                &identity,
                Ok(ExportResponse {
                    download_url: Some("/static/downloads/chat.xlsx".into())
                })
            ),
            Ok(Command::OpenUrl("/static/downloads/chat.xlsx".into()))
        );
        assert_eq!(
            controller.on_export_loaded(&identity, Ok(ExportResponse { download_url: None })),
            Err(EXPORT_FAILED)
        );
        assert_eq!(
            controller.on_export_loaded(&identity, Err("404".into())),
            Err(EXPORT_REQUEST_FAILED)
        );
    }
}
