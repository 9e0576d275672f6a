//! Render model of the transcript panel.
//!
//! Everything here is a pure function of the received data, so a message
//! renders identically whether it arrived in a snapshot or on its own.

use crate::{
    models::chat::{BotType, ChatIdentity, Message, PsychProfile, Role, Sentiment, UserInfo},
    utils::text_processing::{ContentSpan, split_links},
};

const MISSING: &str = "—";

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedMessage {
    pub role: Role,
    pub sender: String,
    pub timestamp: String,
    pub sentiment: Sentiment,
    pub tags: Vec<String>,
    pub content: Vec<ContentSpan>,
}

pub fn render_message(message: &Message, bot_type: BotType) -> RenderedMessage {
    let sender = match message.role {
        Role::User => "👤 User".to_string(),
        Role::Bot => match bot_type {
            BotType::Evg => format!("🌸 {}", bot_type.display_name()),
            BotType::Damon => format!("🔥 {}", bot_type.display_name()),
        },
    };

    RenderedMessage {
        role: message.role,
        sender,
        timestamp: message.timestamp.clone(),
        sentiment: message.sentiment,
        tags: message.tags.clone(),
        content: split_links(&message.content),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProfileCard {
    Ready {
        temperament: String,
        emotional_tone: String,
        communication_style: String,
        needs: Vec<String>,
        summary: String,
    },
    Unavailable(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct UserHeader {
    pub summary: String,
    pub profile: Option<ProfileCard>,
}

pub fn render_user_header(info: &UserInfo) -> UserHeader {
    let first = info.first_name.as_deref().unwrap_or(MISSING);
    let last = info.last_name.as_deref().unwrap_or_default();
    let handle = info.handle.as_deref().unwrap_or(MISSING);
    let summary = format!(
        "👤 {} {} | @{} | 🌐 {} | 💬 Free: {}",
        first,
        last,
        handle,
        info.language_or_default(),
        info.free_messages
    );

    let or_missing = |value: &Option<String>| value.clone().unwrap_or_else(|| MISSING.to_string());
    let profile = info.psych_profile.as_ref().map(|profile| match profile {
        PsychProfile::Ready {
            temperament,
            emotional_tone,
            communication_style,
            needs,
            summary,
        } => ProfileCard::Ready {
            temperament: or_missing(temperament),
            emotional_tone: or_missing(emotional_tone),
            communication_style: or_missing(communication_style),
            needs: needs.clone(),
            summary: or_missing(summary),
        },
        PsychProfile::Failed(reason) => ProfileCard::Unavailable(reason.clone()),
    });

    UserHeader { summary, profile }
}

/// Rendered content of an open chat.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptView {
    pub title: String,
    pub header: UserHeader,
    pub messages: Vec<RenderedMessage>,
}

impl TranscriptView {
    pub fn render(identity: &ChatIdentity, header: UserHeader, messages: &[Message]) -> Self {
        Self {
            title: identity.to_string(),
            header,
            messages: messages
                .iter()
                .map(|m| render_message(m, identity.bot_type))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum TranscriptPanel {
    #[default]
    Hidden,
    Error(String),
    Open(TranscriptView),
}
