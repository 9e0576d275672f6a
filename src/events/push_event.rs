//! Wire format of the push channel.
//!
//! Every websocket text frame is a JSON object `{"event": <name>, "data": {...}}`.
//! Inbound frames decode into [`PushEvent`]; outbound signals encode from
//! [`OutboundSignal`].

use crate::models::{
    chat::{BotType, ChatIdentity, Message, Sentiment, UserInfo},
    de::{null_as_default, string_or_number},
    notice::Notice,
    stats::StatsUpdate,
};
use serde::{Deserialize, Serialize};

const MISSING_NAME: &str = "—";

#[derive(Clone, Debug, PartialEq)]
pub enum PushEvent {
    /// Full transcript for one chat. `user_info` is only present when the
    /// server chose to include it.
    ChatSnapshot {
        identity: ChatIdentity,
        messages: Vec<Message>,
        user_info: Option<UserInfo>,
    },
    /// Exactly one new message for one chat.
    ChatMessage {
        identity: ChatIdentity,
        message: Message,
    },
    Alert(Notice),
    StatsUpdate(StatsUpdate),
    ServerGreeting(String),
}

impl PushEvent {
    pub fn identity(&self) -> Option<&ChatIdentity> {
        match self {
            PushEvent::ChatSnapshot { identity, .. } | PushEvent::ChatMessage { identity, .. } => {
                Some(identity)
            }
            _ => None,
        }
    }

    /// Decodes one text frame. Frames with an unknown event name, or a
    /// `chat_update` carrying neither a snapshot nor a message, yield `None`.
    pub fn decode(text: &str) -> Result<Option<Self>, serde_json::Error> {
        let frame: Frame = serde_json::from_str(text)?;
        let event = match frame.event.as_str() {
            "chat_update" => {
                let update: ChatUpdateWire = serde_json::from_value(frame.data)?;
                let identity = ChatIdentity::new(update.user_id, update.bot_type);
                match (update.chat, update.message) {
                    (Some(messages), _) => PushEvent::ChatSnapshot {
                        identity,
                        messages,
                        user_info: update.user_info,
                    },
                    (None, Some(message)) => PushEvent::ChatMessage { identity, message },
                    (None, None) => {
                        tracing::debug!("chat_update for {} carried no content", identity);
                        return Ok(None);
                    }
                }
            }
            "new_message_enriched" => {
                let alert: NewMessageWire = serde_json::from_value(frame.data)?;
                PushEvent::Alert(Notice::NewMessage {
                    bot_type: alert.bot_type,
                    text: alert.text,
                    sentiment: alert.sentiment,
                    tags: alert.tags,
                    sender_name: or_missing(alert.first_name),
                    sender_handle: or_missing(alert.username),
                })
            }
            "emergency_alert" => {
                let alert: EmergencyWire = serde_json::from_value(frame.data)?;
                PushEvent::Alert(Notice::Emergency {
                    sender_name: or_missing(alert.first_name),
                    sender_handle: or_missing(alert.username),
                    text: alert.text,
                })
            }
            "stats_update" => PushEvent::StatsUpdate(serde_json::from_value(frame.data)?),
            "server_response" => {
                let greeting: GreetingWire = serde_json::from_value(frame.data)?;
                PushEvent::ServerGreeting(greeting.data)
            }
            other => {
                tracing::trace!("Ignoring push event {:?}", other);
                return Ok(None);
            }
        };
        Ok(Some(event))
    }
}

fn or_missing(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| MISSING_NAME.to_string())
}

#[derive(Deserialize)]
struct Frame {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct ChatUpdateWire {
    #[serde(deserialize_with = "string_or_number")]
    user_id: String,
    bot_type: BotType,
    #[serde(default)]
    chat: Option<Vec<Message>>,
    #[serde(default)]
    message: Option<Message>,
    #[serde(default)]
    user_info: Option<UserInfo>,
}

#[derive(Deserialize)]
struct NewMessageWire {
    #[serde(default)]
    bot_type: Option<BotType>,
    #[serde(default, deserialize_with = "null_as_default")]
    text: String,
    #[serde(default)]
    sentiment: Sentiment,
    #[serde(default, deserialize_with = "null_as_default")]
    tags: Vec<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Deserialize)]
struct EmergencyWire {
    #[serde(default, deserialize_with = "null_as_default")]
    text: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Deserialize)]
struct GreetingWire {
    #[serde(default)]
    data: String,
}

/// Signals the client sends to the server.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundSignal {
    /// Tells the server which chat is open so it targets updates at it.
    RequestNewMessages { user_id: String, bot_type: BotType },
    RequestStatsUpdate,
}

impl OutboundSignal {
    pub fn subscribe(identity: &ChatIdentity) -> Self {
        OutboundSignal::RequestNewMessages {
            user_id: identity.user_id.clone(),
            bot_type: identity.bot_type,
        }
    }
}
