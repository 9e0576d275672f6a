use super::de::{null_as_default, string_or_number};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The two bots served by the backend.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum BotType {
    Evg,
    Damon,
}

impl BotType {
    /// Wire code, also used in API paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            BotType::Evg => "evg",
            BotType::Damon => "damon",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BotType::Evg => "Evgenia",
            BotType::Damon => "Damon",
        }
    }
}

impl fmt::Display for BotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one conversation thread.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChatIdentity {
    pub user_id: String,
    pub bot_type: BotType,
}

impl ChatIdentity {
    pub fn new(user_id: impl Into<String>, bot_type: BotType) -> Self {
        Self {
            user_id: user_id.into(),
            bot_type,
        }
    }
}

impl fmt::Display for ChatIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.user_id, self.bot_type)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant", alias = "bot")]
    Bot,
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub fn glyph(&self) -> &'static str {
        match self {
            Sentiment::Positive => "😊",
            Sentiment::Negative => "😞",
            Sentiment::Neutral => "😐",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

// Unknown labels and `null` both read as neutral.
impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref() {
            Some("positive") => Sentiment::Positive,
            Some("negative") => Sentiment::Negative,
            _ => Sentiment::Neutral,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PsychProfile {
    Ready {
        temperament: Option<String>,
        emotional_tone: Option<String>,
        communication_style: Option<String>,
        needs: Vec<String>,
        summary: Option<String>,
    },
    Failed(String),
}

#[derive(Deserialize, Default)]
struct RawPsychProfile {
    temperament: Option<String>,
    emotional_tone: Option<String>,
    communication_style: Option<String>,
    needs: Option<String>,
    summary: Option<String>,
    error: Option<String>,
}

impl RawPsychProfile {
    fn into_profile(self) -> Option<PsychProfile> {
        if let Some(error) = self.error {
            return Some(PsychProfile::Failed(error));
        }
        let needs: Vec<String> = self
            .needs
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        if self.temperament.is_none()
            && self.emotional_tone.is_none()
            && self.communication_style.is_none()
            && self.summary.is_none()
            && needs.is_empty()
        {
            return None;
        }
        Some(PsychProfile::Ready {
            temperament: self.temperament,
            emotional_tone: self.emotional_tone,
            communication_style: self.communication_style,
            needs,
            summary: self.summary,
        })
    }
}

fn psych_profile<'de, D>(deserializer: D) -> Result<Option<PsychProfile>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawPsychProfile>::deserialize(deserializer)?;
    Ok(raw.and_then(RawPsychProfile::into_profile))
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UserInfo {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, rename = "username")]
    pub handle: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub free_messages: u32,
    #[serde(default, deserialize_with = "psych_profile")]
    pub psych_profile: Option<PsychProfile>,
}

impl UserInfo {
    pub fn language_or_default(&self) -> &str {
        self.language.as_deref().unwrap_or("ru")
    }
}

/// A full conversation as returned by the chat endpoint or a snapshot push.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    pub user_info: UserInfo,
    pub messages: Vec<Message>,
}

/// `GET /api/chat/{user_id}/{bot_type}` body.
#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_info: UserInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chat: Vec<Message>,
}

impl From<ChatResponse> for Transcript {
    fn from(response: ChatResponse) -> Self {
        Self {
            user_info: response.user_info,
            messages: response.chat,
        }
    }
}

/// `GET /api/export/{user_id}/{bot_type}` body.
#[derive(Deserialize, Debug, Default)]
pub struct ExportResponse {
    #[serde(default)]
    pub download_url: Option<String>,
}

/// One row of the chats table.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ChatSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    pub bot_type: BotType,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub relationship_mode: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl ChatSummary {
    pub fn identity(&self) -> ChatIdentity {
        ChatIdentity::new(self.user_id.clone(), self.bot_type)
    }

    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or_default();
        let last = self.last_name.as_deref().unwrap_or_default();
        format!("{} {}", first, last).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_defaults_fill_missing_fields() {
        let msg: Message =
            serde_json::from_str(r#"{"role": "assistant", "content": "hi", "sentiment": null}"#)
                .unwrap();
        assert_eq!(msg.role, Role::Bot);
        assert_eq!(msg.sentiment, Sentiment::Neutral);
        assert!(msg.tags.is_empty());
        assert!(msg.timestamp.is_empty());
    }

    #[test]
    fn unknown_sentiment_is_neutral() {
        let msg: Message =
            serde_json::from_str(r#"{"role": "user", "content": "x", "sentiment": "ecstatic"}"#)
                .unwrap();
        assert_eq!(msg.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn chat_response_tolerates_null_user_info() {
        let body = r#"{"chat": [], "user_info": null, "user_id": 42, "bot_type": "evg"}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        let transcript = Transcript::from(response);
        assert_eq!(transcript.user_info, UserInfo::default());
        assert!(transcript.messages.is_empty());
    }

    #[test]
    fn psych_profile_variants() {
        let ready: UserInfo = serde_json::from_str(
            r#"{"psych_profile": {"temperament": "calm", "needs": "rest, support ,"}}"#,
        )
        .unwrap();
        match ready.psych_profile {
            Some(PsychProfile::Ready { temperament, needs, .. }) => {
                assert_eq!(temperament.as_deref(), Some("calm"));
                assert_eq!(needs, vec!["rest", "support"]);
            }
            other => panic!("unexpected profile: {:?}", other),
        }

        let failed: UserInfo =
            serde_json::from_str(r#"{"psych_profile": {"error": "too short"}}"#).unwrap();
        assert_eq!(
            failed.psych_profile,
            Some(PsychProfile::Failed("too short".to_string()))
        );

        let empty: UserInfo = serde_json::from_str(r#"{"psych_profile": {}}"#).unwrap();
        assert_eq!(empty.psych_profile, None);
    }

    #[test]
    fn identity_display_matches_header_format() {
        assert_eq!(ChatIdentity::new("42", BotType::Evg).to_string(), "42 (evg)");
    }

    #[test]
    fn chat_summary_accepts_numeric_ids() {
        let row: ChatSummary = serde_json::from_str(
            r#"{"user_id": 7, "bot_type": "damon", "first_name": "Ann", "last_name": null}"#,
        )
        .unwrap();
        assert_eq!(row.identity(), ChatIdentity::new("7", BotType::Damon));
        assert_eq!(row.full_name(), "Ann");
    }
}
