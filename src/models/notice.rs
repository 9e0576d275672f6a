use super::chat::{BotType, Sentiment};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Danger,
}

/// An identity-agnostic alert pushed by the server.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    NewMessage {
        bot_type: Option<BotType>,
        text: String,
        sentiment: Sentiment,
        tags: Vec<String>,
        sender_name: String,
        sender_handle: String,
    },
    Emergency {
        sender_name: String,
        sender_handle: String,
        text: String,
    },
}

impl Notice {
    pub fn severity(&self) -> Severity {
        match self {
            Notice::NewMessage { .. } => Severity::Info,
            Notice::Emergency { .. } => Severity::Danger,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Notice::NewMessage {
                sender_name,
                sender_handle,
                ..
            } => format!("🆕 New message from {} (@{})", sender_name, sender_handle),
            Notice::Emergency {
                sender_name,
                sender_handle,
                ..
            } => format!(
                "🚨 EMERGENCY! User {} (@{}) needs help!",
                sender_name, sender_handle
            ),
        }
    }

    pub fn body(&self) -> String {
        match self {
            Notice::NewMessage { bot_type, text, .. } => match bot_type {
                Some(bot) => format!("({}): \"{}\"", bot, text),
                None => format!("\"{}\"", text),
            },
            Notice::Emergency { text, .. } => format!("\"{}\"", text),
        }
    }

    /// Sentiment badge and tags shown under the body of a new-message notice.
    pub fn annotations(&self) -> Option<(Sentiment, &[String])> {
        match self {
            Notice::NewMessage {
                sentiment, tags, ..
            } => Some((*sentiment, tags.as_slice())),
            Notice::Emergency { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emergency_is_danger() {
        let notice = Notice::Emergency {
            sender_name: "Ann".into(),
            sender_handle: "ann".into(),
            text: "help".into(),
        };
        assert_eq!(notice.severity(), Severity::Danger);
        assert_eq!(notice.title(), "🚨 EMERGENCY! User Ann (@ann) needs help!");
        assert_eq!(notice.body(), "\"help\"");
        assert!(notice.annotations().is_none());
    }

    #[test]
    fn new_message_is_info() {
        let notice = Notice::NewMessage {
            bot_type: Some(BotType::Damon),
            text: "hello".into(),
            sentiment: Sentiment::Positive,
            tags: vec!["fun".into()],
            sender_name: "Bob".into(),
            sender_handle: "—".into(),
        };
        assert_eq!(notice.severity(), Severity::Info);
        assert_eq!(notice.body(), "(damon): \"hello\"");
        let (sentiment, tags) = notice.annotations().unwrap();
        assert_eq!(sentiment, Sentiment::Positive);
        assert_eq!(tags, ["fun".to_string()]);
    }
}
