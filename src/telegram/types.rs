//! Bot API wire types, limited to the fields the bot reads or writes

use serde::{Deserialize, Serialize};

use crate::conversation::{ChatId, Event, Keyboard};

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub data: Option<String>,
    /// Message the pressed keyboard belongs to
    pub message: Option<Message>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl From<&Keyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &Keyboard) -> Self {
        Self {
            inline_keyboard: keyboard
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| InlineKeyboardButton {
                            text: button.label.clone(),
                            callback_data: button.selection.to_string(),
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

/// An update reduced to what the conversation needs
#[derive(Debug, Clone, PartialEq)]
pub struct Incoming {
    pub chat: ChatId,
    pub event: Event,
    /// Set for button presses, which must be answered
    pub callback_id: Option<String>,
}

impl Update {
    /// `None` for updates that carry no chat (e.g. a callback on a deleted message)
    #[must_use]
    pub fn into_incoming(self) -> Option<Incoming> {
        if let Some(callback) = self.callback_query {
            let chat = callback.message.as_ref().map(|m| ChatId(m.chat.id))?;
            let event = callback
                .data
                .as_deref()
                .map_or(Event::Unsupported, Event::from_callback);
            return Some(Incoming {
                chat,
                event,
                callback_id: Some(callback.id),
            });
        }

        let message = self.message?;
        let event = message
            .text
            .as_deref()
            .map_or(Event::Unsupported, Event::from_text);
        Some(Incoming {
            chat: ChatId(message.chat.id),
            event,
            callback_id: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Command, Selection};
    use crate::models::Interval;

    fn parse(json: &str) -> Option<Incoming> {
        serde_json::from_str::<Update>(json).unwrap().into_incoming()
    }

    #[test]
    fn test_text_message() {
        let incoming = parse(
            r#"{"update_id": 10, "message": {"message_id": 1, "chat": {"id": 42, "type": "private"}, "text": "Москва"}}"#,
        )
        .unwrap();
        assert_eq!(incoming.chat, ChatId(42));
        assert_eq!(incoming.event, Event::Text("Москва".into()));
        assert!(incoming.callback_id.is_none());
    }

    #[test]
    fn test_command_with_bot_name() {
        let incoming = parse(
            r#"{"update_id": 11, "message": {"message_id": 2, "chat": {"id": -100}, "text": "/weather@RouteCastBot"}}"#,
        )
        .unwrap();
        assert_eq!(incoming.event, Event::Command(Command::Weather));
    }

    #[test]
    fn test_sticker_is_unsupported() {
        let incoming = parse(
            r#"{"update_id": 12, "message": {"message_id": 3, "chat": {"id": 42}, "sticker": {"file_id": "x"}}}"#,
        )
        .unwrap();
        assert_eq!(incoming.event, Event::Unsupported);
    }

    #[test]
    fn test_callback_query() {
        let incoming = parse(
            r#"{"update_id": 13, "callback_query": {"id": "cb-1", "data": "interval:3",
                "message": {"message_id": 4, "chat": {"id": 42}, "text": "Выберите интервал"}}}"#,
        )
        .unwrap();
        assert_eq!(incoming.chat, ChatId(42));
        assert_eq!(incoming.event, Event::Selection(Selection::Interval(Interval::Three)));
        assert_eq!(incoming.callback_id.as_deref(), Some("cb-1"));
    }

    #[test]
    fn test_callback_with_foreign_payload() {
        let incoming = parse(
            r#"{"update_id": 14, "callback_query": {"id": "cb-2", "data": "interval_3",
                "message": {"message_id": 5, "chat": {"id": 42}}}}"#,
        )
        .unwrap();
        assert_eq!(incoming.event, Event::Unsupported);
    }

    #[test]
    fn test_callback_without_message_is_dropped() {
        assert!(parse(r#"{"update_id": 15, "callback_query": {"id": "cb-3", "data": "stops:no"}}"#).is_none());
    }

    #[test]
    fn test_keyboard_markup() {
        let markup = InlineKeyboardMarkup::from(&Keyboard::stop_decision());
        let json = serde_json::to_value(&markup).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"inline_keyboard": [[
                {"text": "Да", "callback_data": "stops:yes"},
                {"text": "Нет", "callback_data": "stops:no"}
            ]]})
        );
    }
}
