//! Outbound effects and the sink that delivers them

use async_trait::async_trait;

use super::event::Selection;
use crate::models::{Feature, Interval};

/// Inline button: label shown to the user, selection sent back on press
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub selection: Selection,
}

impl Button {
    pub fn new(label: impl Into<String>, selection: Selection) -> Self {
        Self {
            label: label.into(),
            selection,
        }
    }
}

/// Rows of inline buttons attached to a message
#[derive(Debug, Clone, PartialEq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// "Да" / "Нет" for adding intermediate stops
    #[must_use]
    pub fn stop_decision() -> Self {
        Self {
            rows: vec![vec![
                Button::new("Да", Selection::StopDecision(true)),
                Button::new("Нет", Selection::StopDecision(false)),
            ]],
        }
    }

    #[must_use]
    pub fn intervals() -> Self {
        let button = |interval: Interval| Button::new(interval.label(), Selection::Interval(interval));
        Self {
            rows: vec![
                vec![button(Interval::One), button(Interval::Three)],
                vec![button(Interval::Five)],
            ],
        }
    }

    #[must_use]
    pub fn features() -> Self {
        let button = |feature: Feature| Button::new(feature.display_name(), Selection::Feature(feature));
        Self {
            rows: vec![
                vec![button(Feature::Temperature), button(Feature::Humidity)],
                vec![button(Feature::Wind), button(Feature::Precipitation)],
            ],
        }
    }

    /// Every selection offered by this keyboard
    pub fn selections(&self) -> impl Iterator<Item = Selection> + '_ {
        self.rows.iter().flatten().map(|button| button.selection)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextReply {
    pub text: String,
    /// Send with Markdown parse mode
    pub markdown: bool,
    pub keyboard: Option<Keyboard>,
}

/// Something the bot says back to the chat
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(TextReply),
    Photo {
        png: Vec<u8>,
        file_name: String,
        caption: String,
    },
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(TextReply {
            text: text.into(),
            markdown: false,
            keyboard: None,
        })
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Reply::Text(TextReply {
            text: text.into(),
            markdown: true,
            keyboard: None,
        })
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Reply::Text(TextReply {
            text: text.into(),
            markdown: false,
            keyboard: Some(keyboard),
        })
    }

    /// Message text or photo caption
    #[must_use]
    pub fn body(&self) -> &str {
        match self {
            Reply::Text(reply) => &reply.text,
            Reply::Photo { caption, .. } => caption,
        }
    }
}

/// Delivers replies to one chat
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, reply: Reply) -> crate::Result<()>;
}
