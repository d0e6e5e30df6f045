//! The route entry conversation: events, states, sessions and replies.
//!
//! The flow per chat is
//! `Idle -> AwaitingStart -> AwaitingEnd -> AwaitingStopDecision -> (AwaitingStops) -> AwaitingInterval -> AwaitingFeature`,
//! restartable from any state with `/weather`. Which handler runs is decided by
//! [`state::dispatch`] from the current state and the kind of event alone.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod event;
pub mod machine;
pub mod messages;
pub mod reply;
pub mod session;
pub mod state;

pub use event::{Command, Event, EventKind, Selection};
pub use machine::ConversationMachine;
pub use reply::{Button, Keyboard, Reply, ReplySink, TextReply};
pub use session::{Session, SessionStore};
pub use state::{Action, State, dispatch};

/// Telegram chat identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
