//! Long-poll loop tying the Telegram transport to the conversation machine

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::conversation::{ConversationMachine, SessionStore};
use crate::telegram::{ChatSink, Incoming, TelegramClient};

/// Pause after a failed poll before trying again
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

pub struct Bot {
    client: TelegramClient,
    machine: ConversationMachine,
    sessions: SessionStore,
}

impl Bot {
    /// Sessions untouched for `session_idle_ttl` are forgotten
    pub fn new(
        client: TelegramClient,
        machine: ConversationMachine,
        session_idle_ttl: Duration,
    ) -> Self {
        Self {
            client,
            machine,
            sessions: SessionStore::with_idle_ttl(session_idle_ttl),
        }
    }

    /// Poll and handle updates until Ctrl-C. Events are handled one at a time,
    /// in arrival order, so sessions never need locking.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut offset: i64 = 0;
        info!("Telegram bot listening for messages...");

        loop {
            let updates = tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down, {} chat sessions dropped", self.sessions.len());
                    return Ok(());
                }
                updates = self.client.get_updates(offset) => updates,
            };

            let updates = match updates {
                Ok(updates) => updates,
                Err(e) => {
                    warn!("Telegram poll error: {e}");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                match update.into_incoming() {
                    Some(incoming) => self.handle(incoming).await,
                    None => debug!("Skipping update without a chat"),
                }
            }

            let evicted = self.sessions.evict_idle();
            if evicted > 0 {
                debug!("Evicted {evicted} idle chat sessions");
            }
        }
    }

    async fn handle(&mut self, incoming: Incoming) {
        let Incoming {
            chat,
            event,
            callback_id,
        } = incoming;

        if let Some(callback_id) = callback_id {
            if let Err(e) = self.client.answer_callback_query(&callback_id).await {
                warn!("Failed to answer callback query {callback_id}: {e}");
            }
        }

        debug!("Event from {chat}: {event:?}");
        let session = self.sessions.get_or_create(chat);
        let sink = ChatSink::new(&self.client, chat);
        self.machine.handle(session, event, &sink).await;
    }
}
