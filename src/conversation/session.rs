//! Per-chat session data and the in-memory session store

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::ChatId;
use super::state::State;
use crate::models::{Interval, PointForecast};
use crate::route::RouteBuilder;

/// Everything collected from one chat during the route entry flow
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub state: State,
    pub start_point: String,
    pub end_point: String,
    pub stops: Vec<String>,
    pub interval: Option<Interval>,
    pub forecast_results: Vec<PointForecast>,
}

impl Session {
    /// Drop the collected route and results and wait for a new start point
    pub fn restart(&mut self) {
        *self = Session {
            state: State::AwaitingStart,
            ..Session::default()
        };
    }

    /// Route points in travel order
    #[must_use]
    pub fn route(&self) -> Vec<String> {
        RouteBuilder::build(&self.start_point, &self.stops, &self.end_point)
    }
}

/// Idle time after which a chat's session is forgotten, unless configured
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug)]
struct Entry {
    session: Session,
    last_seen: Instant,
}

/// Sessions keyed by chat, created on first contact. Lives only in memory;
/// sessions idle for longer than `idle_ttl` are dropped by [`SessionStore::evict_idle`].
#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<ChatId, Entry>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_ttl,
        }
    }

    /// The chat's session, creating an idle one on first contact
    pub fn get_or_create(&mut self, chat: ChatId) -> &mut Session {
        self.touch(chat, Instant::now())
    }

    fn touch(&mut self, chat: ChatId, now: Instant) -> &mut Session {
        let entry = self.sessions.entry(chat).or_insert_with(|| Entry {
            session: Session::default(),
            last_seen: now,
        });
        entry.last_seen = now;
        &mut entry.session
    }

    #[must_use]
    pub fn get(&self, chat: ChatId) -> Option<&Session> {
        self.sessions.get(&chat).map(|entry| &entry.session)
    }

    /// Forget sessions idle for longer than the TTL; returns how many were dropped
    pub fn evict_idle(&mut self) -> usize {
        self.evict_idle_at(Instant::now())
    }

    fn evict_idle_at(&mut self, now: Instant) -> usize {
        let before = self.sessions.len();
        let ttl = self.idle_ttl;
        self.sessions
            .retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= ttl);
        before - self.sessions.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
