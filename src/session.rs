use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use dashmap::DashMap;
use tokio::sync::watch;
use uuid::Uuid;

use crate::gate::SessionStore;
use crate::state::SharedState;

/// Session key holding the signed-in user's name.
pub const SESSION_USER_KEY: &str = "user";

#[derive(Debug)]
struct SessionEntry {
    data: HashMap<String, String>,
    last_seen: Instant,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            data: HashMap::new(),
            last_seen: Instant::now(),
        }
    }
}

/// Server-side sessions keyed by the id carried in the session cookie.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    /// session id -> (key/value data, last seen)
    sessions: Arc<DashMap<Uuid, SessionEntry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an empty session and return its id.
    pub fn create(&self) -> Uuid {
        let id = Uuid::now_v7();
        self.sessions.insert(id, SessionEntry::new());
        id
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.sessions.contains_key(id)
    }

    /// Mark the session as used now. Returns false if it doesn't exist.
    pub fn touch(&self, id: &Uuid) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.last_seen = Instant::now();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &Uuid, key: &str) -> Option<String> {
        self.sessions
            .get(id)
            .and_then(|entry| entry.data.get(key).cloned())
    }

    /// Store a value, creating the session on first write.
    pub fn insert(&self, id: &Uuid, key: &str, value: String) {
        let mut entry = self.sessions.entry(*id).or_insert_with(SessionEntry::new);
        entry.last_seen = Instant::now();
        entry.data.insert(key.to_string(), value);
    }

    pub fn remove(&self, id: &Uuid, key: &str) -> Option<String> {
        self.sessions
            .get_mut(id)
            .and_then(|mut entry| entry.data.remove(key))
    }

    /// Remove sessions not seen within `max_age`.
    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.sessions
            .retain(|_, entry| now.duration_since(entry.last_seen) < max_age);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Handle to one caller's session, placed in request extensions by
/// [`session_layer`]. The session only exists in the store once something
/// has been written to it.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    store: MemorySessionStore,
}

impl Session {
    pub fn new(id: Uuid, store: MemorySessionStore) -> Self {
        Self { id, store }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl SessionStore for Session {
    fn get(&self, key: &str) -> Option<String> {
        self.store.get(&self.id, key)
    }

    fn insert(&mut self, key: &str, value: String) {
        self.store.insert(&self.id, key, value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        self.store.remove(&self.id, key)
    }
}

/// Middleware that attaches a [`Session`] to every request.
///
/// Callers without a session we recognize get a fresh id; the cookie is only
/// set if the request ended up writing to that session.
pub async fn session_layer(
    State(state): State<SharedState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let cookie_name = state.config.session_cookie.clone();

    let existing = jar
        .get(&cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .filter(|id| state.sessions.touch(id));

    let (id, fresh) = match existing {
        Some(id) => (id, false),
        None => (Uuid::now_v7(), true),
    };

    req.extensions_mut()
        .insert(Session::new(id, state.sessions.clone()));

    let response = next.run(req).await;

    if fresh && state.sessions.contains(&id) {
        tracing::debug!(session_id = %id, "Started new session");
        let cookie = Cookie::build((cookie_name, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        (jar.add(cookie), response).into_response()
    } else {
        response
    }
}

/// Periodically drop sessions idle for longer than `max_age` until shutdown
/// is signaled.
pub async fn run_cleanup(
    store: MemorySessionStore,
    max_age: Duration,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        let before = store.len();
        store.cleanup(max_age);
        let removed = before.saturating_sub(store.len());
        if removed > 0 {
            tracing::debug!("Expired {removed} idle sessions");
        }

        tokio::select! {
            _ = tokio::time::sleep(every) => {}
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    tracing::debug!("Session cleanup stopped");
}
