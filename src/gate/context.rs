use std::collections::HashMap;

/// Mutable key-value store backing a caller's session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn insert(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str) -> Option<String>;
}

impl SessionStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }

    fn insert(&mut self, key: &str, value: String) {
        HashMap::insert(self, key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        HashMap::remove(self, key)
    }
}

/// What the gate needs to know about an incoming request.
///
/// Capabilities a server may not provide are `Option`s; the gate checks for
/// their presence before use.
pub trait GateRequest {
    type Session: SessionStore;

    /// Pre-computed authentication state. `None` when nothing upstream
    /// established one, which the gate treats as unauthenticated.
    fn is_authenticated(&self) -> Option<bool>;

    /// Path and query as seen by the current router.
    fn url(&self) -> &str;

    /// Path and query as received by the server, before any nested router
    /// stripped its prefix.
    fn original_url(&self) -> Option<&str> {
        None
    }

    /// First value of the named query parameter.
    fn query(&self, name: &str) -> Option<&str>;

    /// Raw header value, looked up case-insensitively. Bytes rather than
    /// text so values that aren't valid UTF-8 still count as present.
    fn header(&self, name: &str) -> Option<&[u8]>;

    fn session(&mut self) -> Option<&mut Self::Session>;
}
