//! Login gate: decides whether a request may proceed, must be sent to the
//! login page, or gets rejected as unauthenticated.

pub mod context;

use std::sync::Arc;

use serde::Deserialize;

pub use context::{GateRequest, SessionStore};

/// Session key holding the URL to send the caller back to after login.
pub const RETURN_TO_KEY: &str = "returnTo";

pub const DEFAULT_REDIRECT_TO: &str = "/login";

const AJAX_PARAM: &str = "ajax";
const X_REQUESTED_WITH: &str = "x-requested-with";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GateOptions {
    /// Where unauthenticated browser requests are sent.
    pub redirect_to: String,
    /// Record the requested URL in the session before redirecting.
    pub set_return_to: bool,
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            redirect_to: DEFAULT_REDIRECT_TO.to_string(),
            set_return_to: true,
        }
    }
}

impl GateOptions {
    pub fn with_redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect_to = target.into();
        self
    }

    pub fn with_set_return_to(mut self, set_return_to: bool) -> Self {
        self.set_return_to = set_return_to;
        self
    }
}

impl From<&str> for GateOptions {
    fn from(target: &str) -> Self {
        GateOptions::default().with_redirect_to(target)
    }
}

impl From<String> for GateOptions {
    fn from(target: String) -> Self {
        GateOptions::default().with_redirect_to(target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Proceed,
    RedirectTo(String),
    /// Programmatic caller without a session; answer 401 and stop the chain.
    RejectUnauthenticated,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Proceed => "proceed",
            Outcome::RedirectTo(_) => "redirect",
            Outcome::RejectUnauthenticated => "reject",
        }
    }
}

/// A mounted login check. Cloning is cheap and clones share one set of
/// options, which never change after construction.
#[derive(Debug, Clone)]
pub struct LoginGate {
    options: Arc<GateOptions>,
}

impl Default for LoginGate {
    fn default() -> Self {
        Self::new(GateOptions::default())
    }
}

impl LoginGate {
    pub fn new(options: impl Into<GateOptions>) -> Self {
        let mut options = options.into();
        if options.redirect_to.is_empty() {
            options.redirect_to = DEFAULT_REDIRECT_TO.to_string();
        }
        Self {
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &GateOptions {
        &self.options
    }

    /// Evaluate the request. Writes the return URL into the session when it
    /// decides to redirect; has no other side effects.
    pub fn check<R: GateRequest>(&self, req: &mut R) -> Outcome {
        if req.is_authenticated().unwrap_or(false) {
            return Outcome::Proceed;
        }

        if is_programmatic(req) {
            return Outcome::RejectUnauthenticated;
        }

        if self.options.set_return_to {
            let return_to = req.original_url().unwrap_or(req.url()).to_string();
            if let Some(session) = req.session() {
                session.insert(RETURN_TO_KEY, return_to);
            }
        }

        Outcome::RedirectTo(self.options.redirect_to.clone())
    }
}

/// XHR libraries send `X-Requested-With`; clients that can't set headers
/// may pass `?ajax=true` instead.
fn is_programmatic<R: GateRequest>(req: &R) -> bool {
    req.query(AJAX_PARAM) == Some("true")
        || req.header(X_REQUESTED_WITH).is_some_and(|v| !v.is_empty())
}

/// Remove the recorded return URL from the session, falling back to `/`.
/// Only local paths are returned.
///
/// A login handler calls this once credentials check out:
///
/// ```rust,ignore
/// session.insert(SESSION_USER_KEY, user.name.clone());
/// Redirect::to(&take_return_to(&mut session))
/// ```
pub fn take_return_to<S: SessionStore>(session: &mut S) -> String {
    session
        .remove(RETURN_TO_KEY)
        .filter(|url| url.starts_with('/') && !url.starts_with("//"))
        .unwrap_or_else(|| "/".to_string())
}
