use axum::extract::{OriginalUri, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::auth::Authenticated;
use crate::gate::{GateRequest, LoginGate, Outcome};
use crate::session::Session;

/// View of an axum request through the gate's capability contract.
pub struct HttpGateRequest<'a> {
    req: &'a Request,
    query: Vec<(String, String)>,
    session: Option<Session>,
}

impl<'a> HttpGateRequest<'a> {
    pub fn new(req: &'a Request) -> Self {
        let query = req
            .uri()
            .query()
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Self {
            req,
            query,
            session: req.extensions().get::<Session>().cloned(),
        }
    }
}

impl GateRequest for HttpGateRequest<'_> {
    type Session = Session;

    fn is_authenticated(&self) -> Option<bool> {
        self.req
            .extensions()
            .get::<Authenticated>()
            .map(|authenticated| authenticated.0)
    }

    fn url(&self) -> &str {
        self.req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
    }

    fn original_url(&self) -> Option<&str> {
        self.req
            .extensions()
            .get::<OriginalUri>()
            .and_then(|uri| uri.0.path_and_query())
            .map(|pq| pq.as_str())
    }

    fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn header(&self, name: &str) -> Option<&[u8]> {
        self.req.headers().get(name).map(|value| value.as_bytes())
    }

    fn session(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }
}

/// Middleware guarding routes behind a login.
///
/// Unauthenticated browser requests are redirected to the gate's login
/// page; XHR-style requests get a bare `401 Unauthorized` instead.
///
/// ```rust,ignore
/// let account = Router::new()
///     .route("/account", get(show))
///     .layer(axum::middleware::from_fn_with_state(LoginGate::new("/signin"), ensure_logged_in));
/// ```
pub async fn ensure_logged_in(State(gate): State<LoginGate>, req: Request, next: Next) -> Response {
    let outcome = {
        let mut ctx = HttpGateRequest::new(&req);
        gate.check(&mut ctx)
    };

    tracing::debug!(path = %req.uri().path(), outcome = outcome.label(), "Login gate");

    match outcome {
        Outcome::Proceed => next.run(req).await,
        Outcome::RedirectTo(target) => Redirect::to(&target).into_response(),
        Outcome::RejectUnauthenticated => StatusCode::UNAUTHORIZED.into_response(),
    }
}
