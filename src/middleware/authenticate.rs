use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::Authenticated;
use crate::gate::SessionStore;
use crate::session::{SESSION_USER_KEY, Session};

/// Record whether the caller's session belongs to a signed-in user.
///
/// Requests without a session get no [`Authenticated`] marker at all.
pub async fn mark_authenticated(mut req: Request, next: Next) -> Response {
    let authenticated = req
        .extensions()
        .get::<Session>()
        .map(|session| session.get(SESSION_USER_KEY).is_some());

    if let Some(authenticated) = authenticated {
        req.extensions_mut().insert(Authenticated(authenticated));
    }

    next.run(req).await
}
