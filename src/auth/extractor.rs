use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::gate::SessionStore;
use crate::session::{SESSION_USER_KEY, Session};

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub name: String,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Unauthorized("Missing session".to_string()))?;

        let name = session
            .get(SESSION_USER_KEY)
            .ok_or_else(|| AppError::Unauthorized("Not signed in".to_string()))?;

        Ok(CurrentUser { name })
    }
}
