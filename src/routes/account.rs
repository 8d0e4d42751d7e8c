use axum::Json;
use serde::Serialize;

use crate::auth::CurrentUser;

#[derive(Serialize)]
pub struct AccountResponse {
    pub user: String,
}

pub async fn show(user: CurrentUser) -> Json<AccountResponse> {
    Json(AccountResponse { user: user.name })
}
