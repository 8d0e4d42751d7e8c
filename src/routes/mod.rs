pub mod account;
pub mod admin;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

pub fn account_routes() -> Router<SharedState> {
    Router::new().route("/account", get(account::show))
}

/// Admin pages, nested under `/admin` by the app.
pub fn admin_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/reports/{name}", get(admin::report))
}
