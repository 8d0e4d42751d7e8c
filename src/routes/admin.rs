use axum::extract::Path;
use axum::Json;
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::error::AppError;

const REPORTS: &[&str] = &["daily", "weekly"];

#[derive(Serialize)]
pub struct AdminIndex {
    pub user: String,
    pub reports: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct Report {
    pub name: String,
    pub requested_by: String,
}

pub async fn index(user: CurrentUser) -> Json<AdminIndex> {
    Json(AdminIndex {
        user: user.name,
        reports: REPORTS.to_vec(),
    })
}

pub async fn report(
    user: CurrentUser,
    Path(name): Path<String>,
) -> Result<Json<Report>, AppError> {
    if !REPORTS.contains(&name.as_str()) {
        return Err(AppError::NotFound(format!("No report named '{name}'")));
    }

    Ok(Json(Report {
        name,
        requested_by: user.name,
    }))
}
