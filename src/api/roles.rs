use crate::{error::AppResult, models::Role, repo::roles, DbPool};
use axum::{routing::get, Extension, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct RolesResponse {
    roles: Vec<Role>,
}

async fn list(Extension(pool): Extension<DbPool>) -> AppResult<Json<RolesResponse>> {
    let conn = &mut pool.get().await?;

    Ok(Json(RolesResponse {
        roles: roles::list(conn).await?,
    }))
}

pub fn app() -> Router {
    Router::new().route("/roles", get(list))
}
