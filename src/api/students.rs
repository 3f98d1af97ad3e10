use crate::{error::AppResult, models::Student, repo::students, DbPool};
use axum::{routing::get, Extension, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct StudentsResponse {
    students: Vec<Student>,
}

async fn list(Extension(pool): Extension<DbPool>) -> AppResult<Json<StudentsResponse>> {
    let conn = &mut pool.get().await?;

    Ok(Json(StudentsResponse {
        students: students::list(conn).await?,
    }))
}

pub fn app() -> Router {
    Router::new().route("/students", get(list))
}
