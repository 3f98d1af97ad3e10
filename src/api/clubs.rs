use super::{message, non_blank, parse_date, required_text, MessageResponse};
use crate::{
    error::{AppError, AppResult},
    extract::JsonBody,
    models::Club,
    repo::clubs::{self, ClubChanges, NewClub},
    DbPool,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use diesel_async::AsyncConnection;
use scoped_futures::ScopedFutureExt;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct ClubRequest {
    club_name: Option<String>,
    club_description: Option<String>,
    founded_date: Option<String>,
    contact_email: Option<String>,
    faculty_advisor: Option<String>,
}

impl ClubRequest {
    fn into_new_club(self) -> AppResult<NewClub> {
        Ok(NewClub {
            club_name: required_text(self.club_name, "club_name")?,
            contact_email: required_text(self.contact_email, "contact_email")?,
            founded_date: parse_date(self.founded_date, "founded_date")?,
            club_description: non_blank(self.club_description),
            faculty_advisor: non_blank(self.faculty_advisor),
        })
    }

    fn into_changes(self) -> AppResult<ClubChanges> {
        let changes = ClubChanges {
            club_name: not_blanked(self.club_name, "club_name")?,
            contact_email: not_blanked(self.contact_email, "contact_email")?,
            founded_date: parse_date(self.founded_date, "founded_date")?,
            club_description: self.club_description,
            faculty_advisor: self.faculty_advisor,
        };
        Ok(changes)
    }
}

/// A required column may be left out of a patch but not cleared.
fn not_blanked(value: Option<String>, field: &str) -> AppResult<Option<String>> {
    value.map(|v| required_text(Some(v), field)).transpose()
}

async fn list(Extension(pool): Extension<DbPool>) -> AppResult<Json<Vec<Club>>> {
    let conn = &mut pool.get().await?;

    Ok(Json(clubs::list(conn).await?))
}

async fn info(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
) -> AppResult<Json<Club>> {
    let conn = &mut pool.get().await?;

    clubs::find(conn, club_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Club not found"))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    JsonBody(req): JsonBody<ClubRequest>,
) -> AppResult<(StatusCode, Json<Club>)> {
    let new_club = req.into_new_club()?;
    let conn = &mut pool.get().await?;

    let club = clubs::insert(conn, &new_club).await?;
    tracing::info!(club_id = club.id, "created club {}", club.club_name);

    Ok((StatusCode::CREATED, Json(club)))
}

async fn update(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
    JsonBody(req): JsonBody<ClubRequest>,
) -> AppResult<Json<Club>> {
    let changes = req.into_changes()?;
    let conn = &mut pool.get().await?;

    clubs::update(conn, club_id, &changes)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Club not found"))
}

async fn delete(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    let conn = &mut pool.get().await?;

    let deleted = conn
        .transaction::<_, AppError, _>(move |conn| {
            async move { Ok(clubs::delete_cascade(conn, club_id).await?) }.scope_boxed()
        })
        .await?;

    if deleted == 0 {
        return Err(AppError::not_found("Club not found"));
    }
    tracing::info!(club_id, "deleted club and its dependent rows");

    Ok(message(format!("Club with ID {club_id} deleted successfully")))
}

pub fn app() -> Router {
    Router::new()
        .route("/clubs", get(list).post(create))
        .route("/clubs/:club_id", get(info).put(update).delete(delete))
}
