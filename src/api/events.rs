use super::{message, non_blank, parse_date, parse_time, required, required_text, MessageResponse};
use crate::{
    error::{AppError, AppResult},
    extract::JsonBody,
    models::Event,
    repo::{
        clubs,
        events::{self, EventWindow, NewEvent},
    },
    DbPool,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::Local;
use diesel_async::AsyncConnection;
use scoped_futures::ScopedFutureExt;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct EventsResponse {
    events: Vec<Event>,
}

#[derive(Debug, Default, Deserialize)]
struct EventRequest {
    event_name: Option<String>,
    event_description: Option<String>,
    event_date: Option<String>,
    event_time: Option<String>,
    location: Option<String>,
}

impl EventRequest {
    fn into_new_event(self, club_id: i32) -> AppResult<NewEvent> {
        Ok(NewEvent {
            event_name: required_text(self.event_name, "event_name")?,
            event_date: required(parse_date(self.event_date, "event_date")?, "event_date")?,
            event_time: parse_time(self.event_time, "event_time")?,
            event_description: non_blank(self.event_description),
            location: non_blank(self.location),
            club_id,
        })
    }
}

async fn load(pool: &DbPool, club_id: i32, window: EventWindow) -> AppResult<Json<EventsResponse>> {
    let conn = &mut pool.get().await?;

    Ok(Json(EventsResponse {
        events: events::list(conn, club_id, window).await?,
    }))
}

async fn list(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
) -> AppResult<Json<EventsResponse>> {
    load(&pool, club_id, EventWindow::All).await
}

async fn upcoming(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
) -> AppResult<Json<EventsResponse>> {
    let today = Local::now().date_naive();
    load(&pool, club_id, EventWindow::Upcoming(today)).await
}

async fn past(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
) -> AppResult<Json<EventsResponse>> {
    let today = Local::now().date_naive();
    load(&pool, club_id, EventWindow::Past(today)).await
}

async fn create(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
    JsonBody(req): JsonBody<EventRequest>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let new_event = req.into_new_event(club_id)?;
    let conn = &mut pool.get().await?;

    let event = conn
        .transaction::<_, AppError, _>(move |conn| {
            async move {
                if !clubs::exists(conn, club_id).await? {
                    return Err(AppError::not_found("Club not found"));
                }
                Ok(events::insert(conn, &new_event).await?)
            }
            .scope_boxed()
        })
        .await?;
    tracing::info!(club_id, event_id = event.id, "created event {}", event.event_name);

    Ok((StatusCode::CREATED, Json(event)))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path((club_id, event_id)): Path<(i32, i32)>,
) -> AppResult<Json<MessageResponse>> {
    let conn = &mut pool.get().await?;

    conn.transaction::<_, AppError, _>(move |conn| {
        async move {
            if events::find_for_club(conn, club_id, event_id).await?.is_none() {
                return Err(AppError::not_found("Event not found for this club"));
            }
            events::delete_cascade(conn, event_id).await?;
            Ok(())
        }
        .scope_boxed()
    })
    .await?;
    tracing::info!(club_id, event_id, "deleted event");

    Ok(message("Event deleted successfully"))
}

pub fn app() -> Router {
    Router::new()
        .route("/clubs/:club_id/events", get(list).post(create))
        .route("/clubs/:club_id/events/upcoming", get(upcoming))
        .route("/clubs/:club_id/events/past", get(past))
        .route("/clubs/:club_id/events/:event_id", delete(remove))
}
