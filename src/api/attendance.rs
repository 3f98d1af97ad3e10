use super::{message, parse_time, required_text, MessageResponse};
use crate::{
    error::{AppError, AppResult},
    extract::JsonBody,
    models::{AttendanceStatus, EventAttendance, Student},
    repo::{attendance, events, students},
    DbPool,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::NaiveTime;
use diesel_async::AsyncConnection;
use scoped_futures::ScopedFutureExt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct AttendanceRecord {
    attendance_id: i32,
    event_id: i32,
    student_id: String,
    attendance_status: String,
    check_in_time: Option<NaiveTime>,
    member_name: String,
}

impl AttendanceRecord {
    fn new(row: EventAttendance, student: &Student) -> Self {
        Self {
            attendance_id: row.id,
            event_id: row.event_id,
            student_id: row.student_id,
            attendance_status: row.attendance_status,
            check_in_time: row.check_in_time,
            member_name: student.full_name(),
        }
    }
}

#[derive(Serialize)]
struct AttendanceResponse {
    attendance: Vec<AttendanceRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct AttendanceRequest {
    student_id: Option<String>,
    attendance_status: Option<String>,
    check_in_time: Option<String>,
}

struct NewAttendance {
    student_id: String,
    status: AttendanceStatus,
    check_in_time: Option<NaiveTime>,
}

impl AttendanceRequest {
    fn validate(self) -> AppResult<NewAttendance> {
        let student_id = required_text(self.student_id, "student_id")?;
        let status = required_text(self.attendance_status, "attendance_status")?
            .parse::<AttendanceStatus>()
            .map_err(|e| AppError::bad_request(e.to_string()))?;
        Ok(NewAttendance {
            student_id,
            status,
            check_in_time: parse_time(self.check_in_time, "check_in_time")?,
        })
    }
}

async fn list(
    Extension(pool): Extension<DbPool>,
    Path(event_id): Path<i32>,
) -> AppResult<Json<AttendanceResponse>> {
    let conn = &mut pool.get().await?;

    let attendance = attendance::list(conn, event_id)
        .await?
        .into_iter()
        .map(|(row, student)| AttendanceRecord::new(row, &student))
        .collect();

    Ok(Json(AttendanceResponse { attendance }))
}

async fn record(
    Extension(pool): Extension<DbPool>,
    Path(event_id): Path<i32>,
    JsonBody(req): JsonBody<AttendanceRequest>,
) -> AppResult<(StatusCode, Json<AttendanceRecord>)> {
    let new = req.validate()?;
    let conn = &mut pool.get().await?;

    let record = conn
        .transaction::<_, AppError, _>(move |conn| {
            async move {
                if events::find(conn, event_id).await?.is_none() {
                    return Err(AppError::not_found("Event not found"));
                }
                let Some(student) = students::find(conn, &new.student_id).await? else {
                    return Err(AppError::not_found("Student not found"));
                };
                if attendance::find_for_student(conn, event_id, &student.student_id)
                    .await?
                    .is_some()
                {
                    return Err(AppError::conflict(
                        "Attendance already recorded for this student",
                    ));
                }

                let row = attendance::insert(
                    conn,
                    event_id,
                    &student.student_id,
                    new.status,
                    new.check_in_time,
                )
                .await?;
                Ok(AttendanceRecord::new(row, &student))
            }
            .scope_boxed()
        })
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path((event_id, attendance_id)): Path<(i32, i32)>,
) -> AppResult<Json<MessageResponse>> {
    let conn = &mut pool.get().await?;

    if attendance::delete(conn, event_id, attendance_id).await? == 0 {
        return Err(AppError::not_found("Attendance record not found"));
    }

    Ok(message("Attendance record deleted successfully"))
}

pub fn app() -> Router {
    Router::new()
        .route("/events/:event_id/attendance", get(list).post(record))
        .route("/events/:event_id/attendance/:attendance_id", delete(remove))
}
