use super::{message, non_blank, required_text, MessageResponse};
use crate::{
    error::{AppError, AppResult},
    extract::{JsonBody, QueryParams},
    models::{Membership, MembershipStatus, Student},
    repo::{
        clubs,
        members::{self, MemberSearch},
        students,
    },
    DbPool,
};
use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Extension, Json, Router,
};
use diesel_async::AsyncConnection;
use scoped_futures::ScopedFutureExt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct MemberResponse {
    #[serde(flatten)]
    student: Student,
    active_status: String,
}

impl From<(Membership, Student)> for MemberResponse {
    fn from((membership, student): (Membership, Student)) -> Self {
        Self {
            student,
            active_status: membership.active_status,
        }
    }
}

#[derive(Serialize)]
struct MembersResponse {
    members: Vec<MemberResponse>,
}

impl MembersResponse {
    fn from_rows(rows: Vec<(Membership, Student)>) -> Json<Self> {
        Json(Self {
            members: rows.into_iter().map(MemberResponse::from).collect(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct MemberRequest {
    student_id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone_number: Option<String>,
    major: Option<String>,
    graduation_year: Option<i32>,
    active_status: Option<String>,
}

impl MemberRequest {
    fn status(&self) -> AppResult<MembershipStatus> {
        match self.active_status.as_deref().map(str::trim) {
            None | Some("") => Ok(MembershipStatus::default()),
            Some(s) => s
                .parse::<MembershipStatus>()
                .map_err(|e| AppError::bad_request(e.to_string())),
        }
    }

    /// Builds the student record for a first-time member.
    fn into_student(self, student_id: String) -> AppResult<Student> {
        Ok(Student {
            student_id,
            first_name: required_text(self.first_name, "first_name")?,
            last_name: required_text(self.last_name, "last_name")?,
            email: required_text(self.email, "email")?,
            phone_number: non_blank(self.phone_number),
            major: non_blank(self.major),
            graduation_year: self.graduation_year,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct MemberSearchParams {
    first_name: Option<String>,
    last_name: Option<String>,
    student_id: Option<String>,
    email: Option<String>,
    major: Option<String>,
    graduation_year: Option<String>,
}

impl MemberSearchParams {
    /// `None` when the filters cannot match anything.
    fn into_search(self) -> Option<MemberSearch> {
        let graduation_year = match non_blank(self.graduation_year) {
            Some(year) => Some(year.parse::<i32>().ok()?),
            None => None,
        };
        Some(MemberSearch {
            first_name: non_blank(self.first_name),
            last_name: non_blank(self.last_name),
            student_id: non_blank(self.student_id),
            email: non_blank(self.email),
            major: non_blank(self.major),
            graduation_year,
        })
    }
}

enum AddOutcome {
    Added(MemberResponse),
    AlreadyMember,
}

async fn list(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
) -> AppResult<Json<MembersResponse>> {
    let conn = &mut pool.get().await?;

    Ok(MembersResponse::from_rows(members::list(conn, club_id).await?))
}

async fn search(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
    QueryParams(params): QueryParams<MemberSearchParams>,
) -> AppResult<Json<MembersResponse>> {
    let Some(filter) = params.into_search() else {
        return Ok(MembersResponse::from_rows(Vec::new()));
    };
    let conn = &mut pool.get().await?;

    Ok(MembersResponse::from_rows(
        members::search(conn, club_id, &filter).await?,
    ))
}

async fn add(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
    JsonBody(req): JsonBody<MemberRequest>,
) -> AppResult<Response> {
    let student_id = required_text(req.student_id.clone(), "student_id")?;
    let status = req.status()?;
    let conn = &mut pool.get().await?;

    let outcome = conn
        .transaction::<_, AppError, _>(move |conn| {
            async move {
                if !clubs::exists(conn, club_id).await? {
                    return Err(AppError::not_found("Club not found"));
                }

                let student = match students::find(conn, &student_id).await? {
                    Some(student) => student,
                    None => {
                        let student = req.into_student(student_id)?;
                        tracing::info!(student_id = %student.student_id, "registering new student");
                        students::insert(conn, &student).await?
                    }
                };

                if members::find(conn, club_id, &student.student_id).await?.is_some() {
                    return Ok(AddOutcome::AlreadyMember);
                }

                let membership = members::insert(conn, club_id, &student.student_id, status).await?;
                Ok(AddOutcome::Added(MemberResponse::from((membership, student))))
            }
            .scope_boxed()
        })
        .await?;

    Ok(match outcome {
        AddOutcome::Added(member) => {
            tracing::info!(club_id, student_id = %member.student.student_id, "added member");
            (StatusCode::CREATED, Json(member)).into_response()
        }
        AddOutcome::AlreadyMember => message("Member already exists in this club").into_response(),
    })
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path((club_id, student_id)): Path<(i32, String)>,
) -> AppResult<Json<MessageResponse>> {
    let conn = &mut pool.get().await?;

    conn.transaction::<_, AppError, _>(move |conn| {
        async move {
            if !clubs::exists(conn, club_id).await? {
                return Err(AppError::not_found("Club not found"));
            }
            if members::delete(conn, club_id, &student_id).await? == 0 {
                return Err(AppError::not_found("Member not found in this club"));
            }
            tracing::info!(club_id, %student_id, "removed member");
            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    Ok(message("Member removed from the club"))
}

pub fn app() -> Router {
    Router::new()
        .route("/clubs/:club_id/members", get(list).post(add))
        .route("/clubs/:club_id/members/search", get(search))
        .route("/clubs/:club_id/members/:student_id", delete(remove))
}
