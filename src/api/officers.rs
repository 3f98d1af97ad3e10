use super::{message, required, required_text, MessageResponse};
use crate::{
    error::{AppError, AppResult},
    extract::JsonBody,
    models::{ClubRole, Role, Student},
    repo::{members, officers, roles},
    DbPool,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use diesel_async::AsyncConnection;
use scoped_futures::ScopedFutureExt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct Officer {
    student_id: String,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: Option<String>,
    role_id: i32,
    role_name: String,
    role_description: Option<String>,
}

impl Officer {
    fn new(student: Student, role: Role) -> Self {
        Self {
            student_id: student.student_id,
            first_name: student.first_name,
            last_name: student.last_name,
            email: student.email,
            phone_number: student.phone_number,
            role_id: role.id,
            role_name: role.role_name,
            role_description: role.role_description,
        }
    }
}

#[derive(Serialize)]
struct OfficersResponse {
    officers: Vec<Officer>,
}

#[derive(Debug, Serialize)]
struct ClubRoleResponse {
    club_role_id: i32,
    club_id: i32,
    student_id: String,
    role_id: i32,
    role_name: String,
}

impl ClubRoleResponse {
    fn new(row: ClubRole, role: Role) -> Self {
        Self {
            club_role_id: row.id,
            club_id: row.club_id,
            student_id: row.student_id,
            role_id: row.role_id,
            role_name: role.role_name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct OfficerRequest {
    student_id: Option<String>,
    role_id: Option<i32>,
}

async fn list(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
) -> AppResult<Json<OfficersResponse>> {
    let conn = &mut pool.get().await?;

    let officers = officers::list(conn, club_id)
        .await?
        .into_iter()
        .map(|(_, student, role)| Officer::new(student, role))
        .collect();

    Ok(Json(OfficersResponse { officers }))
}

async fn assign(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
    JsonBody(req): JsonBody<OfficerRequest>,
) -> AppResult<(StatusCode, Json<ClubRoleResponse>)> {
    let student_id = required_text(req.student_id, "student_id")?;
    let role_id = required(req.role_id, "role_id")?;
    let conn = &mut pool.get().await?;

    let club_role = conn
        .transaction::<_, AppError, _>(move |conn| {
            async move {
                if members::find(conn, club_id, &student_id).await?.is_none() {
                    return Err(AppError::bad_request("Student is not a member of the club"));
                }
                let Some(role) = roles::find(conn, role_id).await? else {
                    return Err(AppError::not_found("Role not found"));
                };
                if officers::find(conn, club_id, &student_id, role_id).await?.is_some() {
                    return Err(AppError::conflict("Student already holds this role"));
                }
                let row = officers::insert(conn, club_id, &student_id, role_id).await?;
                Ok(ClubRoleResponse::new(row, role))
            }
            .scope_boxed()
        })
        .await?;
    tracing::info!(
        club_id,
        student_id = %club_role.student_id,
        role = %club_role.role_name,
        "assigned officer role"
    );

    Ok((StatusCode::CREATED, Json(club_role)))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path((club_id, student_id, role_id)): Path<(i32, String, i32)>,
) -> AppResult<Json<MessageResponse>> {
    let conn = &mut pool.get().await?;

    if officers::delete(conn, club_id, &student_id, role_id).await? == 0 {
        return Err(AppError::not_found("Officer role not found for this club"));
    }
    tracing::info!(club_id, %student_id, role_id, "removed officer role");

    Ok(message("Officer role removed successfully"))
}

pub fn app() -> Router {
    Router::new()
        .route("/clubs/:club_id/officers", get(list).post(assign))
        .route("/clubs/:club_id/officers/:student_id/:role_id", delete(remove))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn treasurer() -> Role {
        Role {
            id: 2,
            role_name: "Treasurer".into(),
            role_description: Some("Manages the club's finances.".into()),
        }
    }

    #[test]
    fn officer_json_merges_student_and_role() {
        let officer = Officer::new(
            Student {
                student_id: "S003".into(),
                first_name: "Charlie".into(),
                last_name: "Brown".into(),
                email: "charlie.brown@example.com".into(),
                phone_number: Some("555-1234".into()),
                major: Some("Mathematics".into()),
                graduation_year: Some(2026),
            },
            treasurer(),
        );
        let json = serde_json::to_value(&officer).unwrap();
        assert_eq!(json["student_id"], "S003");
        assert_eq!(json["role_id"], 2);
        assert_eq!(json["role_name"], "Treasurer");
        assert!(json.get("major").is_none());
    }

    #[test]
    fn assignment_echoes_the_role_name() {
        let row = ClubRole {
            id: 11,
            club_id: 1,
            student_id: "S001".into(),
            role_id: 2,
        };
        let json = serde_json::to_value(ClubRoleResponse::new(row, treasurer())).unwrap();
        assert_eq!(json["club_role_id"], 11);
        assert_eq!(json["role_name"], "Treasurer");
    }
}
