use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Serialize;
use std::borrow::Cow;

#[derive(Debug)]
pub enum AppError {
    InternalServerError(anyhow::Error),
    ResponseStatusError(StatusCode, Cow<'static, str>),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct AppErrorResponse<'a> {
    error: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InternalServerError(err) => {
                if let Some(message) = constraint_violation(&err) {
                    tracing::warn!("rejected write: {message}");
                    return AppError::from(StatusCode::BAD_REQUEST, message).into_response();
                }
                tracing::error!("internal error: {err:#}");
                AppError::from(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
            AppError::ResponseStatusError(code, s) => {
                (code, Json(AppErrorResponse { error: &s })).into_response()
            }
        }
    }
}

/// Unique, foreign key and check violations are caused by the request, not the server.
fn constraint_violation(err: &anyhow::Error) -> Option<String> {
    match err.downcast_ref::<DieselError>()? {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::ForeignKeyViolation
            | DatabaseErrorKind::CheckViolation,
            info,
        ) => Some(info.message().to_string()),
        _ => None,
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(e: E) -> AppError {
        AppError::InternalServerError(e.into())
    }
}

impl AppError {
    pub fn from(code: StatusCode, s: impl Into<Cow<'static, str>>) -> AppError {
        AppError::ResponseStatusError(code, s.into())
    }

    pub fn bad_request(s: impl Into<Cow<'static, str>>) -> AppError {
        AppError::from(StatusCode::BAD_REQUEST, s)
    }

    pub fn not_found(s: impl Into<Cow<'static, str>>) -> AppError {
        AppError::from(StatusCode::NOT_FOUND, s)
    }

    pub fn conflict(s: impl Into<Cow<'static, str>>) -> AppError {
        AppError::from(StatusCode::CONFLICT, s)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ResponseStatusError(code, _) => *code,
        }
    }
}
