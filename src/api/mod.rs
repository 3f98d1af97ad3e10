use crate::error::{AppError, AppResult};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::borrow::Cow;

pub mod attendance;
pub mod budget;
pub mod clubs;
pub mod events;
pub mod expenses;
pub mod members;
pub mod officers;
pub mod roles;
pub mod sponsors;
pub mod students;

pub fn app() -> Router {
    Router::new()
        .merge(clubs::app())
        .merge(members::app())
        .merge(events::app())
        .merge(attendance::app())
        .merge(budget::app())
        .merge(expenses::app())
        .merge(sponsors::app())
        .merge(officers::app())
        .merge(students::app())
        .merge(roles::app())
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: Cow<'static, str>,
}

pub fn message(s: impl Into<Cow<'static, str>>) -> Json<MessageResponse> {
    Json(MessageResponse { message: s.into() })
}

/// Trims the value; blank strings count as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::bad_request(format!("{field} is required")))
}

fn required_text(value: Option<String>, field: &str) -> AppResult<String> {
    required(non_blank(value), field)
}

fn parse_date(value: Option<String>, field: &str) -> AppResult<Option<NaiveDate>> {
    non_blank(value)
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d").map_err(|_| {
                AppError::bad_request(format!("{field} must be a date in YYYY-MM-DD format"))
            })
        })
        .transpose()
}

fn parse_time(value: Option<String>, field: &str) -> AppResult<Option<NaiveTime>> {
    non_blank(value)
        .map(|v| {
            NaiveTime::parse_from_str(&v, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(&v, "%H:%M"))
                .map_err(|_| AppError::bad_request(format!("{field} must be a time in HH:MM:SS format")))
        })
        .transpose()
}

fn parse_year(value: Option<String>, field: &str) -> AppResult<Option<i32>> {
    non_blank(value)
        .map(|v| {
            v.parse::<i32>()
                .map_err(|_| AppError::bad_request(format!("{field} must be a year")))
        })
        .transpose()
}

fn positive_amount(value: Option<f64>, field: &str) -> AppResult<f64> {
    match required(value, field)? {
        amount if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(AppError::bad_request(format!("{field} must be greater than zero"))),
    }
}

fn non_negative_amount(value: Option<f64>, field: &str) -> AppResult<f64> {
    match required(value, field)? {
        amount if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(AppError::bad_request(format!("{field} must not be negative"))),
    }
}
