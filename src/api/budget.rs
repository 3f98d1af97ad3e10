use super::{non_negative_amount, parse_year, required};
use crate::{
    error::{AppError, AppResult},
    extract::{JsonBody, QueryParams},
    repo::{
        budget::{self, BudgetSummary},
        clubs,
    },
    DbPool,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use diesel_async::AsyncConnection;
use scoped_futures::ScopedFutureExt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct BudgetResponse {
    budget: BudgetSummary,
}

#[derive(Serialize)]
struct FiscalYearsResponse {
    fiscal_years: Vec<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct BudgetQuery {
    fiscal_year: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BudgetRequest {
    fiscal_year: Option<i32>,
    total_budget: Option<f64>,
}

impl BudgetRequest {
    fn validate(self) -> AppResult<(i32, f64)> {
        let fiscal_year = required(self.fiscal_year, "fiscal_year")?;
        let total_budget = non_negative_amount(self.total_budget, "total_budget")?;
        Ok((fiscal_year, total_budget))
    }
}

async fn info(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
    QueryParams(query): QueryParams<BudgetQuery>,
) -> AppResult<Json<BudgetResponse>> {
    let fiscal_year = required(parse_year(query.fiscal_year, "fiscal_year")?, "fiscal_year")?;
    let conn = &mut pool.get().await?;

    let Some(row) = budget::find(conn, club_id, fiscal_year).await? else {
        return Err(AppError::not_found("No budget data found"));
    };

    Ok(Json(BudgetResponse {
        budget: budget::summary(conn, &row).await?,
    }))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
    JsonBody(req): JsonBody<BudgetRequest>,
) -> AppResult<(StatusCode, Json<BudgetResponse>)> {
    let (fiscal_year, total_budget) = req.validate()?;
    let conn = &mut pool.get().await?;

    let summary = conn
        .transaction::<_, AppError, _>(move |conn| {
            async move {
                if !clubs::exists(conn, club_id).await? {
                    return Err(AppError::not_found("Club not found"));
                }
                if budget::find(conn, club_id, fiscal_year).await?.is_some() {
                    return Err(AppError::conflict(
                        "Budget for this fiscal year already exists",
                    ));
                }
                let row = budget::insert(conn, club_id, fiscal_year, total_budget).await?;
                Ok(budget::summary(conn, &row).await?)
            }
            .scope_boxed()
        })
        .await?;
    tracing::info!(club_id, fiscal_year, total_budget, "created budget");

    Ok((StatusCode::CREATED, Json(BudgetResponse { budget: summary })))
}

async fn update(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
    JsonBody(req): JsonBody<BudgetRequest>,
) -> AppResult<Json<BudgetResponse>> {
    let (fiscal_year, total_budget) = req.validate()?;
    let conn = &mut pool.get().await?;

    let summary = conn
        .transaction::<_, AppError, _>(move |conn| {
            async move {
                let Some(row) = budget::find(conn, club_id, fiscal_year).await? else {
                    return Err(AppError::not_found(
                        "Budget record not found for the given fiscal year",
                    ));
                };
                let row = budget::set_total(conn, row.id, total_budget).await?;
                Ok(budget::summary(conn, &row).await?)
            }
            .scope_boxed()
        })
        .await?;

    Ok(Json(BudgetResponse { budget: summary }))
}

async fn years(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
) -> AppResult<Json<FiscalYearsResponse>> {
    let conn = &mut pool.get().await?;

    Ok(Json(FiscalYearsResponse {
        fiscal_years: budget::years(conn, club_id).await?,
    }))
}

pub fn app() -> Router {
    Router::new()
        .route("/clubs/:club_id/budget", get(info).post(create))
        .route("/clubs/:club_id/budget/update", put(update))
        .route("/clubs/:club_id/budget/years", get(years))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_requires_year_and_total() {
        let err = BudgetRequest {
            total_budget: Some(5000.0),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = BudgetRequest {
            fiscal_year: Some(2024),
            total_budget: Some(-10.0),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let ok = BudgetRequest {
            fiscal_year: Some(2024),
            total_budget: Some(5000.0),
        }
        .validate()
        .unwrap();
        assert_eq!(ok, (2024, 5000.0));
    }
}
