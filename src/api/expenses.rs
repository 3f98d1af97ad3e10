use super::{message, non_blank, parse_date, parse_year, positive_amount, required, required_text, MessageResponse};
use crate::{
    error::{AppError, AppResult},
    extract::{JsonBody, QueryParams},
    models::{Expense, ExpenseCategory},
    repo::{
        budget,
        expenses::{self, ExpenseSearch, NewExpense},
        fiscal_year_bounds,
    },
    DbPool,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::{Datelike, NaiveDate};
use diesel_async::AsyncConnection;
use scoped_futures::ScopedFutureExt;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct CategoriesResponse {
    categories: &'static [ExpenseCategory],
}

#[derive(Serialize)]
struct ExpensesResponse {
    expenses: Vec<Expense>,
}

#[derive(Debug, Default, Deserialize)]
struct ExpenseQuery {
    expense_name: Option<String>,
    category: Option<String>,
    fiscal_year: Option<String>,
}

impl ExpenseQuery {
    fn into_search(self) -> AppResult<ExpenseSearch> {
        let dates = match parse_year(self.fiscal_year, "fiscal_year")? {
            Some(year) => Some(
                fiscal_year_bounds(year)
                    .ok_or_else(|| AppError::bad_request("fiscal_year is out of range"))?,
            ),
            None => None,
        };
        Ok(ExpenseSearch {
            name: non_blank(self.expense_name),
            category: non_blank(self.category),
            dates,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct ExpenseRequest {
    expense_name: Option<String>,
    expense_amount: Option<f64>,
    expense_date: Option<String>,
    description: Option<String>,
    category: Option<String>,
}

struct ValidExpense {
    expense_name: String,
    expense_amount: f64,
    expense_date: NaiveDate,
    description: Option<String>,
    category: ExpenseCategory,
}

impl ExpenseRequest {
    fn validate(self) -> AppResult<ValidExpense> {
        let expense_name = required_text(self.expense_name, "expense_name")?;
        let expense_amount = positive_amount(self.expense_amount, "expense_amount")?;
        let expense_date = required(parse_date(self.expense_date, "expense_date")?, "expense_date")?;
        let category = match non_blank(self.category) {
            Some(category) => category
                .parse::<ExpenseCategory>()
                .map_err(|e| AppError::bad_request(e.to_string()))?,
            None => ExpenseCategory::default(),
        };
        Ok(ValidExpense {
            expense_name,
            expense_amount,
            expense_date,
            description: non_blank(self.description),
            category,
        })
    }
}

impl ValidExpense {
    fn into_new_expense(self, club_id: i32, budget_id: i32) -> NewExpense {
        NewExpense {
            club_id,
            budget_id,
            expense_name: self.expense_name,
            expense_amount: self.expense_amount,
            expense_date: self.expense_date,
            description: self.description,
            category: self.category.as_str().to_string(),
        }
    }
}

async fn categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: ExpenseCategory::ALL,
    })
}

async fn list(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
    QueryParams(query): QueryParams<ExpenseQuery>,
) -> AppResult<Json<ExpensesResponse>> {
    let filter = ExpenseSearch {
        dates: query.into_search()?.dates,
        ..Default::default()
    };
    let conn = &mut pool.get().await?;

    Ok(Json(ExpensesResponse {
        expenses: expenses::search(conn, club_id, &filter).await?,
    }))
}

async fn search(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
    QueryParams(query): QueryParams<ExpenseQuery>,
) -> AppResult<Json<ExpensesResponse>> {
    let filter = query.into_search()?;
    let conn = &mut pool.get().await?;

    Ok(Json(ExpensesResponse {
        expenses: expenses::search(conn, club_id, &filter).await?,
    }))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
    JsonBody(req): JsonBody<ExpenseRequest>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let valid = req.validate()?;
    let conn = &mut pool.get().await?;

    let expense = conn
        .transaction::<_, AppError, _>(move |conn| {
            async move {
                let fiscal_year = valid.expense_date.year();
                let Some(row) = budget::find(conn, club_id, fiscal_year).await? else {
                    return Err(AppError::not_found(
                        "No budget found for the given fiscal year",
                    ));
                };
                let new_expense = valid.into_new_expense(club_id, row.id);
                Ok(expenses::insert(conn, &new_expense).await?)
            }
            .scope_boxed()
        })
        .await?;
    tracing::info!(club_id, expense_id = expense.id, amount = expense.expense_amount, "recorded expense");

    Ok((StatusCode::CREATED, Json(expense)))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path((club_id, expense_id)): Path<(i32, i32)>,
) -> AppResult<Json<MessageResponse>> {
    let conn = &mut pool.get().await?;

    if expenses::delete(conn, club_id, expense_id).await? == 0 {
        return Err(AppError::not_found("Expense not found"));
    }

    Ok(message("Expense deleted successfully"))
}

pub fn app() -> Router {
    Router::new()
        .route("/expenses/categories", get(categories))
        .route("/clubs/:club_id/expenses", get(list).post(create))
        .route("/clubs/:club_id/expenses/search", get(search))
        .route("/clubs/:club_id/expenses/:expense_id", delete(remove))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workshop_materials() -> ExpenseRequest {
        ExpenseRequest {
            expense_name: Some("Workshop Materials".into()),
            expense_amount: Some(500.0),
            expense_date: Some("2024-12-05".into()),
            description: Some("Materials for AI workshop.".into()),
            category: Some("Supplies".into()),
        }
    }

    #[test]
    fn valid_expense_maps_to_its_budget() {
        let expense = workshop_materials().validate().unwrap().into_new_expense(1, 9);
        assert_eq!(expense.budget_id, 9);
        assert_eq!(expense.category, "Supplies");
        assert_eq!(expense.expense_date.year(), 2024);
    }

    #[test]
    fn category_defaults_to_other_and_rejects_unknowns() {
        let expense = ExpenseRequest {
            category: None,
            ..workshop_materials()
        }
        .validate()
        .unwrap();
        assert_eq!(expense.category, ExpenseCategory::Other);

        let err = ExpenseRequest {
            category: Some("Bribes".into()),
            ..workshop_materials()
        }
        .validate()
        .err()
        .unwrap();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn amount_must_be_positive() {
        let err = ExpenseRequest {
            expense_amount: Some(0.0),
            ..workshop_materials()
        }
        .validate()
        .err()
        .unwrap();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn query_fiscal_year_becomes_a_date_range() {
        let search = ExpenseQuery {
            fiscal_year: Some("2025".into()),
            expense_name: Some(" ".into()),
            ..Default::default()
        }
        .into_search()
        .unwrap();
        assert_eq!(search.name, None);
        assert_eq!(search.dates, fiscal_year_bounds(2025));

        assert!(ExpenseQuery {
            fiscal_year: Some("twenty".into()),
            ..Default::default()
        }
        .into_search()
        .is_err());
    }
}
