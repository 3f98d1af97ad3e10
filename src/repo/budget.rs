use super::fiscal_year_bounds;
use crate::{models::Budget, schema::*};
use diesel::{dsl::sum, prelude::*};
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};
use serde::Serialize;

/// Budget totals for one fiscal year. Always derived from the expense rows,
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub budget_id: i32,
    pub fiscal_year: i32,
    pub total_budget: f64,
    pub spent_amount: f64,
    pub remaining_amount: f64,
}

impl BudgetSummary {
    pub fn new(budget: &Budget, spent_amount: f64) -> Self {
        Self {
            budget_id: budget.id,
            fiscal_year: budget.fiscal_year,
            total_budget: budget.total_budget,
            spent_amount,
            remaining_amount: budget.total_budget - spent_amount,
        }
    }
}

pub async fn find(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    fiscal_year: i32,
) -> QueryResult<Option<Budget>> {
    budgets::table
        .filter(budgets::club_id.eq(club_id))
        .filter(budgets::fiscal_year.eq(fiscal_year))
        .first(conn)
        .await
        .optional()
}

/// Fiscal years with a budget, newest first.
pub async fn years(conn: &mut AsyncPgConnection, club_id: i32) -> QueryResult<Vec<i32>> {
    budgets::table
        .filter(budgets::club_id.eq(club_id))
        .select(budgets::fiscal_year)
        .distinct()
        .order(budgets::fiscal_year.desc())
        .load(conn)
        .await
}

pub async fn insert(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    fiscal_year: i32,
    total_budget: f64,
) -> QueryResult<Budget> {
    diesel::insert_into(budgets::table)
        .values((
            budgets::club_id.eq(club_id),
            budgets::fiscal_year.eq(fiscal_year),
            budgets::total_budget.eq(total_budget),
        ))
        .get_result(conn)
        .await
}

pub async fn set_total(
    conn: &mut AsyncPgConnection,
    budget_id: i32,
    total_budget: f64,
) -> QueryResult<Budget> {
    diesel::update(budgets::table.find(budget_id))
        .set(budgets::total_budget.eq(total_budget))
        .get_result(conn)
        .await
}

/// Sum of the club's expenses dated inside the fiscal year.
pub async fn spent_in_year(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    fiscal_year: i32,
) -> QueryResult<f64> {
    let Some((start, end)) = fiscal_year_bounds(fiscal_year) else {
        return Ok(0.0);
    };

    let spent: Option<f64> = expenses::table
        .filter(expenses::club_id.eq(club_id))
        .filter(expenses::expense_date.ge(start))
        .filter(expenses::expense_date.lt(end))
        .select(sum(expenses::expense_amount))
        .get_result(conn)
        .await?;

    Ok(spent.unwrap_or(0.0))
}

pub async fn summary(conn: &mut AsyncPgConnection, budget: &Budget) -> QueryResult<BudgetSummary> {
    let spent = spent_in_year(conn, budget.club_id, budget.fiscal_year).await?;
    Ok(BudgetSummary::new(budget, spent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_is_total_minus_spent() {
        let budget = Budget {
            id: 1,
            club_id: 1,
            fiscal_year: 2024,
            total_budget: 5000.0,
        };
        let summary = BudgetSummary::new(&budget, 500.0);
        assert_eq!(summary.remaining_amount, 4500.0);
        assert_eq!(summary.spent_amount, 500.0);
        assert_eq!(summary.budget_id, 1);
    }

    #[test]
    fn overspending_goes_negative() {
        let budget = Budget {
            id: 7,
            club_id: 2,
            fiscal_year: 2026,
            total_budget: 1000.0,
        };
        assert_eq!(BudgetSummary::new(&budget, 1600.0).remaining_amount, -600.0);
    }
}
