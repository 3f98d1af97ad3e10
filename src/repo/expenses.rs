use super::contains_pattern;
use crate::{models::Expense, schema::*};
use chrono::NaiveDate;
use diesel::{pg::Pg, prelude::*, PgTextExpressionMethods};
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};

#[derive(Debug, Default, Clone)]
pub struct ExpenseSearch {
    pub name: Option<String>,
    pub category: Option<String>,
    /// Half-open `[start, end)` range on the expense date.
    pub dates: Option<(NaiveDate, NaiveDate)>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = expenses)]
pub struct NewExpense {
    pub club_id: i32,
    pub budget_id: i32,
    pub expense_name: String,
    pub expense_amount: f64,
    pub expense_date: NaiveDate,
    pub description: Option<String>,
    pub category: String,
}

pub async fn search(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    filter: &ExpenseSearch,
) -> QueryResult<Vec<Expense>> {
    let mut query = expenses::table
        .filter(expenses::club_id.eq(club_id))
        .into_boxed::<Pg>();

    if let Some(name) = &filter.name {
        query = query.filter(expenses::expense_name.ilike(contains_pattern(name)));
    }
    if let Some(category) = &filter.category {
        query = query.filter(expenses::category.ilike(contains_pattern(category)));
    }
    if let Some((start, end)) = filter.dates {
        query = query
            .filter(expenses::expense_date.ge(start))
            .filter(expenses::expense_date.lt(end));
    }

    query
        .order((expenses::expense_date.asc(), expenses::id.asc()))
        .load(conn)
        .await
}

pub async fn insert(conn: &mut AsyncPgConnection, expense: &NewExpense) -> QueryResult<Expense> {
    diesel::insert_into(expenses::table)
        .values(expense)
        .get_result(conn)
        .await
}

pub async fn delete(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    expense_id: i32,
) -> QueryResult<usize> {
    diesel::delete(
        expenses::table
            .filter(expenses::id.eq(expense_id))
            .filter(expenses::club_id.eq(club_id)),
    )
    .execute(conn)
    .await
}
