use crate::{models::Club, schema::*};
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};

#[derive(Debug, Insertable)]
#[diesel(table_name = clubs)]
pub struct NewClub {
    pub club_name: String,
    pub club_description: Option<String>,
    pub founded_date: Option<NaiveDate>,
    pub contact_email: String,
    pub faculty_advisor: Option<String>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = clubs)]
pub struct ClubChanges {
    pub club_name: Option<String>,
    pub club_description: Option<String>,
    pub founded_date: Option<NaiveDate>,
    pub contact_email: Option<String>,
    pub faculty_advisor: Option<String>,
}

impl ClubChanges {
    pub fn is_empty(&self) -> bool {
        self.club_name.is_none()
            && self.club_description.is_none()
            && self.founded_date.is_none()
            && self.contact_email.is_none()
            && self.faculty_advisor.is_none()
    }
}

pub async fn list(conn: &mut AsyncPgConnection) -> QueryResult<Vec<Club>> {
    clubs::table.order(clubs::id.asc()).load(conn).await
}

pub async fn find(conn: &mut AsyncPgConnection, club_id: i32) -> QueryResult<Option<Club>> {
    clubs::table.find(club_id).first(conn).await.optional()
}

pub async fn exists(conn: &mut AsyncPgConnection, club_id: i32) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(clubs::table.find(club_id)))
        .get_result(conn)
        .await
}

pub async fn insert(conn: &mut AsyncPgConnection, club: &NewClub) -> QueryResult<Club> {
    diesel::insert_into(clubs::table)
        .values(club)
        .get_result(conn)
        .await
}

pub async fn update(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    changes: &ClubChanges,
) -> QueryResult<Option<Club>> {
    if changes.is_empty() {
        return find(conn, club_id).await;
    }
    diesel::update(clubs::table.find(club_id))
        .set(changes)
        .get_result(conn)
        .await
        .optional()
}

/// Removes the club and every row that depends on it. Returns the number of
/// club rows deleted (0 or 1). Meant to run inside a transaction.
pub async fn delete_cascade(conn: &mut AsyncPgConnection, club_id: i32) -> QueryResult<usize> {
    let event_ids: Vec<i32> = events::table
        .filter(events::club_id.eq(club_id))
        .select(events::id)
        .load(conn)
        .await?;

    diesel::delete(club_roles::table.filter(club_roles::club_id.eq(club_id)))
        .execute(conn)
        .await?;
    diesel::delete(
        event_hostings::table.filter(
            event_hostings::club_id
                .eq(club_id)
                .or(event_hostings::event_id.eq_any(&event_ids)),
        ),
    )
    .execute(conn)
    .await?;
    diesel::delete(
        sponsorship_contributions::table.filter(sponsorship_contributions::club_id.eq(club_id)),
    )
    .execute(conn)
    .await?;
    diesel::delete(memberships::table.filter(memberships::club_id.eq(club_id)))
        .execute(conn)
        .await?;
    diesel::delete(expenses::table.filter(expenses::club_id.eq(club_id)))
        .execute(conn)
        .await?;
    diesel::delete(budgets::table.filter(budgets::club_id.eq(club_id)))
        .execute(conn)
        .await?;
    diesel::delete(event_attendance::table.filter(event_attendance::event_id.eq_any(&event_ids)))
        .execute(conn)
        .await?;
    diesel::delete(events::table.filter(events::club_id.eq(club_id)))
        .execute(conn)
        .await?;

    diesel::delete(clubs::table.find(club_id))
        .execute(conn)
        .await
}
