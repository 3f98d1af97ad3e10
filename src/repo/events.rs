use crate::{models::Event, schema::*};
use chrono::{NaiveDate, NaiveTime};
use diesel::{pg::Pg, prelude::*};
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};

/// Hosting status recorded for the club that creates an event.
pub const LEAD_HOST: &str = "Lead";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventWindow {
    All,
    /// Dated on or after the given day, soonest first.
    Upcoming(NaiveDate),
    /// Dated before the given day, most recent first.
    Past(NaiveDate),
}

#[derive(Debug, Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub event_name: String,
    pub event_description: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub club_id: i32,
}

pub async fn list(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    window: EventWindow,
) -> QueryResult<Vec<Event>> {
    let query = events::table
        .filter(events::club_id.eq(club_id))
        .into_boxed::<Pg>();

    let query = match window {
        EventWindow::All => query.order((events::event_date.asc(), events::event_time.asc())),
        EventWindow::Upcoming(today) => query
            .filter(events::event_date.ge(today))
            .order((events::event_date.asc(), events::event_time.asc())),
        EventWindow::Past(today) => query
            .filter(events::event_date.lt(today))
            .order((events::event_date.desc(), events::event_time.desc())),
    };

    query.load(conn).await
}

pub async fn find(conn: &mut AsyncPgConnection, event_id: i32) -> QueryResult<Option<Event>> {
    events::table.find(event_id).first(conn).await.optional()
}

pub async fn find_for_club(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    event_id: i32,
) -> QueryResult<Option<Event>> {
    events::table
        .filter(events::id.eq(event_id))
        .filter(events::club_id.eq(club_id))
        .first(conn)
        .await
        .optional()
}

/// Inserts the event and marks its club as the lead host. Meant to run
/// inside a transaction.
pub async fn insert(conn: &mut AsyncPgConnection, event: &NewEvent) -> QueryResult<Event> {
    let event: Event = diesel::insert_into(events::table)
        .values(event)
        .get_result(conn)
        .await?;

    diesel::insert_into(event_hostings::table)
        .values((
            event_hostings::club_id.eq(event.club_id),
            event_hostings::event_id.eq(event.id),
            event_hostings::hosting_status.eq(LEAD_HOST),
        ))
        .execute(conn)
        .await?;

    Ok(event)
}

/// Removes the event with its attendance and hosting rows. Meant to run
/// inside a transaction.
pub async fn delete_cascade(conn: &mut AsyncPgConnection, event_id: i32) -> QueryResult<usize> {
    diesel::delete(event_attendance::table.filter(event_attendance::event_id.eq(event_id)))
        .execute(conn)
        .await?;
    diesel::delete(event_hostings::table.filter(event_hostings::event_id.eq(event_id)))
        .execute(conn)
        .await?;
    diesel::delete(events::table.find(event_id))
        .execute(conn)
        .await
}
