use super::contains_pattern;
use crate::{
    models::{Sponsor, SponsorshipContribution},
    schema::*,
};
use chrono::NaiveDate;
use diesel::{pg::Pg, prelude::*, PgTextExpressionMethods};
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};

#[derive(Debug, Default, Clone)]
pub struct SponsorSearch {
    pub sponsor_name: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    /// Inclusive lower bound on the contribution date.
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound on the contribution date.
    pub to_date: Option<NaiveDate>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sponsors)]
pub struct NewSponsor {
    pub sponsor_name: String,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

pub async fn list(conn: &mut AsyncPgConnection) -> QueryResult<Vec<Sponsor>> {
    sponsors::table.order(sponsors::sponsor_name.asc()).load(conn).await
}

pub async fn find_by_name(
    conn: &mut AsyncPgConnection,
    sponsor_name: &str,
) -> QueryResult<Option<Sponsor>> {
    sponsors::table
        .filter(sponsors::sponsor_name.eq(sponsor_name))
        .first(conn)
        .await
        .optional()
}

pub async fn insert(conn: &mut AsyncPgConnection, sponsor: &NewSponsor) -> QueryResult<Sponsor> {
    diesel::insert_into(sponsors::table)
        .values(sponsor)
        .get_result(conn)
        .await
}

pub async fn contributions(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    filter: &SponsorSearch,
) -> QueryResult<Vec<(SponsorshipContribution, Sponsor)>> {
    let mut query = sponsorship_contributions::table
        .inner_join(sponsors::table)
        .filter(sponsorship_contributions::club_id.eq(club_id))
        .into_boxed::<Pg>();

    if let Some(name) = &filter.sponsor_name {
        query = query.filter(sponsors::sponsor_name.ilike(contains_pattern(name)));
    }
    if let Some(person) = &filter.contact_person {
        query = query.filter(sponsors::contact_person.ilike(contains_pattern(person)));
    }
    if let Some(email) = &filter.contact_email {
        query = query.filter(sponsors::contact_email.ilike(contains_pattern(email)));
    }
    if let Some(from) = filter.from_date {
        query = query.filter(sponsorship_contributions::contribution_date.ge(from));
    }
    if let Some(to) = filter.to_date {
        query = query.filter(sponsorship_contributions::contribution_date.le(to));
    }

    query
        .order((
            sponsorship_contributions::contribution_date.desc(),
            sponsorship_contributions::id.desc(),
        ))
        .load(conn)
        .await
}

pub async fn insert_contribution(
    conn: &mut AsyncPgConnection,
    sponsor_id: i32,
    club_id: i32,
    amount: f64,
    date: NaiveDate,
) -> QueryResult<SponsorshipContribution> {
    diesel::insert_into(sponsorship_contributions::table)
        .values((
            sponsorship_contributions::sponsor_id.eq(sponsor_id),
            sponsorship_contributions::club_id.eq(club_id),
            sponsorship_contributions::contribution_amount.eq(amount),
            sponsorship_contributions::contribution_date.eq(date),
        ))
        .get_result(conn)
        .await
}

pub async fn delete_contribution(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    sponsorship_id: i32,
) -> QueryResult<usize> {
    diesel::delete(
        sponsorship_contributions::table
            .filter(sponsorship_contributions::id.eq(sponsorship_id))
            .filter(sponsorship_contributions::club_id.eq(club_id)),
    )
    .execute(conn)
    .await
}
