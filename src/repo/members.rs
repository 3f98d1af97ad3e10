use super::contains_pattern;
use crate::{
    models::{Membership, MembershipStatus, Student},
    schema::*,
};
use diesel::{pg::Pg, prelude::*, PgTextExpressionMethods};
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};

/// Optional member filters; text fields match case-insensitively anywhere in the column.
#[derive(Debug, Default, Clone)]
pub struct MemberSearch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub student_id: Option<String>,
    pub email: Option<String>,
    pub major: Option<String>,
    pub graduation_year: Option<i32>,
}

pub async fn list(
    conn: &mut AsyncPgConnection,
    club_id: i32,
) -> QueryResult<Vec<(Membership, Student)>> {
    search(conn, club_id, &MemberSearch::default()).await
}

pub async fn search(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    filter: &MemberSearch,
) -> QueryResult<Vec<(Membership, Student)>> {
    let mut query = memberships::table
        .inner_join(students::table)
        .filter(memberships::club_id.eq(club_id))
        .into_boxed::<Pg>();

    if let Some(first_name) = &filter.first_name {
        query = query.filter(students::first_name.ilike(contains_pattern(first_name)));
    }
    if let Some(last_name) = &filter.last_name {
        query = query.filter(students::last_name.ilike(contains_pattern(last_name)));
    }
    if let Some(student_id) = &filter.student_id {
        query = query.filter(students::student_id.ilike(contains_pattern(student_id)));
    }
    if let Some(email) = &filter.email {
        query = query.filter(students::email.ilike(contains_pattern(email)));
    }
    if let Some(major) = &filter.major {
        query = query.filter(students::major.ilike(contains_pattern(major)));
    }
    if let Some(year) = filter.graduation_year {
        query = query.filter(students::graduation_year.eq(year));
    }

    query
        .order((students::last_name.asc(), students::first_name.asc()))
        .load(conn)
        .await
}

pub async fn find(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    student_id: &str,
) -> QueryResult<Option<Membership>> {
    memberships::table
        .filter(memberships::club_id.eq(club_id))
        .filter(memberships::student_id.eq(student_id))
        .first(conn)
        .await
        .optional()
}

pub async fn insert(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    student_id: &str,
    status: MembershipStatus,
) -> QueryResult<Membership> {
    diesel::insert_into(memberships::table)
        .values((
            memberships::club_id.eq(club_id),
            memberships::student_id.eq(student_id),
            memberships::active_status.eq(status.as_str()),
        ))
        .get_result(conn)
        .await
}

/// Drops the membership together with any officer roles it carried.
/// Meant to run inside a transaction.
pub async fn delete(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    student_id: &str,
) -> QueryResult<usize> {
    diesel::delete(
        club_roles::table
            .filter(club_roles::club_id.eq(club_id))
            .filter(club_roles::student_id.eq(student_id)),
    )
    .execute(conn)
    .await?;

    diesel::delete(
        memberships::table
            .filter(memberships::club_id.eq(club_id))
            .filter(memberships::student_id.eq(student_id)),
    )
    .execute(conn)
    .await
}
