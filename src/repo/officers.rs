use crate::{
    models::{ClubRole, Role, Student},
    schema::*,
};
use diesel::prelude::*;
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};

pub async fn list(
    conn: &mut AsyncPgConnection,
    club_id: i32,
) -> QueryResult<Vec<(ClubRole, Student, Role)>> {
    club_roles::table
        .inner_join(students::table)
        .inner_join(roles::table)
        .filter(club_roles::club_id.eq(club_id))
        .order((roles::id.asc(), students::last_name.asc()))
        .load(conn)
        .await
}

pub async fn find(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    student_id: &str,
    role_id: i32,
) -> QueryResult<Option<ClubRole>> {
    club_roles::table
        .filter(club_roles::club_id.eq(club_id))
        .filter(club_roles::student_id.eq(student_id))
        .filter(club_roles::role_id.eq(role_id))
        .first(conn)
        .await
        .optional()
}

pub async fn insert(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    student_id: &str,
    role_id: i32,
) -> QueryResult<ClubRole> {
    diesel::insert_into(club_roles::table)
        .values((
            club_roles::club_id.eq(club_id),
            club_roles::student_id.eq(student_id),
            club_roles::role_id.eq(role_id),
        ))
        .get_result(conn)
        .await
}

pub async fn delete(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    student_id: &str,
    role_id: i32,
) -> QueryResult<usize> {
    diesel::delete(
        club_roles::table
            .filter(club_roles::club_id.eq(club_id))
            .filter(club_roles::student_id.eq(student_id))
            .filter(club_roles::role_id.eq(role_id)),
    )
    .execute(conn)
    .await
}
