use crate::{models::Student, schema::*};
use diesel::prelude::*;
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};

pub async fn list(conn: &mut AsyncPgConnection) -> QueryResult<Vec<Student>> {
    students::table
        .order((students::last_name.asc(), students::first_name.asc()))
        .load(conn)
        .await
}

pub async fn find(conn: &mut AsyncPgConnection, student_id: &str) -> QueryResult<Option<Student>> {
    students::table
        .find(student_id)
        .first(conn)
        .await
        .optional()
}

pub async fn insert(conn: &mut AsyncPgConnection, student: &Student) -> QueryResult<Student> {
    diesel::insert_into(students::table)
        .values(student)
        .get_result(conn)
        .await
}
