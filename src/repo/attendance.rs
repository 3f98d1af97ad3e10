use crate::{
    models::{AttendanceStatus, EventAttendance, Student},
    schema::*,
};
use chrono::NaiveTime;
use diesel::prelude::*;
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};

pub async fn list(
    conn: &mut AsyncPgConnection,
    event_id: i32,
) -> QueryResult<Vec<(EventAttendance, Student)>> {
    event_attendance::table
        .inner_join(students::table)
        .filter(event_attendance::event_id.eq(event_id))
        .order(event_attendance::id.asc())
        .load(conn)
        .await
}

pub async fn find_for_student(
    conn: &mut AsyncPgConnection,
    event_id: i32,
    student_id: &str,
) -> QueryResult<Option<EventAttendance>> {
    event_attendance::table
        .filter(event_attendance::event_id.eq(event_id))
        .filter(event_attendance::student_id.eq(student_id))
        .first(conn)
        .await
        .optional()
}

pub async fn insert(
    conn: &mut AsyncPgConnection,
    event_id: i32,
    student_id: &str,
    status: AttendanceStatus,
    check_in_time: Option<NaiveTime>,
) -> QueryResult<EventAttendance> {
    diesel::insert_into(event_attendance::table)
        .values((
            event_attendance::event_id.eq(event_id),
            event_attendance::student_id.eq(student_id),
            event_attendance::attendance_status.eq(status.as_str()),
            event_attendance::check_in_time.eq(check_in_time),
        ))
        .get_result(conn)
        .await
}

pub async fn delete(
    conn: &mut AsyncPgConnection,
    event_id: i32,
    attendance_id: i32,
) -> QueryResult<usize> {
    diesel::delete(
        event_attendance::table
            .filter(event_attendance::id.eq(attendance_id))
            .filter(event_attendance::event_id.eq(event_id)),
    )
    .execute(conn)
    .await
}
