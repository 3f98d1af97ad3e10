use crate::{models::Role, schema::*};
use diesel::prelude::*;
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};

pub async fn list(conn: &mut AsyncPgConnection) -> QueryResult<Vec<Role>> {
    roles::table.order(roles::id.asc()).load(conn).await
}

pub async fn find(conn: &mut AsyncPgConnection, role_id: i32) -> QueryResult<Option<Role>> {
    roles::table.find(role_id).first(conn).await.optional()
}
