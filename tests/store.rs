//! Store-level tests against a migrated PostgreSQL database.
//!
//! Run with `DATABASE_URL=... cargo test -- --ignored`. Repo tests run in a
//! transaction that is never committed. Router tests commit through the pool,
//! use unique names and delete their club when done.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Extension, Router,
};
use chrono::NaiveDate;
use club_hub::{
    connect_to_db,
    models::{AttendanceStatus, ExpenseCategory, MembershipStatus, Student},
    repo::{
        attendance, budget,
        clubs::{self, ClubChanges, NewClub},
        events::{self, NewEvent},
        expenses::{self, ExpenseSearch, NewExpense},
        fiscal_year_bounds, members, officers, roles,
        sponsors::{self, NewSponsor},
        students,
    },
    schema,
};
use diesel::{prelude::*, result::DatabaseErrorKind};
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set")
}

async fn connect() -> AsyncPgConnection {
    let mut conn = AsyncPgConnection::establish(&database_url()).await.unwrap();
    conn.begin_test_transaction().await.unwrap();
    conn
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn new_club(conn: &mut AsyncPgConnection, name: &str) -> i32 {
    let club = NewClub {
        club_name: name.to_string(),
        club_description: Some("Test club.".into()),
        founded_date: Some(day(2020, 9, 1)),
        contact_email: format!("{}@example.com", name.to_lowercase().replace(' ', "_")),
        faculty_advisor: None,
    };
    clubs::insert(conn, &club).await.unwrap().id
}

async fn new_student(conn: &mut AsyncPgConnection, student_id: &str) -> Student {
    let student = Student {
        student_id: student_id.to_string(),
        first_name: "Test".into(),
        last_name: student_id.to_string(),
        email: format!("{}@example.com", student_id.to_lowercase()),
        phone_number: None,
        major: Some("Computer Science".into()),
        graduation_year: Some(2026),
    };
    students::insert(conn, &student).await.unwrap()
}

fn expense(club_id: i32, budget_id: i32, amount: f64, on: NaiveDate) -> NewExpense {
    NewExpense {
        club_id,
        budget_id,
        expense_name: "Workshop Materials".into(),
        expense_amount: amount,
        expense_date: on,
        description: None,
        category: ExpenseCategory::Supplies.as_str().to_string(),
    }
}

#[tokio::test]
#[ignore]
async fn club_round_trip_and_partial_update() {
    let conn = &mut connect().await;
    let club_id = new_club(conn, "Go Club").await;

    let club = clubs::find(conn, club_id).await.unwrap().unwrap();
    assert_eq!(club.club_name, "Go Club");
    assert_eq!(club.founded_date, Some(day(2020, 9, 1)));

    let changes = ClubChanges {
        faculty_advisor: Some("Dr. Lee".into()),
        ..Default::default()
    };
    let club = clubs::update(conn, club_id, &changes).await.unwrap().unwrap();
    assert_eq!(club.club_name, "Go Club");
    assert_eq!(club.faculty_advisor.as_deref(), Some("Dr. Lee"));
}

#[tokio::test]
#[ignore]
async fn deleting_a_club_removes_its_dependents() {
    let conn = &mut connect().await;
    let club_id = new_club(conn, "Doomed Club").await;
    let student = new_student(conn, "T100").await;
    members::insert(conn, club_id, &student.student_id, MembershipStatus::Active)
        .await
        .unwrap();

    let president = roles::list(conn)
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.role_name == "President")
        .unwrap();
    officers::insert(conn, club_id, &student.student_id, president.id)
        .await
        .unwrap();

    let event = events::insert(
        conn,
        &NewEvent {
            event_name: "Farewell".into(),
            event_description: None,
            event_date: day(2024, 12, 1),
            event_time: None,
            location: None,
            club_id,
        },
    )
    .await
    .unwrap();
    attendance::insert(conn, event.id, &student.student_id, AttendanceStatus::Present, None)
        .await
        .unwrap();

    let budget = budget::insert(conn, club_id, 2024, 1000.0).await.unwrap();
    expenses::insert(conn, &expense(club_id, budget.id, 50.0, day(2024, 11, 2)))
        .await
        .unwrap();

    let sponsor = sponsors::insert(
        conn,
        &NewSponsor {
            sponsor_name: "Doomed Sponsor".into(),
            contact_person: None,
            contact_email: None,
            phone_number: None,
            address: None,
        },
    )
    .await
    .unwrap();
    sponsors::insert_contribution(conn, sponsor.id, club_id, 250.0, day(2024, 10, 1))
        .await
        .unwrap();

    assert_eq!(clubs::delete_cascade(conn, club_id).await.unwrap(), 1);

    let counts: Vec<i64> = vec![
        schema::clubs::table
            .filter(schema::clubs::id.eq(club_id))
            .count()
            .get_result(conn)
            .await
            .unwrap(),
        schema::memberships::table
            .filter(schema::memberships::club_id.eq(club_id))
            .count()
            .get_result(conn)
            .await
            .unwrap(),
        schema::club_roles::table
            .filter(schema::club_roles::club_id.eq(club_id))
            .count()
            .get_result(conn)
            .await
            .unwrap(),
        schema::events::table
            .filter(schema::events::club_id.eq(club_id))
            .count()
            .get_result(conn)
            .await
            .unwrap(),
        schema::event_hostings::table
            .filter(schema::event_hostings::event_id.eq(event.id))
            .count()
            .get_result(conn)
            .await
            .unwrap(),
        schema::event_attendance::table
            .filter(schema::event_attendance::event_id.eq(event.id))
            .count()
            .get_result(conn)
            .await
            .unwrap(),
        schema::budgets::table
            .filter(schema::budgets::club_id.eq(club_id))
            .count()
            .get_result(conn)
            .await
            .unwrap(),
        schema::expenses::table
            .filter(schema::expenses::club_id.eq(club_id))
            .count()
            .get_result(conn)
            .await
            .unwrap(),
        schema::sponsorship_contributions::table
            .filter(schema::sponsorship_contributions::club_id.eq(club_id))
            .count()
            .get_result(conn)
            .await
            .unwrap(),
    ];
    assert!(counts.iter().all(|&n| n == 0), "leftover rows: {counts:?}");

    // Students and sponsors outlive the club.
    assert!(students::find(conn, "T100").await.unwrap().is_some());
    assert!(sponsors::find_by_name(conn, "Doomed Sponsor").await.unwrap().is_some());

    assert_eq!(clubs::delete_cascade(conn, club_id).await.unwrap(), 0);
}

#[tokio::test]
#[ignore]
async fn removing_a_member_drops_their_roles() {
    let conn = &mut connect().await;
    let club_id = new_club(conn, "Debate Club").await;
    let student = new_student(conn, "T200").await;
    members::insert(conn, club_id, &student.student_id, MembershipStatus::Active)
        .await
        .unwrap();
    let role = roles::list(conn).await.unwrap().remove(0);
    officers::insert(conn, club_id, &student.student_id, role.id)
        .await
        .unwrap();

    assert_eq!(members::delete(conn, club_id, "T200").await.unwrap(), 1);
    assert!(officers::list(conn, club_id).await.unwrap().is_empty());
    assert_eq!(members::delete(conn, club_id, "T200").await.unwrap(), 0);
}

#[tokio::test]
#[ignore]
async fn budget_remaining_subtracts_expenses_in_the_year() {
    let conn = &mut connect().await;
    let club_id = new_club(conn, "Budget Club").await;
    let row = budget::insert(conn, club_id, 2024, 5000.0).await.unwrap();
    expenses::insert(conn, &expense(club_id, row.id, 500.0, day(2024, 12, 5)))
        .await
        .unwrap();

    // Outside the fiscal year, so it does not count against 2024.
    let next = budget::insert(conn, club_id, 2025, 6000.0).await.unwrap();
    expenses::insert(conn, &expense(club_id, next.id, 400.0, day(2025, 1, 10)))
        .await
        .unwrap();

    let summary = budget::summary(conn, &row).await.unwrap();
    assert_eq!(summary.spent_amount, 500.0);
    assert_eq!(summary.remaining_amount, 4500.0);

    assert_eq!(budget::years(conn, club_id).await.unwrap(), vec![2025, 2024]);
}

#[tokio::test]
#[ignore]
async fn expense_search_filters_compose() {
    let conn = &mut connect().await;
    let club_id = new_club(conn, "Search Club").await;
    let row = budget::insert(conn, club_id, 2024, 5000.0).await.unwrap();
    expenses::insert(conn, &expense(club_id, row.id, 20.0, day(2024, 3, 1)))
        .await
        .unwrap();

    let found = expenses::search(
        conn,
        club_id,
        &ExpenseSearch {
            name: Some("workshop".into()),
            category: Some("supplies".into()),
            dates: fiscal_year_bounds(2024),
        },
    )
    .await
    .unwrap();
    assert_eq!(found.len(), 1);

    let none = expenses::search(
        conn,
        club_id,
        &ExpenseSearch {
            name: Some("100%".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
#[ignore]
async fn duplicate_membership_is_a_unique_violation() {
    let conn = &mut connect().await;
    let club_id = new_club(conn, "Unique Club").await;
    new_student(conn, "T300").await;
    members::insert(conn, club_id, "T300", MembershipStatus::Pending)
        .await
        .unwrap();
    assert!(members::find(conn, club_id, "T300").await.unwrap().is_some());

    // Aborts the surrounding transaction, so this has to come last.
    match members::insert(conn, club_id, "T300", MembershipStatus::Active).await {
        Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {}
        other => panic!("expected a unique violation, got {other:?}"),
    }
}

fn router() -> Router {
    let pool = connect_to_db(&database_url(), 2).unwrap();
    club_hub::app().layer(Extension(pool))
}

fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    format!("{prefix}{nanos}")
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn post_club(app: &Router, name: &str) -> Value {
    let (status, club) = send(
        app,
        Method::POST,
        "/api/clubs",
        Some(json!({
            "club_name": name,
            "club_description": "Weekly go games.",
            "founded_date": "2019-02-14",
            "contact_email": "go_club@example.com",
            "faculty_advisor": "Dr. Tanaka"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    club
}

async fn delete_club(app: &Router, club_id: i64) {
    let (status, _) = send(app, Method::DELETE, &format!("/api/clubs/{club_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn listed_club_keeps_every_field() {
    let app = router();
    let name = unique("Go Club ");
    let created = post_club(&app, &name).await;
    let club_id = created["club_id"].as_i64().unwrap();

    let (status, clubs) = send(&app, Method::GET, "/api/clubs", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = clubs
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["club_id"] == club_id)
        .cloned()
        .unwrap();
    assert_eq!(
        listed,
        json!({
            "club_id": club_id,
            "club_name": name,
            "club_description": "Weekly go games.",
            "founded_date": "2019-02-14",
            "contact_email": "go_club@example.com",
            "faculty_advisor": "Dr. Tanaka"
        })
    );

    delete_club(&app, club_id).await;
    let (status, _) = send(&app, Method::DELETE, &format!("/api/clubs/{club_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn adding_a_member_twice_keeps_one_membership() {
    let app = router();
    let club_id = post_club(&app, &unique("Member Club ")).await["club_id"]
        .as_i64()
        .unwrap();
    let student_id = unique("M");
    let member = json!({
        "student_id": student_id,
        "first_name": "Grace",
        "last_name": "Hopper",
        "email": format!("{}@example.com", student_id.to_lowercase()),
        "major": "Computer Science",
        "graduation_year": 2026
    });
    let uri = format!("/api/clubs/{club_id}/members");

    let (status, body) = send(&app, Method::POST, &uri, Some(member.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["active_status"], "Active");

    let (status, body) = send(&app, Method::POST, &uri, Some(member)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Member already exists in this club"}));

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let matching = body["members"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|m| m["student_id"] == student_id.as_str())
        .count();
    assert_eq!(matching, 1);

    delete_club(&app, club_id).await;
}

#[tokio::test]
#[ignore]
async fn second_budget_for_a_year_conflicts() {
    let app = router();
    let club_id = post_club(&app, &unique("Budget Club ")).await["club_id"]
        .as_i64()
        .unwrap();
    let uri = format!("/api/clubs/{club_id}/budget");
    let budget = json!({"fiscal_year": 2024, "total_budget": 5000.0});

    let (status, _) = send(&app, Method::POST, &uri, Some(budget.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, &uri, Some(budget)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"error": "Budget for this fiscal year already exists"}));

    let (status, body) = send(&app, Method::GET, &format!("{uri}?fiscal_year=2024"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["budget"]["total_budget"], 5000.0);
    assert_eq!(body["budget"]["remaining_amount"], 5000.0);

    delete_club(&app, club_id).await;
}
