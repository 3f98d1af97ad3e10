//! Loads a small, deterministic sample dataset into an empty database.
//!
//! Run after `diesel migration run`. Does nothing if any club already exists.

use anyhow::{anyhow, Context};
use chrono::{NaiveDate, NaiveTime};
use club_hub::{
    config::Config,
    connect_to_db,
    models::{AttendanceStatus, ExpenseCategory, MembershipStatus, Student},
    repo::{
        attendance, budget, clubs,
        clubs::NewClub,
        events::{self, NewEvent},
        expenses::{self, NewExpense},
        members, officers, roles,
        sponsors::{self, NewSponsor},
        students,
    },
};
use diesel_async::{pg::AsyncPgConnection, AsyncConnection};
use scoped_futures::ScopedFutureExt;
use tracing_subscriber::{fmt, EnvFilter};

const CLUBS: &[(&str, &str, &str, &str, &str)] = &[
    ("AI Club", "Focuses on AI projects.", "2015-03-01", "ai_club@example.com", "Dr. Smith"),
    ("Robotics Club", "Design and build robots.", "2010-09-15", "robotics_club@example.com", "Dr. Johnson"),
    ("Chess Club", "For chess enthusiasts.", "2018-01-20", "chess_club@example.com", "Dr. Lee"),
];

const STUDENTS: &[(&str, &str, &str, &str, &str, i32)] = &[
    ("S001", "Alice", "Johnson", "123-456-7890", "Computer Science", 2025),
    ("S002", "Bob", "Smith", "234-567-8901", "Mechanical Engineering", 2024),
    ("S003", "Charlie", "Brown", "345-678-9012", "Mathematics", 2026),
    ("S004", "Diana", "Prince", "456-789-0123", "Physics", 2025),
    ("S005", "Eve", "Polastri", "567-890-1234", "Biology", 2024),
    ("S006", "Frank", "Castle", "678-901-2345", "Civil Engineering", 2025),
];

// (club, student, status)
const MEMBERSHIPS: &[(usize, &str, MembershipStatus)] = &[
    (0, "S001", MembershipStatus::Active),
    (1, "S002", MembershipStatus::Active),
    (2, "S003", MembershipStatus::Inactive),
    (0, "S004", MembershipStatus::Active),
    (1, "S005", MembershipStatus::Pending),
    (2, "S006", MembershipStatus::Active),
];

// (club, student, role name)
const OFFICERS: &[(usize, &str, &str)] = &[
    (0, "S001", "President"),
    (1, "S002", "Treasurer"),
    (2, "S003", "Secretary"),
    (0, "S004", "Secretary"),
    (1, "S005", "President"),
    (2, "S006", "Treasurer"),
];

const EVENTS: &[(&str, &str, &str, &str, &str, usize)] = &[
    ("AI Workshop", "Introduction to machine learning.", "2024-12-10", "10:00:00", "Room 101", 0),
    ("Robotics Competition", "Annual robotics contest.", "2024-12-15", "09:00:00", "Main Hall", 1),
    ("Chess Tournament", "Open chess competition.", "2024-12-20", "13:00:00", "Library", 2),
    ("AI Club Meet & Greet", "Networking event for AI enthusiasts.", "2024-11-01", "17:00:00", "Cafeteria", 0),
    ("Robotics Club Hackathon", "Building robotic solutions in 24 hours.", "2024-12-01", "08:00:00", "Engineering Hall", 1),
    ("Chess Blitz", "Quick matches and strategy sessions.", "2024-11-25", "15:00:00", "Game Room", 2),
];

// (event, student, status, check-in)
const ATTENDANCE: &[(usize, &str, AttendanceStatus, Option<&str>)] = &[
    (0, "S001", AttendanceStatus::Present, Some("09:45:00")),
    (0, "S004", AttendanceStatus::Absent, None),
    (1, "S002", AttendanceStatus::Present, Some("08:50:00")),
    (1, "S005", AttendanceStatus::Present, Some("09:00:00")),
    (2, "S003", AttendanceStatus::Present, Some("12:55:00")),
    (2, "S006", AttendanceStatus::Absent, None),
];

const BUDGETS: &[(usize, i32, f64)] = &[
    (0, 2024, 5000.0),
    (1, 2024, 7000.0),
    (2, 2024, 2000.0),
    (0, 2025, 6000.0),
    (0, 2026, 6500.0),
    (1, 2025, 8000.0),
    (1, 2026, 8500.0),
    (2, 2025, 2500.0),
    (2, 2026, 3000.0),
];

// (budget, name, date, amount, description, category)
const EXPENSES: &[(usize, &str, &str, f64, &str, ExpenseCategory)] = &[
    (0, "Workshop Materials", "2024-12-05", 500.0, "Materials for AI workshop.", ExpenseCategory::Supplies),
    (1, "Robot Parts", "2024-12-01", 2000.0, "Parts for competition.", ExpenseCategory::Supplies),
    (2, "Trophies", "2024-12-10", 150.0, "Chess trophies.", ExpenseCategory::Event),
    (3, "AI Workshop Materials", "2025-01-10", 400.0, "Materials for workshop.", ExpenseCategory::Supplies),
    (3, "Conference Tickets", "2025-03-15", 1500.0, "Tickets for AI conference.", ExpenseCategory::Event),
    (4, "Server Subscription", "2026-02-20", 800.0, "Cloud server subscription.", ExpenseCategory::Other),
    (4, "AI Meet-up Catering", "2026-05-10", 600.0, "Catering for meet-up.", ExpenseCategory::Food),
    (5, "Robot Hardware", "2025-01-25", 2000.0, "Hardware for robot build.", ExpenseCategory::Supplies),
    (5, "Competition Registration", "2025-06-30", 500.0, "Registration fee.", ExpenseCategory::Event),
    (6, "Software Licenses", "2026-03-10", 1200.0, "Licenses for simulation tools.", ExpenseCategory::Supplies),
    (6, "Team Jerseys", "2026-04-15", 400.0, "Jerseys for competition.", ExpenseCategory::Other),
    (7, "Tournament Prizes", "2025-02-05", 300.0, "Prizes for chess tournament.", ExpenseCategory::Event),
    (7, "Chess Boards", "2025-08-10", 200.0, "New chess boards.", ExpenseCategory::Supplies),
    (8, "Coaching Sessions", "2026-01-20", 600.0, "Sessions with a grandmaster.", ExpenseCategory::Event),
    (8, "Event Snacks", "2026-03-15", 150.0, "Snacks for attendees.", ExpenseCategory::Food),
];

const SPONSORS: &[(&str, &str, &str, &str, &str)] = &[
    ("TechCorp", "Emily Davis", "emily.davis@techcorp.com", "456-789-0123", "123 Tech Street"),
    ("Innovate Inc.", "Michael Green", "michael.green@innovate.com", "567-890-1234", "456 Innovate Ave"),
];

// (sponsor, club, amount, date)
const CONTRIBUTIONS: &[(usize, usize, f64, &str)] = &[
    (0, 0, 2000.0, "2024-11-01"),
    (1, 1, 3000.0, "2024-11-15"),
];

fn date(s: &str) -> anyhow::Result<NaiveDate> {
    s.parse::<NaiveDate>().with_context(|| format!("bad date {s}"))
}

fn time(s: &str) -> anyhow::Result<NaiveTime> {
    s.parse::<NaiveTime>().with_context(|| format!("bad time {s}"))
}

async fn seed(conn: &mut AsyncPgConnection) -> anyhow::Result<()> {
    let mut club_ids = Vec::with_capacity(CLUBS.len());
    for &(name, description, founded, email, advisor) in CLUBS {
        let club = NewClub {
            club_name: name.to_string(),
            club_description: Some(description.to_string()),
            founded_date: Some(date(founded)?),
            contact_email: email.to_string(),
            faculty_advisor: Some(advisor.to_string()),
        };
        club_ids.push(clubs::insert(conn, &club).await?.id);
    }

    for &(student_id, first, last, phone, major, year) in STUDENTS {
        let student = Student {
            student_id: student_id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
            phone_number: Some(phone.to_string()),
            major: Some(major.to_string()),
            graduation_year: Some(year),
        };
        students::insert(conn, &student).await?;
    }

    for &(club, student_id, status) in MEMBERSHIPS {
        members::insert(conn, club_ids[club], student_id, status).await?;
    }

    let known_roles = roles::list(conn).await?;
    for &(club, student_id, role_name) in OFFICERS {
        let role = known_roles
            .iter()
            .find(|r| r.role_name == role_name)
            .ok_or_else(|| anyhow!("role {role_name} is missing; run the migrations first"))?;
        officers::insert(conn, club_ids[club], student_id, role.id).await?;
    }

    let mut event_ids = Vec::with_capacity(EVENTS.len());
    for &(name, description, on, at, location, club) in EVENTS {
        let event = NewEvent {
            event_name: name.to_string(),
            event_description: Some(description.to_string()),
            event_date: date(on)?,
            event_time: Some(time(at)?),
            location: Some(location.to_string()),
            club_id: club_ids[club],
        };
        event_ids.push(events::insert(conn, &event).await?.id);
    }

    for &(event, student_id, status, check_in) in ATTENDANCE {
        let check_in = check_in.map(time).transpose()?;
        attendance::insert(conn, event_ids[event], student_id, status, check_in).await?;
    }

    let mut budgets = Vec::with_capacity(BUDGETS.len());
    for &(club, year, total) in BUDGETS {
        budgets.push(budget::insert(conn, club_ids[club], year, total).await?);
    }

    for &(budget, name, on, amount, description, category) in EXPENSES {
        let budget = &budgets[budget];
        let expense = NewExpense {
            club_id: budget.club_id,
            budget_id: budget.id,
            expense_name: name.to_string(),
            expense_amount: amount,
            expense_date: date(on)?,
            description: Some(description.to_string()),
            category: category.as_str().to_string(),
        };
        expenses::insert(conn, &expense).await?;
    }

    let mut sponsor_ids = Vec::with_capacity(SPONSORS.len());
    for &(name, person, email, phone, address) in SPONSORS {
        let sponsor = NewSponsor {
            sponsor_name: name.to_string(),
            contact_person: Some(person.to_string()),
            contact_email: Some(email.to_string()),
            phone_number: Some(phone.to_string()),
            address: Some(address.to_string()),
        };
        sponsor_ids.push(sponsors::insert(conn, &sponsor).await?.id);
    }

    for &(sponsor, club, amount, on) in CONTRIBUTIONS {
        sponsors::insert_contribution(conn, sponsor_ids[sponsor], club_ids[club], amount, date(on)?)
            .await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::load().context("failed to read configuration")?;
    let pool = connect_to_db(&config.db_url, 1)?;
    let conn = &mut pool.get().await?;

    if !clubs::list(conn).await?.is_empty() {
        tracing::info!("database already has clubs, skipping seed");
        return Ok(());
    }

    conn.transaction::<_, anyhow::Error, _>(|conn| seed(conn).scope_boxed())
        .await?;
    tracing::info!(
        clubs = CLUBS.len(),
        students = STUDENTS.len(),
        events = EVENTS.len(),
        expenses = EXPENSES.len(),
        "seeded sample data"
    );

    Ok(())
}
