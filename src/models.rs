use crate::schema::*;
use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use serde::Serialize;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Queryable, Serialize)]
pub struct Club {
    #[serde(rename = "club_id")]
    pub id: i32,
    pub club_name: String,
    pub club_description: Option<String>,
    pub founded_date: Option<NaiveDate>,
    pub contact_email: String,
    pub faculty_advisor: Option<String>,
}

#[derive(Debug, Clone, Queryable, Insertable, Serialize)]
pub struct Student {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub major: Option<String>,
    pub graduation_year: Option<i32>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Queryable)]
pub struct Membership {
    pub id: i32,
    pub club_id: i32,
    pub student_id: String,
    pub active_status: String,
}

#[derive(Debug, Clone, Queryable, Serialize)]
pub struct Role {
    #[serde(rename = "role_id")]
    pub id: i32,
    pub role_name: String,
    pub role_description: Option<String>,
}

#[derive(Debug, Clone, Queryable)]
pub struct ClubRole {
    pub id: i32,
    pub club_id: i32,
    pub student_id: String,
    pub role_id: i32,
}

#[derive(Debug, Clone, Queryable, Serialize)]
pub struct Event {
    #[serde(rename = "event_id")]
    pub id: i32,
    pub event_name: String,
    pub event_description: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub club_id: i32,
}

#[derive(Debug, Clone, Queryable)]
pub struct EventAttendance {
    pub id: i32,
    pub event_id: i32,
    pub student_id: String,
    pub attendance_status: String,
    pub check_in_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Queryable)]
pub struct Budget {
    pub id: i32,
    pub club_id: i32,
    pub fiscal_year: i32,
    pub total_budget: f64,
}

#[derive(Debug, Clone, Queryable, Serialize)]
pub struct Expense {
    #[serde(rename = "expense_id")]
    pub id: i32,
    pub club_id: i32,
    pub budget_id: i32,
    pub expense_name: String,
    pub expense_amount: f64,
    pub expense_date: NaiveDate,
    pub description: Option<String>,
    pub category: String,
}

#[derive(Debug, Clone, Queryable, Serialize)]
pub struct Sponsor {
    #[serde(rename = "sponsor_id")]
    pub id: i32,
    pub sponsor_name: String,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Queryable)]
pub struct SponsorshipContribution {
    pub id: i32,
    pub sponsor_id: i32,
    pub club_id: i32,
    pub contribution_amount: f64,
    pub contribution_date: NaiveDate,
}

/// Returned when a status or category string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use itertools::Itertools;
        write!(
            f,
            "invalid {} '{}', expected one of: {}",
            self.field,
            self.value,
            self.expected.iter().join(", ")
        )
    }
}

impl std::error::Error for UnknownVariant {}

// Stored as plain text columns; the enum only guards what gets written.
macro_rules! text_enum {
    ($(#[$attr:meta])* $name:ident, $field:literal, { $($(#[$vattr:meta])* $variant:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
        $(#[$attr])*
        pub enum $name {
            $($(#[$vattr])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            const NAMES: &'static [&'static str] = &[$(stringify!($variant)),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| UnknownVariant {
                        field: $field,
                        value: s.to_string(),
                        expected: $name::NAMES,
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(
    #[derive(Default)]
    MembershipStatus,
    "active_status",
    { #[default] Active, Inactive, Pending }
);
text_enum!(AttendanceStatus, "attendance_status", { Present, Absent });
text_enum!(
    #[derive(Default)]
    ExpenseCategory,
    "category",
    { Event, Supplies, Travel, Food, #[default] Other }
);
