//! # Trip Scheduler
//!
//! A trip pairs one bus with one route and repeats on a set of weekdays.
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌────────────────────────────────┐
//! │ Bus 12       │ + │ Dhaka-Sylhet │ + │ to 08:00 / from 17:30          │
//! └──────────────┘   └──────────────┘   │ Monday, Wednesday, Friday      │
//!                                       └────────────────────────────────┘
//!                                                      │
//!                                                      ▼
//!                                      Trip (consumed by booking flows)
//! ```
//!
//! A bus cannot run two active trips that leave at the same time of day on
//! a shared weekday; [`check_conflicts`] enforces this.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};

// =============================================================================
// Weekday
// =============================================================================

/// Day of the week a trip runs, serialized by its English name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// De-duplicates and puts weekdays in calendar order (Monday first).
pub fn normalize_days(days: &[Weekday]) -> Vec<Weekday> {
    let mut days = days.to_vec();
    days.sort();
    days.dedup();
    days
}

// =============================================================================
// Trip
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TripStatus {
    #[default]
    Active,
    Inactive,
    Cancelled,
}

/// Outbound (`to`) and return (`from`) departure timestamps.
///
/// Only the time of day matters for recurrence; the date part records when
/// the schedule was first set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DepartureTimes {
    #[ts(as = "String")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "departure_to"))]
    pub to: DateTime<Utc>,
    #[ts(as = "String")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "departure_from"))]
    pub from: DateTime<Utc>,
}

impl DepartureTimes {
    pub fn outbound_time(&self) -> NaiveTime {
        self.to.time()
    }

    pub fn return_time(&self) -> NaiveTime {
        self.from.time()
    }
}

/// A scheduled recurring bus departure.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Trip {
    pub id: String,
    pub company_id: String,
    pub trip_name: String,
    pub bus_id: String,
    pub bus_name: String,
    pub route_id: String,
    pub route_name: String,
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub departure_times: DepartureTimes,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub days_of_week: Vec<Weekday>,
    pub status: TripStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    pub fn is_active(&self) -> bool {
        self.status == TripStatus::Active
    }

    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.days_of_week.contains(&Weekday::of(date))
    }

    /// The first outbound departure strictly after `after`.
    ///
    /// Returns `None` for inactive trips or an empty weekday set.
    pub fn next_departure(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if !self.is_active() || self.days_of_week.is_empty() {
            return None;
        }

        let time = self.departure_times.outbound_time();
        (0..=7)
            .map(|offset| after.date_naive() + Duration::days(offset))
            .filter(|date| self.runs_on(*date))
            .map(|date| date.and_time(time).and_utc())
            .find(|candidate| *candidate > after)
    }

    fn shared_days(&self, other: &Trip) -> Vec<Weekday> {
        self.days_of_week
            .iter()
            .filter(|day| other.days_of_week.contains(day))
            .copied()
            .collect()
    }
}

// =============================================================================
// Validation & Conflicts
// =============================================================================

/// Checks the fields every trip needs before it can be saved.
///
/// Missing fields are reported together.
pub fn validate_schedule(
    bus_id: &str,
    route_id: &str,
    days: &[Weekday],
) -> Result<(), ValidationError> {
    let mut missing = Vec::new();
    if bus_id.trim().is_empty() {
        missing.push("busId".to_string());
    }
    if route_id.trim().is_empty() {
        missing.push("routeId".to_string());
    }
    if days.is_empty() {
        missing.push("daysOfWeek".to_string());
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields { fields: missing })
    }
}

/// Rejects `candidate` if its bus already runs another active trip leaving
/// at the same time of day on a shared weekday.
///
/// Trips with the same id as the candidate are ignored, so an update does
/// not conflict with its own stored version.
pub fn check_conflicts(candidate: &Trip, existing: &[Trip]) -> CoreResult<()> {
    if !candidate.is_active() {
        return Ok(());
    }

    let outbound = truncate_to_minute(candidate.departure_times.outbound_time());

    for other in existing {
        if other.id == candidate.id || other.bus_id != candidate.bus_id || !other.is_active() {
            continue;
        }
        if truncate_to_minute(other.departure_times.outbound_time()) != outbound {
            continue;
        }

        let days = candidate.shared_days(other);
        if !days.is_empty() {
            return Err(CoreError::ScheduleConflict {
                bus_id: candidate.bus_id.clone(),
                trip_name: other.trip_name.clone(),
                days,
            });
        }
    }

    Ok(())
}

fn truncate_to_minute(time: NaiveTime) -> (u32, u32) {
    (time.hour(), time.minute())
}

// =============================================================================
// Unit Tests
// =============================================================================
