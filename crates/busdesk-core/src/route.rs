//! # Stops and Routes
//!
//! Stops are referenced by name, not id, when a route name is composed.
//! There is no foreign key between a fare or route and its stops, so the
//! resolver is the only place that checks the names exist.
//!
//! ```text
//! origin "Dhaka" ──┐
//!                  ├──► StopDirectory::resolve ──► "Dhaka - Sylhet"
//! dest  "Sylhet" ──┘          │
//!                             └──► CoreError::UnknownStop { names }
//! ```

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Separator between origin and destination in a route name.
pub const ROUTE_NAME_SEPARATOR: &str = " - ";

// =============================================================================
// Stop
// =============================================================================

/// A place a bus picks up or drops off passengers.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Stop {
    pub id: String,
    pub company_id: String,
    pub name: String,
    /// Free-form kind: "terminal", "counter", "roadside", ...
    #[serde(rename = "type")]
    pub stop_type: String,
    pub district: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Route
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RouteStatus {
    #[default]
    Active,
    Inactive,
}

/// An ordered path from origin to destination through intermediate stops.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Route {
    pub id: String,
    pub company_id: String,
    pub route_name: String,
    pub origin: String,
    pub destination: String,
    /// Intermediate stop names, in travel order.
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub stops: Vec<String>,
    pub distance_km: Option<f64>,
    pub status: RouteStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Route {
    /// Origin, intermediate stops and destination in travel order.
    pub fn path(&self) -> Vec<&str> {
        std::iter::once(self.origin.as_str())
            .chain(self.stops.iter().map(String::as_str))
            .chain(std::iter::once(self.destination.as_str()))
            .collect()
    }
}

/// Formats a route name without checking the stops exist.
pub fn format_route_name(origin: &str, destination: &str) -> String {
    format!("{}{}{}", origin.trim(), ROUTE_NAME_SEPARATOR, destination.trim())
}

// =============================================================================
// Stop Directory (resolver)
// =============================================================================

/// The set of stop names known for one company.
#[derive(Debug, Clone, Default)]
pub struct StopDirectory {
    names: HashSet<String>,
}

impl StopDirectory {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopDirectory {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_stops(stops: &[Stop]) -> Self {
        StopDirectory::new(stops.iter().map(|s| s.name.clone()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name.trim())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Produces `"{origin} - {destination}"` when both names are known stops.
    ///
    /// ## Errors
    /// - `UnknownStop` listing every name that did not resolve
    /// - `SameOriginDestination` when both names are the same stop
    pub fn resolve(&self, origin: &str, destination: &str) -> CoreResult<String> {
        let unknown: Vec<String> = [origin, destination]
            .iter()
            .filter(|name| !self.contains(name))
            .map(|name| name.trim().to_string())
            .collect();

        if !unknown.is_empty() {
            return Err(CoreError::UnknownStop { names: unknown });
        }

        if origin.trim() == destination.trim() {
            return Err(CoreError::SameOriginDestination(origin.trim().to_string()));
        }

        Ok(format_route_name(origin, destination))
    }

    /// Like [`StopDirectory::resolve`] but suppresses failures, for form
    /// previews that show nothing until both stops are picked.
    pub fn route_name(&self, origin: &str, destination: &str) -> Option<String> {
        self.resolve(origin, destination).ok()
    }

    /// Checks that every intermediate stop of a route is known.
    pub fn check_all<'a, I>(&self, names: I) -> CoreResult<()>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let unknown: Vec<String> = names
            .into_iter()
            .filter(|name| !self.contains(name))
            .cloned()
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(CoreError::UnknownStop { names: unknown })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> StopDirectory {
        StopDirectory::new(["Dhaka", "Sylhet", "Comilla", "Chittagong"])
    }

    #[test]
    fn test_known_pair_produces_route_name() {
        let dir = directory();
        assert_eq!(dir.resolve("Dhaka", "Sylhet").unwrap(), "Dhaka - Sylhet");
        assert_eq!(
            dir.route_name("Chittagong", "Comilla").as_deref(),
            Some("Chittagong - Comilla")
        );
    }

    #[test]
    fn test_unknown_name_is_an_explicit_error() {
        let dir = directory();
        match dir.resolve("Dhaka", "Khulna") {
            Err(CoreError::UnknownStop { names }) => assert_eq!(names, vec!["Khulna"]),
            other => panic!("expected UnknownStop, got {other:?}"),
        }

        match dir.resolve("Rajshahi", "Khulna") {
            Err(CoreError::UnknownStop { names }) => {
                assert_eq!(names, vec!["Rajshahi", "Khulna"])
            }
            other => panic!("expected UnknownStop, got {other:?}"),
        }
    }

    #[test]
    fn test_suppressed_variant_returns_none_for_unknown() {
        let dir = directory();
        assert_eq!(dir.route_name("Dhaka", "Khulna"), None);
        assert_eq!(dir.route_name("", "Sylhet"), None);
        assert_eq!(StopDirectory::default().route_name("Dhaka", "Sylhet"), None);
    }

    #[test]
    fn test_same_origin_and_destination_rejected() {
        let dir = directory();
        assert!(matches!(
            dir.resolve("Dhaka", "Dhaka"),
            Err(CoreError::SameOriginDestination(_))
        ));
    }

    #[test]
    fn test_names_are_trimmed() {
        let dir = directory();
        assert_eq!(dir.resolve(" Dhaka ", "Sylhet ").unwrap(), "Dhaka - Sylhet");
    }

    #[test]
    fn test_route_path() {
        let now = Utc::now();
        let route = Route {
            id: "r-1".to_string(),
            company_id: "c-1".to_string(),
            route_name: "Dhaka - Chittagong".to_string(),
            origin: "Dhaka".to_string(),
            destination: "Chittagong".to_string(),
            stops: vec!["Comilla".to_string()],
            distance_km: Some(244.0),
            status: RouteStatus::Active,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(route.path(), vec!["Dhaka", "Comilla", "Chittagong"]);
    }
}
