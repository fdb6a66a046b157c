//! # Trips
//!
//! Create and update both run the double-booking check against the bus's
//! other active trips before writing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use busdesk_core::trip::{check_conflicts, normalize_days, validate_schedule};
use busdesk_core::validation::{validate_name, RequiredFields};
use busdesk_core::{
    DepartureTimes, Route, Trip, TripStatus, ValidationError, Weekday, MAX_NAME_LENGTH,
};

use crate::auth::CompanyScope;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::AppState;

/// Body for create and update. On update, absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub trip_name: Option<String>,
    pub bus_id: Option<String>,
    pub bus_name: Option<String>,
    pub route_id: Option<String>,
    pub departure_times: Option<DepartureTimes>,
    pub days_of_week: Option<Vec<Weekday>>,
    pub status: Option<TripStatus>,
}

pub async fn list_trips(
    State(state): State<AppState>,
    scope: CompanyScope,
) -> ApiResult<Json<Value>> {
    let trips = state.db.trips().list(&scope.company_id).await?;
    Ok(Json(json!({ "success": true, "trips": trips })))
}

pub async fn get_trip(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Value>> {
    let trip = load_trip(&state, &scope, &id).await?;
    let next_departure = trip.next_departure(Utc::now());
    Ok(Json(json!({
        "success": true,
        "trip": trip,
        "nextDeparture": next_departure,
    })))
}

pub async fn create_trip(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiJson(body): ApiJson<TripRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut required = RequiredFields::default();
    let trip_name = required.text("tripName", body.trip_name);
    let bus_name = required.text("busName", body.bus_name);
    let departure_times = required.take("departureTimes", body.departure_times);

    let bus_id = body.bus_id.unwrap_or_default().trim().to_string();
    let route_id = body.route_id.unwrap_or_default().trim().to_string();
    let days = normalize_days(&body.days_of_week.unwrap_or_default());

    // Report every missing field at once, including the schedule ones
    let mut missing = required.missing().to_vec();
    if let Err(err) = validate_schedule(&bus_id, &route_id, &days) {
        missing.extend(err.fields());
    }

    let (Some(trip_name), Some(bus_name), Some(departure_times), true) =
        (trip_name, bus_name, departure_times, missing.is_empty())
    else {
        return Err(ValidationError::MissingFields { fields: missing }.into());
    };

    let trip_name = validate_name("tripName", &trip_name, MAX_NAME_LENGTH)?;
    let bus_name = validate_name("busName", &bus_name, MAX_NAME_LENGTH)?;
    let route = load_route(&state, &scope, &route_id).await?;

    let now = Utc::now();
    let trip = Trip {
        id: Uuid::new_v4().to_string(),
        company_id: scope.company_id.clone(),
        trip_name,
        bus_id,
        bus_name,
        route_id: route.id,
        route_name: route.route_name,
        departure_times,
        days_of_week: days,
        status: body.status.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    let existing = state
        .db
        .trips()
        .active_for_bus(&scope.company_id, &trip.bus_id)
        .await?;
    check_conflicts(&trip, &existing)?;

    let trip = state.db.trips().insert(&trip).await?;
    info!(
        company_id = %scope.company_id,
        trip_name = %trip.trip_name,
        bus_id = %trip.bus_id,
        "Created trip"
    );

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "trip": trip }))))
}

pub async fn update_trip(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<TripRequest>,
) -> ApiResult<Json<Value>> {
    let mut trip = load_trip(&state, &scope, &id).await?;

    if let Some(name) = body.trip_name {
        trip.trip_name = validate_name("tripName", &name, MAX_NAME_LENGTH)?;
    }
    if let Some(name) = body.bus_name {
        trip.bus_name = validate_name("busName", &name, MAX_NAME_LENGTH)?;
    }
    if let Some(bus_id) = body.bus_id {
        trip.bus_id = bus_id.trim().to_string();
    }
    if let Some(route_id) = body.route_id {
        let route_id = route_id.trim();
        if route_id != trip.route_id {
            let route = load_route(&state, &scope, route_id).await?;
            trip.route_id = route.id;
            trip.route_name = route.route_name;
        }
    }
    if let Some(times) = body.departure_times {
        trip.departure_times = times;
    }
    if let Some(days) = body.days_of_week {
        trip.days_of_week = normalize_days(&days);
    }
    if let Some(status) = body.status {
        trip.status = status;
    }
    validate_schedule(&trip.bus_id, &trip.route_id, &trip.days_of_week)?;

    let existing = state
        .db
        .trips()
        .active_for_bus(&scope.company_id, &trip.bus_id)
        .await?;
    check_conflicts(&trip, &existing)?;

    trip.updated_at = Utc::now();
    state.db.trips().update(&trip).await?;
    info!(id = %trip.id, "Updated trip");

    Ok(Json(json!({ "success": true, "trip": trip })))
}

pub async fn delete_trip(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Value>> {
    state.db.trips().delete(&scope.company_id, &id).await?;
    info!(id = %id, "Deleted trip");
    Ok(Json(json!({ "success": true })))
}

async fn load_trip(state: &AppState, scope: &CompanyScope, id: &str) -> ApiResult<Trip> {
    state
        .db
        .trips()
        .get_by_id(&scope.company_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Trip", id))
}

async fn load_route(state: &AppState, scope: &CompanyScope, id: &str) -> ApiResult<Route> {
    state
        .db
        .routes()
        .get_by_id(&scope.company_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Route", id))
}
