//! # Fares
//!
//! Fares are keyed by a route name composed from two known stops. Every
//! response carries the derived `discountedAmount`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use busdesk_core::validation::{
    validate_currency, validate_discount_percent, validate_fare_amount, RequiredFields,
};
use busdesk_core::{Fare, FareQuote, FareStatus, Money, DEFAULT_CURRENCY};

use crate::auth::CompanyScope;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::AppState;

/// Body for create and update. On update, absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub fare_amount: Option<f64>,
    pub currency: Option<String>,
    pub discount_percent: Option<f64>,
    pub status: Option<FareStatus>,
}

pub async fn list_fares(
    State(state): State<AppState>,
    scope: CompanyScope,
) -> ApiResult<Json<Value>> {
    let fares: Vec<FareQuote> = state
        .db
        .fares()
        .list(&scope.company_id)
        .await?
        .into_iter()
        .map(FareQuote::from)
        .collect();

    Ok(Json(json!({ "success": true, "fares": fares })))
}

pub async fn get_fare(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Value>> {
    let fare = load_fare(&state, &scope, &id).await?;
    Ok(Json(json!({ "success": true, "fare": FareQuote::from(fare) })))
}

pub async fn create_fare(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiJson(body): ApiJson<FareRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut required = RequiredFields::default();
    let origin = required.text("origin", body.origin);
    let destination = required.text("destination", body.destination);
    let fare_amount = required.take("fareAmount", body.fare_amount);

    let (Some(origin), Some(destination), Some(fare_amount)) = (origin, destination, fare_amount)
    else {
        return Err(required.into_error().into());
    };

    let fare_amount = Money::from_decimal(fare_amount);
    validate_fare_amount(fare_amount)?;
    let discount_percent = body.discount_percent.unwrap_or(0.0);
    validate_discount_percent(discount_percent)?;
    let currency = match body.currency {
        Some(code) => validate_currency(&code)?,
        None => DEFAULT_CURRENCY.to_string(),
    };

    let directory = state.db.stops().directory(&scope.company_id).await?;
    let route_name = directory.resolve(&origin, &destination)?;

    let now = Utc::now();
    let fare = Fare {
        id: Uuid::new_v4().to_string(),
        company_id: scope.company_id.clone(),
        route_name,
        origin,
        destination,
        fare_amount,
        currency,
        discount_percent,
        status: body.status.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    let fare = state.db.fares().insert(&fare).await?;
    info!(company_id = %scope.company_id, route_name = %fare.route_name, "Created fare");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "fare": FareQuote::from(fare) })),
    ))
}

pub async fn update_fare(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<FareRequest>,
) -> ApiResult<Json<Value>> {
    let mut fare = load_fare(&state, &scope, &id).await?;

    if body.origin.is_some() || body.destination.is_some() {
        let origin = body.origin.unwrap_or_else(|| fare.origin.clone());
        let destination = body.destination.unwrap_or_else(|| fare.destination.clone());

        let directory = state.db.stops().directory(&scope.company_id).await?;
        fare.route_name = directory.resolve(&origin, &destination)?;
        fare.origin = origin.trim().to_string();
        fare.destination = destination.trim().to_string();
    }
    if let Some(amount) = body.fare_amount {
        let amount = Money::from_decimal(amount);
        validate_fare_amount(amount)?;
        fare.fare_amount = amount;
    }
    if let Some(pct) = body.discount_percent {
        validate_discount_percent(pct)?;
        fare.discount_percent = pct;
    }
    if let Some(code) = body.currency {
        fare.currency = validate_currency(&code)?;
    }
    if let Some(status) = body.status {
        fare.status = status;
    }
    fare.updated_at = Utc::now();

    state.db.fares().update(&fare).await?;
    info!(id = %fare.id, "Updated fare");

    Ok(Json(json!({ "success": true, "fare": FareQuote::from(fare) })))
}

pub async fn delete_fare(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Value>> {
    state.db.fares().delete(&scope.company_id, &id).await?;
    info!(id = %id, "Deleted fare");
    Ok(Json(json!({ "success": true })))
}

async fn load_fare(state: &AppState, scope: &CompanyScope, id: &str) -> ApiResult<Fare> {
    state
        .db
        .fares()
        .get_by_id(&scope.company_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Fare", id))
}
