//! Stops: the names fares and routes are checked against.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use busdesk_core::validation::{validate_name, RequiredFields};
use busdesk_core::{Stop, MAX_NAME_LENGTH};

use crate::auth::CompanyScope;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StopRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub stop_type: Option<String>,
    pub district: Option<String>,
}

pub async fn list_stops(
    State(state): State<AppState>,
    scope: CompanyScope,
) -> ApiResult<Json<Value>> {
    let stops = state.db.stops().list(&scope.company_id).await?;
    Ok(Json(json!({ "success": true, "stops": stops })))
}

pub async fn create_stop(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiJson(body): ApiJson<StopRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut required = RequiredFields::default();
    let name = required.text("name", body.name);
    let stop_type = required.text("type", body.stop_type);
    let district = required.text("district", body.district);

    let (Some(name), Some(stop_type), Some(district)) = (name, stop_type, district) else {
        return Err(required.into_error().into());
    };

    let now = Utc::now();
    let stop = Stop {
        id: Uuid::new_v4().to_string(),
        company_id: scope.company_id.clone(),
        name: validate_name("name", &name, MAX_NAME_LENGTH)?,
        stop_type,
        district,
        created_at: now,
        updated_at: now,
    };

    let stop = state.db.stops().insert(&stop).await?;
    info!(company_id = %scope.company_id, name = %stop.name, "Created stop");

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "stop": stop }))))
}

pub async fn update_stop(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<StopRequest>,
) -> ApiResult<Json<Value>> {
    let mut stop = state
        .db
        .stops()
        .get_by_id(&scope.company_id, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stop", &id))?;

    if let Some(name) = body.name {
        stop.name = validate_name("name", &name, MAX_NAME_LENGTH)?;
    }
    if let Some(stop_type) = body.stop_type {
        stop.stop_type = validate_name("type", &stop_type, MAX_NAME_LENGTH)?;
    }
    if let Some(district) = body.district {
        stop.district = validate_name("district", &district, MAX_NAME_LENGTH)?;
    }
    stop.updated_at = Utc::now();

    state.db.stops().update(&stop).await?;
    info!(id = %stop.id, "Updated stop");

    Ok(Json(json!({ "success": true, "stop": stop })))
}

pub async fn delete_stop(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Value>> {
    state.db.stops().delete(&scope.company_id, &id).await?;
    info!(id = %id, "Deleted stop");
    Ok(Json(json!({ "success": true })))
}
