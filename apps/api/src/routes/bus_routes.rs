//! Routes: an origin, a destination and the stops between them, all of
//! which must be known stops.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use busdesk_core::validation::{validate_distance_km, RequiredFields};
use busdesk_core::{Route, RouteStatus};

use crate::auth::CompanyScope;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub stops: Option<Vec<String>>,
    pub distance_km: Option<f64>,
    pub status: Option<RouteStatus>,
}

pub async fn list_routes(
    State(state): State<AppState>,
    scope: CompanyScope,
) -> ApiResult<Json<Value>> {
    let routes = state.db.routes().list(&scope.company_id).await?;
    Ok(Json(json!({ "success": true, "routes": routes })))
}

pub async fn get_route(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Value>> {
    let route = state
        .db
        .routes()
        .get_by_id(&scope.company_id, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Route", &id))?;

    Ok(Json(json!({ "success": true, "path": route.path(), "route": route })))
}

pub async fn create_route(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiJson(body): ApiJson<RouteRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut required = RequiredFields::default();
    let origin = required.text("origin", body.origin);
    let destination = required.text("destination", body.destination);

    let (Some(origin), Some(destination)) = (origin, destination) else {
        return Err(required.into_error().into());
    };

    validate_distance_km(body.distance_km)?;
    let stops: Vec<String> = body
        .stops
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let directory = state.db.stops().directory(&scope.company_id).await?;
    let route_name = directory.resolve(&origin, &destination)?;
    directory.check_all(&stops)?;

    let now = Utc::now();
    let route = Route {
        id: Uuid::new_v4().to_string(),
        company_id: scope.company_id.clone(),
        route_name,
        origin,
        destination,
        stops,
        distance_km: body.distance_km,
        status: body.status.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    let route = state.db.routes().insert(&route).await?;
    info!(company_id = %scope.company_id, route_name = %route.route_name, "Created route");

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "route": route }))))
}

pub async fn delete_route(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Value>> {
    state.db.routes().delete(&scope.company_id, &id).await?;
    info!(id = %id, "Deleted route");
    Ok(Json(json!({ "success": true })))
}
