//! # HTTP Routes
//!
//! ```text
//! GET    /health
//! GET    /bus/payments            POST /bus/payments
//! GET    /bus/fares               POST /bus/fares
//! GET    /bus/fares/{id}          PUT  /bus/fares/{id}     DELETE /bus/fares/{id}
//! GET    /bus/trips               POST /bus/trips
//! GET    /bus/trips/{id}          PUT  /bus/trips/{id}     DELETE /bus/trips/{id}
//! GET    /bus/stops               POST /bus/stops
//!                                 PUT  /bus/stops/{id}     DELETE /bus/stops/{id}
//! GET    /bus/routes              POST /bus/routes
//! GET    /bus/routes/{id}                                  DELETE /bus/routes/{id}
//! POST   /bus/notifications
//! ```
//!
//! Everything under `/bus` requires a vendor or admin bearer token.

pub mod bus_routes;
pub mod fares;
pub mod health;
pub mod notifications;
pub mod payments;
pub mod stops;
pub mod trips;

use axum::routing::{get, post, put};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/bus", vendor_routes())
}

fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/payments",
            get(payments::list_payments).post(payments::record_payment),
        )
        .route("/fares", get(fares::list_fares).post(fares::create_fare))
        .route(
            "/fares/{id}",
            get(fares::get_fare)
                .put(fares::update_fare)
                .delete(fares::delete_fare),
        )
        .route("/trips", get(trips::list_trips).post(trips::create_trip))
        .route(
            "/trips/{id}",
            get(trips::get_trip)
                .put(trips::update_trip)
                .delete(trips::delete_trip),
        )
        .route("/stops", get(stops::list_stops).post(stops::create_stop))
        .route(
            "/stops/{id}",
            put(stops::update_stop).delete(stops::delete_stop),
        )
        .route(
            "/routes",
            get(bus_routes::list_routes).post(bus_routes::create_route),
        )
        .route(
            "/routes/{id}",
            get(bus_routes::get_route).delete(bus_routes::delete_route),
        )
        .route("/notifications", post(notifications::send_notifications))
}
