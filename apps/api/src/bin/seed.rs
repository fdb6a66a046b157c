//! Populates a demo company and prints a bearer token for it.
//!
//! ```text
//! cargo run -p busdesk-api --bin seed
//! curl -H "Authorization: Bearer <token>" localhost:8080/bus/payments
//! ```

use anyhow::Context;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use busdesk_api::{ApiConfig, JwtManager, Role};
use busdesk_core::{
    BookingRecord, DepartureTimes, DispatchRecord, DispatchStatus, Fare, FareStatus, Money,
    PaymentMethod, Route, RouteStatus, SaleStatus, Stop, StopDirectory, TicketRecord, Trip,
    TripStatus, Weekday, DEFAULT_CURRENCY,
};
use busdesk_db::{generate_ticket_number, Database, DbConfig};

const COMPANY_ID: &str = "demo-company";
const USER_ID: &str = "demo-vendor";

const STOPS: &[(&str, &str, &str)] = &[
    ("Dhaka", "terminal", "Dhaka"),
    ("Comilla", "counter", "Comilla"),
    ("Chittagong", "terminal", "Chittagong"),
    ("Sreemangal", "roadside", "Moulvibazar"),
    ("Sylhet", "terminal", "Sylhet"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ApiConfig::load().context("loading configuration")?;
    let db = Database::new(DbConfig::new(&config.database_path))
        .await
        .context("opening database")?;

    let now = Utc::now();

    // Stops
    for (name, stop_type, district) in STOPS {
        db.stops()
            .insert(&Stop {
                id: Uuid::new_v4().to_string(),
                company_id: COMPANY_ID.to_string(),
                name: name.to_string(),
                stop_type: stop_type.to_string(),
                district: district.to_string(),
                created_at: now,
                updated_at: now,
            })
            .await
            .with_context(|| format!("inserting stop {name}"))?;
    }
    let directory = StopDirectory::new(STOPS.iter().map(|(name, _, _)| *name));

    // Routes and fares
    let routes = [
        ("Dhaka", "Sylhet", vec!["Sreemangal"], 245.0, 85_000, 0.0),
        ("Dhaka", "Chittagong", vec!["Comilla"], 253.0, 90_000, 10.0),
    ];
    let mut route_ids = Vec::new();
    for (origin, destination, stops, km, fare_cents, discount) in routes {
        let route_name = directory.resolve(origin, destination)?;
        let route = Route {
            id: Uuid::new_v4().to_string(),
            company_id: COMPANY_ID.to_string(),
            route_name: route_name.clone(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            stops: stops.into_iter().map(String::from).collect(),
            distance_km: Some(km),
            status: RouteStatus::Active,
            created_at: now,
            updated_at: now,
        };
        db.routes().insert(&route).await?;

        db.fares()
            .insert(&Fare {
                id: Uuid::new_v4().to_string(),
                company_id: COMPANY_ID.to_string(),
                route_name: route_name.clone(),
                origin: origin.to_string(),
                destination: destination.to_string(),
                fare_amount: Money::from_cents(fare_cents),
                currency: DEFAULT_CURRENCY.to_string(),
                discount_percent: discount,
                status: FareStatus::Active,
                created_at: now,
                updated_at: now,
            })
            .await?;

        route_ids.push((route.id, route_name));
    }

    // Trips
    let trips = [
        ("Morning Express", "bus-12", "Hino AC 12", 8, vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday]),
        ("Night Coach", "bus-7", "Scania 7", 22, vec![Weekday::Saturday, Weekday::Sunday]),
    ];
    for ((trip_name, bus_id, bus_name, hour, days), (route_id, route_name)) in
        trips.into_iter().zip(route_ids.iter())
    {
        let to = Utc
            .with_ymd_and_hms(2026, 1, 5, hour, 0, 0)
            .single()
            .context("building departure time")?;
        db.trips()
            .insert(&Trip {
                id: Uuid::new_v4().to_string(),
                company_id: COMPANY_ID.to_string(),
                trip_name: trip_name.to_string(),
                bus_id: bus_id.to_string(),
                bus_name: bus_name.to_string(),
                route_id: route_id.clone(),
                route_name: route_name.clone(),
                departure_times: DepartureTimes {
                    to,
                    from: to + Duration::hours(9),
                },
                days_of_week: days,
                status: TripStatus::Active,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }

    // Payments across all three sources
    let departure = NaiveDate::from_ymd_opt(2026, 3, 10).context("building departure date")?;
    let bookings = [
        ("Nusrat Jahan", 85_000, SaleStatus::Paid, PaymentMethod::Card),
        ("Tanvir Ahmed", 85_000, SaleStatus::Pending, PaymentMethod::MobileBanking),
        ("Farhana Akter", 90_000, SaleStatus::Failed, PaymentMethod::Online),
    ];
    for (i, (name, cents, status, method)) in bookings.into_iter().enumerate() {
        db.bookings()
            .insert(&BookingRecord {
                id: Uuid::new_v4().to_string(),
                company_id: COMPANY_ID.to_string(),
                booking_number: format!("BK-{:05}", i + 1),
                customer_name: name.to_string(),
                customer_email: Some(format!("customer{}@example.com", i + 1)),
                customer_phone: Some(format!("0171000000{}", i + 1)),
                amount: Money::from_cents(cents),
                currency: DEFAULT_CURRENCY.to_string(),
                payment_method: method,
                payment_status: status,
                trip_name: "Morning Express".to_string(),
                route_name: "Dhaka - Sylhet".to_string(),
                bus_name: "Hino AC 12".to_string(),
                departure_date: departure,
                created_at: now - Duration::hours(i as i64 * 5),
            })
            .await?;
    }

    for (i, name) in ["Rahim Uddin", "Salma Begum"].into_iter().enumerate() {
        db.tickets()
            .insert(&TicketRecord {
                id: Uuid::new_v4().to_string(),
                company_id: COMPANY_ID.to_string(),
                ticket_number: generate_ticket_number(),
                passenger_name: name.to_string(),
                passenger_email: None,
                passenger_phone: None,
                amount: Money::from_cents(81_000),
                currency: DEFAULT_CURRENCY.to_string(),
                payment_method: PaymentMethod::Cash,
                payment_status: SaleStatus::Completed,
                trip_name: "Night Coach".to_string(),
                route_name: "Dhaka - Chittagong".to_string(),
                bus_name: "Scania 7".to_string(),
                departure_date: departure,
                seat_number: Some(format!("B{}", i + 1)),
                created_at: now - Duration::hours(i as i64 * 7 + 2),
            })
            .await?;
    }

    for (i, status) in [DispatchStatus::InTransit, DispatchStatus::Arrived].into_iter().enumerate() {
        db.dispatches()
            .insert(&DispatchRecord {
                id: Uuid::new_v4().to_string(),
                company_id: COMPANY_ID.to_string(),
                dispatch_number: format!("DSP-{:05}", i + 1),
                sender_name: "Karim Traders".to_string(),
                sender_phone: "01700000000".to_string(),
                receiver_name: "Sylhet Depot".to_string(),
                receiver_phone: "01800000000".to_string(),
                charge: Money::from_cents(30_000),
                currency: DEFAULT_CURRENCY.to_string(),
                status,
                trip_name: Some("Morning Express".to_string()),
                route_name: Some("Dhaka - Sylhet".to_string()),
                bus_name: None,
                created_at: now - Duration::hours(i as i64 * 11 + 1),
            })
            .await?;
    }

    info!(company_id = COMPANY_ID, "Demo data seeded");

    let jwt = JwtManager::new(&config.jwt_secret, config.token_lifetime_secs);
    let token = jwt
        .issue(USER_ID, COMPANY_ID, Role::Vendor)
        .map_err(|e| anyhow::anyhow!("issuing token: {e}"))?;
    println!("{token}");

    db.close().await;
    Ok(())
}
