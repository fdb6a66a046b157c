//! # busdesk-core: Pure Business Logic for Busdesk
//!
//! Fares, stops, trips and the payment ledger as plain types and functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Busdesk Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Vendor Dashboard (browser)                      │   │
//! │  │    Fares ──► Stops/Routes ──► Trips ──► Payments ledger        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    busdesk-api (axum)                           │   │
//! │  │    /bus/fares, /bus/trips, /bus/stops, /bus/payments, ...      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ busdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  fare   │ │  route  │ │  trip   │ │ payment │ │ ledger  │  │   │
//! │  │   │ discount│ │ resolver│ │ conflict│ │ remap   │ │ merge   │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  busdesk-db (Database Layer)                    │   │
//! │  │            SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`fare`] - Fares and the discount rule
//! - [`route`] - Stops, routes and route name resolution
//! - [`trip`] - Weekly trip schedules and double-booking checks
//! - [`payment`] - Source payment records and the normalized shape
//! - [`ledger`] - Merge, pagination and stats for the payment feed
//! - [`error`] - Domain error types
//! - [`validation`] - Request validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use busdesk_core::fare::{discounted_amount, DiscountRate};
//! use busdesk_core::route::StopDirectory;
//! use busdesk_core::Money;
//!
//! let stops = StopDirectory::new(["Dhaka", "Sylhet"]);
//! assert_eq!(stops.resolve("Dhaka", "Sylhet").unwrap(), "Dhaka - Sylhet");
//!
//! let price = discounted_amount(Money::from_cents(80_000), DiscountRate::from_percentage(10.0));
//! assert_eq!(price.cents(), 72_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fare;
pub mod ledger;
pub mod money;
pub mod payment;
pub mod route;
pub mod trip;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use fare::{Fare, FareQuote, FareStatus};
pub use ledger::{LedgerPage, PageRequest, Pagination, PaymentFilter, PaymentStats};
pub use money::Money;
pub use payment::{
    BookingRecord, DispatchRecord, DispatchStatus, Payment, PaymentMethod, PaymentSource,
    PaymentStatus, SaleStatus, TicketRecord,
};
pub use route::{Route, RouteStatus, Stop, StopDirectory};
pub use trip::{DepartureTimes, Trip, TripStatus, Weekday};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency used when a request does not name one.
pub const DEFAULT_CURRENCY: &str = "BDT";

/// Page size when the client does not send `limit`.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page the ledger will return.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Longest accepted ledger search term.
pub const MAX_SEARCH_LENGTH: usize = 100;

/// Largest fare or payment amount accepted from a request (10,000,000.00).
pub const MAX_AMOUNT: Money = Money::from_cents(1_000_000_000);

/// Longest accepted name for stops, trips, buses and customers.
pub const MAX_NAME_LENGTH: usize = 200;
