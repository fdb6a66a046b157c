//! # busdesk-db: Database Layer for Busdesk
//!
//! SQLite storage for fares, stops, routes, trips and the payment sources,
//! using sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Busdesk Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (GET /bus/payments)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    busdesk-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ FareRepo      │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ TripRepo      │    │ 001_initial  │  │   │
//! │  │   │ Connection    │    │ LedgerRepo    │    │ _schema.sql  │  │   │
//! │  │   │ Management    │    │ ...           │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (or :memory: in tests)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use busdesk_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("busdesk.db")).await?;
//! let fares = db.fares().list(&company_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::booking::BookingRepository;
pub use repository::dispatch::DispatchRepository;
pub use repository::fare::FareRepository;
pub use repository::ledger::LedgerRepository;
pub use repository::route::RouteRepository;
pub use repository::stop::StopRepository;
pub use repository::ticket::{generate_ticket_number, TicketRepository};
pub use repository::trip::TripRepository;
