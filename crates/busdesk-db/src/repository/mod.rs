//! # Repository Module
//!
//! Database repository implementations for Busdesk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Request handler                                                       │
//! │       │                                                                 │
//! │       │  db.fares().list(&company_id)                                  │
//! │       ▼                                                                 │
//! │  FareRepository                                                        │
//! │  ├── list(&self, company_id)                                           │
//! │  ├── get_by_id(&self, company_id, id)                                  │
//! │  ├── insert(&self, fare)                                               │
//! │  ├── update(&self, fare)                                               │
//! │  └── delete(&self, company_id, id)   (soft delete)                     │
//! │       │                                                                 │
//! │       │  SQL Query (always scoped by company_id)                       │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`StopRepository`](stop::StopRepository) - Stops and the stop directory
//! - [`RouteRepository`](route::RouteRepository) - Routes
//! - [`FareRepository`](fare::FareRepository) - Fares
//! - [`TripRepository`](trip::TripRepository) - Trips and per-bus lookups
//! - [`BookingRepository`](booking::BookingRepository) - Online bookings
//! - [`TicketRepository`](ticket::TicketRepository) - Walk-in tickets
//! - [`DispatchRepository`](dispatch::DispatchRepository) - Parcel dispatches
//! - [`LedgerRepository`](ledger::LedgerRepository) - The merged payment feed

pub mod booking;
pub mod dispatch;
pub mod fare;
mod filter;
pub mod ledger;
pub mod route;
pub mod stop;
pub mod ticket;
pub mod trip;
