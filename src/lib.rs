//! Table and capacity allocation core for a restaurant reservation system.
//!
//! Three questions, all answered from an immutable table catalog plus the
//! caller's confirmed reservations:
//! - does a date still have seats for this party? (`check_availability`)
//! - which tables are taken at this date+time? (`resolve_occupancy`)
//! - may these specific tables be combined for one party?
//!   (`validate_combination`)
//!
//! Every answer is a point-in-time read, not a lock. Closing the
//! concurrent-booking race is the embedding store's job at commit time.

pub mod cache;
pub mod catalog;
pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;
pub mod source;

pub use catalog::{CatalogError, STANDARD_TABLE_SEATS, TableCatalog, TableDefinition};
pub use engine::{
    AllocError, Allocator, capacity_snapshot, confirmed_seats, resolve_occupancy,
    suggest_combination, tables_needed, validate_combination,
};
pub use model::{
    Area, AvailabilityReport, OccupancySummary, OccupancyView, ReservationCapacitySnapshot,
    ReservationRecord, ReservationStatus, ReservationSummary, TableNumber, TableOccupancy,
};
pub use source::{InMemorySource, ReservationSource, SourceError};
