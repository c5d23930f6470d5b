use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Physical table number. Sparse — retired numbers stay unused forever.
pub type TableNumber = u32;

/// Floor zone. Closed set; the floor plan cannot invent new areas at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Area {
    Indoor,
    SemiOutdoor,
    Outdoor,
}

impl Area {
    pub const ALL: [Area; 3] = [Area::Indoor, Area::SemiOutdoor, Area::Outdoor];
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Area::Indoor => write!(f, "indoor"),
            Area::SemiOutdoor => write!(f, "semi-outdoor"),
            Area::Outdoor => write!(f, "outdoor"),
        }
    }
}

/// Reservation lifecycle state as the payment flow reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationStatus {
    Pending,
    PendingPayment,
    Confirmed,
    Cancelled,
    Rejected,
}

impl ReservationStatus {
    /// Only a confirmed reservation holds seats or tables. Provisional and
    /// dead reservations must never reduce available capacity.
    pub fn occupies_capacity(&self) -> bool {
        matches!(self, ReservationStatus::Confirmed)
    }
}

/// The narrow reservation shape the core consumes — exactly the fields the
/// allocation math needs, decoupled from whatever the store persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub id: Ulid,
    /// Customer-facing voucher code.
    pub code: String,
    pub customer_name: String,
    pub date: NaiveDate,
    /// Sitting slot.
    pub time: NaiveTime,
    pub party_size: u32,
    pub status: ReservationStatus,
    /// Table numbers bound to this reservation. May be empty before the
    /// party is assigned to specific tables.
    pub tables: Vec<TableNumber>,
}

impl ReservationRecord {
    pub fn occupies_capacity(&self) -> bool {
        self.status.occupies_capacity()
    }
}

// ── Query result types ───────────────────────────────────────────

/// Customer-facing slice of a reservation, attached to occupied tables for
/// admin display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationSummary {
    pub code: String,
    pub customer_name: String,
    pub party_size: u32,
    pub status: ReservationStatus,
}

impl From<&ReservationRecord> for ReservationSummary {
    fn from(r: &ReservationRecord) -> Self {
        Self {
            code: r.code.clone(),
            customer_name: r.customer_name.clone(),
            party_size: r.party_size,
            status: r.status,
        }
    }
}

/// Date-level capacity answer. Seat capacity is authoritative; the table
/// counts are an estimate for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub date: NaiveDate,
    pub party_size: u32,
    pub available: bool,
    /// True when the reservation store was unreachable and the report
    /// assumes full capacity. Callers should warn the user.
    pub degraded: bool,
    pub total_seats: u32,
    pub reserved_seats: u32,
    pub available_seats: u32,
    pub tables_used: u32,
    pub tables_available: u32,
}

/// One table's state at a specific date+time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOccupancy {
    pub number: TableNumber,
    pub capacity: u32,
    pub area: Area,
    pub available: bool,
    /// Reservations bound to this table at the queried slot. More than one
    /// entry means the store holds conflicting confirmations — surfaced
    /// as-is, never collapsed to a single winner.
    pub reservations: Vec<ReservationSummary>,
}

/// Aggregate over the tables in scope of an occupancy query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OccupancySummary {
    pub total: u32,
    pub occupied: u32,
    pub available: u32,
    /// Each reservation counted once, even when it spans several tables.
    pub people_seated: u32,
}

/// Per-table availability map for one date+time(+area).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyView {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub area: Option<Area>,
    /// Ascending by table number, same order as the catalog.
    pub tables: Vec<TableOccupancy>,
    pub summary: OccupancySummary,
}

/// Ephemeral capacity aggregate for a date, optionally narrowed to a
/// sitting time and area. Derived per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationCapacitySnapshot {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub area: Option<Area>,
    pub reserved_party_seats: u32,
    pub occupied_table_numbers: BTreeSet<TableNumber>,
}
