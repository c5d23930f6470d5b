use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};

use crate::catalog::TableCatalog;
use crate::limits::MAX_PARTY_SIZE;
use crate::model::*;
use crate::observability;
use crate::source::ReservationSource;

use super::{AllocError, Allocator};

// ── Capacity arithmetic ──────────────────────────────────────────

/// Minimum number of standard tables a party occupies. Ceiling division by
/// the per-table seating unit; rounding down would strand the remainder of
/// the party without a seat.
pub fn tables_needed(party_size: u32, seats_per_table: u32) -> u32 {
    debug_assert!(seats_per_table > 0, "seating unit must be positive");
    party_size.div_ceil(seats_per_table)
}

/// Seats held by confirmed reservations. Status is re-checked here even
/// though sources are asked for confirmed records only — a provisional or
/// cancelled record must never reduce capacity.
pub fn confirmed_seats(records: &[ReservationRecord]) -> u32 {
    records
        .iter()
        .filter(|r| r.occupies_capacity())
        .map(|r| r.party_size)
        .sum()
}

/// Time/area-filtered capacity aggregate over one day's records.
///
/// Area attribution is by bound table: with an area filter, a reservation
/// counts iff at least one of its tables lies in that area, and only those
/// tables enter the occupied set. Records with no table assignment count
/// only in the unfiltered view.
pub fn capacity_snapshot(
    catalog: &TableCatalog,
    records: &[ReservationRecord],
    date: NaiveDate,
    time: Option<NaiveTime>,
    area: Option<Area>,
) -> ReservationCapacitySnapshot {
    let in_area = |n: TableNumber, a: Area| catalog.table(n).is_some_and(|t| t.area == a);

    let mut reserved_party_seats = 0u32;
    let mut occupied_table_numbers = BTreeSet::new();
    for r in records {
        if !r.occupies_capacity() {
            continue;
        }
        if let Some(t) = time
            && r.time != t
        {
            continue;
        }
        match area {
            Some(a) => {
                if !r.tables.iter().any(|&n| in_area(n, a)) {
                    continue;
                }
                reserved_party_seats += r.party_size;
                occupied_table_numbers.extend(r.tables.iter().copied().filter(|&n| in_area(n, a)));
            }
            None => {
                reserved_party_seats += r.party_size;
                occupied_table_numbers.extend(r.tables.iter().copied());
            }
        }
    }

    ReservationCapacitySnapshot {
        date,
        time,
        area,
        reserved_party_seats,
        occupied_table_numbers,
    }
}

// ── Allocator surface ────────────────────────────────────────────

impl<S: ReservationSource> Allocator<S> {
    /// Date-level capacity check for a party. Seat capacity is the
    /// authoritative constraint; the table counts in the report are an
    /// estimate for display.
    ///
    /// Fails open: when the reservation store is unreachable the report
    /// claims full capacity with `degraded = true` — an outage must not
    /// block the whole booking flow, and the caller re-validates at commit
    /// time anyway.
    pub async fn check_availability(
        &self,
        date: NaiveDate,
        party_size: u32,
    ) -> Result<AvailabilityReport, AllocError> {
        if party_size == 0 {
            return Err(AllocError::InvalidPartySize(party_size));
        }
        if party_size > MAX_PARTY_SIZE {
            return Err(AllocError::LimitExceeded("party size too large"));
        }

        let total_seats = self.catalog.total_seats();
        let table_count = self.catalog.table_count() as u32;

        let (reserved_seats, degraded) = match self.source.confirmed_on(date).await {
            Ok(records) => (confirmed_seats(&records), false),
            Err(e) => {
                tracing::warn!(%date, "availability check failing open: {e}");
                metrics::counter!(observability::AVAILABILITY_DEGRADED_TOTAL).increment(1);
                (0, true)
            }
        };

        let available_seats = total_seats.saturating_sub(reserved_seats);
        let tables_used = tables_needed(reserved_seats, self.catalog.standard_table_seats());
        let report = AvailabilityReport {
            date,
            party_size,
            available: available_seats >= party_size,
            degraded,
            total_seats,
            reserved_seats,
            available_seats,
            tables_used,
            tables_available: table_count.saturating_sub(tables_used),
        };
        metrics::counter!(
            observability::AVAILABILITY_CHECKS_TOTAL,
            "outcome" => if report.available { "available" } else { "full" }
        )
        .increment(1);
        Ok(report)
    }

    /// Capacity aggregate for a date, optionally narrowed to a sitting time
    /// and area. Reporting path — store outages surface as `Upstream`
    /// rather than failing open.
    pub async fn capacity_snapshot(
        &self,
        date: NaiveDate,
        time: Option<NaiveTime>,
        area: Option<Area>,
    ) -> Result<ReservationCapacitySnapshot, AllocError> {
        let records = self.source.confirmed_on(date).await?;
        Ok(capacity_snapshot(&self.catalog, &records, date, time, area))
    }
}
