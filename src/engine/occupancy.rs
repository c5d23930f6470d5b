use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};

use crate::catalog::TableCatalog;
use crate::model::*;
use crate::observability;
use crate::source::ReservationSource;

use super::{AllocError, Allocator};

/// Per-table occupied/available view for one date+time, optionally narrowed
/// to an area. Only confirmed reservations at that exact slot occupy a
/// table. When the store holds more than one confirmation for the same
/// table+slot, every one of them is attached to the row — the conflict is
/// surfaced, not resolved by picking a winner.
pub fn resolve_occupancy(
    catalog: &TableCatalog,
    records: &[ReservationRecord],
    date: NaiveDate,
    time: NaiveTime,
    area: Option<Area>,
) -> OccupancyView {
    let in_scope =
        |n: TableNumber| catalog.table(n).is_some_and(|t| area.is_none_or(|a| t.area == a));

    let mut bound: HashMap<TableNumber, Vec<ReservationSummary>> = HashMap::new();
    let mut people_seated = 0u32;
    for r in records {
        if !r.occupies_capacity() || r.time != time {
            continue;
        }
        let mut seated = false;
        for &n in &r.tables {
            if in_scope(n) {
                bound.entry(n).or_default().push(ReservationSummary::from(r));
                seated = true;
            }
        }
        // A reservation spanning several tables seats its party once.
        if seated {
            people_seated += r.party_size;
        }
    }

    let mut tables = Vec::new();
    let mut occupied = 0u32;
    for t in catalog.all_tables() {
        if let Some(a) = area
            && t.area != a
        {
            continue;
        }
        let reservations = bound.remove(&t.number).unwrap_or_default();
        let available = reservations.is_empty();
        if !available {
            occupied += 1;
        }
        tables.push(TableOccupancy {
            number: t.number,
            capacity: t.capacity,
            area: t.area,
            available,
            reservations,
        });
    }

    let total = tables.len() as u32;
    OccupancyView {
        date,
        time,
        area,
        tables,
        summary: OccupancySummary {
            total,
            occupied,
            available: total - occupied,
            people_seated,
        },
    }
}

impl<S: ReservationSource> Allocator<S> {
    /// Occupancy map for a date+time(+area), served through the day-keyed
    /// TTL cache. Staff path — store outages surface as `Upstream`; a
    /// floor map that silently showed every table free would invite
    /// double-seating.
    pub async fn resolve_occupancy(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        area: Option<Area>,
    ) -> Result<OccupancyView, AllocError> {
        let records = self.day_records(date).await?;
        metrics::counter!(observability::OCCUPANCY_RESOLUTIONS_TOTAL).increment(1);
        Ok(resolve_occupancy(&self.catalog, &records, date, time, area))
    }
}
