mod combine;
mod error;
mod occupancy;
mod planner;

pub use combine::{suggest_combination, validate_combination};
pub use error::AllocError;
pub use occupancy::resolve_occupancy;
pub use planner::{capacity_snapshot, confirmed_seats, tables_needed};

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::cache::{DEFAULT_OCCUPANCY_TTL, TtlCache};
use crate::catalog::TableCatalog;
use crate::model::ReservationRecord;
use crate::observability;
use crate::source::ReservationSource;

/// Façade over the allocation core: an immutable catalog, the caller's
/// reservation source, and the day-keyed occupancy cache. All capacity
/// answers are point-in-time reads — never a held reservation; the caller
/// must re-validate atomically when committing a booking.
pub struct Allocator<S> {
    catalog: Arc<TableCatalog>,
    source: S,
    day_cache: TtlCache<NaiveDate, Vec<ReservationRecord>>,
}

impl<S: ReservationSource> Allocator<S> {
    pub fn new(catalog: Arc<TableCatalog>, source: S) -> Self {
        Self::with_cache_ttl(catalog, source, DEFAULT_OCCUPANCY_TTL)
    }

    pub fn with_cache_ttl(catalog: Arc<TableCatalog>, source: S, ttl: Duration) -> Self {
        Self {
            catalog,
            source,
            day_cache: TtlCache::new(ttl),
        }
    }

    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    /// One day's confirmed reservations, served from the TTL cache when
    /// fresh. Only the occupancy/suggestion paths read through here — the
    /// availability check always asks the store so a booking decision never
    /// rides on stale data longer than it has to.
    pub(super) async fn day_records(
        &self,
        date: NaiveDate,
    ) -> Result<Arc<Vec<ReservationRecord>>, AllocError> {
        if let Some(records) = self.day_cache.get(&date) {
            metrics::counter!(observability::OCCUPANCY_CACHE_HITS_TOTAL).increment(1);
            return Ok(records);
        }
        metrics::counter!(observability::OCCUPANCY_CACHE_MISSES_TOTAL).increment(1);
        let records = self.source.confirmed_on(date).await?;
        Ok(self.day_cache.insert(date, records))
    }
}
