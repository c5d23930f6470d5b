use crate::engine::AllocError;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: availability checks served. Labels: outcome.
pub const AVAILABILITY_CHECKS_TOTAL: &str = "fourtop_availability_checks_total";

/// Counter: availability checks that failed open because the reservation
/// store was unreachable.
pub const AVAILABILITY_DEGRADED_TOTAL: &str = "fourtop_availability_degraded_total";

/// Counter: occupancy views resolved.
pub const OCCUPANCY_RESOLUTIONS_TOTAL: &str = "fourtop_occupancy_resolutions_total";

/// Counter: combination validations rejected. Labels: reason.
pub const COMBINATION_REJECTED_TOTAL: &str = "fourtop_combination_rejected_total";

// ── USE metrics (resource utilization) ──────────────────────────

/// Counter: day-record cache hits.
pub const OCCUPANCY_CACHE_HITS_TOTAL: &str = "fourtop_occupancy_cache_hits_total";

/// Counter: day-record cache misses (store round-trips).
pub const OCCUPANCY_CACHE_MISSES_TOTAL: &str = "fourtop_occupancy_cache_misses_total";

/// Map an error to a short label for metrics. The library only emits
/// through the `metrics` facade; installing an exporter is the
/// application's job.
pub fn rejection_label(err: &AllocError) -> &'static str {
    match err {
        AllocError::InvalidPartySize(_) => "invalid_party_size",
        AllocError::EmptySelection => "empty_selection",
        AllocError::DuplicateTable(_) => "duplicate_table",
        AllocError::UnknownTable(_) => "unknown_table",
        AllocError::NotCombinable(_) => "not_combinable",
        AllocError::LinkedPartnerRequired { .. } => "linked_partner_required",
        AllocError::WrongTableCount { .. } => "wrong_table_count",
        AllocError::InsufficientSeats { .. } => "insufficient_seats",
        AllocError::LimitExceeded(_) => "limit_exceeded",
        AllocError::Upstream(_) => "upstream",
    }
}
