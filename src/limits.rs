//! Input sanity bounds. Exceeding any of these is a caller error, not a
//! capacity question.

/// Largest party a single reservation may carry.
pub const MAX_PARTY_SIZE: u32 = 100;

/// Largest table set a customer may select for one party.
pub const MAX_TABLES_PER_PARTY: usize = 12;

/// Upper bound on catalog size; a floor plan past this is a config fault.
pub const MAX_CATALOG_TABLES: usize = 512;
