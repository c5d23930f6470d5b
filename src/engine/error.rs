use crate::model::TableNumber;

/// Every rejection the allocation core can produce. None is fatal; all are
/// meant for display to the customer or staff, so `Display` carries the
/// actionable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// Party size of zero (or otherwise nonsensical).
    InvalidPartySize(u32),
    EmptySelection,
    DuplicateTable(TableNumber),
    UnknownTable(TableNumber),
    /// A standalone-only table appeared in a multi-table set.
    NotCombinable(TableNumber),
    /// A linked table was combined with something other than its partner.
    LinkedPartnerRequired {
        table: TableNumber,
        partner: TableNumber,
    },
    /// Set size does not match the computed table requirement.
    WrongTableCount { chosen: usize, required: u32 },
    InsufficientSeats { seats: u32, party_size: u32 },
    LimitExceeded(&'static str),
    /// Reservation store unreachable on a path that does not fail open.
    Upstream(String),
}

impl std::fmt::Display for AllocError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocError::InvalidPartySize(n) => {
                write!(f, "party size {n} is not valid; it must be at least 1")
            }
            AllocError::EmptySelection => write!(f, "no tables were selected"),
            AllocError::DuplicateTable(n) => {
                write!(f, "table {n} appears more than once in the selection")
            }
            AllocError::UnknownTable(n) => write!(f, "table {n} does not exist"),
            AllocError::NotCombinable(n) => {
                write!(f, "table {n} cannot be combined with other tables")
            }
            AllocError::LinkedPartnerRequired { table, partner } => {
                write!(f, "table {table} can only be combined with table {partner}")
            }
            AllocError::WrongTableCount { chosen, required } => {
                write!(
                    f,
                    "{chosen} tables selected but this party requires exactly {required}"
                )
            }
            AllocError::InsufficientSeats { seats, party_size } => {
                write!(
                    f,
                    "the selected tables seat {seats}, not enough for a party of {party_size}"
                )
            }
            AllocError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            AllocError::Upstream(e) => write!(f, "reservation data unavailable: {e}"),
        }
    }
}

impl std::error::Error for AllocError {}

impl From<crate::source::SourceError> for AllocError {
    fn from(e: crate::source::SourceError) -> Self {
        AllocError::Upstream(e.0)
    }
}
