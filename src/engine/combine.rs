use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};

use chrono::{NaiveDate, NaiveTime};

use crate::catalog::{TableCatalog, TableDefinition};
use crate::limits::{MAX_PARTY_SIZE, MAX_TABLES_PER_PARTY};
use crate::model::{Area, TableNumber};
use crate::observability;
use crate::source::ReservationSource;

use super::planner::{capacity_snapshot, tables_needed};
use super::{AllocError, Allocator};

/// Decide whether a customer's chosen table set is legal for one party.
///
/// Rules, in rejection order:
/// 1. the set is non-empty, duplicate-free, and every number is a real table;
/// 2. a standalone-only table must be the only table in the set;
/// 3. a linked table in a multi-table set must appear with exactly its
///    partner — never a third table;
/// 4. the chosen seats must cover the party, and a set of freely-combinable
///    tables must match the computed table requirement exactly.
///
/// The first violation is reported; an invalid table is never silently
/// dropped from the set.
pub fn validate_combination(
    catalog: &TableCatalog,
    tables: &[TableNumber],
    party_size: u32,
) -> Result<(), AllocError> {
    if party_size == 0 {
        return Err(AllocError::InvalidPartySize(party_size));
    }
    if party_size > MAX_PARTY_SIZE {
        return Err(AllocError::LimitExceeded("party size too large"));
    }
    if tables.is_empty() {
        return Err(AllocError::EmptySelection);
    }
    if tables.len() > MAX_TABLES_PER_PARTY {
        return Err(AllocError::LimitExceeded("too many tables selected"));
    }

    let mut defs: Vec<&TableDefinition> = Vec::with_capacity(tables.len());
    let mut seen = HashSet::new();
    for &n in tables {
        let def = catalog.table(n).ok_or(AllocError::UnknownTable(n))?;
        if !seen.insert(n) {
            return Err(AllocError::DuplicateTable(n));
        }
        defs.push(def);
    }

    if defs.len() > 1 {
        for d in &defs {
            if !d.combinable {
                return Err(AllocError::NotCombinable(d.number));
            }
        }
        for d in &defs {
            if let Some(partner) = d.linked_table {
                let only_partner = defs.len() == 2 && defs.iter().any(|o| o.number == partner);
                if !only_partner {
                    return Err(AllocError::LinkedPartnerRequired {
                        table: d.number,
                        partner,
                    });
                }
            }
        }
    }

    let seats: u32 = defs.iter().map(|d| d.capacity).sum();
    if seats < party_size {
        return Err(AllocError::InsufficientSeats { seats, party_size });
    }
    // The count rule only applies to sets of freely-combinable tables: a
    // standalone table or a linked pair is sized by its actual capacity,
    // not the standard-unit arithmetic.
    if defs.iter().all(|d| d.freely_combinable()) {
        let required = tables_needed(party_size, catalog.standard_table_seats());
        if defs.len() as u32 != required {
            return Err(AllocError::WrongTableCount {
                chosen: defs.len(),
                required,
            });
        }
    }

    Ok(())
}

/// Propose a legal table set for a party given the currently occupied
/// tables. Preference order: the smallest single table that fits, then a
/// linked pair, then the required count of freely-combinable tables within
/// one area (largest capacities first). Deterministic for a given catalog
/// and occupancy; the result always passes [`validate_combination`].
pub fn suggest_combination(
    catalog: &TableCatalog,
    occupied: &BTreeSet<TableNumber>,
    area: Option<Area>,
    party_size: u32,
) -> Option<Vec<TableNumber>> {
    if party_size == 0 || party_size > MAX_PARTY_SIZE {
        return None;
    }
    let usable = |t: &TableDefinition| {
        !occupied.contains(&t.number) && area.is_none_or(|a| t.area == a)
    };

    // Smallest free single table that seats the whole party.
    let mut best: Option<&TableDefinition> = None;
    for t in catalog.all_tables().iter().filter(|t| usable(t)) {
        if t.capacity >= party_size && best.is_none_or(|b| t.capacity < b.capacity) {
            best = Some(t);
        }
    }
    if let Some(t) = best {
        return Some(vec![t.number]);
    }

    // A free linked pair with enough combined seats.
    for t in catalog.all_tables().iter().filter(|t| usable(t)) {
        let Some(partner) = t.linked_table else { continue };
        if partner < t.number {
            continue; // each pair considered once
        }
        if let Some(p) = catalog.table(partner)
            && usable(p)
            && t.capacity + p.capacity >= party_size
        {
            return Some(vec![t.number, partner]);
        }
    }

    // The required count of freely-combinable tables, area by area.
    let required = tables_needed(party_size, catalog.standard_table_seats()) as usize;
    if required > MAX_TABLES_PER_PARTY {
        return None;
    }
    let areas: &[Area] = match area {
        Some(ref a) => std::slice::from_ref(a),
        None => &Area::ALL,
    };
    for &a in areas {
        let mut candidates: Vec<&TableDefinition> = catalog
            .tables_in_area(a)
            .filter(|t| !occupied.contains(&t.number) && t.freely_combinable())
            .collect();
        if candidates.len() < required {
            continue;
        }
        candidates.sort_by_key(|t| (Reverse(t.capacity), t.number));
        let chosen = &candidates[..required];
        if chosen.iter().map(|t| t.capacity).sum::<u32>() >= party_size {
            let mut numbers: Vec<TableNumber> = chosen.iter().map(|t| t.number).collect();
            numbers.sort_unstable();
            return Some(numbers);
        }
    }

    None
}

impl<S: ReservationSource> Allocator<S> {
    /// Validate a customer's chosen table set against the catalog rules.
    pub fn validate_combination(
        &self,
        tables: &[TableNumber],
        party_size: u32,
    ) -> Result<(), AllocError> {
        let result = validate_combination(&self.catalog, tables, party_size);
        if let Err(ref e) = result {
            metrics::counter!(
                observability::COMBINATION_REJECTED_TOTAL,
                "reason" => observability::rejection_label(e)
            )
            .increment(1);
        }
        result
    }

    /// Recommend a legal, currently-free table set for a party at the given
    /// slot. `Ok(None)` means nothing fits — a capacity answer, not an error.
    pub async fn suggest_tables(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        area: Option<Area>,
        party_size: u32,
    ) -> Result<Option<Vec<TableNumber>>, AllocError> {
        if party_size == 0 {
            return Err(AllocError::InvalidPartySize(party_size));
        }
        if party_size > MAX_PARTY_SIZE {
            return Err(AllocError::LimitExceeded("party size too large"));
        }
        let records = self.day_records(date).await?;
        let snapshot = capacity_snapshot(&self.catalog, &records, date, Some(time), None);
        Ok(suggest_combination(
            &self.catalog,
            &snapshot.occupied_table_numbers,
            area,
            party_size,
        ))
    }
}
