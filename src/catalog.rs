use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::limits::MAX_CATALOG_TABLES;
use crate::model::{Area, TableNumber};

/// The common per-table seating unit the party→table arithmetic divides by.
pub const STANDARD_TABLE_SEATS: u32 = 4;

/// Static definition of one physical table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub number: TableNumber,
    pub capacity: u32,
    pub area: Area,
    /// False means this table is seated alone, never merged with another.
    #[serde(default = "default_combinable")]
    pub combinable: bool,
    /// When set, this table may merge only with that exact partner.
    #[serde(default)]
    pub linked_table: Option<TableNumber>,
}

fn default_combinable() -> bool {
    true
}

impl TableDefinition {
    pub fn new(number: TableNumber, capacity: u32, area: Area) -> Self {
        Self {
            number,
            capacity,
            area,
            combinable: true,
            linked_table: None,
        }
    }

    /// Mark the table standalone-only.
    pub fn standalone(mut self) -> Self {
        self.combinable = false;
        self
    }

    /// Pre-pair the table with exactly one partner.
    pub fn linked_to(mut self, partner: TableNumber) -> Self {
        self.linked_table = Some(partner);
        self
    }

    /// True when the table may merge with any other such table.
    pub fn freely_combinable(&self) -> bool {
        self.combinable && self.linked_table.is_none()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CatalogError {
    Empty,
    DuplicateNumber(TableNumber),
    ZeroCapacity(TableNumber),
    ZeroStandardSeats,
    SelfLink(TableNumber),
    UnknownLinkTarget { table: TableNumber, partner: TableNumber },
    AsymmetricLink { table: TableNumber, partner: TableNumber },
    LinkedNotCombinable(TableNumber),
    LimitExceeded(&'static str),
    Config(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "catalog has no tables"),
            CatalogError::DuplicateNumber(n) => write!(f, "duplicate table number: {n}"),
            CatalogError::ZeroCapacity(n) => write!(f, "table {n} has zero capacity"),
            CatalogError::ZeroStandardSeats => write!(f, "standard table seats must be positive"),
            CatalogError::SelfLink(n) => write!(f, "table {n} is linked to itself"),
            CatalogError::UnknownLinkTarget { table, partner } => {
                write!(f, "table {table} links to nonexistent table {partner}")
            }
            CatalogError::AsymmetricLink { table, partner } => {
                write!(f, "table {table} links to {partner}, but {partner} does not link back")
            }
            CatalogError::LinkedNotCombinable(n) => {
                write!(f, "table {n} is linked but marked non-combinable")
            }
            CatalogError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            CatalogError::Config(e) => write!(f, "catalog config error: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Immutable registry of every physical table. Built once from
/// configuration, validated up front, only read afterwards.
#[derive(Debug, Clone)]
pub struct TableCatalog {
    /// Sorted ascending by number for deterministic rendering.
    tables: Vec<TableDefinition>,
    index: HashMap<TableNumber, usize>,
    total_seats: u32,
    standard_seats: u32,
}

impl TableCatalog {
    pub fn new(tables: Vec<TableDefinition>) -> Result<Self, CatalogError> {
        Self::with_standard_seats(tables, STANDARD_TABLE_SEATS)
    }

    pub fn with_standard_seats(
        mut tables: Vec<TableDefinition>,
        standard_seats: u32,
    ) -> Result<Self, CatalogError> {
        if standard_seats == 0 {
            return Err(CatalogError::ZeroStandardSeats);
        }
        if tables.is_empty() {
            return Err(CatalogError::Empty);
        }
        if tables.len() > MAX_CATALOG_TABLES {
            return Err(CatalogError::LimitExceeded("too many tables in catalog"));
        }

        tables.sort_by_key(|t| t.number);

        let mut index = HashMap::with_capacity(tables.len());
        let mut total_seats = 0u32;
        for (i, t) in tables.iter().enumerate() {
            if t.capacity == 0 {
                return Err(CatalogError::ZeroCapacity(t.number));
            }
            if index.insert(t.number, i).is_some() {
                return Err(CatalogError::DuplicateNumber(t.number));
            }
            total_seats += t.capacity;
        }

        for t in &tables {
            let Some(partner) = t.linked_table else { continue };
            if partner == t.number {
                return Err(CatalogError::SelfLink(t.number));
            }
            if !t.combinable {
                return Err(CatalogError::LinkedNotCombinable(t.number));
            }
            let Some(&pi) = index.get(&partner) else {
                return Err(CatalogError::UnknownLinkTarget {
                    table: t.number,
                    partner,
                });
            };
            if tables[pi].linked_table != Some(t.number) {
                return Err(CatalogError::AsymmetricLink {
                    table: t.number,
                    partner,
                });
            }
        }

        Ok(Self {
            tables,
            index,
            total_seats,
            standard_seats,
        })
    }

    /// Load the catalog from its JSON configuration document — an array of
    /// table objects; `combinable` defaults to true, `linked_table` to none.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let tables: Vec<TableDefinition> =
            serde_json::from_str(json).map_err(|e| CatalogError::Config(e.to_string()))?;
        Self::new(tables)
    }

    /// The shipped restaurant layout. Numbers 9, 13 and 15 are retired and
    /// must never validate.
    pub fn default_floor_plan() -> Self {
        let mut tables = Vec::new();
        // Indoor hall: eight four-tops, each seated alone.
        for n in 1..=8 {
            tables.push(TableDefinition::new(n, 4, Area::Indoor).standalone());
        }
        // Semi-outdoor: three free four-tops plus the 14↔16 pair that
        // merges into the big-party surface.
        for n in [10, 11, 12] {
            tables.push(TableDefinition::new(n, 4, Area::SemiOutdoor));
        }
        tables.push(TableDefinition::new(14, 4, Area::SemiOutdoor).linked_to(16));
        tables.push(TableDefinition::new(16, 8, Area::SemiOutdoor).linked_to(14));
        // Outdoor: six two-tops, freely combinable.
        for n in 17..=22 {
            tables.push(TableDefinition::new(n, 2, Area::Outdoor));
        }
        Self::new(tables).expect("default floor plan is valid")
    }

    // ── Lookup ───────────────────────────────────────────────

    /// All tables, ascending by number.
    pub fn all_tables(&self) -> &[TableDefinition] {
        &self.tables
    }

    pub fn tables_in_area(&self, area: Area) -> impl Iterator<Item = &TableDefinition> {
        self.tables.iter().filter(move |t| t.area == area)
    }

    pub fn table(&self, number: TableNumber) -> Option<&TableDefinition> {
        self.index.get(&number).map(|&i| &self.tables[i])
    }

    pub fn is_valid_table(&self, number: TableNumber) -> bool {
        self.index.contains_key(&number)
    }

    // ── Derived constants ────────────────────────────────────

    pub fn total_seats(&self) -> u32 {
        self.total_seats
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn standard_table_seats(&self) -> u32 {
        self.standard_seats
    }
}

impl Default for TableCatalog {
    fn default() -> Self {
        Self::default_floor_plan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_top(n: TableNumber) -> TableDefinition {
        TableDefinition::new(n, 4, Area::Indoor)
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(matches!(TableCatalog::new(vec![]), Err(CatalogError::Empty)));
    }

    #[test]
    fn rejects_duplicate_numbers() {
        let result = TableCatalog::new(vec![four_top(1), four_top(1)]);
        assert!(matches!(result, Err(CatalogError::DuplicateNumber(1))));
    }

    #[test]
    fn rejects_zero_capacity() {
        let result = TableCatalog::new(vec![TableDefinition::new(3, 0, Area::Indoor)]);
        assert!(matches!(result, Err(CatalogError::ZeroCapacity(3))));
    }

    #[test]
    fn rejects_self_link() {
        let result = TableCatalog::new(vec![four_top(1).linked_to(1)]);
        assert!(matches!(result, Err(CatalogError::SelfLink(1))));
    }

    #[test]
    fn rejects_unknown_link_target() {
        let result = TableCatalog::new(vec![four_top(1).linked_to(99)]);
        assert!(matches!(
            result,
            Err(CatalogError::UnknownLinkTarget { table: 1, partner: 99 })
        ));
    }

    #[test]
    fn rejects_asymmetric_link() {
        // 1 links to 2, but 2 does not link back.
        let result = TableCatalog::new(vec![four_top(1).linked_to(2), four_top(2)]);
        assert!(matches!(
            result,
            Err(CatalogError::AsymmetricLink { table: 1, partner: 2 })
        ));
    }

    #[test]
    fn rejects_linked_non_combinable() {
        let result = TableCatalog::new(vec![
            four_top(1).linked_to(2).standalone(),
            four_top(2).linked_to(1),
        ]);
        assert!(matches!(result, Err(CatalogError::LinkedNotCombinable(1))));
    }

    #[test]
    fn rejects_zero_standard_seats() {
        let result = TableCatalog::with_standard_seats(vec![four_top(1)], 0);
        assert!(matches!(result, Err(CatalogError::ZeroStandardSeats)));
    }

    #[test]
    fn tables_sorted_ascending() {
        let catalog = TableCatalog::new(vec![four_top(5), four_top(1), four_top(3)]).unwrap();
        let numbers: Vec<_> = catalog.all_tables().iter().map(|t| t.number).collect();
        assert_eq!(numbers, vec![1, 3, 5]);
    }

    #[test]
    fn lookup_and_validity() {
        let catalog = TableCatalog::new(vec![four_top(1), four_top(4)]).unwrap();
        assert!(catalog.is_valid_table(1));
        assert!(!catalog.is_valid_table(2)); // inside the numeric span, still invalid
        assert_eq!(catalog.table(4).unwrap().capacity, 4);
        assert!(catalog.table(9).is_none());
    }

    #[test]
    fn derived_totals() {
        let catalog = TableCatalog::new(vec![
            four_top(1),
            TableDefinition::new(2, 2, Area::Outdoor),
            TableDefinition::new(3, 8, Area::SemiOutdoor),
        ])
        .unwrap();
        assert_eq!(catalog.total_seats(), 14);
        assert_eq!(catalog.table_count(), 3);
        assert_eq!(catalog.standard_table_seats(), STANDARD_TABLE_SEATS);
    }

    #[test]
    fn area_filter_preserves_order() {
        let catalog = TableCatalog::default_floor_plan();
        let outdoor: Vec<_> = catalog
            .tables_in_area(Area::Outdoor)
            .map(|t| t.number)
            .collect();
        assert_eq!(outdoor, vec![17, 18, 19, 20, 21, 22]);
    }

    #[test]
    fn default_floor_plan_shape() {
        let catalog = TableCatalog::default_floor_plan();
        assert_eq!(catalog.table_count(), 19);
        assert_eq!(catalog.total_seats(), 68);

        // Retired numbers never validate, even inside the populated span.
        for retired in [9, 13, 15] {
            assert!(!catalog.is_valid_table(retired));
            assert!(catalog.table(retired).is_none());
        }

        // Indoor four-tops are standalone-only.
        for n in 1..=8 {
            let t = catalog.table(n).unwrap();
            assert_eq!(t.area, Area::Indoor);
            assert!(!t.combinable);
        }

        // The linked pair is symmetric and carries the 8-seat table.
        assert_eq!(catalog.table(14).unwrap().linked_table, Some(16));
        assert_eq!(catalog.table(16).unwrap().linked_table, Some(14));
        assert_eq!(catalog.table(16).unwrap().capacity, 8);
    }

    #[test]
    fn loads_from_json() {
        let json = r#"[
            {"number": 1, "capacity": 4, "area": "indoor", "combinable": false},
            {"number": 14, "capacity": 4, "area": "semi-outdoor", "linked_table": 16},
            {"number": 16, "capacity": 8, "area": "semi-outdoor", "linked_table": 14},
            {"number": 20, "capacity": 2, "area": "outdoor"}
        ]"#;
        let catalog = TableCatalog::from_json(json).unwrap();
        assert_eq!(catalog.table_count(), 4);
        assert!(!catalog.table(1).unwrap().combinable);
        assert!(catalog.table(20).unwrap().freely_combinable());
        assert_eq!(catalog.table(14).unwrap().linked_table, Some(16));
    }

    #[test]
    fn bad_json_is_config_error() {
        let result = TableCatalog::from_json("{not json");
        assert!(matches!(result, Err(CatalogError::Config(_))));

        // Valid JSON, invalid area value.
        let result = TableCatalog::from_json(r#"[{"number":1,"capacity":4,"area":"roof"}]"#);
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }
}
