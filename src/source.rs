use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;

use crate::model::ReservationRecord;

/// The reservation store was unreachable or returned garbage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError(pub String);

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "reservation store unavailable: {}", self.0)
    }
}

impl std::error::Error for SourceError {}

/// Seam between the allocation core and the caller's reservation store.
///
/// Implementations should return only confirmed reservations for the date;
/// the core filters by status again defensively, so over-returning is safe
/// and under-returning is not.
#[async_trait]
pub trait ReservationSource: Send + Sync {
    async fn confirmed_on(&self, date: NaiveDate) -> Result<Vec<ReservationRecord>, SourceError>;
}

#[async_trait]
impl<S: ReservationSource + ?Sized> ReservationSource for Arc<S> {
    async fn confirmed_on(&self, date: NaiveDate) -> Result<Vec<ReservationRecord>, SourceError> {
        (**self).confirmed_on(date).await
    }
}

/// Reference store for tests and embedders without a database.
#[derive(Default)]
pub struct InMemorySource {
    by_date: DashMap<NaiveDate, Vec<ReservationRecord>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: ReservationRecord) {
        self.by_date.entry(record.date).or_default().push(record);
    }

    /// Replace everything stored for one date.
    pub fn set_day(&self, date: NaiveDate, records: Vec<ReservationRecord>) {
        self.by_date.insert(date, records);
    }

    pub fn clear(&self) {
        self.by_date.clear();
    }
}

#[async_trait]
impl ReservationSource for InMemorySource {
    async fn confirmed_on(&self, date: NaiveDate) -> Result<Vec<ReservationRecord>, SourceError> {
        let records = self
            .by_date
            .get(&date)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        Ok(records
            .into_iter()
            .filter(ReservationRecord::occupies_capacity)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReservationStatus;
    use chrono::NaiveTime;
    use ulid::Ulid;

    fn record(date: NaiveDate, status: ReservationStatus) -> ReservationRecord {
        ReservationRecord {
            id: Ulid::new(),
            code: "RSV-1".into(),
            customer_name: "Rui".into(),
            date,
            time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            party_size: 2,
            status,
            tables: vec![],
        }
    }

    #[test]
    fn returns_only_confirmed_for_date() {
        let source = InMemorySource::new();
        let day = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        let other = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        source.insert(record(day, ReservationStatus::Confirmed));
        source.insert(record(day, ReservationStatus::PendingPayment));
        source.insert(record(other, ReservationStatus::Confirmed));

        let got = tokio_test::block_on(source.confirmed_on(day)).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].status, ReservationStatus::Confirmed);
    }

    #[test]
    fn empty_day_is_empty_not_error() {
        let source = InMemorySource::new();
        let day = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        assert!(tokio_test::block_on(source.confirmed_on(day)).unwrap().is_empty());
    }

    #[test]
    fn set_day_replaces() {
        let source = InMemorySource::new();
        let day = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        source.insert(record(day, ReservationStatus::Confirmed));
        source.set_day(day, vec![]);
        assert!(tokio_test::block_on(source.confirmed_on(day)).unwrap().is_empty());
    }
}
