use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{MatchDraft, MatchRecord, MatchUpdate, Period, PeriodTotal};
use crate::store::{aggregate, MatchStore, StoreResult};

/// Match records held in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    next_id: u64,
    records: BTreeMap<u64, MatchRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &MatchRecord> {
        self.records.values()
    }
}

impl MatchStore for MemoryStore {
    fn check_conflict(
        &self,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> StoreResult<bool> {
        Ok(self
            .records
            .values()
            .any(|record| record.overlaps(date, start, end)))
    }

    fn insert(&mut self, draft: &MatchDraft) -> StoreResult<u64> {
        self.next_id = self.next_id.max(self.records.keys().last().copied().unwrap_or(0)) + 1;
        let id = self.next_id;
        self.records.insert(id, MatchRecord::from_draft(id, draft));
        Ok(id)
    }

    fn update(&mut self, id: u64, update: MatchUpdate) -> StoreResult<MatchRecord> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(StoreError::NotFound { id })?;
        record.apply(update);
        Ok(record.clone())
    }

    fn delete(&mut self, id: u64) -> StoreResult<MatchRecord> {
        self.records.remove(&id).ok_or(StoreError::NotFound { id })
    }

    fn get(&self, id: u64) -> StoreResult<Option<MatchRecord>> {
        Ok(self.records.get(&id).cloned())
    }

    fn query_by_date(&self, date: NaiveDate) -> StoreResult<Vec<MatchRecord>> {
        Ok(self
            .records
            .values()
            .filter(|record| record.date == date)
            .sorted_by_key(|record| (record.start_time, record.id))
            .cloned()
            .collect())
    }

    fn match_dates(&self) -> StoreResult<Vec<NaiveDate>> {
        Ok(self
            .records
            .values()
            .map(|record| record.date)
            .sorted()
            .dedup()
            .collect())
    }

    fn aggregate_by(&self, period: Period) -> StoreResult<Vec<PeriodTotal>> {
        Ok(aggregate(self.records.values(), period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::draft;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_conflict_half_open() {
        let mut store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        assert!(!store.check_conflict(date, t(13, 0), t(14, 0)).unwrap());

        store.insert(&draft((2025, 3, 8), (13, 0), 60)).unwrap();
        assert!(store.check_conflict(date, t(13, 30), t(14, 30)).unwrap());
        assert!(store.check_conflict(date, t(12, 30), t(13, 1)).unwrap());
        assert!(!store.check_conflict(date, t(14, 0), t(15, 0)).unwrap());
        assert!(!store.check_conflict(date, t(12, 0), t(13, 0)).unwrap());

        let next_day = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert!(!store.check_conflict(next_day, t(13, 0), t(14, 0)).unwrap());
    }

    #[test]
    fn test_crud() {
        let mut store = MemoryStore::new();
        let first = store.insert(&draft((2025, 3, 8), (15, 0), 100)).unwrap();
        let second = store.insert(&draft((2025, 3, 8), (10, 0), 100)).unwrap();
        assert_ne!(first, second);

        let day = store
            .query_by_date(NaiveDate::from_ymd_opt(2025, 3, 8).unwrap())
            .unwrap();
        assert_eq!(day.iter().map(|r| r.id).collect_vec(), [second, first]);

        let updated = store
            .update(
                first,
                MatchUpdate {
                    location: Some("Empire Field".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.location, "Empire Field");
        assert_eq!(store.get(first).unwrap(), Some(updated));

        store.delete(second).unwrap();
        assert_eq!(store.len(), 1);
        assert!(matches!(
            store.delete(second),
            Err(StoreError::NotFound { id }) if id == second
        ));
        assert!(matches!(
            store.update(99, MatchUpdate::default()),
            Err(StoreError::NotFound { id: 99 })
        ));
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut store = MemoryStore::new();
        let first = store.insert(&draft((2025, 3, 8), (9, 0), 100)).unwrap();
        store.delete(first).unwrap();
        let second = store.insert(&draft((2025, 3, 8), (9, 0), 100)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_match_dates() {
        let mut store = MemoryStore::new();
        store.insert(&draft((2025, 3, 9), (9, 0), 100)).unwrap();
        store.insert(&draft((2025, 3, 8), (9, 0), 100)).unwrap();
        store.insert(&draft((2025, 3, 8), (13, 0), 100)).unwrap();

        assert_eq!(
            store.match_dates().unwrap(),
            [
                NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            ]
        );
    }

    #[test]
    fn test_aggregate_by_period() {
        let mut store = MemoryStore::new();
        // Monday and Sunday of week 09, Monday of week 10, then April.
        store.insert(&draft((2025, 3, 3), (9, 0), 100)).unwrap();
        store.insert(&draft((2025, 3, 9), (9, 0), 100)).unwrap();
        store.insert(&draft((2025, 3, 10), (9, 0), 100)).unwrap();
        let april = store.insert(&draft((2025, 4, 2), (9, 0), 100)).unwrap();
        store
            .update(
                april,
                MatchUpdate {
                    amount: Some(40.0),
                    ..Default::default()
                },
            )
            .unwrap();

        let weekly = store.aggregate_by(Period::Week).unwrap();
        let weekly = weekly
            .iter()
            .map(|p| (p.period.as_str(), p.total, p.matches))
            .collect_vec();
        assert_eq!(
            weekly,
            [
                ("2025-09", 130.0, 2),
                ("2025-10", 65.0, 1),
                ("2025-13", 40.0, 1)
            ]
        );

        let monthly = store.aggregate_by(Period::Month).unwrap();
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].period, "2025-03");
        assert_eq!(monthly[0].total, 195.0);
        assert_eq!(monthly[1].total, 40.0);

        let yearly = store.aggregate_by(Period::Year).unwrap();
        assert_eq!(yearly.len(), 1);
        assert_eq!(yearly[0].total, 235.0);
        assert_eq!(yearly[0].matches, 4);
    }
}
