//! Persistence of accepted assignments and the income queries over them.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::StoreError;
use crate::model::{MatchDraft, MatchRecord, MatchUpdate, Period, PeriodTotal};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Playing time plus break assumed for manually entered matches.
const MANUAL_MATCH_MINUTES: i64 = 90;
const MANUAL_BREAK_MINUTES: i64 = 10;

/// Storage for match records.
pub trait MatchStore {
    /// Whether `[start, end)` overlaps any stored match on `date`.
    fn check_conflict(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime)
        -> StoreResult<bool>;

    /// Persist `draft` and return the id assigned to it.
    fn insert(&mut self, draft: &MatchDraft) -> StoreResult<u64>;

    /// Apply `update` to the record `id` and return the updated record.
    fn update(&mut self, id: u64, update: MatchUpdate) -> StoreResult<MatchRecord>;

    /// Remove the record `id` and return it.
    fn delete(&mut self, id: u64) -> StoreResult<MatchRecord>;

    fn get(&self, id: u64) -> StoreResult<Option<MatchRecord>>;

    /// Matches on `date`, ordered by start time.
    fn query_by_date(&self, date: NaiveDate) -> StoreResult<Vec<MatchRecord>>;

    /// Distinct dates that have at least one match, ascending.
    fn match_dates(&self) -> StoreResult<Vec<NaiveDate>>;

    /// Income per calendar period, ordered by period key.
    fn aggregate_by(&self, period: Period) -> StoreResult<Vec<PeriodTotal>>;
}

/// Outcome of persisting a batch of drafts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntakeReport {
    /// Ids of the inserted drafts, in input order.
    pub added: Vec<u64>,
    /// Drafts rejected because they overlap a stored match.
    pub conflicts: Vec<MatchDraft>,
}

/// Insert each draft that does not conflict with what is already stored.
///
/// Drafts are handled in order, so a batch can conflict with itself.
#[instrument(skip_all)]
pub fn intake<S, I>(store: &mut S, drafts: I) -> StoreResult<IntakeReport>
where
    S: MatchStore + ?Sized,
    I: IntoIterator<Item = MatchDraft>,
{
    let mut report = IntakeReport::default();
    for draft in drafts {
        if store.check_conflict(draft.date, draft.start_time, draft.end_time)? {
            debug!(match_name = %draft.match_name, date = %draft.date, "time conflict");
            report.conflicts.push(draft);
        } else {
            report.added.push(store.insert(&draft)?);
        }
    }
    debug!(
        added = report.added.len(),
        conflicts = report.conflicts.len(),
        "intake finished"
    );
    Ok(report)
}

/// End time of a manually entered match starting at `start`, or `None` if
/// it would run past midnight.
pub fn default_end_time(start: NaiveTime) -> Option<NaiveTime> {
    let length = TimeDelta::minutes(MANUAL_MATCH_MINUTES + MANUAL_BREAK_MINUTES);
    let (end, overflow) = start.overflowing_add_signed(length);
    (overflow == 0).then_some(end)
}

/// Sum `records` by `period`, ordered by period key.
pub(crate) fn aggregate<'a>(
    records: impl IntoIterator<Item = &'a MatchRecord>,
    period: Period,
) -> Vec<PeriodTotal> {
    let mut totals: std::collections::BTreeMap<String, PeriodTotal> = Default::default();
    for record in records {
        let key = period.key(record.date);
        let entry = totals.entry(key.clone()).or_insert_with(|| PeriodTotal {
            period: key,
            total: 0.0,
            matches: 0,
        });
        entry.total += record.amount;
        entry.matches += 1;
    }
    totals.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, SourceFormat};

    pub(crate) fn draft(date: (i32, u32, u32), start: (u32, u32), minutes: i64) -> MatchDraft {
        let start_time = NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap();
        MatchDraft {
            league: "BCSPL".to_string(),
            division: "U15".to_string(),
            role: Role::Referee,
            match_name: format!("BCSPL U15 {}:{:02}", start.0, start.1),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            start_time,
            end_time: start_time + TimeDelta::minutes(minutes),
            location: "Burnaby Lake West".to_string(),
            amount: 65.0,
            source: SourceFormat::Assignr,
            defaults: vec![],
        }
    }

    #[test]
    fn test_intake_skips_conflicts_within_batch() {
        let mut store = MemoryStore::new();
        let batch = vec![
            draft((2025, 3, 8), (13, 0), 60),
            draft((2025, 3, 8), (13, 30), 60),
            draft((2025, 3, 8), (14, 0), 60),
        ];
        let report = intake(&mut store, batch).unwrap();

        assert_eq!(report.added.len(), 2);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].match_name, "BCSPL U15 13:30");
    }

    #[test]
    fn test_intake_takes_lazy_iterator() {
        let mut store = MemoryStore::new();
        let batch = (8..11).map(|hour| draft((2025, 3, 9), (hour, 0), 50));
        let report = intake(&mut store, batch).unwrap();

        assert_eq!(report.added, vec![1, 2, 3]);
        assert!(report.conflicts.is_empty());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_extracted_draft_never_conflicts_with_empty_store() {
        let store = MemoryStore::new();
        let text = "Referee: Sat, Mar 8, 2025 10:00 AM @ Field A\n# BCSPL U15\n\
                    Assistant Referee: Sat, Mar 8, 2025 10:30 AM @ Field B\n# BCSPL U16";
        let drafts = crate::Extractor::new().extract(text);
        assert_eq!(drafts.len(), 2);
        for draft in &drafts {
            assert!(!store
                .check_conflict(draft.date, draft.start_time, draft.end_time)
                .unwrap());
        }
    }

    #[test]
    fn test_default_end_time() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(default_end_time(t(18, 0)), Some(t(19, 40)));
        assert_eq!(default_end_time(t(23, 0)), None);
    }
}
