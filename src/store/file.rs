use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, instrument};

use crate::error::StoreError;
use crate::model::{MatchDraft, MatchRecord, MatchUpdate, Period, PeriodTotal};
use crate::store::{MatchStore, MemoryStore, StoreResult};

/// Match records kept in a local JSON file.
///
/// The whole file is loaded on open and rewritten after every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file is an empty store.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data)?,
            Err(e) if e.kind() == ErrorKind::NotFound => MemoryStore::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        debug!(records = inner.len(), "opened match store");
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the records and keep it only once the
    /// copy is on disk.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut MemoryStore) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut next = self.inner.clone();
        let value = change(&mut next)?;
        self.save(&next)?;
        self.inner = next;
        Ok(value)
    }

    fn save(&self, records: &MemoryStore) -> StoreResult<()> {
        let data = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, data).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl MatchStore for JsonFileStore {
    fn check_conflict(
        &self,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> StoreResult<bool> {
        self.inner.check_conflict(date, start, end)
    }

    #[instrument(skip_all, fields(date = %draft.date, match_name = %draft.match_name))]
    fn insert(&mut self, draft: &MatchDraft) -> StoreResult<u64> {
        let id = self.commit(|records| records.insert(draft))?;
        debug!(id, "stored match");
        Ok(id)
    }

    #[instrument(skip(self, update))]
    fn update(&mut self, id: u64, update: MatchUpdate) -> StoreResult<MatchRecord> {
        self.commit(|records| records.update(id, update))
    }

    #[instrument(skip(self))]
    fn delete(&mut self, id: u64) -> StoreResult<MatchRecord> {
        self.commit(|records| records.delete(id))
    }

    fn get(&self, id: u64) -> StoreResult<Option<MatchRecord>> {
        self.inner.get(id)
    }

    fn query_by_date(&self, date: NaiveDate) -> StoreResult<Vec<MatchRecord>> {
        self.inner.query_by_date(date)
    }

    fn match_dates(&self) -> StoreResult<Vec<NaiveDate>> {
        self.inner.match_dates()
    }

    fn aggregate_by(&self, period: Period) -> StoreResult<Vec<PeriodTotal>> {
        self.inner.aggregate_by(period)
    }
}
