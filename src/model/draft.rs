use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::model::{DefaultPolicy, Role, SourceFormat};

/// A fully extracted assignment that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDraft {
    pub league: String,
    pub division: String,
    pub role: Role,
    pub match_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub amount: f64,
    pub source: SourceFormat,
    /// Default policies applied while building this draft.
    pub defaults: Vec<DefaultPolicy>,
}

impl MatchDraft {
    /// Whether `policy` supplied one of this draft's values.
    pub fn is_defaulted(&self, policy: DefaultPolicy) -> bool {
        self.defaults.contains(&policy)
    }

    /// Length of the assignment in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}
