use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::model::{MatchDraft, Role};

/// A persisted assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: u64,
    pub league: String,
    pub division: String,
    pub role: Role,
    pub match_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub amount: f64,
}

impl MatchRecord {
    pub fn from_draft(id: u64, draft: &MatchDraft) -> Self {
        Self {
            id,
            league: draft.league.clone(),
            division: draft.division.clone(),
            role: draft.role,
            match_name: draft.match_name.clone(),
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            location: draft.location.clone(),
            amount: draft.amount,
        }
    }

    /// Half-open `[start, end)` overlap with another span on the same date.
    pub fn overlaps(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> bool {
        self.date == date && start < self.end_time && end > self.start_time
    }

    /// Apply every field set in `update`.
    pub fn apply(&mut self, update: MatchUpdate) {
        let MatchUpdate {
            league,
            division,
            role,
            match_name,
            date,
            start_time,
            end_time,
            location,
            amount,
        } = update;
        if let Some(league) = league {
            self.league = league;
        }
        if let Some(division) = division {
            self.division = division;
        }
        if let Some(role) = role {
            self.role = role;
        }
        if let Some(match_name) = match_name {
            self.match_name = match_name;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(start_time) = start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = end_time {
            self.end_time = end_time;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(amount) = amount {
            self.amount = amount;
        }
    }
}

/// Partial edit of a [`MatchRecord`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchUpdate {
    pub league: Option<String>,
    pub division: Option<String>,
    pub role: Option<Role>,
    pub match_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub amount: Option<f64>,
}

/// Calendar period used to group income statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Year,
}

impl Period {
    /// Grouping key for `date`, e.g. `2025-09` for week 9 or month 9.
    pub fn key(self, date: NaiveDate) -> String {
        let format = match self {
            Period::Week => "%Y-%W",
            Period::Month => "%Y-%m",
            Period::Year => "%Y",
        };
        date.format(format).to_string()
    }
}

/// Income summed over one calendar period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTotal {
    pub period: String,
    pub total: f64,
    pub matches: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(start: (u32, u32), end: (u32, u32)) -> MatchRecord {
        MatchRecord {
            id: 1,
            league: "BCSPL".to_string(),
            division: "U15".to_string(),
            role: Role::Referee,
            match_name: "BCSPL U15".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            location: "Swangard Stadium".to_string(),
            amount: 65.0,
        }
    }

    #[test]
    fn test_overlap_is_half_open_and_symmetric() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();

        let a = record((13, 0), (14, 0));
        let b = record((13, 30), (14, 30));
        assert!(a.overlaps(date, b.start_time, b.end_time));
        assert!(b.overlaps(date, a.start_time, a.end_time));

        let c = record((14, 0), (15, 0));
        assert!(!a.overlaps(date, c.start_time, c.end_time));
        assert!(!c.overlaps(date, a.start_time, a.end_time));

        let other_day = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert!(!a.overlaps(other_day, t(13, 0), t(14, 0)));
    }

    #[test]
    fn test_apply_update_only_touches_set_fields() {
        let mut rec = record((10, 0), (11, 40));
        rec.apply(MatchUpdate {
            amount: Some(80.0),
            role: Some(Role::AssistantReferee),
            ..Default::default()
        });
        assert_eq!(rec.amount, 80.0);
        assert_eq!(rec.role, Role::AssistantReferee);
        assert_eq!(rec.league, "BCSPL");
        assert_eq!(rec.location, "Swangard Stadium");
    }

    #[test]
    fn test_period_keys() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_eq!(Period::Week.key(date), "2025-09");
        assert_eq!(Period::Month.key(date), "2025-03");
        assert_eq!(Period::Year.key(date), "2025");
    }
}
