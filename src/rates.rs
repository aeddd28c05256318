//! Pay rates per league, role and age bracket.
//!
//! The built-in table covers the youth leagues whose assignments carry an
//! age bracket in their division. Flat-rate rules for leagues that pay by
//! tier instead of bracket live here as well.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::model::Role;

static AGE_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"U(\d{2})").expect("valid age bracket pattern"));

static BUILTIN: LazyLock<Arc<RateTable>> = LazyLock::new(|| Arc::new(RateTable::builtin()));

const SPAPPZ_PREMIUM_KEYWORDS: [&str; 3] = ["Premier", "Prime", "Imperial Cup"];

/// (base, premium) flat rates for Spappz leagues.
const SPAPPZ_REFEREE: (f64, f64) = (60.0, 90.0);
const SPAPPZ_AR: (f64, f64) = (45.0, 70.0);

/// Flat pair paid for provincial cup games.
const CUP_REFEREE: f64 = 85.0;
const CUP_AR: f64 = 60.0;

/// Static mapping of league code → role → age bracket → rate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    leagues: HashMap<String, HashMap<Role, BTreeMap<String, f64>>>,
}

impl RateTable {
    /// An empty table; every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared built-in table.
    pub fn shared() -> Arc<RateTable> {
        Arc::clone(&BUILTIN)
    }

    /// Add or replace a single rate.
    pub fn with_rate(
        mut self,
        league: impl Into<String>,
        role: Role,
        bracket: impl Into<String>,
        amount: f64,
    ) -> Self {
        self.leagues
            .entry(league.into())
            .or_default()
            .entry(role)
            .or_default()
            .insert(bracket.into(), amount.max(0.0));
        self
    }

    fn with_ladder(self, league: &str, role: Role, rates: &[(&str, f64)]) -> Self {
        rates.iter().fold(self, |table, &(bracket, amount)| {
            table.with_rate(league, role, bracket, amount)
        })
    }

    fn builtin() -> Self {
        use Role::{AssistantReferee as Ar, Referee as Ref};

        Self::new()
            .with_ladder(
                "BCSPL",
                Ref,
                &[
                    ("U13", 55.0),
                    ("U14", 60.0),
                    ("U15", 65.0),
                    ("U16", 70.0),
                    ("U17", 75.0),
                    ("U18", 80.0),
                ],
            )
            .with_ladder(
                "BCSPL",
                Ar,
                &[
                    ("U13", 40.0),
                    ("U14", 42.0),
                    ("U15", 45.0),
                    ("U16", 48.0),
                    ("U17", 50.0),
                    ("U18", 55.0),
                ],
            )
            .with_ladder(
                "BCCSL",
                Ref,
                &[
                    ("U13", 45.0),
                    ("U14", 50.0),
                    ("U15", 55.0),
                    ("U16", 60.0),
                    ("U17", 65.0),
                    ("U18", 70.0),
                    ("U15D3", 45.0),
                    ("U16D3", 50.0),
                    ("U17D3", 55.0),
                    ("U18D3", 60.0),
                ],
            )
            .with_ladder(
                "BCCSL",
                Ar,
                &[
                    ("U13", 32.0),
                    ("U14", 35.0),
                    ("U15", 38.0),
                    ("U16", 40.0),
                    ("U17", 45.0),
                    ("U18", 48.0),
                    ("U15D3", 31.0),
                    ("U16D3", 33.0),
                    ("U17D3", 38.0),
                    ("U18D3", 41.0),
                ],
            )
    }

    /// Rate for the given assignment, or `None` if the table has no entry.
    ///
    /// Roles other than referee and assistant referee are paid as referee.
    pub fn lookup(&self, league: &str, role: Role, division: &str) -> Option<f64> {
        let role = match role {
            Role::Referee | Role::AssistantReferee => role,
            Role::FourthOfficial | Role::Official => Role::Referee,
        };
        let bracket = bracket_key(division)?;
        self.leagues
            .get(league)?
            .get(&role)?
            .get(&bracket)
            .copied()
    }

    /// Like [`lookup`](Self::lookup), but a miss pays zero.
    pub fn infer(&self, league: &str, role: Role, division: &str) -> f64 {
        self.lookup(league, role, division).unwrap_or(0.0)
    }
}

/// Age bracket key of a division: `U16` for "U16 Girls", `U16D3` for "U16 D3".
pub fn bracket_key(division: &str) -> Option<String> {
    let age = AGE_BRACKET.captures(division)?.get(1)?.as_str();
    if division.contains("D3") {
        Some(format!("U{age}D3"))
    } else {
        Some(format!("U{age}"))
    }
}

/// Spappz leagues pay a flat rate per role, higher for premium divisions.
pub fn spappz_rate(role: Role, division: &str) -> f64 {
    let premium = SPAPPZ_PREMIUM_KEYWORDS
        .iter()
        .any(|keyword| division.contains(keyword));
    let (base, top) = match role {
        Role::AssistantReferee => SPAPPZ_AR,
        _ => SPAPPZ_REFEREE,
    };
    if premium {
        top
    } else {
        base
    }
}

/// Flat cup rate for referee and assistant referee; other roles are unpaid.
pub fn cup_rate(role: Role) -> Option<f64> {
    match role {
        Role::Referee => Some(CUP_REFEREE),
        Role::AssistantReferee => Some(CUP_AR),
        Role::FourthOfficial | Role::Official => None,
    }
}
