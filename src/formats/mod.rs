pub(crate) mod assignr;
pub(crate) mod comet;
pub mod datetime;
pub(crate) mod spappz;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{ExtractError, Result};
use crate::model::{MatchDraft, SourceFormat};
use crate::rates::RateTable;

/// League code used when no known league can be recovered from the text.
pub const DEFAULT_LEAGUE: &str = "OTHER";
/// Division used when no age bracket can be recovered from the text.
pub const UNKNOWN_DIVISION: &str = "Unknown";

/// Standard fixture length: two 45 minute halves and a 10 minute break.
pub(crate) const STANDARD_HALF_MINUTES: u32 = 45;
pub(crate) const STANDARD_BREAK_MINUTES: u32 = 10;
pub(crate) const STANDARD_MATCH_MINUTES: u32 = 2 * STANDARD_HALF_MINUTES + STANDARD_BREAK_MINUTES;

/// Everything an extractor needs besides the text itself.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Context<'a> {
    pub rates: &'a RateTable,
    pub reference: NaiveDate,
}

/// Pick the extractor for `text`. Markers are checked in a fixed order and
/// the first hit wins.
pub fn classify(text: &str) -> SourceFormat {
    if text.contains("Schedule date/time") {
        SourceFormat::Spappz
    } else if text.contains("appointed as") && text.contains("Match Date") {
        SourceFormat::Comet
    } else if text.contains("Referee:") || text.contains("Assistant Referee") {
        SourceFormat::Assignr
    } else {
        SourceFormat::Unknown
    }
}

impl SourceFormat {
    pub(crate) fn extract(self, text: &str, ctx: &Context) -> Result<Vec<MatchDraft>> {
        match self {
            SourceFormat::Spappz => spappz::extract(text, ctx).map(|draft| vec![draft]),
            SourceFormat::Comet => comet::extract(text, ctx).map(|draft| vec![draft]),
            SourceFormat::Assignr => assignr::extract(text, ctx),
            SourceFormat::Unknown => Err(ExtractError::FormatUnrecognized),
        }
    }
}

/// First capture group of `pattern` in `text`, trimmed; `None` when absent or blank.
pub(crate) fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify("Schedule date/time: x\nReferee: y"), SourceFormat::Spappz);
        assert_eq!(
            classify("You have been appointed as Referee ... Match Date: 01.01.2025 10:00"),
            SourceFormat::Comet
        );
        assert_eq!(
            classify("appointed as Referee, no date line"),
            SourceFormat::Unknown
        );
        assert_eq!(classify("Referee: Sat @ Park"), SourceFormat::Assignr);
        assert_eq!(classify("Assistant Referee 2 - see below"), SourceFormat::Assignr);
        assert_eq!(classify("Dinner on Friday?"), SourceFormat::Unknown);
    }

    #[test]
    fn test_unknown_format_is_unrecognized() {
        let rates = RateTable::new();
        let ctx = Context {
            rates: &rates,
            reference: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        };
        assert_eq!(
            SourceFormat::Unknown.extract("hello", &ctx),
            Err(ExtractError::FormatUnrecognized)
        );
    }
}
