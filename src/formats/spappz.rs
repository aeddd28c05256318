use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::formats::{datetime, Context, DEFAULT_LEAGUE, STANDARD_MATCH_MINUTES};
use crate::model::{DefaultPolicy, MatchDraft, Role, SourceFormat};
use crate::rates;

/// Known league names and abbreviations, checked in order.
const LEAGUE_MARKERS: [(&str, &str); 8] = [
    ("Vancouver Metro Soccer League", "VMSL"),
    ("VMSL", "VMSL"),
    ("Pacific Coast Soccer League", "PCSL"),
    ("PCSL", "PCSL"),
    ("Fraser Valley Soccer League", "FVSL"),
    ("FVSL", "FVSL"),
    ("Metro Women's Soccer League", "MWSL"),
    ("MWSL", "MWSL"),
];

/// Extract the single fixture described by a Spappz notification.
pub(crate) fn extract(text: &str, ctx: &Context) -> Result<MatchDraft> {
    let role = labeled(text, "Role")?;
    let division = labeled(text, "Division")?;
    let schedule = labeled(text, "Schedule date/time")?;
    let field_name = labeled(text, "Field Name")?;
    let city = labeled(text, "City")?;
    let home_team = labeled(text, "Home Team")?;
    let visiting_team = labeled(text, "Visiting Team")?;

    let role = if role.contains("Assistant") {
        Role::AssistantReferee
    } else {
        Role::Referee
    };

    let start = datetime::parse_datetime(schedule, ctx.reference).ok_or_else(|| {
        ExtractError::DateParse {
            format: SourceFormat::Spappz,
            input: schedule.to_string(),
        }
    })?;
    let end_time = datetime::end_after(start.time(), STANDARD_MATCH_MINUTES)?;

    let mut defaults = vec![];
    let league = match infer_league(text) {
        Some(code) => code,
        None => {
            defaults.push(DefaultPolicy::LeaguePlaceholder);
            DEFAULT_LEAGUE
        }
    };

    let draft = MatchDraft {
        league: league.to_string(),
        division: division.to_string(),
        role,
        match_name: format!("{home_team} vs {visiting_team}"),
        date: start.date(),
        start_time: start.time(),
        end_time,
        location: format!("{field_name}, {city}"),
        amount: rates::spappz_rate(role, division),
        source: SourceFormat::Spappz,
        defaults,
    };
    debug!(match_name = %draft.match_name, league = %draft.league, "parsed spappz assignment");
    Ok(draft)
}

/// Value of the first `label:` line, trimmed.
fn labeled<'t>(text: &'t str, label: &'static str) -> Result<&'t str> {
    text.lines()
        .find_map(|line| {
            line.split_once(label)
                .and_then(|(_, rest)| rest.strip_prefix(':'))
        })
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ExtractError::FieldMissing {
            format: SourceFormat::Spappz,
            field: label,
        })
}

fn infer_league(text: &str) -> Option<&'static str> {
    LEAGUE_MARKERS
        .iter()
        .find(|(marker, _)| text.contains(marker))
        .map(|&(_, code)| code)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::rates::RateTable;

    const NOTIFICATION: &str = "Role: Assistant Referee\nDivision: Premier\nSchedule date/time: Monday, March 3 2025 1:00 PM\nField Name: Central Park\nCity: Vancouver\nHome Team: Lions\nVisiting Team: Tigers";

    fn extract_with_defaults(text: &str) -> Result<MatchDraft> {
        let rates = RateTable::new();
        let ctx = Context {
            rates: &rates,
            reference: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        };
        extract(text, &ctx)
    }

    #[test]
    fn test_extract_notification() {
        let draft = extract_with_defaults(NOTIFICATION).unwrap();

        assert_eq!(draft.role, Role::AssistantReferee);
        assert_eq!(draft.division, "Premier");
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(draft.start_time, NaiveTime::from_hms_opt(13, 0, 0).unwrap());
        assert_eq!(draft.end_time, NaiveTime::from_hms_opt(14, 40, 0).unwrap());
        assert_eq!(draft.match_name, "Lions vs Tigers");
        assert_eq!(draft.location, "Central Park, Vancouver");
        assert_eq!(draft.amount, 70.0);
        assert_eq!(draft.league, DEFAULT_LEAGUE);
        assert!(draft.is_defaulted(DefaultPolicy::LeaguePlaceholder));
    }

    #[test]
    fn test_referee_base_tier_with_known_league() {
        let text = NOTIFICATION
            .replace("Assistant Referee", "Referee")
            .replace("Premier", "Division 4")
            + "\n\nThis game is part of the Vancouver Metro Soccer League schedule.";
        let draft = extract_with_defaults(&text).unwrap();

        assert_eq!(draft.role, Role::Referee);
        assert_eq!(draft.amount, 60.0);
        assert_eq!(draft.league, "VMSL");
        assert!(draft.defaults.is_empty());
        assert_eq!(draft.duration_minutes(), 100);
    }

    #[test]
    fn test_missing_label_fails() {
        let text = NOTIFICATION.replace("City: Vancouver\n", "");
        assert_eq!(
            extract_with_defaults(&text),
            Err(ExtractError::FieldMissing {
                format: SourceFormat::Spappz,
                field: "City",
            })
        );
    }

    #[test]
    fn test_blank_label_fails() {
        let text = NOTIFICATION.replace("Home Team: Lions", "Home Team:   ");
        assert!(matches!(
            extract_with_defaults(&text),
            Err(ExtractError::FieldMissing {
                field: "Home Team",
                ..
            })
        ));
    }

    #[test]
    fn test_unparseable_schedule_fails() {
        let text = NOTIFICATION.replace("Monday, March 3 2025 1:00 PM", "to be confirmed");
        assert!(matches!(
            extract_with_defaults(&text),
            Err(ExtractError::DateParse { .. })
        ));
    }
}
