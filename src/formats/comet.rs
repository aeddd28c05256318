use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::formats::{
    capture, datetime, Context, DEFAULT_LEAGUE, STANDARD_MATCH_MINUTES, UNKNOWN_DIVISION,
};
use crate::model::{DefaultPolicy, MatchDraft, Role, SourceFormat};
use crate::rates;

static ROLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"appointed as (.*?) of the match").expect("valid role pattern"));
static TEAMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"of the match (.*?) and the status").expect("valid teams pattern")
});
static MATCH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Match Date:\s*(\d{2}\.\d{2}\.\d{4}) (\d{2}:\d{2})").expect("valid date pattern")
});
static STADIUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Stadium:\s*(.*?)\s*\(").expect("valid stadium pattern"));
static CITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Stadium:.*\((.*?)\)").expect("valid city pattern"));
static COMPETITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Competition:[ \t]*(.*)").expect("valid competition pattern"));

/// Leagues named by two words; tried before the one-word codes.
const TWO_WORD_LEAGUES: [&str; 2] = ["BC Soccer", "Canada Soccer"];
const ONE_WORD_LEAGUES: [&str; 3] = ["BCSPL", "BCCSL", "BCSA"];

/// The provincial body whose cup games pay a flat rate.
const GENERIC_BODY: &str = "BC Soccer";
/// The premier youth league, paid per age bracket.
const PREMIER_LEAGUE: &str = "BCSPL";

const OPPONENT_PLACEHOLDER: &str = "TBD";

/// Extract the appointment described by a COMET notification.
///
/// Every group is required; a single missing one fails the whole record.
pub(crate) fn extract(text: &str, ctx: &Context) -> Result<MatchDraft> {
    let missing = |field| ExtractError::FieldMissing {
        format: SourceFormat::Comet,
        field,
    };

    let role_raw = capture(&ROLE, text).ok_or_else(|| missing("role"))?;
    let teams = capture(&TEAMS, text).ok_or_else(|| missing("teams"))?;
    let date_caps = MATCH_DATE
        .captures(text)
        .ok_or_else(|| missing("Match Date"))?;
    let stadium = capture(&STADIUM, text).ok_or_else(|| missing("Stadium"))?;
    let city = capture(&CITY, text).ok_or_else(|| missing("city"))?;
    let competition = capture(&COMPETITION, text).ok_or_else(|| missing("Competition"))?;

    let start = datetime::parse_strict(&date_caps[1], &date_caps[2]).ok_or_else(|| {
        ExtractError::DateParse {
            format: SourceFormat::Comet,
            input: date_caps[0].to_string(),
        }
    })?;
    let end_time = datetime::end_after(start.time(), STANDARD_MATCH_MINUTES)?;

    let mut defaults = vec![];
    let role = classify_role(role_raw);

    let (home, away) = split_teams(teams);
    let away = away.unwrap_or_else(|| {
        defaults.push(DefaultPolicy::OpponentTbd);
        OPPONENT_PLACEHOLDER
    });

    let (league, division) = split_competition(competition);
    let league = league.unwrap_or_else(|| {
        defaults.push(DefaultPolicy::LeaguePlaceholder);
        DEFAULT_LEAGUE
    });
    let division = if division.is_empty() {
        defaults.push(DefaultPolicy::DivisionUnknown);
        UNKNOWN_DIVISION.to_string()
    } else {
        division
    };

    let amount = infer_amount(ctx, league, role, &division);
    if amount.is_none() {
        defaults.push(DefaultPolicy::AmountZero);
    }

    let draft = MatchDraft {
        league: league.to_string(),
        division,
        role,
        match_name: format!("{home} vs {away}"),
        date: start.date(),
        start_time: start.time(),
        end_time,
        location: format!("{stadium}, {city}"),
        amount: amount.unwrap_or(0.0),
        source: SourceFormat::Comet,
        defaults,
    };
    debug!(match_name = %draft.match_name, league = %draft.league, role = %draft.role, "parsed comet appointment");
    Ok(draft)
}

fn classify_role(raw: &str) -> Role {
    let raw = raw.to_lowercase();
    if raw.contains("4th official") {
        Role::FourthOfficial
    } else if raw.contains("assistant") {
        Role::AssistantReferee
    } else if raw.contains("referee") {
        Role::Referee
    } else {
        Role::Official
    }
}

fn split_teams(teams: &str) -> (&str, Option<&str>) {
    match teams.split_once(" - ") {
        Some((home, away)) if !away.trim().is_empty() => (home.trim(), Some(away.trim())),
        Some((home, _)) => (home.trim(), None),
        None => (teams.trim(), None),
    }
}

/// Split competition text into a known league and the remaining division.
fn split_competition(competition: &str) -> (Option<&'static str>, String) {
    let words = competition.split_whitespace().collect_vec();

    if words.len() >= 2 {
        let two = words[..2].join(" ");
        if let Some(&league) = TWO_WORD_LEAGUES.iter().find(|&&l| l == two) {
            return (Some(league), words[2..].join(" "));
        }
    }
    if let Some(first) = words.first() {
        if let Some(&league) = ONE_WORD_LEAGUES.iter().find(|&l| l == first) {
            return (Some(league), words[1..].join(" "));
        }
    }
    (None, words.join(" "))
}

fn infer_amount(ctx: &Context, league: &str, role: Role, division: &str) -> Option<f64> {
    match league {
        GENERIC_BODY if division.contains("Cup") => rates::cup_rate(role),
        PREMIER_LEAGUE => {
            let bracket = division.split_whitespace().last()?;
            ctx.rates.lookup(league, role, bracket)
        }
        _ => None,
    }
}
