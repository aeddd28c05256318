use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{ExtractError, Result};
use crate::formats::{
    capture, datetime, Context, DEFAULT_LEAGUE, STANDARD_MATCH_MINUTES, UNKNOWN_DIVISION,
};
use crate::model::{DefaultPolicy, MatchDraft, Role, SourceFormat};

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(Referee|Assistant Referee(?:\s*\d+)?)\s*:(.*)$").expect("valid header pattern")
});
static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Two x (\d{1,3})\s*min\s*/\s*(\d{1,3})\s*min HT").expect("valid duration pattern")
});
static CUP_AFTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bCup\s+([A-Z])\b").expect("valid cup pattern"));
static CUP_BEFORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z])\s+Cup\b").expect("valid cup pattern"));
static SPL_LEAGUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]*SPL)\b").expect("valid league pattern"));
static SECONDARY_LEAGUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(BCCSL)\b").expect("valid league pattern"));
static DIVISION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bU(\d{2})(?:[ \t]*([A-Z0-9][A-Z0-9-]*)\b)?").expect("valid division pattern")
});

/// League that runs the cup competitions.
const CUP_LEAGUE: &str = "BCSPL";
const DETAIL_MARKER: char = '#';

/// One assignment: its header line and the lines up to the next header.
#[derive(Debug)]
struct Block<'t> {
    label: &'t str,
    header: &'t str,
    lines: Vec<&'t str>,
}

/// Extract every assignment in an Assignr paste.
///
/// Blocks that fail are logged and skipped; the rest are returned in order.
pub(crate) fn extract(text: &str, ctx: &Context) -> Result<Vec<MatchDraft>> {
    let blocks = split_blocks(text);
    let total = blocks.len();

    let drafts: Vec<MatchDraft> = blocks
        .iter()
        .enumerate()
        .filter_map(|(index, block)| match parse_block(block, ctx) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!(error = %e, index, label = block.label, "skipping unparsable assignr block");
                None
            }
        })
        .collect();

    debug!(blocks = total, count = drafts.len(), "parsed assignr assignments");
    if drafts.is_empty() {
        return Err(ExtractError::NoMatches {
            format: SourceFormat::Assignr,
        });
    }
    Ok(drafts)
}

fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks: Vec<Block> = vec![];
    for line in text.lines() {
        if let Some(caps) = HEADER.captures(line) {
            let (Some(label), Some(header)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            blocks.push(Block {
                label: label.as_str(),
                header: header.as_str(),
                lines: vec![],
            });
        } else if let Some(block) = blocks.last_mut() {
            block.lines.push(line);
        }
    }
    blocks
}

fn parse_block(block: &Block, ctx: &Context) -> Result<MatchDraft> {
    let missing = |field| ExtractError::FieldMissing {
        format: SourceFormat::Assignr,
        field,
    };

    let (when, location) = block.header.split_once('@').ok_or_else(|| missing("@"))?;
    let when = when.trim();
    let location = location.trim();
    if when.is_empty() {
        return Err(missing("date/time"));
    }
    if location.is_empty() {
        return Err(missing("location"));
    }

    let start =
        datetime::parse_datetime(when, ctx.reference).ok_or_else(|| ExtractError::DateParse {
            format: SourceFormat::Assignr,
            input: when.to_string(),
        })?;

    let details = block
        .lines
        .iter()
        .find_map(|line| line.trim_start().strip_prefix(DETAIL_MARKER))
        .map(str::trim)
        .unwrap_or_default();

    let mut defaults = vec![];
    let minutes = match duration_minutes(details) {
        Some(minutes) => minutes,
        None => {
            defaults.push(DefaultPolicy::StandardDuration);
            STANDARD_MATCH_MINUTES
        }
    };
    let end_time = datetime::end_after(start.time(), minutes)?;

    let role = if block.label.contains("Assistant") {
        Role::AssistantReferee
    } else {
        Role::Referee
    };

    let (league, cup) = infer_league(details);
    let league = league.unwrap_or_else(|| {
        defaults.push(DefaultPolicy::LeaguePlaceholder);
        DEFAULT_LEAGUE
    });
    let division = infer_division(details).unwrap_or_else(|| {
        defaults.push(DefaultPolicy::DivisionUnknown);
        UNKNOWN_DIVISION.to_string()
    });

    let mut match_name = format!("{league} {division}");
    match cup {
        Some(Cup::Lettered(letter)) => match_name.push_str(&format!(" Cup {letter}")),
        Some(Cup::Unlettered) => match_name.push_str(" Cup"),
        None => {}
    }

    let amount = ctx.rates.lookup(league, role, &division).unwrap_or_else(|| {
        defaults.push(DefaultPolicy::AmountZero);
        0.0
    });

    Ok(MatchDraft {
        league: league.to_string(),
        division,
        role,
        match_name,
        date: start.date(),
        start_time: start.time(),
        end_time,
        location: location.to_string(),
        amount,
        source: SourceFormat::Assignr,
        defaults,
    })
}

/// `Two x <N>min/<M>min HT` gives two halves of N and a break of M.
fn duration_minutes(details: &str) -> Option<u32> {
    let caps = DURATION.captures(details)?;
    let half: u32 = caps[1].parse().ok()?;
    let break_minutes: u32 = caps[2].parse().ok()?;
    Some(2 * half + break_minutes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cup<'t> {
    Lettered(&'t str),
    Unlettered,
}

fn infer_league(details: &str) -> (Option<&str>, Option<Cup<'_>>) {
    if details.contains("Cup") {
        let cup = capture(&CUP_AFTER, details)
            .or_else(|| capture(&CUP_BEFORE, details))
            .map_or(Cup::Unlettered, Cup::Lettered);
        return (Some(CUP_LEAGUE), Some(cup));
    }
    let league = capture(&SPL_LEAGUE, details).or_else(|| capture(&SECONDARY_LEAGUE, details));
    (league, None)
}

/// `U15`, `U16D3`, ...; the level is stripped of anything but letters and digits.
fn infer_division(details: &str) -> Option<String> {
    let caps = DIVISION.captures(details)?;
    let level: String = caps
        .get(2)
        .map(|m| m.as_str().chars().filter(char::is_ascii_alphanumeric).collect())
        .unwrap_or_default();
    Some(format!("U{}{level}", &caps[1]))
}
