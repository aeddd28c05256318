use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

/// Officiating role on a match.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
pub enum Role {
    #[default]
    Referee,
    #[serde(rename = "AR")]
    #[strum(serialize = "AR")]
    AssistantReferee,
    #[serde(rename = "4th")]
    #[strum(serialize = "4th")]
    FourthOfficial,
    Official,
}

/// Known assignment notification layouts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
pub enum SourceFormat {
    Spappz,
    Comet,
    Assignr,
    Unknown,
}

/// A named rule that filled in a value the source text did not state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DefaultPolicy {
    /// No known league marker; league is [`DEFAULT_LEAGUE`](crate::DEFAULT_LEAGUE).
    LeaguePlaceholder,
    /// No age bracket found; division is [`UNKNOWN_DIVISION`](crate::UNKNOWN_DIVISION).
    DivisionUnknown,
    /// No rate rule matched; amount is zero.
    AmountZero,
    /// No duration stated; two 45 min halves and a 10 min break.
    StandardDuration,
    /// Only one side of the fixture was named.
    OpponentTbd,
}
