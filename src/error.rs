use std::path::PathBuf;

use ::scraper::error::SelectorErrorKind;
use chrono::NaiveTime;

use crate::model::SourceFormat;

/// All errors that can occur while extracting drafts from pasted text.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// No known source format marker was found in the text.
    #[error("text does not match any known assignment format")]
    FormatUnrecognized,

    /// A required field is absent from text in an otherwise recognized format.
    #[error("{format}: required field `{field}` not found")]
    FieldMissing {
        format: SourceFormat,
        field: &'static str,
    },

    /// A date/time expression could not be turned into a date and a time.
    #[error("{format}: failed to parse date/time from {input:?}")]
    DateParse { format: SourceFormat, input: String },

    /// Start plus duration does not end later on the same day.
    #[error("match starting at {start} lasting {minutes} min does not end on the same day")]
    InvalidSpan { start: NaiveTime, minutes: u32 },

    /// The format was recognized but every candidate in it failed.
    #[error("{format}: no assignment could be extracted")]
    NoMatches { format: SourceFormat },

    /// A CSS selector used for HTML rendering could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),
}

impl<'a> From<SelectorErrorKind<'a>> for ExtractError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        ExtractError::Selector(err.to_string())
    }
}

/// All errors that can occur in a match store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("i/o failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The backing file could not be (de)serialized.
    #[error("invalid store data: {0}")]
    Json(#[from] serde_json::Error),

    /// No record exists with the given id.
    #[error("no match record with id {id}")]
    NotFound { id: u64 },
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;
