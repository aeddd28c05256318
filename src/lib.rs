//! Track referee assignments and pull them out of assignment notification
//! emails.
//!
//! [`Extractor`] turns a pasted Spappz, COMET or Assignr notification into
//! [`MatchDraft`]s with pay filled in from a [`RateTable`]. A [`MatchStore`]
//! keeps accepted assignments and answers the conflict and income queries.

pub use error::{ExtractError, Result, StoreError};
pub use extractor::Extractor;
pub use formats::{classify, DEFAULT_LEAGUE, UNKNOWN_DIVISION};
pub use model::*;
pub use rates::RateTable;
pub use store::{
    default_end_time, intake, IntakeReport, JsonFileStore, MatchStore, MemoryStore, StoreResult,
};

mod error;
mod extractor;
pub mod formats;
mod model;
pub mod normalize;
pub mod rates;
pub mod store;
