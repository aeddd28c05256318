use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, instrument, warn};

use crate::error::{ExtractError, Result};
use crate::formats::{self, Context};
use crate::model::{MatchDraft, SourceFormat};
use crate::normalize;
use crate::rates::RateTable;

/// The main entry point for turning pasted assignment notifications into drafts.
///
/// `Extractor` holds the rate table used for pay inference and the reference
/// date used to complete dates that omit the year.
///
/// # Examples
///
/// ```
/// use refsched::{Extractor, Role};
///
/// let text = "Role: Referee\nDivision: Premier\n\
///             Schedule date/time: Monday, March 3 2025 1:00 PM\n\
///             Field Name: Central Park\nCity: Vancouver\n\
///             Home Team: Lions\nVisiting Team: Tigers";
///
/// let drafts = Extractor::new().extract(text);
/// assert_eq!(drafts.len(), 1);
/// assert_eq!(drafts[0].role, Role::Referee);
/// assert_eq!(drafts[0].match_name, "Lions vs Tigers");
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    rates: Arc<RateTable>,
    reference: NaiveDate,
}

impl Extractor {
    /// Create an extractor with the built-in rate table and today as reference date.
    pub fn new() -> Self {
        Self {
            rates: RateTable::shared(),
            reference: Local::now().date_naive(),
        }
    }

    /// Use `rates` instead of the built-in rate table.
    pub fn with_rates(mut self, rates: RateTable) -> Self {
        self.rates = Arc::new(rates);
        self
    }

    /// Resolve year-less dates, `today` and `tomorrow` against `date`.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference = date;
        self
    }

    /// The rate table used to infer pay amounts.
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Detect which notification layout `text` uses.
    pub fn classify(&self, text: &str) -> SourceFormat {
        normalize::to_plain_text(text)
            .map(|text| formats::classify(&text))
            .unwrap_or(SourceFormat::Unknown)
    }

    /// Extract every valid draft from `text`.
    ///
    /// Unknown formats and failed extractions both yield an empty list; use
    /// [`try_extract`](Self::try_extract) to tell them apart.
    #[instrument(skip_all, fields(len = text.len()))]
    pub fn extract(&self, text: &str) -> Vec<MatchDraft> {
        match self.try_extract(text) {
            Ok(drafts) => drafts,
            Err(ExtractError::FormatUnrecognized) => {
                debug!("no known assignment format in text");
                vec![]
            }
            Err(e) => {
                warn!(error = %e, "failed to extract assignments");
                vec![]
            }
        }
    }

    /// Extract drafts from `text`, reporting why nothing could be extracted.
    #[instrument(skip_all, fields(len = text.len()))]
    pub fn try_extract(&self, text: &str) -> Result<Vec<MatchDraft>> {
        let text = normalize::to_plain_text(text)?;
        let format = formats::classify(&text);
        let ctx = Context {
            rates: &self.rates,
            reference: self.reference,
        };
        let drafts = format.extract(&text, &ctx)?;
        debug!(%format, count = drafts.len(), "extracted assignments");
        Ok(drafts)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
