//! Pipeline configuration

use crate::error::{ForecastError, ForecastResult};
use crate::schema::SOURCE_SHEET;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_STALE_AFTER_DAYS: i64 = 7;

/// Which descriptive row wins when a contact has several
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// Keep the first row seen in sheet order
    #[default]
    FirstSeen,
    /// Keep the row with the most recent `Updated`; ties keep the earlier row
    LatestUpdated,
}

impl FromStr for DedupPolicy {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "first-seen" | "first" => Ok(DedupPolicy::FirstSeen),
            "latest-updated" | "latest" => Ok(DedupPolicy::LatestUpdated),
            other => Err(ForecastError::Config(format!(
                "Unknown dedup policy '{}' (expected first-seen or latest-updated)",
                other
            ))),
        }
    }
}

impl fmt::Display for DedupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DedupPolicy::FirstSeen => write!(f, "first-seen"),
            DedupPolicy::LatestUpdated => write!(f, "latest-updated"),
        }
    }
}

/// Settings for one forecast run
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub sheet: String,
    pub stale_after_days: i64,
    pub dedup: DedupPolicy,
    /// Fixed "now" for the staleness check; `None` uses the local clock
    pub reference_time: Option<NaiveDateTime>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            sheet: SOURCE_SHEET.to_string(),
            stale_after_days: DEFAULT_STALE_AFTER_DAYS,
            dedup: DedupPolicy::default(),
            reference_time: None,
        }
    }
}

impl ForecastConfig {
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = sheet.into();
        self
    }

    pub fn with_stale_after_days(mut self, days: i64) -> Self {
        self.stale_after_days = days;
        self
    }

    pub fn with_dedup(mut self, dedup: DedupPolicy) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn with_reference_time(mut self, now: NaiveDateTime) -> Self {
        self.reference_time = Some(now);
        self
    }

    pub fn validate(&self) -> ForecastResult<()> {
        if self.sheet.trim().is_empty() {
            return Err(ForecastError::Config("Sheet name must not be empty".into()));
        }
        if self.stale_after_days < 0 {
            return Err(ForecastError::Config(format!(
                "Stale window must be non-negative, got {} days",
                self.stale_after_days
            )));
        }
        Ok(())
    }

    /// The instant staleness is measured against
    pub fn now(&self) -> NaiveDateTime {
        self.reference_time
            .unwrap_or_else(|| chrono::Local::now().naive_local())
    }
}
