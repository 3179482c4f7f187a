//! Share options, expiry policy, and share results.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::file::PendingFile;
use crate::types::id::DocumentNo;

/// Longest day-count expiry accepted.
pub const MAX_EXPIRY_DAYS: u32 = 36_500;

/// When a shared link stops working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Expiry {
    /// The link never expires.
    #[default]
    Never,
    /// The link expires the given number of days after creation.
    Days(u32),
    /// The link expires at a fixed instant.
    Until(DateTime<Utc>),
}

impl Expiry {
    /// Expire after `n` days; zero days means never.
    pub fn days(n: u32) -> Self {
        if n == 0 { Self::Never } else { Self::Days(n) }
    }

    /// Expire at a fixed instant, rejected when it lies before `now`.
    pub fn until(at: DateTime<Utc>, now: DateTime<Utc>) -> Result<Self, AppError> {
        if at < now {
            return Err(AppError::validation(format!(
                "expiry date {} is in the past",
                at.format("%Y-%m-%d")
            )));
        }
        Ok(Self::Until(at))
    }

    /// Expire at midnight UTC of a calendar date later than today.
    pub fn on_date(date: NaiveDate, now: DateTime<Utc>) -> Result<Self, AppError> {
        if date <= now.date_naive() {
            return Err(AppError::validation(format!(
                "expiry date {date} must be later than today"
            )));
        }
        let at = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| AppError::validation("invalid expiry date"))?
            .and_utc();
        Self::until(at, now)
    }

    /// Parse `never`, `N`, `Nd`, or `YYYY-MM-DD` relative to `now`.
    pub fn parse_at(input: &str, now: DateTime<Utc>) -> Result<Self, AppError> {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("never") {
            return Ok(Self::Never);
        }

        let digits = input.strip_suffix(['d', 'D']).unwrap_or(input);
        if let Ok(n) = digits.parse::<u64>() {
            let days = u32::try_from(n).unwrap_or(u32::MAX);
            let expiry = Self::days(days);
            expiry.validate()?;
            return Ok(expiry);
        }

        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
            AppError::validation(format!(
                "invalid expiry '{input}': expected never, a number of days, or YYYY-MM-DD"
            ))
        })?;
        Self::on_date(date, now)
    }

    /// Check that the policy can be resolved to an instant.
    pub fn validate(&self) -> Result<(), AppError> {
        match self {
            Self::Days(n) if *n > MAX_EXPIRY_DAYS => Err(AppError::validation(format!(
                "expiry of {n} days exceeds the maximum of {MAX_EXPIRY_DAYS} days"
            ))),
            _ => Ok(()),
        }
    }

    /// Numeric encoding sent by both client shapes: `0` never, `n` days, `-1` custom.
    pub fn wire_days(&self) -> i64 {
        match self {
            Self::Never => 0,
            Self::Days(n) => i64::from(*n),
            Self::Until(_) => -1,
        }
    }

    /// RFC 3339 instant accompanying a custom expiry.
    pub fn custom_iso8601(&self) -> Option<String> {
        match self {
            Self::Until(at) => Some(at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            _ => None,
        }
    }

    /// The absolute instant this policy resolves to when a link is created at `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, AppError> {
        match self {
            Self::Never => Ok(None),
            Self::Days(n) => Duration::try_days(i64::from(*n))
                .and_then(|delta| now.checked_add_signed(delta))
                .map(Some)
                .ok_or_else(|| {
                    AppError::validation(format!("expiry of {n} days is out of range"))
                }),
            Self::Until(at) => Ok(Some(*at)),
        }
    }
}

impl FromStr for Expiry {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_at(s, Utc::now())
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => write!(f, "never"),
            Self::Days(n) => write!(f, "{n} day(s)"),
            Self::Until(at) => write!(f, "{}", at.format("%Y-%m-%d")),
        }
    }
}

/// Options applied to the link created by a share.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareOptions {
    /// Optional password protecting the link.
    pub password: Option<String>,
    /// Expiry policy.
    pub expiry: Expiry,
}

impl ShareOptions {
    /// Build options, treating an empty password as none.
    pub fn new(password: Option<String>, expiry: Expiry) -> Self {
        Self {
            password: password.filter(|p| !p.is_empty()),
            expiry,
        }
    }

    /// Whether the link will be password protected.
    pub fn is_protected(&self) -> bool {
        self.password.is_some()
    }
}

/// Everything one share request sends to the document service.
#[derive(Debug, Clone)]
pub struct ShareUpload {
    /// Files to share, in selection order.
    pub files: Vec<PendingFile>,
    /// Link options.
    pub options: ShareOptions,
}

impl ShareUpload {
    /// Total size of the selected files.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Result of a successful share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareReceipt {
    /// Public URL of the shared link.
    pub url: String,
    /// Number of the uploaded document.
    pub document_no: DocumentNo,
    /// When the link expires, if ever.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Render a byte count with a 1024 base, e.g. `1.5 MB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[unit])
    } else {
        format!("{rounded:.1} {}", UNITS[unit])
    }
}
