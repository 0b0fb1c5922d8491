//! Core data types for domain scanning.
//!
//! This module defines the scan configuration, the per-domain classification
//! and the expiration record produced from WHOIS data.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default window, in days, within which a domain counts as expiring soon.
pub const DEFAULT_THRESHOLD_DAYS: i64 = 30;

/// Format used for expiration dates in console lines and `comingsoon.txt`.
pub const EXPIRATION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SECONDS_PER_DAY: i64 = 86_400;

/// How a single candidate domain was classified.
///
/// Variants are listed in priority order: the first check that matches wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Classification {
    /// DNS resolution failed, the name is presumed unregistered
    Available,

    /// Registered, with an expiration date inside the threshold window
    ExpiringSoon { expires_on: NaiveDateTime },

    /// Registered, not expiring soon, and answering HTTP 200
    Active,

    /// Registered, not expiring soon, and not answering HTTP 200
    Taken,
}

impl Classification {
    pub fn is_available(&self) -> bool {
        matches!(self, Classification::Available)
    }

    pub fn is_expiring_soon(&self) -> bool {
        matches!(self, Classification::ExpiringSoon { .. })
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Available => write!(f, "available"),
            Classification::ExpiringSoon { expires_on } => {
                write!(f, "expiring soon on {}", format_expiration(expires_on))
            }
            Classification::Active => write!(f, "active and taken"),
            Classification::Taken => write!(f, "taken"),
        }
    }
}

/// Result of classifying one candidate domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainScanResult {
    /// The domain name that was checked (e.g., "example.com")
    pub domain: String,

    /// Outcome of the priority chain
    pub classification: Classification,

    /// WHOIS failure message, if the expiration check errored and was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_error: Option<String>,

    /// How long the checks for this domain took
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_duration: Option<Duration>,
}

/// Whether a registered domain is expiring soon, and the date that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpirationRecord {
    pub expiring_soon: bool,
    pub expiration_date: Option<NaiveDateTime>,
}

impl ExpirationRecord {
    /// Record for a domain whose expiration could not be determined.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Build a record from the expiration dates reported by WHOIS.
    ///
    /// Only the first date is considered. A date `threshold_days` or fewer
    /// whole days away from `now` is expiring soon; dates in the past count
    /// as well. Partial days round down, so 12 hours ago is day -1.
    pub fn from_dates(dates: &[NaiveDateTime], now: NaiveDateTime, threshold_days: i64) -> Self {
        match dates.first() {
            Some(date) => {
                let days_until_expiration = (*date - now).num_seconds().div_euclid(SECONDS_PER_DAY);
                Self {
                    expiring_soon: days_until_expiration <= threshold_days,
                    expiration_date: Some(*date),
                }
            }
            None => Self::unknown(),
        }
    }
}

/// Settings for a scan: where inputs live, where results go, and lookup limits.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Literal candidate domains, one per line
    pub domains_file: PathBuf,

    /// Words combined with every TLD
    pub wordlist_file: PathBuf,

    /// TLDs (no leading dot) combined with every word
    pub tld_file: PathBuf,

    /// Output file for available domains
    pub available_file: PathBuf,

    /// Output file for soon-to-expire domains
    pub comingsoon_file: PathBuf,

    /// Expiring-soon window in days
    /// Default: 30
    pub threshold_days: i64,

    /// Timeout for the HTTP activity probe
    /// Default: 3 seconds
    pub http_timeout: Duration,

    /// Timeout for a WHOIS query
    /// Default: 10 seconds
    pub whois_timeout: Duration,

    /// Timeout for a DNS lookup
    /// Default: 5 seconds
    pub dns_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            domains_file: PathBuf::from("domains.txt"),
            wordlist_file: PathBuf::from("wordlist.txt"),
            tld_file: PathBuf::from("tld.txt"),
            available_file: PathBuf::from("available.txt"),
            comingsoon_file: PathBuf::from("comingsoon.txt"),
            threshold_days: DEFAULT_THRESHOLD_DAYS,
            http_timeout: Duration::from_secs(3),
            whois_timeout: Duration::from_secs(10),
            dns_timeout: Duration::from_secs(5),
        }
    }
}

impl ScanConfig {
    /// Set the expiring-soon window.
    pub fn with_threshold_days(mut self, days: i64) -> Self {
        self.threshold_days = days;
        self
    }

    /// Set the HTTP activity probe timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Set the WHOIS query timeout.
    pub fn with_whois_timeout(mut self, timeout: Duration) -> Self {
        self.whois_timeout = timeout;
        self
    }

    /// Set the DNS lookup timeout.
    pub fn with_dns_timeout(mut self, timeout: Duration) -> Self {
        self.dns_timeout = timeout;
        self
    }
}

/// Render an expiration date the way it appears in output files.
pub fn format_expiration(date: &NaiveDateTime) -> String {
    date.format(EXPIRATION_DATE_FORMAT).to_string()
}
