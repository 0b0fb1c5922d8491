//! WHOIS expiration lookups.
//!
//! This module queries WHOIS through the system's `whois` command and pulls
//! the expiration date out of the unstructured text response. Nothing else
//! in the response is interpreted.

use crate::error::DomainScanError;
use crate::protocols::WhoisLookup;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use std::future::Future;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

lazy_static! {
    /// Lines carrying an expiration date across the common registry formats.
    static ref EXPIRATION_FIELD: Regex = Regex::new(
        r"(?im)^[ \t]*(?:registry expiry date|registrar registration expiration date|expiration date|expiry date|expiration time|expires on|expires|expire|paid-till|renewal date)[ \t]*:[ \t]*(.*?)[ \t\r]*$"
    )
    .expect("expiration field pattern is valid");
}

/// Formats tried, in order, for values carrying a time of day.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%d-%b-%Y %H:%M:%S",
    "%Y.%m.%d %H:%M:%S",
];

/// Formats tried, in order, for date-only values.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d-%b-%Y",
    "%Y.%m.%d",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%d/%m/%Y",
];

/// WHOIS client that shells out to the system `whois` command.
#[derive(Clone)]
pub struct WhoisClient {
    /// Timeout for WHOIS requests
    timeout: Duration,
}

impl WhoisClient {
    /// Create a new WHOIS client with a 10 second timeout.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }

    /// Create a new WHOIS client with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Query WHOIS and return every expiration date found, in response order.
    ///
    /// An empty vector means the response carried no expiration field.
    ///
    /// # Errors
    ///
    /// Returns `DomainScanError` if:
    /// - The `whois` command is not available on the system
    /// - The WHOIS query times out
    /// - The server refused the query because of rate limiting
    /// - Expiration fields are present but none of them parse as a date
    pub async fn lookup_expiration(
        &self,
        domain: &str,
    ) -> Result<Vec<NaiveDateTime>, DomainScanError> {
        let output = tokio::time::timeout(self.timeout, self.execute_whois_command(domain))
            .await
            .map_err(|_| DomainScanError::timeout("WHOIS query", self.timeout))??;

        if is_rate_limited(&output) {
            return Err(DomainScanError::whois(
                domain,
                "WHOIS server rate limited the query",
            ));
        }

        parse_expiration_dates(&output).map_err(|e| DomainScanError::whois(domain, e.to_string()))
    }

    /// Execute the system whois command and return its standard output.
    async fn execute_whois_command(&self, domain: &str) -> Result<String, DomainScanError> {
        let output = Command::new("whois")
            .args(whois_args(domain))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                DomainScanError::whois(
                    domain,
                    format!(
                        "Failed to execute whois command: {}. Make sure 'whois' is installed.",
                        e
                    ),
                )
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if stdout.trim().is_empty() && !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DomainScanError::whois(
                domain,
                format!("whois exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        debug!(domain, bytes = stdout.len(), "WHOIS response received");
        Ok(stdout)
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WhoisLookup for WhoisClient {
    fn expiration_dates(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<Vec<NaiveDateTime>, DomainScanError>> + Send {
        self.lookup_expiration(domain)
    }
}

/// Extract all expiration dates from a raw WHOIS response.
///
/// Values that do not parse are skipped. If the response has expiration
/// fields but none of them parse, that is an error rather than "no date".
pub fn parse_expiration_dates(response: &str) -> Result<Vec<NaiveDateTime>, DomainScanError> {
    let mut dates = Vec::new();
    let mut unparsed = Vec::new();

    for caps in EXPIRATION_FIELD.captures_iter(response) {
        let value = caps[1].trim();
        if value.is_empty() {
            continue;
        }
        match parse_whois_date(value) {
            Some(date) => dates.push(date),
            None => unparsed.push(value.to_string()),
        }
    }

    if dates.is_empty() {
        if let Some(value) = unparsed.into_iter().next() {
            return Err(DomainScanError::ParseError {
                message: "unrecognized expiration date format".to_string(),
                content: Some(value),
            });
        }
    }

    Ok(dates)
}

/// Parse a single WHOIS date value into a naive UTC timestamp.
pub fn parse_whois_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.naive_utc());
    }

    let value = strip_zone_suffix(value);

    for format in DATETIME_FORMATS {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, format) {
            return Some(date);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Drop trailing zone markers such as `Z`, ` UTC` or ` GMT`.
fn strip_zone_suffix(value: &str) -> &str {
    let trimmed = value
        .strip_suffix(" UTC")
        .or_else(|| value.strip_suffix(" GMT"))
        .or_else(|| value.strip_suffix('Z'))
        .unwrap_or(value);
    trimmed.trim_end()
}

/// Arguments for the `whois` command; `--` keeps a leading `-` from being read as a flag.
fn whois_args(domain: &str) -> [&str; 2] {
    ["--", domain]
}

/// Check if the WHOIS output indicates rate limiting.
fn is_rate_limited(output: &str) -> bool {
    let output_lower = output.to_lowercase();
    let rate_limit_patterns = [
        "rate limit exceeded",
        "too many requests",
        "quota exceeded",
        "limit exceeded",
        "rate-limited",
    ];

    rate_limit_patterns
        .iter()
        .any(|pattern| output_lower.contains(pattern))
}

/// Check if the system has a working whois command.
pub async fn is_whois_available() -> bool {
    match Command::new("whois").arg("--version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}
