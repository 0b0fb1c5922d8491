//! Main domain scanner implementation.
//!
//! This module provides the `DomainScanner` struct that runs the three
//! checks for each candidate domain in a fixed priority order:
//!
//! 1. DNS availability. A domain that does not resolve is available and no
//!    further checks run.
//! 2. WHOIS expiration. A domain expiring within the threshold is recorded
//!    as coming soon and the HTTP probe is skipped.
//! 3. HTTP activity. Used only to report whether the domain is served.

use crate::error::DomainScanError;
use crate::generate::load_candidates;
use crate::protocols::{
    is_active, is_available, ActivityProbe, DnsClient, HttpProbe, NameResolver, WhoisClient,
    WhoisLookup,
};
use crate::report::ScanReport;
use crate::types::{Classification, DomainScanResult, ExpirationRecord, ScanConfig};
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info};

/// Scanner that classifies candidate domains one at a time.
///
/// The lookups are generic so tests can substitute their own resolver, WHOIS
/// source and HTTP probe; the defaults are the real network clients.
///
/// # Example
///
/// ```rust,no_run
/// use domain_scan_lib::DomainScanner;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scanner = DomainScanner::new()?;
///     let result = scanner.classify("example.com").await;
///     println!("{} is {}", result.domain, result.classification);
///     Ok(())
/// }
/// ```
pub struct DomainScanner<R = DnsClient, W = WhoisClient, H = HttpProbe> {
    /// Configuration settings for this scanner instance
    config: ScanConfig,
    /// Resolver used for the availability check
    resolver: R,
    /// WHOIS source used for the expiration check
    whois: W,
    /// HTTP probe used for the activity check
    probe: H,
}

impl DomainScanner {
    /// Create a new scanner with default configuration.
    ///
    /// Default settings:
    /// - Threshold: 30 days
    /// - HTTP timeout: 3 seconds
    /// - WHOIS timeout: 10 seconds
    /// - DNS timeout: 5 seconds
    pub fn new() -> Result<Self, DomainScanError> {
        Self::with_config(ScanConfig::default())
    }

    /// Create a new scanner with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `DomainScanError::Internal` if the HTTP client cannot be built.
    pub fn with_config(config: ScanConfig) -> Result<Self, DomainScanError> {
        let resolver = DnsClient::with_timeout(config.dns_timeout);
        let whois = WhoisClient::with_timeout(config.whois_timeout);
        let probe = HttpProbe::with_timeout(config.http_timeout)?;

        Ok(Self {
            config,
            resolver,
            whois,
            probe,
        })
    }
}

impl<R, W, H> DomainScanner<R, W, H>
where
    R: NameResolver,
    W: WhoisLookup,
    H: ActivityProbe,
{
    /// Create a scanner from explicit lookup implementations.
    pub fn with_clients(config: ScanConfig, resolver: R, whois: W, probe: H) -> Self {
        Self {
            config,
            resolver,
            whois,
            probe,
        }
    }

    /// Get the current configuration for this scanner.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Check whether a domain is available, i.e. does not resolve.
    pub async fn check_availability(&self, domain: &str) -> bool {
        is_available(&self.resolver, domain).await
    }

    /// Query WHOIS and evaluate the first expiration date against the threshold.
    ///
    /// # Errors
    ///
    /// Returns the WHOIS error unchanged; callers decide how to degrade.
    pub async fn lookup_expiration(&self, domain: &str) -> Result<ExpirationRecord, DomainScanError> {
        let dates = self.whois.expiration_dates(domain).await?;
        let now = Utc::now().naive_utc();
        Ok(ExpirationRecord::from_dates(
            &dates,
            now,
            self.config.threshold_days,
        ))
    }

    /// Expiration check that never fails.
    ///
    /// WHOIS errors are reported as "not expiring, no date".
    pub async fn check_expiration(&self, domain: &str) -> ExpirationRecord {
        self.expiration_or_error(domain).await.0
    }

    /// Expiration record plus the WHOIS failure message, if the lookup failed.
    ///
    /// Failures are logged at debug level only; callers decide how to show them.
    async fn expiration_or_error(&self, domain: &str) -> (ExpirationRecord, Option<String>) {
        match self.lookup_expiration(domain).await {
            Ok(record) => (record, None),
            Err(e) => {
                debug!(domain, error = %e, "WHOIS check failed");
                let message = match e {
                    DomainScanError::WhoisError { message, .. } => message,
                    other => other.to_string(),
                };
                (ExpirationRecord::unknown(), Some(message))
            }
        }
    }

    /// Check whether a registered domain answers `GET http://<domain>` with 200.
    pub async fn check_activity(&self, domain: &str) -> bool {
        is_active(&self.probe, domain).await
    }

    /// Run the priority chain for one domain.
    pub async fn classify(&self, domain: &str) -> DomainScanResult {
        let start_time = Instant::now();
        let mut whois_error = None;

        let classification = if self.check_availability(domain).await {
            Classification::Available
        } else {
            let (record, error) = self.expiration_or_error(domain).await;
            whois_error = error;

            if let (true, Some(expires_on)) = (record.expiring_soon, record.expiration_date) {
                Classification::ExpiringSoon { expires_on }
            } else if self.check_activity(domain).await {
                Classification::Active
            } else {
                Classification::Taken
            }
        };

        debug!(domain, %classification, "domain classified");

        DomainScanResult {
            domain: domain.to_string(),
            classification,
            whois_error,
            check_duration: Some(start_time.elapsed()),
        }
    }

    /// Classify every domain in order, one at a time.
    ///
    /// `on_result` is called after each domain so callers can report
    /// progress while the scan runs.
    pub async fn scan<F>(&self, domains: &[String], mut on_result: F) -> ScanReport
    where
        F: FnMut(&DomainScanResult),
    {
        let mut report = ScanReport::new();

        for domain in domains {
            let result = self.classify(domain).await;
            on_result(&result);
            report.record(result);
        }

        info!(
            checked = domains.len(),
            available = report.available.len(),
            coming_soon = report.coming_soon.len(),
            "scan finished"
        );

        report
    }

    /// Load candidates from the configured input files, scan them, and write
    /// both result files.
    ///
    /// # Errors
    ///
    /// Returns `DomainScanError::FileError` if an input file cannot be read
    /// or an output file cannot be written. Lookup failures never abort the
    /// run.
    pub async fn run<F>(&self, on_result: F) -> Result<ScanReport, DomainScanError>
    where
        F: FnMut(&DomainScanResult),
    {
        let candidates = load_candidates(
            &self.config.domains_file,
            &self.config.wordlist_file,
            &self.config.tld_file,
        )?;
        debug!(candidates = candidates.len(), "candidate list loaded");

        let report = self.scan(&candidates, on_result).await;
        report.write_to(&self.config.available_file, &self.config.comingsoon_file)?;

        Ok(report)
    }
}
