//! Scan result collection and output files.

use crate::error::DomainScanError;
use crate::types::{format_expiration, Classification, DomainScanResult};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Results accumulated over a scan.
///
/// `available` and `coming_soon` are the two lists written to disk; a domain
/// lands in at most one of them. `results` keeps every classification for
/// JSON output and summaries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub available: Vec<String>,
    pub coming_soon: Vec<String>,
    pub results: Vec<DomainScanResult>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a classified domain to the matching list.
    pub fn record(&mut self, result: DomainScanResult) {
        match &result.classification {
            Classification::Available => self.available.push(result.domain.clone()),
            Classification::ExpiringSoon { expires_on } => self
                .coming_soon
                .push(coming_soon_entry(&result.domain, expires_on)),
            Classification::Active | Classification::Taken => {}
        }
        self.results.push(result);
    }

    /// Number of domains classified as active.
    pub fn active_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.classification == Classification::Active)
            .count()
    }

    /// Number of WHOIS lookups that failed during the scan.
    pub fn whois_error_count(&self) -> usize {
        self.results.iter().filter(|r| r.whois_error.is_some()).count()
    }

    /// Render every per-domain result as a pretty-printed JSON array.
    pub fn to_json(&self) -> Result<String, DomainScanError> {
        Ok(serde_json::to_string_pretty(&self.results)?)
    }

    /// Write both lists, one entry per line, replacing any existing files.
    ///
    /// # Errors
    ///
    /// Returns `DomainScanError::FileError` naming the file that failed.
    pub fn write_to<A, C>(&self, available_file: A, comingsoon_file: C) -> Result<(), DomainScanError>
    where
        A: AsRef<Path>,
        C: AsRef<Path>,
    {
        write_lines(available_file.as_ref(), &self.available)?;
        write_lines(comingsoon_file.as_ref(), &self.coming_soon)?;
        Ok(())
    }
}

/// Format a coming-soon line: `<domain> - expires on <date>`.
pub fn coming_soon_entry(domain: &str, expires_on: &chrono::NaiveDateTime) -> String {
    format!("{} - expires on {}", domain, format_expiration(expires_on))
}

fn write_lines(path: &Path, lines: &[String]) -> Result<(), DomainScanError> {
    let to_file_error =
        |e: std::io::Error| DomainScanError::file_error(path.to_string_lossy(), e.to_string());

    let mut writer = BufWriter::new(File::create(path).map_err(to_file_error)?);
    for line in lines {
        writeln!(writer, "{}", line).map_err(to_file_error)?;
    }
    writer.flush().map_err(to_file_error)
}
