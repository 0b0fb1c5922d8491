//! Console output for the domain-scan CLI.
//!
//! Status lines go to stdout as each domain is classified. Styling comes from
//! the `console` crate, which drops colors when stdout is not a terminal, so
//! the plain text of every line stays stable for scripts.

use console::style;
use domain_scan_lib::{format_expiration, Classification, DomainScanResult, ScanReport};
use std::path::Path;
use std::time::Duration;

// ── Result lines ─────────────────────────────────────────────────────────────

/// Plain status line for a classification.
///
/// Taken domains that are not served over HTTP have no line unless
/// `verbose` is set.
pub fn status_line(result: &DomainScanResult, verbose: bool) -> Option<String> {
    let domain = &result.domain;
    match &result.classification {
        Classification::Available => Some(format!("{} is available", domain)),
        Classification::ExpiringSoon { expires_on } => Some(format!(
            "{} is expiring soon on {}",
            domain,
            format_expiration(expires_on)
        )),
        Classification::Active => Some(format!("{} is active and taken", domain)),
        Classification::Taken if verbose => Some(format!("{} is taken", domain)),
        Classification::Taken => None,
    }
}

/// Print a single classified domain with colors.
pub fn print_result(result: &DomainScanResult, verbose: bool) {
    let Some(line) = status_line(result, verbose) else {
        return;
    };

    let styled = match result.classification {
        Classification::Available => style(line).green(),
        Classification::ExpiringSoon { .. } => style(line).yellow(),
        Classification::Active => style(line).white(),
        Classification::Taken => style(line).dim(),
    };
    println!("{}", styled);
}

/// Plain WHOIS error line.
pub fn whois_error_line(domain: &str, message: &str) -> String {
    format!("Error checking WHOIS for {}: {}", domain, message)
}

/// Print a WHOIS failure. These never stop the scan.
pub fn print_whois_error(domain: &str, message: &str, to_stderr: bool) {
    let line = style(whois_error_line(domain, message)).red();
    if to_stderr {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

// ── Dry run ──────────────────────────────────────────────────────────────────

/// Print the candidate list without checking anything.
pub fn print_candidates(candidates: &[String]) {
    for domain in candidates {
        println!("{}", domain);
    }
    eprintln!(
        "{}",
        style(format!(
            "{} candidate domain{} (dry run, nothing checked)",
            candidates.len(),
            plural(candidates.len())
        ))
        .dim()
    );
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print where both output files were written.
pub fn print_saved(available_file: &Path, comingsoon_file: &Path) {
    println!("Available domains saved to {}", available_file.display());
    println!("Domains expiring soon saved to {}", comingsoon_file.display());
}

/// Print the final summary bar with colored counts.
pub fn print_summary(report: &ScanReport, duration: Duration) {
    let total = report.results.len();
    let taken = total - report.available.len() - report.coming_soon.len();

    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(total).bold(),
        plural(total),
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", report.available.len())).green(),
        style("|").dim(),
        style(format!("{} expiring soon", report.coming_soon.len())).yellow(),
        style("|").dim(),
        style(format!("{} taken ({} active)", taken, report.active_count())).red(),
    );

    let whois_errors = report.whois_error_count();
    if whois_errors > 0 {
        println!(
            "  {} {} WHOIS lookup{} failed",
            style("•").dim(),
            whois_errors,
            plural(whois_errors),
        );
    }
}

/// Print a warning to stderr.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), message);
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use domain_scan_lib::protocols::parse_whois_date;

    fn expiring(value: &str) -> Classification {
        let expires_on = parse_whois_date(value).unwrap();
        Classification::ExpiringSoon { expires_on }
    }

    fn make_result(domain: &str, classification: Classification) -> DomainScanResult {
        DomainScanResult {
            domain: domain.to_string(),
            classification,
            whois_error: None,
            check_duration: None,
        }
    }

    #[test]
    fn test_status_line_available() {
        let r = make_result("free.com", Classification::Available);
        assert_eq!(status_line(&r, false).unwrap(), "free.com is available");
    }

    #[test]
    fn test_status_line_expiring() {
        let r = make_result("soon.com", expiring("2025-05-01T12:00:00Z"));
        assert_eq!(
            status_line(&r, false).unwrap(),
            "soon.com is expiring soon on 2025-05-01 12:00:00"
        );
    }

    #[test]
    fn test_status_line_active() {
        let r = make_result("busy.com", Classification::Active);
        assert_eq!(status_line(&r, false).unwrap(), "busy.com is active and taken");
    }

    #[test]
    fn test_status_line_taken_only_when_verbose() {
        let r = make_result("parked.com", Classification::Taken);
        assert_eq!(status_line(&r, false), None);
        assert_eq!(status_line(&r, true).unwrap(), "parked.com is taken");
    }

    #[test]
    fn test_whois_error_line() {
        assert_eq!(
            whois_error_line("flaky.com", "connection reset"),
            "Error checking WHOIS for flaky.com: connection reset"
        );
    }
}
