//! Protocol implementations for domain scanning.
//!
//! Each external lookup the scanner performs sits behind a small trait so the
//! scanner can be driven by the real network clients or by test doubles.

use crate::error::DomainScanError;
use chrono::NaiveDateTime;
use std::future::Future;
use std::net::Ipv4Addr;

/// DNS resolution used by the availability check
pub mod dns;

/// Plain-HTTP activity probing
pub mod http;

/// WHOIS expiration lookups
pub mod whois;

pub use dns::{is_available, DnsClient};
pub use http::{is_active, HttpProbe};
pub use whois::{is_whois_available, parse_expiration_dates, parse_whois_date, WhoisClient};

/// Resolves a domain to its IPv4 addresses.
pub trait NameResolver {
    fn resolve(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<Vec<Ipv4Addr>, DomainScanError>> + Send;
}

/// Fetches the expiration dates a WHOIS server reports for a domain.
///
/// Dates are returned in the order they appear in the response; an empty
/// vector means no expiration field was present.
pub trait WhoisLookup {
    fn expiration_dates(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<Vec<NaiveDateTime>, DomainScanError>> + Send;
}

/// Performs the HTTP activity probe and reports the response status code.
pub trait ActivityProbe {
    fn status(&self, domain: &str) -> impl Future<Output = Result<u16, DomainScanError>> + Send;
}
