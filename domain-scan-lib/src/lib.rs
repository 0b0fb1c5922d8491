//! # Domain Scan Library
//!
//! A library for finding registrable and soon-to-expire domain names.
//!
//! Every candidate domain goes through three checks in a fixed order. The
//! first decisive one wins:
//!
//! 1. **DNS**: a name with no IPv4 address is available.
//! 2. **WHOIS**: a registered name expiring within the threshold is coming soon.
//! 3. **HTTP**: a remaining name answering `GET http://<domain>` with 200 is active.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_scan_lib::{DomainScanner, ScanConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scanner = DomainScanner::with_config(ScanConfig::default())?;
//!     let report = scanner
//!         .run(|result| println!("{} is {}", result.domain, result.classification))
//!         .await?;
//!
//!     println!("{} available, {} coming soon", report.available.len(), report.coming_soon.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Candidate generation**: literal domain list plus every word × TLD pair
//! - **Pluggable lookups**: resolver, WHOIS and HTTP probe are traits
//! - **Layered configuration**: TOML files and `DS_*` environment variables

// Re-export main public API types and functions
// This makes them available as domain_scan_lib::TypeName
pub use checker::DomainScanner;
pub use config::{
    load_env_config, parse_duration, validate_threshold, ConfigManager, EnvConfig, FileConfig,
};
pub use error::DomainScanError;
pub use report::{coming_soon_entry, ScanReport};
pub use types::{
    format_expiration, Classification, DomainScanResult, ExpirationRecord, ScanConfig,
    DEFAULT_THRESHOLD_DAYS,
};

// Public modules
pub mod generate;
pub mod protocols;

// Re-export generation and lookup entry points for convenience
pub use generate::{combine, generate_domains, load_candidates, parse_list, read_list};
pub use protocols::{
    is_whois_available, ActivityProbe, DnsClient, HttpProbe, NameResolver, WhoisClient,
    WhoisLookup,
};

// Internal modules - these are not part of the public API
mod checker;
mod config;
mod error;
mod report;
mod types;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainScanError>;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
