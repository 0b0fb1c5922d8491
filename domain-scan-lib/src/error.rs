//! Error handling for domain scanning operations.
//!
//! Only input/output and configuration errors are fatal to a scan. Lookup
//! errors are produced here too, but the scanner contains them to the domain
//! being classified.

use std::fmt;
use std::time::Duration;

/// Main error type for domain scanning operations.
#[derive(Debug, Clone)]
pub enum DomainScanError {
    /// DNS resolution failed
    DnsError { domain: String, message: String },

    /// WHOIS query or response handling failed
    WhoisError { domain: String, message: String },

    /// HTTP activity probe failed at the network level
    HttpError { domain: String, message: String },

    /// A value (date, duration, config field) could not be parsed
    ParseError {
        message: String,
        content: Option<String>,
    },

    /// Configuration errors (invalid settings, etc.)
    ConfigError { message: String },

    /// File I/O errors when reading input lists or writing results
    FileError { path: String, message: String },

    /// An external lookup took longer than its configured limit
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl DomainScanError {
    /// Create a new DNS error.
    pub fn dns<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::DnsError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new WHOIS error.
    pub fn whois<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::WhoisError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new HTTP error.
    pub fn http<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::HttpError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new parse error.
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::ParseError {
            message: message.into(),
            content: None,
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Map a failed HTTP request, reporting timeouts against the probe's limit.
    pub fn from_request(domain: &str, err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::timeout(format!("HTTP request to {}", domain), timeout)
        } else if err.is_connect() {
            Self::http(domain, format!("connection failed: {}", err))
        } else {
            Self::http(domain, err.to_string())
        }
    }

    /// Whether this error aborts the whole scan rather than a single lookup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::FileError { .. } | Self::ConfigError { .. } | Self::Internal { .. }
        )
    }
}

impl fmt::Display for DomainScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DnsError { domain, message } => {
                write!(f, "DNS lookup failed for '{}': {}", domain, message)
            }
            Self::WhoisError { domain, message } => {
                write!(f, "WHOIS error for '{}': {}", domain, message)
            }
            Self::HttpError { domain, message } => {
                write!(f, "HTTP probe failed for '{}': {}", domain, message)
            }
            Self::ParseError { message, content } => match content {
                Some(content) => write!(f, "Parse error: {} (input: '{}')", message, content),
                None => write!(f, "Parse error: {}", message),
            },
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for DomainScanError {}

impl From<toml::de::Error> for DomainScanError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML configuration: {}", err),
        }
    }
}

impl From<serde_json::Error> for DomainScanError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: format!("JSON serialization failed: {}", err),
            content: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = DomainScanError::whois("example.com", "no output");
        assert_eq!(err.to_string(), "WHOIS error for 'example.com': no output");

        let err = DomainScanError::file_error("tld.txt", "No such file or directory");
        assert_eq!(
            err.to_string(),
            "File error at 'tld.txt': No such file or directory"
        );

        let err = DomainScanError::timeout("WHOIS query", Duration::from_secs(10));
        assert_eq!(err.to_string(), "Timeout after 10s during: WHOIS query");
    }

    #[test]
    fn test_parse_error_includes_input() {
        let err = DomainScanError::ParseError {
            message: "unrecognized date".to_string(),
            content: Some("soon".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Parse error: unrecognized date (input: 'soon')"
        );
    }

    #[test]
    fn test_json_error_is_parse_error() {
        let json_err = serde_json::from_str::<Vec<String>>("[1,").unwrap_err();
        let err: DomainScanError = json_err.into();
        assert!(matches!(err, DomainScanError::ParseError { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_fatal_classification() {
        assert!(DomainScanError::file_error("domains.txt", "missing").is_fatal());
        assert!(DomainScanError::config("bad threshold").is_fatal());
        assert!(!DomainScanError::dns("example.com", "NXDOMAIN").is_fatal());
        assert!(!DomainScanError::whois("example.com", "timeout").is_fatal());
        assert!(!DomainScanError::timeout("HTTP", Duration::from_secs(3)).is_fatal());
    }
}
