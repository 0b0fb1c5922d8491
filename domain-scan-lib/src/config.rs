//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `DS_*`
//! environment variables and layering them onto a `ScanConfig`.
//!
//! Precedence (lowest to highest): built-in defaults, XDG config file,
//! home config file, local config file, environment, CLI flags.

use crate::error::DomainScanError;
use crate::types::ScanConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Largest accepted expiring-soon window, in days, in either direction.
const MAX_THRESHOLD_DAYS: i64 = 3650;

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Input list locations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<InputsConfig>,

    /// Result file locations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<OutputsConfig>,

    /// Threshold and lookup timeouts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<ChecksConfig>,
}

/// `[inputs]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct InputsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordlist: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tlds: Option<String>,
}

/// `[outputs]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comingsoon: Option<String>,
}

/// `[checks]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ChecksConfig {
    /// Expiring-soon window in days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_days: Option<i64>,

    /// Timeouts as strings, e.g. "3s", "2m"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_timeout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_timeout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_timeout: Option<String>,
}

impl InputsConfig {
    fn merge(self, higher: Self) -> Self {
        Self {
            domains: higher.domains.or(self.domains),
            wordlist: higher.wordlist.or(self.wordlist),
            tlds: higher.tlds.or(self.tlds),
        }
    }
}

impl OutputsConfig {
    fn merge(self, higher: Self) -> Self {
        Self {
            available: higher.available.or(self.available),
            comingsoon: higher.comingsoon.or(self.comingsoon),
        }
    }
}

impl ChecksConfig {
    fn merge(self, higher: Self) -> Self {
        Self {
            threshold_days: higher.threshold_days.or(self.threshold_days),
            http_timeout: higher.http_timeout.or(self.http_timeout),
            whois_timeout: higher.whois_timeout.or(self.whois_timeout),
            dns_timeout: higher.dns_timeout.or(self.dns_timeout),
        }
    }
}

fn merge_section<T, F>(lower: Option<T>, higher: Option<T>, merge: F) -> Option<T>
where
    F: FnOnce(T, T) -> T,
{
    match (lower, higher) {
        (Some(lower), Some(higher)) => Some(merge(lower, higher)),
        (lower, higher) => higher.or(lower),
    }
}

impl FileConfig {
    /// Merge two configurations; values from `higher` win.
    pub fn merge(self, higher: FileConfig) -> FileConfig {
        FileConfig {
            inputs: merge_section(self.inputs, higher.inputs, InputsConfig::merge),
            outputs: merge_section(self.outputs, higher.outputs, OutputsConfig::merge),
            checks: merge_section(self.checks, higher.checks, ChecksConfig::merge),
        }
    }

    /// Apply this file's values on top of an existing scan configuration.
    ///
    /// Values are assumed to have passed `validate_config`; anything that
    /// fails to parse is left at the existing setting.
    pub fn apply_to(&self, mut config: ScanConfig) -> ScanConfig {
        if let Some(inputs) = &self.inputs {
            if let Some(path) = &inputs.domains {
                config.domains_file = PathBuf::from(path);
            }
            if let Some(path) = &inputs.wordlist {
                config.wordlist_file = PathBuf::from(path);
            }
            if let Some(path) = &inputs.tlds {
                config.tld_file = PathBuf::from(path);
            }
        }

        if let Some(outputs) = &self.outputs {
            if let Some(path) = &outputs.available {
                config.available_file = PathBuf::from(path);
            }
            if let Some(path) = &outputs.comingsoon {
                config.comingsoon_file = PathBuf::from(path);
            }
        }

        if let Some(checks) = &self.checks {
            if let Some(days) = checks.threshold_days {
                config.threshold_days = days;
            }
            if let Some(timeout) = checks.http_timeout.as_deref().and_then(parse_duration) {
                config.http_timeout = timeout;
            }
            if let Some(timeout) = checks.whois_timeout.as_deref().and_then(parse_duration) {
                config.whois_timeout = timeout;
            }
            if let Some(timeout) = checks.dns_timeout.as_deref().and_then(parse_duration) {
                config.dns_timeout = timeout;
            }
        }

        config
    }
}

/// Configuration discovery and loading functionality.
#[derive(Debug, Default)]
pub struct ConfigManager {
    /// Files merged by the last call to `discover_and_load`, lowest precedence first
    loaded_files: Vec<PathBuf>,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `FileError` if the file is missing or unreadable and
    /// `ConfigError` if it is not valid TOML or fails validation.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainScanError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainScanError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainScanError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;

        validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Files that exist but fail to load are skipped with a warning.
    pub fn discover_and_load(&mut self) -> FileConfig {
        let mut merged_config = FileConfig::default();
        self.loaded_files.clear();

        let candidates = [
            get_xdg_config_path(),
            get_global_config_path(),
            get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    debug!(path = %path.display(), "loaded config file");
                    merged_config = merged_config.merge(config);
                    self.loaded_files.push(path);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring config file");
                }
            }
        }

        merged_config
    }

    /// Config files merged by the last discovery, lowest precedence first.
    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.loaded_files
    }
}

/// Get the local configuration file path.
fn get_local_config_path() -> Option<PathBuf> {
    let candidates = ["./domain-scan.toml", "./.domain-scan.toml"];

    candidates
        .iter()
        .map(Path::new)
        .find(|path| path.exists())
        .map(Path::to_path_buf)
}

/// Get the global configuration file path in the user's home directory.
fn get_global_config_path() -> Option<PathBuf> {
    let home = env::var_os("HOME")?;
    let candidates = [".domain-scan.toml", "domain-scan.toml"];

    candidates
        .iter()
        .map(|candidate| Path::new(&home).join(candidate))
        .find(|path| path.exists())
}

/// Get the XDG configuration file path.
fn get_xdg_config_path() -> Option<PathBuf> {
    let config_dir = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

    let path = config_dir.join("domain-scan").join("config.toml");
    path.exists().then_some(path)
}

/// Validate a configuration for common issues.
pub fn validate_config(config: &FileConfig) -> Result<(), DomainScanError> {
    if let Some(inputs) = &config.inputs {
        for (name, value) in [
            ("inputs.domains", &inputs.domains),
            ("inputs.wordlist", &inputs.wordlist),
            ("inputs.tlds", &inputs.tlds),
        ] {
            validate_path(name, value)?;
        }
    }

    if let Some(outputs) = &config.outputs {
        for (name, value) in [
            ("outputs.available", &outputs.available),
            ("outputs.comingsoon", &outputs.comingsoon),
        ] {
            validate_path(name, value)?;
        }
    }

    if let Some(checks) = &config.checks {
        if let Some(days) = checks.threshold_days {
            validate_threshold(days)?;
        }

        for (name, value) in [
            ("checks.http_timeout", &checks.http_timeout),
            ("checks.whois_timeout", &checks.whois_timeout),
            ("checks.dns_timeout", &checks.dns_timeout),
        ] {
            if let Some(timeout_str) = value {
                if parse_duration(timeout_str).is_none() {
                    return Err(DomainScanError::config(format!(
                        "Invalid {} '{}'. Use format like '5s', '30s', '2m'",
                        name, timeout_str
                    )));
                }
            }
        }
    }

    Ok(())
}

fn validate_path(name: &str, value: &Option<String>) -> Result<(), DomainScanError> {
    match value {
        Some(path) if path.trim().is_empty() => Err(DomainScanError::config(format!(
            "'{}' cannot be empty",
            name
        ))),
        _ => Ok(()),
    }
}

/// Check that an expiring-soon window is within the accepted range.
pub fn validate_threshold(days: i64) -> Result<(), DomainScanError> {
    if (-MAX_THRESHOLD_DAYS..=MAX_THRESHOLD_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(DomainScanError::config(format!(
            "Threshold must be between -{} and {} days, got {}",
            MAX_THRESHOLD_DAYS, MAX_THRESHOLD_DAYS, days
        )))
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via DS_* environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub domains: Option<String>,
    pub wordlist: Option<String>,
    pub tlds: Option<String>,
    pub available_out: Option<String>,
    pub comingsoon_out: Option<String>,
    pub threshold_days: Option<i64>,
    pub http_timeout: Option<Duration>,
    pub whois_timeout: Option<Duration>,
    pub dns_timeout: Option<Duration>,
    pub config: Option<String>,
}

/// Load configuration from the process environment.
pub fn load_env_config() -> EnvConfig {
    EnvConfig::from_lookup(|key| env::var(key).ok())
}

impl EnvConfig {
    /// Build from an arbitrary variable lookup.
    ///
    /// Invalid values are logged as warnings and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str| {
            lookup(key).filter(|v| !v.trim().is_empty()).inspect(|v| {
                debug!("Using {}={}", key, v);
            })
        };

        let timeout = |key: &str| {
            let value = lookup(key)?;
            match parse_duration(&value) {
                Some(duration) => {
                    debug!("Using {}={}", key, value);
                    Some(duration)
                }
                None => {
                    warn!(
                        "Invalid {}='{}', use format like '5s', '30s', '2m'",
                        key, value
                    );
                    None
                }
            }
        };

        let threshold_days = lookup("DS_THRESHOLD").and_then(|value| {
            match value.trim().parse::<i64>() {
                Ok(days) if validate_threshold(days).is_ok() => {
                    debug!("Using DS_THRESHOLD={}", days);
                    Some(days)
                }
                _ => {
                    warn!(
                        "Invalid DS_THRESHOLD='{}', must be a whole number of days",
                        value
                    );
                    None
                }
            }
        });

        Self {
            domains: path("DS_DOMAINS"),
            wordlist: path("DS_WORDLIST"),
            tlds: path("DS_TLDS"),
            available_out: path("DS_AVAILABLE_OUT"),
            comingsoon_out: path("DS_COMINGSOON_OUT"),
            threshold_days,
            http_timeout: timeout("DS_HTTP_TIMEOUT"),
            whois_timeout: timeout("DS_WHOIS_TIMEOUT"),
            dns_timeout: timeout("DS_DNS_TIMEOUT"),
            config: path("DS_CONFIG"),
        }
    }

    /// Apply environment values on top of an existing scan configuration.
    pub fn apply_to(&self, mut config: ScanConfig) -> ScanConfig {
        if let Some(path) = &self.domains {
            config.domains_file = PathBuf::from(path);
        }
        if let Some(path) = &self.wordlist {
            config.wordlist_file = PathBuf::from(path);
        }
        if let Some(path) = &self.tlds {
            config.tld_file = PathBuf::from(path);
        }
        if let Some(path) = &self.available_out {
            config.available_file = PathBuf::from(path);
        }
        if let Some(path) = &self.comingsoon_out {
            config.comingsoon_file = PathBuf::from(path);
        }
        if let Some(days) = self.threshold_days {
            config.threshold_days = days;
        }
        if let Some(timeout) = self.http_timeout {
            config.http_timeout = timeout;
        }
        if let Some(timeout) = self.whois_timeout {
            config.whois_timeout = timeout;
        }
        if let Some(timeout) = self.dns_timeout {
            config.dns_timeout = timeout;
        }
        config
    }
}

/// Parse a timeout string like "5s", "30s", "2m" into a duration.
///
/// A bare number is read as seconds. Zero is rejected.
pub fn parse_duration(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let secs = if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.trim().parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.trim().parse::<u64>().ok().and_then(|m| m.checked_mul(60))
    } else {
        timeout_str.parse::<u64>().ok()
    }?;

    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("5s"), Some(Duration::from_secs(5)));
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_duration("5"), Some(Duration::from_secs(5)));
        assert_eq!(parse_duration(" 3S "), Some(Duration::from_secs(3)));
        assert_eq!(parse_duration("0s"), None);
        assert_eq!(parse_duration(&format!("{}m", u64::MAX)), None);
        assert_eq!(
            parse_duration(&format!("{}m", u64::MAX / 60)),
            Some(Duration::from_secs(u64::MAX / 60 * 60))
        );
        assert_eq!(parse_duration("invalid"), None);
    }

    #[test]
    fn test_load_valid_config() {
        let temp_file = config_file(
            r#"
[inputs]
domains = "lists/domains.txt"
tlds = "lists/tld.txt"

[outputs]
available = "out/available.txt"

[checks]
threshold_days = 45
http_timeout = "5s"
whois_timeout = "1m"
"#,
        );

        let manager = ConfigManager::new();
        let config = manager.load_file(temp_file.path()).unwrap();

        let inputs = config.inputs.clone().unwrap();
        assert_eq!(inputs.domains, Some("lists/domains.txt".to_string()));
        assert_eq!(inputs.wordlist, None);

        let scan = config.apply_to(ScanConfig::default());
        assert_eq!(scan.domains_file, PathBuf::from("lists/domains.txt"));
        assert_eq!(scan.wordlist_file, PathBuf::from("wordlist.txt"));
        assert_eq!(scan.tld_file, PathBuf::from("lists/tld.txt"));
        assert_eq!(scan.available_file, PathBuf::from("out/available.txt"));
        assert_eq!(scan.comingsoon_file, PathBuf::from("comingsoon.txt"));
        assert_eq!(scan.threshold_days, 45);
        assert_eq!(scan.http_timeout, Duration::from_secs(5));
        assert_eq!(scan.whois_timeout, Duration::from_secs(60));
        assert_eq!(scan.dns_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_threshold() {
        let temp_file = config_file("[checks]\nthreshold_days = 99999\n");
        let result = ConfigManager::new().load_file(temp_file.path());
        assert!(matches!(result, Err(DomainScanError::ConfigError { .. })));
    }

    #[test]
    fn test_invalid_timeout() {
        let temp_file = config_file("[checks]\nhttp_timeout = \"soon\"\n");
        let result = ConfigManager::new().load_file(temp_file.path());
        assert!(matches!(result, Err(DomainScanError::ConfigError { .. })));
    }

    #[test]
    fn test_empty_path_rejected() {
        let temp_file = config_file("[outputs]\ncomingsoon = \"  \"\n");
        let result = ConfigManager::new().load_file(temp_file.path());
        assert!(matches!(result, Err(DomainScanError::ConfigError { .. })));
    }

    #[test]
    fn test_malformed_toml() {
        let temp_file = config_file("[checks\nthreshold_days = 3\n");
        let result = ConfigManager::new().load_file(temp_file.path());
        assert!(matches!(result, Err(DomainScanError::ConfigError { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigManager::new().load_file("/nonexistent/domain-scan.toml");
        assert!(matches!(result, Err(DomainScanError::FileError { .. })));
    }

    #[test]
    fn test_merge_configs() {
        let lower = FileConfig {
            inputs: Some(InputsConfig {
                domains: Some("a.txt".to_string()),
                wordlist: Some("words.txt".to_string()),
                tlds: None,
            }),
            outputs: None,
            checks: Some(ChecksConfig {
                threshold_days: Some(10),
                http_timeout: Some("4s".to_string()),
                ..Default::default()
            }),
        };
        let higher = FileConfig {
            inputs: Some(InputsConfig {
                domains: Some("b.txt".to_string()),
                ..Default::default()
            }),
            outputs: Some(OutputsConfig {
                available: Some("free.txt".to_string()),
                comingsoon: None,
            }),
            checks: Some(ChecksConfig {
                threshold_days: Some(20),
                ..Default::default()
            }),
        };

        let merged = lower.merge(higher);
        let inputs = merged.inputs.unwrap();
        assert_eq!(inputs.domains, Some("b.txt".to_string()));
        assert_eq!(inputs.wordlist, Some("words.txt".to_string()));
        assert_eq!(
            merged.outputs.unwrap().available,
            Some("free.txt".to_string())
        );
        let checks = merged.checks.unwrap();
        assert_eq!(checks.threshold_days, Some(20));
        assert_eq!(checks.http_timeout, Some("4s".to_string()));
    }

    #[test]
    fn test_env_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("DS_DOMAINS", "env-domains.txt"),
            ("DS_THRESHOLD", "14"),
            ("DS_HTTP_TIMEOUT", "2s"),
            ("DS_WHOIS_TIMEOUT", "never"),
            ("DS_TLDS", "   "),
        ]
        .into_iter()
        .collect();

        let env_config = EnvConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(env_config.domains, Some("env-domains.txt".to_string()));
        assert_eq!(env_config.threshold_days, Some(14));
        assert_eq!(env_config.http_timeout, Some(Duration::from_secs(2)));
        assert_eq!(env_config.whois_timeout, None);
        assert_eq!(env_config.tlds, None);

        let scan = env_config.apply_to(ScanConfig::default());
        assert_eq!(scan.domains_file, PathBuf::from("env-domains.txt"));
        assert_eq!(scan.threshold_days, 14);
        assert_eq!(scan.http_timeout, Duration::from_secs(2));
        assert_eq!(scan.whois_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_env_threshold_out_of_range_ignored() {
        let env_config = EnvConfig::from_lookup(|key| {
            (key == "DS_THRESHOLD").then(|| "100000".to_string())
        });
        assert_eq!(env_config.threshold_days, None);
    }
}
