//! Domain Scan CLI Application
//!
//! A command-line interface that scans a domain list plus every word × TLD
//! combination, writing available names to one file and names about to
//! expire to another. This is a thin shell around domain-scan-lib.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_scan_lib::{is_whois_available, load_candidates, load_env_config, ConfigManager};
use domain_scan_lib::{parse_duration, validate_threshold, DomainScanner, EnvConfig, ScanConfig};
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-scan
#[derive(Parser, Debug)]
#[command(name = "domain-scan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find available and soon-to-expire domains")]
#[command(
    long_about = "Find available and soon-to-expire domains.\n\nEvery domain from the domain list and every word × TLD combination is checked in turn: names that do not resolve are available, registered names expiring within the threshold are coming soon, and the rest are probed over HTTP."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// File of literal domains to check (one per line) [default: domains.txt]
    #[arg(
        short = 'f',
        long = "domains",
        value_name = "FILE",
        help_heading = "Inputs"
    )]
    pub domains: Option<PathBuf>,

    /// File of words to combine with each TLD [default: wordlist.txt]
    #[arg(
        short = 'w',
        long = "wordlist",
        value_name = "FILE",
        help_heading = "Inputs"
    )]
    pub wordlist: Option<PathBuf>,

    /// File of TLDs to combine with each word [default: tld.txt]
    #[arg(
        short = 't',
        long = "tlds",
        value_name = "FILE",
        help_heading = "Inputs"
    )]
    pub tlds: Option<PathBuf>,

    /// Print the generated candidate list and exit without checking
    #[arg(long = "dry-run", help_heading = "Inputs")]
    pub dry_run: bool,

    /// Where to write available domains [default: available.txt]
    #[arg(long = "available-out", value_name = "FILE", help_heading = "Outputs")]
    pub available_out: Option<PathBuf>,

    /// Where to write domains expiring soon [default: comingsoon.txt]
    #[arg(long = "comingsoon-out", value_name = "FILE", help_heading = "Outputs")]
    pub comingsoon_out: Option<PathBuf>,

    /// Print all results as JSON after the scan
    #[arg(short = 'j', long = "json", help_heading = "Outputs")]
    pub json: bool,

    /// Expiring-soon window in days [default: 30]
    #[arg(
        long = "threshold",
        value_name = "DAYS",
        allow_hyphen_values = true,
        help_heading = "Checks"
    )]
    pub threshold: Option<i64>,

    /// HTTP activity probe timeout, e.g. "3s" [default: 3s]
    #[arg(long = "http-timeout", value_name = "DURATION", help_heading = "Checks")]
    pub http_timeout: Option<String>,

    /// WHOIS query timeout, e.g. "10s" [default: 10s]
    #[arg(long = "whois-timeout", value_name = "DURATION", help_heading = "Checks")]
    pub whois_timeout: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show config sources and taken-but-inactive domains
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,

    /// Enable debug logging on stderr
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(args.debug);

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if args.verbose {
        eprintln!("domain-scan v{} starting...", env!("CARGO_PKG_VERSION"));
    }

    // Run the scan
    if let Err(e) = run_domain_scan(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or debug with `--debug`.
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if let Some(days) = args.threshold {
        validate_threshold(days).map_err(|e| e.to_string())?;
    }

    for (flag, value) in [
        ("--http-timeout", &args.http_timeout),
        ("--whois-timeout", &args.whois_timeout),
    ] {
        if let Some(timeout_str) = value {
            if parse_duration(timeout_str).is_none() {
                return Err(format!(
                    "Invalid {} '{}'. Use format like '5s', '30s', '2m'",
                    flag, timeout_str
                ));
            }
        }
    }

    for (flag, value) in [
        ("--domains", &args.domains),
        ("--wordlist", &args.wordlist),
        ("--tlds", &args.tlds),
        ("--available-out", &args.available_out),
        ("--comingsoon-out", &args.comingsoon_out),
    ] {
        if matches!(value, Some(path) if path.as_os_str().is_empty()) {
            return Err(format!("{} cannot be empty", flag));
        }
    }

    Ok(())
}

async fn run_domain_scan(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let env_config = load_env_config();
    let config = build_config(&args, &env_config)?;
    tracing::debug!(?config, "effective configuration");

    if args.dry_run {
        let candidates = load_candidates(
            &config.domains_file,
            &config.wordlist_file,
            &config.tld_file,
        )?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        } else {
            ui::print_candidates(&candidates);
        }
        return Ok(());
    }

    if !is_whois_available().await {
        ui::print_warning(
            "'whois' command not found or not working; expiration checks will report errors",
        );
    }

    let available_file = config.available_file.clone();
    let comingsoon_file = config.comingsoon_file.clone();
    let scanner = DomainScanner::with_config(config)?;

    let start_time = Instant::now();
    let report = scanner
        .run(|result| {
            if let Some(message) = &result.whois_error {
                ui::print_whois_error(&result.domain, message, args.json);
            }
            if !args.json {
                ui::print_result(result, args.verbose);
            }
        })
        .await?;

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    if args.verbose {
        println!();
        ui::print_summary(&report, start_time.elapsed());
        println!();
    }

    ui::print_saved(&available_file, &comingsoon_file);

    Ok(())
}

/// Build the scan configuration.
///
/// Precedence, lowest first: built-in defaults, config file(s), `DS_*`
/// environment variables, CLI arguments.
fn build_config(
    args: &Args,
    env_config: &EnvConfig,
) -> Result<ScanConfig, Box<dyn std::error::Error>> {
    let mut config = ScanConfig::default();
    let mut config_manager = ConfigManager::new();

    // Step 1: Determine config file path and load config files
    if let Some(explicit_config_path) = &args.config {
        if args.verbose {
            eprintln!(
                "Using explicit config file (CLI --config): {}",
                explicit_config_path
            );
        }

        let file_config = config_manager
            .load_file(explicit_config_path)
            .map_err(|e| {
                format!(
                    "Failed to load config file '{}': {}",
                    explicit_config_path, e
                )
            })?;

        config = file_config.apply_to(config);
    } else if let Some(env_config_path) = &env_config.config {
        if args.verbose {
            eprintln!(
                "Using explicit config file (DS_CONFIG env var): {}",
                env_config_path
            );
        }

        let file_config = config_manager
            .load_file(env_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", env_config_path, e))?;

        config = file_config.apply_to(config);
    } else {
        let file_config = config_manager.discover_and_load();

        if args.verbose {
            if config_manager.loaded_files().is_empty() {
                eprintln!("No config files found, using defaults");
            }
            for path in config_manager.loaded_files() {
                eprintln!("Loaded config file: {}", path.display());
            }
        }

        config = file_config.apply_to(config);
    }

    // Step 2: Apply environment variables (DS_*)
    config = env_config.apply_to(config);

    // Step 3: Apply CLI arguments (highest precedence)
    Ok(apply_cli_args_to_config(config, args))
}

/// Apply CLI arguments to config (highest precedence).
///
/// Only flags the user actually passed override earlier layers.
fn apply_cli_args_to_config(mut config: ScanConfig, args: &Args) -> ScanConfig {
    if let Some(path) = &args.domains {
        config.domains_file = path.clone();
    }
    if let Some(path) = &args.wordlist {
        config.wordlist_file = path.clone();
    }
    if let Some(path) = &args.tlds {
        config.tld_file = path.clone();
    }
    if let Some(path) = &args.available_out {
        config.available_file = path.clone();
    }
    if let Some(path) = &args.comingsoon_out {
        config.comingsoon_file = path.clone();
    }
    if let Some(days) = args.threshold {
        config.threshold_days = days;
    }
    if let Some(timeout) = args.http_timeout.as_deref().and_then(parse_duration) {
        config.http_timeout = timeout;
    }
    if let Some(timeout) = args.whois_timeout.as_deref().and_then(parse_duration) {
        config.whois_timeout = timeout;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    // Helper function with all required fields
    fn create_test_args() -> Args {
        Args {
            domains: None,
            wordlist: None,
            tlds: None,
            dry_run: false,
            available_out: None,
            comingsoon_out: None,
            json: false,
            threshold: None,
            http_timeout: None,
            whois_timeout: None,
            config: None,
            verbose: false,
            debug: false,
        }
    }

    #[test]
    fn test_validate_args_defaults() {
        assert!(validate_args(&create_test_args()).is_ok());
    }

    #[test]
    fn test_validate_args_threshold_range() {
        let mut args = create_test_args();
        args.threshold = Some(-10);
        assert!(validate_args(&args).is_ok());

        args.threshold = Some(5000);
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_bad_timeout() {
        let mut args = create_test_args();
        args.whois_timeout = Some("forever".to_string());
        let err = validate_args(&args).unwrap_err();
        assert!(err.contains("--whois-timeout"));
    }

    #[test]
    fn test_validate_args_empty_path() {
        let mut args = create_test_args();
        args.available_out = Some(PathBuf::new());
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_cli_args_override_config() {
        let mut args = create_test_args();
        args.tlds = Some(PathBuf::from("cli-tlds.txt"));
        args.threshold = Some(7);
        args.http_timeout = Some("9s".to_string());

        let base = ScanConfig::default().with_whois_timeout(Duration::from_secs(20));
        let config = apply_cli_args_to_config(base, &args);

        assert_eq!(config.tld_file, PathBuf::from("cli-tlds.txt"));
        assert_eq!(config.domains_file, PathBuf::from("domains.txt"));
        assert_eq!(config.threshold_days, 7);
        assert_eq!(config.http_timeout, Duration::from_secs(9));
        assert_eq!(config.whois_timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_build_config_precedence() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "[inputs]\ndomains = \"file-domains.txt\"\nwordlist = \"file-words.txt\"\n\n[checks]\nthreshold_days = 60\nwhois_timeout = \"15s\"\n"
        )
        .unwrap();
        file.flush().unwrap();

        let mut args = create_test_args();
        args.config = Some(file.path().to_string_lossy().to_string());
        args.domains = Some(PathBuf::from("cli-domains.txt"));

        let env_config = EnvConfig {
            wordlist: Some("env-words.txt".to_string()),
            threshold_days: Some(21),
            ..Default::default()
        };

        let config = build_config(&args, &env_config).unwrap();
        assert_eq!(config.domains_file, PathBuf::from("cli-domains.txt"));
        assert_eq!(config.wordlist_file, PathBuf::from("env-words.txt"));
        assert_eq!(config.tld_file, PathBuf::from("tld.txt"));
        assert_eq!(config.threshold_days, 21);
        assert_eq!(config.whois_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_build_config_missing_explicit_file() {
        let mut args = create_test_args();
        args.config = Some("/nonexistent/domain-scan.toml".to_string());
        assert!(build_config(&args, &EnvConfig::default()).is_err());
    }
}
