//! DNS-based availability checking.
//!
//! A domain with no resolvable IPv4 address is treated as available for
//! registration. Every resolver failure counts, whether it is a genuine
//! NXDOMAIN, an empty answer, or a timeout talking to the nameserver.

use crate::error::DomainScanError;
use crate::protocols::NameResolver;
use hickory_resolver::{
    config::{ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
    TokioResolver,
};
use std::future::Future;
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::{debug, warn};

/// DNS client backed by the host's resolver configuration.
#[derive(Clone)]
pub struct DnsClient {
    resolver: TokioResolver,
    timeout: Duration,
}

impl DnsClient {
    /// Create a new DNS client with a 5 second lookup timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(5))
    }

    /// Create a new DNS client with a custom lookup timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            resolver: build_system_resolver(timeout),
            timeout,
        }
    }

    /// Look up the IPv4 addresses of a domain.
    pub async fn lookup_ipv4(&self, domain: &str) -> Result<Vec<Ipv4Addr>, DomainScanError> {
        let lookup = tokio::time::timeout(self.timeout, self.resolver.ipv4_lookup(domain))
            .await
            .map_err(|_| DomainScanError::timeout(format!("DNS lookup of {}", domain), self.timeout))?;

        match lookup {
            Ok(response) => Ok(response.iter().map(|a| a.0).collect()),
            Err(e) if e.is_no_records_found() => {
                Err(DomainScanError::dns(domain, format!("no address records: {}", e)))
            }
            Err(e) => Err(DomainScanError::dns(domain, e.to_string())),
        }
    }
}

impl Default for DnsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NameResolver for DnsClient {
    fn resolve(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<Vec<Ipv4Addr>, DomainScanError>> + Send {
        self.lookup_ipv4(domain)
    }
}

/// Decide availability from a resolver.
///
/// Returns `true` when the lookup fails for any reason and `false` when it
/// yields at least one address.
pub async fn is_available<R: NameResolver>(resolver: &R, domain: &str) -> bool {
    match resolver.resolve(domain).await {
        Ok(addresses) => {
            debug!(domain, ?addresses, "domain resolves");
            addresses.is_empty()
        }
        Err(e) => {
            debug!(domain, error = %e, "resolution failed, treating as available");
            true
        }
    }
}

/// Build a resolver from the host system configuration, falling back to the
/// resolver library's default upstream set.
fn build_system_resolver(timeout: Duration) -> TokioResolver {
    match TokioResolver::builder_tokio() {
        Ok(mut builder) => {
            builder.options_mut().timeout = timeout;
            return builder.build();
        }
        Err(e) => {
            warn!("Failed to load system DNS configuration, falling back to defaults: {e}");
        }
    }

    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    TokioResolver::builder_with_config(ResolverConfig::default(), TokioConnectionProvider::default())
        .with_options(opts)
        .build()
}
