//! DNS existence probe pinned to a single public nameserver

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::TokioAsyncResolver;
use tokio::time::timeout;

use super::DnsProbe;
use crate::error::{DomainHunterError, Result};

/// Resolver that only ever talks to the configured nameserver.
///
/// The host resolver configuration is ignored so ISP NXDOMAIN rewriting cannot
/// make unregistered names look like they resolve.
#[derive(Clone)]
pub struct DnsResolver {
    resolver: TokioAsyncResolver,
    nameserver: SocketAddr,
    timeout: Duration,
}

impl DnsResolver {
    pub fn new(nameserver: SocketAddr, lookup_timeout: Duration) -> Self {
        let mut config = ResolverConfig::new();
        config.add_name_server(NameServerConfig::new(nameserver, Protocol::Udp));

        let mut opts = ResolverOpts::default();
        opts.timeout = lookup_timeout;
        opts.attempts = 1;
        opts.use_hosts_file = false;

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
            nameserver,
            timeout: lookup_timeout,
        }
    }

    pub fn nameserver(&self) -> SocketAddr {
        self.nameserver
    }
}

impl std::fmt::Debug for DnsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsResolver")
            .field("nameserver", &self.nameserver)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl DnsProbe for DnsResolver {
    async fn probe(&self, domain: &str) -> Result<bool> {
        // Trailing dot keeps the name from being expanded with search domains.
        let fqdn = format!("{}.", domain.trim_end_matches('.'));

        let lookup = timeout(self.timeout, self.resolver.lookup_ip(fqdn))
            .await
            .map_err(|_| DomainHunterError::timeout("DNS lookup", self.timeout.as_secs()))?;

        match lookup {
            Ok(ips) => Ok(ips.iter().next().is_some()),
            Err(e) => interpret_error(domain, &e),
        }
    }
}

/// Every other failure is passed up for the caller's error policy to decide.
fn interpret_error(domain: &str, err: &ResolveError) -> Result<bool> {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            interpret_negative(domain, *response_code)
        }
        ResolveErrorKind::Timeout => Err(DomainHunterError::dns(domain, "resolver timed out")),
        _ => Err(DomainHunterError::dns(domain, err.to_string())),
    }
}

/// hickory reports SERVFAIL, REFUSED and friends as "no records" too. Only
/// NXDOMAIN and NODATA (NOERROR with an empty answer) mean nothing resolves.
fn interpret_negative(domain: &str, code: ResponseCode) -> Result<bool> {
    match code {
        ResponseCode::NXDomain | ResponseCode::NoError => Ok(false),
        other => Err(DomainHunterError::dns(
            domain,
            format!("nameserver answered {}", other),
        )),
    }
}
