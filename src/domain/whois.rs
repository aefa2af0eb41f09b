//! WHOIS lookups over TCP port 43

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::WhoisLookup;
use crate::error::{DomainHunterError, Result};

const WHOIS_PORT: u16 = 43;
const IANA_WHOIS: &str = "whois.iana.org";
/// Replies past this size are truncated; no registry record comes close.
const MAX_REPLY_BYTES: u64 = 256 * 1024;

/// Raw WHOIS client.
///
/// High-traffic TLDs map to a known server; any other TLD is resolved
/// through IANA first.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    deadline: Duration,
    io_timeout: Duration,
    port: u16,
    server: Option<String>,
}

impl WhoisClient {
    /// `deadline` bounds the whole lookup, discovery round-trip included.
    pub fn new(deadline: Duration) -> Self {
        Self {
            deadline,
            io_timeout: deadline.min(Duration::from_secs(10)),
            port: WHOIS_PORT,
            server: None,
        }
    }

    /// Query servers on a non-standard port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Send every query to `server`, skipping the TLD map and IANA discovery.
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Bound on each connect, write and read step.
    pub fn with_io_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout = io_timeout;
        self
    }

    async fn lookup_inner(&self, domain: &str) -> Result<String> {
        let tld = domain
            .rsplit('.')
            .next()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainHunterError::validation(format!("'{}' has no TLD", domain)))?
            .to_lowercase();

        let server = match self.server.as_deref().or_else(|| whois_server_for_tld(&tld)) {
            Some(server) => server.to_string(),
            None => {
                let iana = self.query(IANA_WHOIS, &tld).await?;
                parse_iana_field(&iana, "whois:")
                    .or_else(|| parse_iana_field(&iana, "refer:"))
                    .ok_or_else(|| {
                        DomainHunterError::whois(
                            domain,
                            format!("no WHOIS server registered for .{}", tld),
                            Some(IANA_WHOIS.to_string()),
                        )
                    })?
            }
        };

        tracing::debug!(domain = %domain, server = %server, "Querying WHOIS");
        self.query(&server, domain).await
    }

    async fn query(&self, server: &str, query: &str) -> Result<String> {
        let secs = self.io_timeout.as_secs();
        let fail = |step: &str, e: std::io::Error| {
            DomainHunterError::whois(query, format!("{} failed: {}", step, e), Some(server.to_string()))
        };

        let mut stream = timeout(self.io_timeout, TcpStream::connect((server, self.port)))
            .await
            .map_err(|_| DomainHunterError::timeout("WHOIS connect", secs))?
            .map_err(|e| fail("connect", e))?;

        timeout(self.io_timeout, stream.write_all(format!("{}\r\n", query).as_bytes()))
            .await
            .map_err(|_| DomainHunterError::timeout("WHOIS write", secs))?
            .map_err(|e| fail("write", e))?;

        let mut buf = Vec::new();
        timeout(self.io_timeout, (&mut stream).take(MAX_REPLY_BYTES).read_to_end(&mut buf))
            .await
            .map_err(|_| DomainHunterError::timeout("WHOIS read", secs))?
            .map_err(|e| fail("read", e))?;

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[async_trait]
impl WhoisLookup for WhoisClient {
    async fn lookup(&self, domain: &str) -> Result<String> {
        timeout(self.deadline, self.lookup_inner(domain))
            .await
            .map_err(|_| DomainHunterError::timeout("WHOIS lookup", self.deadline.as_secs()))?
    }
}

/// Known authoritative servers for frequently scanned TLDs.
pub fn whois_server_for_tld(tld: &str) -> Option<&'static str> {
    match tld {
        "com" | "net" => Some("whois.verisign-grs.com"),
        "org" => Some("whois.pir.org"),
        "io" => Some("whois.nic.io"),
        "sh" => Some("whois.nic.sh"),
        "ai" => Some("whois.nic.ai"),
        "co" => Some("whois.nic.co"),
        "me" => Some("whois.nic.me"),
        "dev" | "app" => Some("whois.nic.google"),
        "xyz" => Some("whois.nic.xyz"),
        "tv" => Some("whois.nic.tv"),
        "gg" => Some("whois.gg"),
        "so" => Some("whois.nic.so"),
        "to" => Some("whois.tonic.to"),
        "is" => Some("whois.isnic.is"),
        "ly" => Some("whois.nic.ly"),
        "de" => Some("whois.denic.de"),
        "uk" => Some("whois.nic.uk"),
        "nl" => Some("whois.domain-registry.nl"),
        _ => None,
    }
}

/// Value of the first `key` line in an IANA TLD record.
fn parse_iana_field(iana: &str, key: &str) -> Option<String> {
    iana.lines()
        .map(str::trim)
        .find_map(|line| {
            if line.to_lowercase().starts_with(key) {
                line.get(key.len()..).map(|v| v.trim().to_string())
            } else {
                None
            }
        })
        .filter(|s| !s.is_empty())
}
