//! Core types and structures for domain-hunter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::{DomainHunterError, Result};

/// Outcome of checking one domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Available,
    Taken,
    Error,
    Pending,
}

impl Verdict {
    /// `Available` and `Taken` are the only verdicts a finished check may carry.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Verdict::Available | Verdict::Taken)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Available => write!(f, "available"),
            Verdict::Taken => write!(f, "taken"),
            Verdict::Error => write!(f, "error"),
            Verdict::Pending => write!(f, "pending"),
        }
    }
}

/// Probe that produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMethod {
    Dns,
    Whois,
}

impl std::fmt::Display for CheckMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckMethod::Dns => write!(f, "dns"),
            CheckMethod::Whois => write!(f, "whois"),
        }
    }
}

/// Single-domain check strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStrategy {
    /// Classify the WHOIS reply
    #[default]
    Whois,
    /// DNS existence only
    Dns,
}

impl FromStr for CheckStrategy {
    type Err = DomainHunterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "whois" => Ok(Self::Whois),
            "dns" => Ok(Self::Dns),
            other => Err(DomainHunterError::config(format!(
                "unknown check strategy '{}', expected 'whois' or 'dns'",
                other
            ))),
        }
    }
}

/// How a DNS failure other than "name does not exist" is read.
///
/// Applies to the standalone DNS check and to the DNS sweep of the hybrid
/// pipeline alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DnsErrorPolicy {
    /// Timeouts, refusals and malformed replies count as registered.
    #[default]
    Taken,
    /// Such failures count as unregistered; the pipeline then sends them on
    /// to WHOIS confirmation.
    Available,
}

impl DnsErrorPolicy {
    pub fn verdict(&self) -> Verdict {
        match self {
            DnsErrorPolicy::Taken => Verdict::Taken,
            DnsErrorPolicy::Available => Verdict::Available,
        }
    }
}

impl FromStr for DnsErrorPolicy {
    type Err = DomainHunterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "taken" => Ok(Self::Taken),
            "available" => Ok(Self::Available),
            other => Err(DomainHunterError::config(format!(
                "unknown DNS error policy '{}', expected 'taken' or 'available'",
                other
            ))),
        }
    }
}

/// Domain availability check result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub domain: String,
    pub status: Verdict,
    pub method: CheckMethod,
    pub checked_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    pub fn new(domain: impl Into<String>, status: Verdict, method: CheckMethod) -> Self {
        Self {
            domain: domain.into(),
            status,
            method,
            checked_at: Utc::now(),
            duration_ms: None,
            error: None,
        }
    }

    /// A check that could not complete. Reported as taken, never as available.
    pub fn failed(domain: impl Into<String>, method: CheckMethod, error: impl Into<String>) -> Self {
        Self::new(domain, Verdict::Taken, method).with_error(error)
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(duration.as_millis() as u64);
        self
    }

    pub fn is_available(&self) -> bool {
        self.status == Verdict::Available
    }
}

pub const DEFAULT_DNS_CONCURRENCY: usize = 50;
pub const DEFAULT_WHOIS_CONCURRENCY: usize = 5;
pub const DEFAULT_NAMESERVER: &str = "8.8.8.8:53";

/// Configuration for domain checking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// In-flight DNS lookups. Public resolvers tolerate wide fan-out.
    pub dns_concurrency: usize,
    /// In-flight WHOIS lookups. Registries rate-limit aggressively.
    pub whois_concurrency: usize,
    /// Nameserver every DNS probe is sent to
    pub nameserver: SocketAddr,
    pub dns_timeout: Duration,
    /// Deadline for a whole WHOIS lookup, server discovery included
    pub whois_timeout: Duration,
    pub dns_error_policy: DnsErrorPolicy,
    /// Strategy used by single-domain checks
    pub strategy: CheckStrategy,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            dns_concurrency: DEFAULT_DNS_CONCURRENCY,
            whois_concurrency: DEFAULT_WHOIS_CONCURRENCY,
            nameserver: SocketAddr::from(([8, 8, 8, 8], 53)),
            dns_timeout: Duration::from_secs(10),
            whois_timeout: Duration::from_secs(15),
            dns_error_policy: DnsErrorPolicy::Taken,
            strategy: CheckStrategy::Whois,
        }
    }
}

impl CheckConfig {
    /// Build a configuration from `DOMAIN_HUNTER_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("DOMAIN_HUNTER_DNS_CONCURRENCY") {
            config.dns_concurrency = parse_positive("DOMAIN_HUNTER_DNS_CONCURRENCY", &v)?;
        }
        if let Some(v) = lookup("DOMAIN_HUNTER_WHOIS_CONCURRENCY") {
            config.whois_concurrency = parse_positive("DOMAIN_HUNTER_WHOIS_CONCURRENCY", &v)?;
        }
        if let Some(v) = lookup("DOMAIN_HUNTER_NAMESERVER") {
            config.nameserver = parse_nameserver(&v)?;
        }
        if let Some(v) = lookup("DOMAIN_HUNTER_DNS_TIMEOUT_SECS") {
            config.dns_timeout =
                Duration::from_secs(parse_positive("DOMAIN_HUNTER_DNS_TIMEOUT_SECS", &v)? as u64);
        }
        if let Some(v) = lookup("DOMAIN_HUNTER_WHOIS_TIMEOUT_SECS") {
            config.whois_timeout =
                Duration::from_secs(parse_positive("DOMAIN_HUNTER_WHOIS_TIMEOUT_SECS", &v)? as u64);
        }
        if let Some(v) = lookup("DOMAIN_HUNTER_DNS_ERROR_POLICY") {
            config.dns_error_policy = v.parse()?;
        }

        Ok(config)
    }
}

fn parse_positive(key: &str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(DomainHunterError::config(format!(
            "{} must be a positive integer, got '{}'",
            key, value
        ))),
    }
}

/// Parse a nameserver address. A bare IP gets port 53.
pub fn parse_nameserver(value: &str) -> Result<SocketAddr> {
    let value = value.trim();
    if let Ok(addr) = value.parse::<SocketAddr>() {
        return Ok(addr);
    }
    value
        .parse::<std::net::IpAddr>()
        .map(|ip| SocketAddr::new(ip, 53))
        .map_err(|_| DomainHunterError::config(format!("invalid nameserver address '{}'", value)))
}

/// Lookup counters shared by one checker
#[derive(Debug, Default)]
pub struct PerformanceMetrics {
    dns_lookups: AtomicU64,
    whois_lookups: AtomicU64,
    transport_errors: AtomicU64,
    total_check_time_ms: AtomicU64,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_dns_lookups(&self) {
        self.dns_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_whois_lookups(&self) {
        self.whois_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_check_time(&self, ms: u64) {
        self.total_check_time_ms.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            dns_lookups: self.dns_lookups.load(Ordering::Relaxed),
            whois_lookups: self.whois_lookups.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            total_check_time_ms: self.total_check_time_ms.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`PerformanceMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub dns_lookups: u64,
    pub whois_lookups: u64,
    pub transport_errors: u64,
    pub total_check_time_ms: u64,
}

impl MetricsSnapshot {
    pub fn lookups(&self) -> u64 {
        self.dns_lookups + self.whois_lookups
    }

    pub fn avg_check_time_ms(&self) -> f64 {
        if self.lookups() == 0 {
            0.0
        } else {
            self.total_check_time_ms as f64 / self.lookups() as f64
        }
    }
}
