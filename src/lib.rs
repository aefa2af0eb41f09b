//! Domain Hunter - bulk domain availability checking
//!
//! Domains are swept with a fast DNS probe against a pinned public resolver,
//! and only the names that do not resolve are confirmed with a rate-limited
//! WHOIS lookup. WHOIS replies are classified conservatively: anything not
//! clearly unregistered is reported as taken.

pub mod domain;
pub mod error;
pub mod generator;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use error::{DomainHunterError, Result};
pub use types::{
    CheckConfig, CheckMethod, CheckResult, CheckStrategy, DnsErrorPolicy, MetricsSnapshot,
    PerformanceMetrics, Verdict,
};

// Re-export main functionality
pub use domain::{
    BatchRunner, DnsProbe, DomainChecker, HybridPipeline, PipelineStats, WhoisClassifier,
    WhoisLookup,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
