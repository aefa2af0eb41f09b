//! Domain availability checking module

pub mod batch;
pub mod checker;
pub mod classifier;
pub mod pipeline;
pub mod resolver;
pub mod validator;
pub mod whois;

// Re-export main functionality
pub use batch::BatchRunner;
pub use checker::DomainChecker;
pub use classifier::{Classification, ClassifierPatterns, WhoisClassifier};
pub use pipeline::{HybridPipeline, PipelineStats};
pub use resolver::DnsResolver;
pub use validator::DomainValidator;
pub use whois::WhoisClient;

use crate::error::Result;
use async_trait::async_trait;

/// Cheap existence signal from DNS
#[async_trait]
pub trait DnsProbe: Send + Sync {
    /// `Ok(true)` if the name resolves, `Ok(false)` if the resolver says it
    /// does not exist. Any other failure is an error.
    async fn probe(&self, domain: &str) -> Result<bool>;
}

/// Raw WHOIS text for a domain
#[async_trait]
pub trait WhoisLookup: Send + Sync {
    async fn lookup(&self, domain: &str) -> Result<String>;
}
