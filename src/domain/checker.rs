//! Domain availability checker

use std::sync::Arc;
use std::time::Instant;

use super::batch::BatchRunner;
use super::classifier::WhoisClassifier;
use super::pipeline::{HybridPipeline, PipelineStats};
use super::resolver::DnsResolver;
use super::validator::DomainValidator;
use super::whois::WhoisClient;
use super::{DnsProbe, WhoisLookup};
use crate::error::Result;
use crate::types::{
    CheckConfig, CheckMethod, CheckResult, CheckStrategy, MetricsSnapshot, PerformanceMetrics,
    Verdict,
};

/// Domain availability checker with performance monitoring.
///
/// Cloning is cheap; clones share adapters and metrics.
#[derive(Clone)]
pub struct DomainChecker {
    config: CheckConfig,
    dns: Arc<dyn DnsProbe>,
    whois: Arc<dyn WhoisLookup>,
    classifier: Arc<WhoisClassifier>,
    validator: DomainValidator,
    metrics: Arc<PerformanceMetrics>,
}

impl DomainChecker {
    /// Create a new domain checker with default configuration
    pub fn new() -> Self {
        Self::with_config(CheckConfig::default())
    }

    /// Create a checker talking to the real DNS and WHOIS services
    pub fn with_config(config: CheckConfig) -> Self {
        let dns = Arc::new(DnsResolver::new(config.nameserver, config.dns_timeout));
        let whois = Arc::new(WhoisClient::new(config.whois_timeout));
        Self::with_adapters(config, dns, whois)
    }

    /// Create a checker over caller-supplied adapters
    pub fn with_adapters(
        config: CheckConfig,
        dns: Arc<dyn DnsProbe>,
        whois: Arc<dyn WhoisLookup>,
    ) -> Self {
        Self {
            config,
            dns,
            whois,
            classifier: Arc::new(WhoisClassifier::new()),
            validator: DomainValidator::new(),
            metrics: Arc::new(PerformanceMetrics::new()),
        }
    }

    /// Replace the WHOIS classifier
    pub fn with_classifier(mut self, classifier: WhoisClassifier) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Validate and check one domain with the configured strategy
    pub async fn check_domain(&self, domain: &str) -> Result<CheckResult> {
        let validated = self.validator.validate(domain)?;
        let result = match self.config.strategy {
            CheckStrategy::Whois => self.check_whois(&validated.full_domain).await,
            CheckStrategy::Dns => self.check_dns(&validated.full_domain).await,
        };
        Ok(result)
    }

    /// Authoritative check: classify the WHOIS reply.
    ///
    /// A failed lookup is classified like any other reply and ends up taken,
    /// with the transport error kept on the result.
    pub async fn check_whois(&self, domain: &str) -> CheckResult {
        let start = Instant::now();
        let reply = self.whois.lookup(domain).await;
        let duration = start.elapsed();

        self.metrics.increment_whois_lookups();
        self.metrics.add_check_time(duration.as_millis() as u64);

        let (classification, error) = match &reply {
            Ok(text) => (self.classifier.explain(Some(text)), None),
            Err(e) => {
                self.metrics.increment_errors();
                (self.classifier.explain(None), Some(e.to_string()))
            }
        };

        tracing::debug!(
            domain = %domain,
            method = "whois",
            classification = %classification,
            duration_ms = %duration.as_millis(),
            "Domain check completed"
        );

        let result =
            CheckResult::new(domain, classification.verdict(), CheckMethod::Whois).with_duration(duration);
        match error {
            Some(error) => result.with_error(error),
            None => result,
        }
    }

    /// Cheap check: does the name resolve at the pinned nameserver.
    ///
    /// DNS can prove a name is registered but not that it is free, so an
    /// `Available` here is only a candidate.
    pub async fn check_dns(&self, domain: &str) -> CheckResult {
        let start = Instant::now();
        let probe = self.dns.probe(domain).await;
        let duration = start.elapsed();

        self.metrics.increment_dns_lookups();
        self.metrics.add_check_time(duration.as_millis() as u64);

        let result = match probe {
            Ok(true) => CheckResult::new(domain, Verdict::Taken, CheckMethod::Dns),
            Ok(false) => CheckResult::new(domain, Verdict::Available, CheckMethod::Dns),
            Err(e) => {
                self.metrics.increment_errors();
                let policy = self.config.dns_error_policy;
                tracing::debug!(domain = %domain, error = %e, policy = ?policy, "DNS probe failed");
                CheckResult::new(domain, policy.verdict(), CheckMethod::Dns).with_error(e.to_string())
            }
        };

        tracing::debug!(
            domain = %domain,
            method = "dns",
            status = %result.status,
            duration_ms = %duration.as_millis(),
            "Domain check completed"
        );

        result.with_duration(duration)
    }

    /// WHOIS-check every domain at the narrow concurrency tier
    pub async fn check_bulk(&self, domains: &[String]) -> Vec<CheckResult> {
        let batch_start = Instant::now();
        let checker = self.clone();
        let results = BatchRunner::new(self.config.whois_concurrency, CheckMethod::Whois)
            .run(domains, move |domain| {
                let checker = checker.clone();
                async move { checker.check_whois(&domain).await }
            })
            .await;

        let available = results.iter().filter(|r| r.is_available()).count();
        tracing::info!(
            domains_requested = %domains.len(),
            available = %available,
            batch_duration_ms = %batch_start.elapsed().as_millis(),
            "Bulk WHOIS check completed"
        );
        results
    }

    /// DNS-check every domain at the wide concurrency tier
    pub async fn check_bulk_dns(&self, domains: &[String]) -> Vec<CheckResult> {
        let checker = self.clone();
        BatchRunner::new(self.config.dns_concurrency, CheckMethod::Dns)
            .run(domains, move |domain| {
                let checker = checker.clone();
                async move { checker.check_dns(&domain).await }
            })
            .await
    }

    /// DNS sweep of every domain, WHOIS confirmation of the unresolved ones
    pub async fn check_bulk_hybrid(&self, domains: &[String]) -> Vec<CheckResult> {
        HybridPipeline::new(self.clone()).run(domains).await
    }

    /// Same as [`check_bulk_hybrid`](Self::check_bulk_hybrid), with phase statistics
    pub async fn check_bulk_hybrid_with_stats(
        &self,
        domains: &[String],
    ) -> (Vec<CheckResult>, PipelineStats) {
        HybridPipeline::new(self.clone()).run_with_stats(domains).await
    }

    /// Get checker configuration
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    pub fn validator(&self) -> &DomainValidator {
        &self.validator
    }

    /// Get current metrics snapshot
    pub fn get_metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.get_stats()
    }
}

impl Default for DomainChecker {
    fn default() -> Self {
        Self::new()
    }
}
