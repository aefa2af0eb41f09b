//! Two-phase availability pipeline
//!
//! DNS answers are cheap and never wrong about a name that resolves, but many
//! registered names have no records at all. Every domain therefore gets a DNS
//! probe at wide concurrency, and only the names that did not resolve go on
//! to the slow, rate-limited WHOIS confirmation.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::batch::BatchRunner;
use super::checker::DomainChecker;
use crate::types::{CheckMethod, CheckResult, Verdict};

/// Counters for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineStats {
    pub total: usize,
    /// Taken after the DNS sweep, never sent to WHOIS
    pub dns_taken: usize,
    /// Sent on to WHOIS confirmation
    pub candidates: usize,
    /// Candidates WHOIS confirmed as available
    pub confirmed_available: usize,
    pub dns_phase: Duration,
    pub whois_phase: Duration,
}

/// Hybrid DNS + WHOIS batch check
pub struct HybridPipeline {
    checker: DomainChecker,
}

impl HybridPipeline {
    pub fn new(checker: DomainChecker) -> Self {
        Self { checker }
    }

    pub async fn run(&self, domains: &[String]) -> Vec<CheckResult> {
        self.run_with_stats(domains).await.0
    }

    pub async fn run_with_stats(&self, domains: &[String]) -> (Vec<CheckResult>, PipelineStats) {
        let config = self.checker.config();
        let mut stats = PipelineStats {
            total: domains.len(),
            ..Default::default()
        };

        // Phase 1: DNS sweep
        let dns_start = Instant::now();
        let mut results = self.checker.check_bulk_dns(domains).await;
        stats.dns_phase = dns_start.elapsed();

        let candidates: Vec<usize> = results
            .iter()
            .enumerate()
            .filter(|(_, r)| r.status == Verdict::Available)
            .map(|(i, _)| i)
            .collect();
        stats.candidates = candidates.len();
        stats.dns_taken = domains.len() - candidates.len();

        tracing::info!(
            total = %stats.total,
            candidates = %stats.candidates,
            dns_concurrency = %config.dns_concurrency,
            duration_ms = %stats.dns_phase.as_millis(),
            "DNS sweep completed"
        );

        // Phase 2: WHOIS confirmation of candidates only
        let whois_start = Instant::now();
        if !candidates.is_empty() {
            let candidate_domains: Vec<String> =
                candidates.iter().map(|&i| domains[i].clone()).collect();
            let checker = self.checker.clone();
            let confirmed = BatchRunner::new(config.whois_concurrency, CheckMethod::Whois)
                .run(&candidate_domains, move |domain| {
                    let checker = checker.clone();
                    async move { checker.check_whois(&domain).await }
                })
                .await;

            for (idx, result) in candidates.into_iter().zip(confirmed) {
                results[idx] = result;
            }
        }
        stats.whois_phase = whois_start.elapsed();
        stats.confirmed_available = results.iter().filter(|r| r.is_available()).count();

        tracing::info!(
            candidates = %stats.candidates,
            confirmed_available = %stats.confirmed_available,
            whois_concurrency = %config.whois_concurrency,
            duration_ms = %stats.whois_phase.as_millis(),
            "WHOIS confirmation completed"
        );

        (results, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DnsProbe, WhoisLookup};
    use crate::error::{DomainHunterError, Result};
    use crate::types::{CheckConfig, DnsErrorPolicy};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Names in `resolving` resolve; names in `broken` fail with SERVFAIL.
    struct SetDns {
        resolving: HashSet<&'static str>,
        broken: HashSet<&'static str>,
    }

    #[async_trait]
    impl DnsProbe for SetDns {
        async fn probe(&self, domain: &str) -> Result<bool> {
            if self.broken.contains(domain) {
                return Err(DomainHunterError::dns(domain, "SERVFAIL"));
            }
            Ok(self.resolving.contains(domain))
        }
    }

    /// Registered unless listed in `free`; counts calls.
    struct CountingWhois {
        free: HashSet<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WhoisLookup for CountingWhois {
        async fn lookup(&self, domain: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.free.contains(domain) {
                Ok(format!("No match for \"{}\".", domain.to_uppercase()))
            } else {
                Ok("Domain Status: clientTransferProhibited".to_string())
            }
        }
    }

    fn build(
        resolving: &[&'static str],
        broken: &[&'static str],
        free: &[&'static str],
        policy: DnsErrorPolicy,
    ) -> (HybridPipeline, Arc<CountingWhois>) {
        let dns = Arc::new(SetDns {
            resolving: resolving.iter().copied().collect(),
            broken: broken.iter().copied().collect(),
        });
        let whois = Arc::new(CountingWhois {
            free: free.iter().copied().collect(),
            calls: AtomicUsize::new(0),
        });
        let config = CheckConfig {
            dns_error_policy: policy,
            ..Default::default()
        };
        let checker = DomainChecker::with_adapters(config, dns, whois.clone());
        (HybridPipeline::new(checker), whois)
    }

    fn owned(domains: &[&str]) -> Vec<String> {
        domains.iter().map(|d| d.to_string()).collect()
    }

    #[tokio::test]
    async fn test_resolving_and_free_domain() {
        let (pipeline, whois) = build(&["ab.io"], &[], &["xy.io"], DnsErrorPolicy::Taken);
        let (results, stats) = pipeline.run_with_stats(&owned(&["ab.io", "xy.io"])).await;

        assert_eq!(results[0].domain, "ab.io");
        assert_eq!(results[0].status, Verdict::Taken);
        assert_eq!(results[0].method, CheckMethod::Dns);
        assert_eq!(results[1].domain, "xy.io");
        assert_eq!(results[1].status, Verdict::Available);
        assert_eq!(results[1].method, CheckMethod::Whois);

        assert_eq!(whois.calls.load(Ordering::SeqCst), 1);
        assert_eq!(stats.dns_taken, 1);
        assert_eq!(stats.candidates, 1);
        assert_eq!(stats.confirmed_available, 1);
    }

    #[tokio::test]
    async fn test_whois_overrides_dns_candidate() {
        // No DNS records, but WHOIS shows a registration.
        let (pipeline, _) = build(&[], &[], &[], DnsErrorPolicy::Taken);
        let results = pipeline.run(&owned(&["parked.io"])).await;
        assert_eq!(results[0].status, Verdict::Taken);
        assert_eq!(results[0].method, CheckMethod::Whois);
    }

    #[tokio::test]
    async fn test_dns_errors_follow_policy() {
        let (pipeline, whois) = build(&[], &["flaky.io"], &["flaky.io"], DnsErrorPolicy::Taken);
        let results = pipeline.run(&owned(&["flaky.io"])).await;
        assert_eq!(results[0].status, Verdict::Taken);
        assert!(results[0].error.is_some());
        assert_eq!(whois.calls.load(Ordering::SeqCst), 0);

        let (pipeline, whois) = build(&[], &["flaky.io"], &["flaky.io"], DnsErrorPolicy::Available);
        let results = pipeline.run(&owned(&["flaky.io"])).await;
        assert_eq!(results[0].status, Verdict::Available);
        assert_eq!(results[0].method, CheckMethod::Whois);
        assert_eq!(whois.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let (pipeline, whois) = build(&[], &[], &[], DnsErrorPolicy::Taken);
        let (results, stats) = pipeline.run_with_stats(&[]).await;
        assert!(results.is_empty());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.candidates, 0);
        assert_eq!(whois.calls.load(Ordering::SeqCst), 0);
    }
}
