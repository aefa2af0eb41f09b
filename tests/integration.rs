//! Integration tests for domain-hunter

use async_trait::async_trait;
use domain_hunter::{
    generator, CheckConfig, CheckMethod, DnsErrorPolicy, DnsProbe, DomainChecker,
    DomainHunterError, Result, Verdict, WhoisClassifier, WhoisLookup,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Resolves names in `resolving`, fails names in `broken`, records every probe
#[derive(Default)]
struct MockDns {
    resolving: HashSet<String>,
    broken: HashSet<String>,
    probed: Mutex<Vec<String>>,
}

impl MockDns {
    fn resolving(names: &[&str]) -> Self {
        Self {
            resolving: names.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl DnsProbe for MockDns {
    async fn probe(&self, domain: &str) -> Result<bool> {
        self.probed.lock().push(domain.to_string());
        if self.broken.contains(domain) {
            return Err(DomainHunterError::dns(domain, "SERVFAIL"));
        }
        Ok(self.resolving.contains(domain))
    }
}

/// WHOIS server answering "not found" for `free` names and a registration
/// record for everything else. Tracks calls and peak concurrency.
#[derive(Default)]
struct MockWhois {
    free: HashSet<String>,
    delay: Duration,
    queried: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MockWhois {
    fn free(names: &[&str]) -> Self {
        Self {
            free: names.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl WhoisLookup for MockWhois {
    async fn lookup(&self, domain: &str) -> Result<String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.queried.lock().push(domain.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.free.contains(domain) {
            Ok(format!("No match for domain \"{}\".\n>>> Last update of WHOIS database", domain))
        } else {
            Ok(format!("Domain Name: {}\nRegistrar: Example Registrar, Inc.\nCreation Date: 2001-01-01", domain))
        }
    }
}

fn checker(dns: Arc<MockDns>, whois: Arc<MockWhois>, config: CheckConfig) -> DomainChecker {
    DomainChecker::with_adapters(config, dns, whois)
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_short_io_scan_scenario() {
    // ab.io resolves; xy.io does not and WHOIS has no record of it
    let dns = Arc::new(MockDns::resolving(&["ab.io"]));
    let whois = Arc::new(MockWhois::free(&["xy.io"]));
    let checker = checker(dns.clone(), whois.clone(), CheckConfig::default());

    let (results, stats) = checker
        .check_bulk_hybrid_with_stats(&strings(&["ab.io", "xy.io"]))
        .await;

    assert_eq!(results[0].domain, "ab.io");
    assert_eq!(results[0].status, Verdict::Taken);
    assert_eq!(results[0].method, CheckMethod::Dns);
    assert_eq!(results[1].domain, "xy.io");
    assert_eq!(results[1].status, Verdict::Available);
    assert_eq!(results[1].method, CheckMethod::Whois);

    assert_eq!(*whois.queried.lock(), vec!["xy.io".to_string()]);
    assert_eq!(stats.dns_taken, 1);
    assert_eq!(stats.candidates, 1);
    assert_eq!(stats.confirmed_available, 1);
}

#[tokio::test]
async fn test_resolving_domains_never_reach_whois() {
    let names = generator::short_domains(1, "io");
    let resolving: Vec<&str> = names.iter().step_by(3).map(String::as_str).collect();
    let dns = Arc::new(MockDns::resolving(&resolving));
    let whois = Arc::new(MockWhois::default());
    let checker = checker(dns.clone(), whois.clone(), CheckConfig::default());

    let results = checker.check_bulk_hybrid(&names).await;

    assert_eq!(dns.probed.lock().len(), names.len());
    let queried: HashSet<String> = whois.queried.lock().iter().cloned().collect();
    assert_eq!(queried.len(), names.len() - resolving.len());
    for name in &resolving {
        assert!(!queried.contains(*name), "{} was sent to WHOIS", name);
    }
    // registered everywhere, so nothing comes back available
    assert!(results.iter().all(|r| r.status == Verdict::Taken));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_whois_tier_respects_limit() {
    let names: Vec<String> = (0..100).map(|i| format!("free{}.io", i)).collect();
    let whois = Arc::new(MockWhois {
        delay: Duration::from_millis(10),
        ..Default::default()
    });
    let config = CheckConfig {
        whois_concurrency: 5,
        ..Default::default()
    };
    let checker = checker(Arc::new(MockDns::default()), whois.clone(), config);

    let results = checker.check_bulk_hybrid(&names).await;

    assert_eq!(results.len(), 100);
    assert_eq!(whois.queried.lock().len(), 100);
    let peak = whois.peak.load(Ordering::SeqCst);
    assert!(peak <= 5, "peak WHOIS concurrency was {}", peak);
    assert!(peak >= 2, "WHOIS lookups never overlapped");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_results_keep_input_order() {
    let names = generator::short_domains_multi_tld(1, "", &["io", "com", "dev"]);
    let resolving: Vec<&str> = names.iter().skip(1).step_by(2).map(String::as_str).collect();
    let dns = Arc::new(MockDns::resolving(&resolving));
    let whois = Arc::new(MockWhois {
        free: names.iter().step_by(4).cloned().collect(),
        delay: Duration::from_millis(1),
        ..Default::default()
    });
    let checker = checker(dns, whois, CheckConfig::default());

    let results = checker.check_bulk_hybrid(&names).await;

    assert_eq!(results.len(), names.len());
    for (result, name) in results.iter().zip(&names) {
        assert_eq!(&result.domain, name);
        assert!(result.status.is_terminal());
    }
}

#[tokio::test]
async fn test_dns_error_policy_controls_candidates() {
    let names = strings(&["ok.io", "bad.io"]);
    let broken_dns = || {
        Arc::new(MockDns {
            broken: ["bad.io".to_string()].into_iter().collect(),
            ..Default::default()
        })
    };

    let whois = Arc::new(MockWhois::free(&["ok.io", "bad.io"]));
    let results = checker(broken_dns(), whois.clone(), CheckConfig::default())
        .check_bulk_hybrid(&names)
        .await;
    assert_eq!(results[0].status, Verdict::Available);
    assert_eq!(results[1].status, Verdict::Taken);
    assert!(results[1].error.is_some());
    assert_eq!(*whois.queried.lock(), vec!["ok.io".to_string()]);

    let whois = Arc::new(MockWhois::free(&["ok.io", "bad.io"]));
    let config = CheckConfig {
        dns_error_policy: DnsErrorPolicy::Available,
        ..Default::default()
    };
    let results = checker(broken_dns(), whois.clone(), config)
        .check_bulk_hybrid(&names)
        .await;
    assert_eq!(results[1].status, Verdict::Available);
    assert_eq!(results[1].method, CheckMethod::Whois);
    assert_eq!(whois.queried.lock().len(), 2);
}

#[tokio::test]
async fn test_check_bulk_whois_only() {
    let dns = Arc::new(MockDns::resolving(&["ab.io"]));
    let whois = Arc::new(MockWhois::free(&["ab.io"]));
    let checker = checker(dns.clone(), whois, CheckConfig::default());

    let results = checker.check_bulk(&strings(&["ab.io", "cd.io"])).await;

    assert!(dns.probed.lock().is_empty());
    assert_eq!(results[0].status, Verdict::Available);
    assert_eq!(results[1].status, Verdict::Taken);
    assert!(results.iter().all(|r| r.method == CheckMethod::Whois));
}

#[tokio::test]
async fn test_check_domain_rejects_malformed_input() {
    let dns = Arc::new(MockDns::default());
    let whois = Arc::new(MockWhois::default());
    let checker = checker(dns.clone(), whois.clone(), CheckConfig::default());

    let err = checker.check_domain("not a domain!").await.unwrap_err();
    assert!(matches!(err, DomainHunterError::Validation { .. }));
    assert!(dns.probed.lock().is_empty());
    assert!(whois.queried.lock().is_empty());
}

#[tokio::test]
async fn test_metrics_track_both_tiers() {
    let dns = Arc::new(MockDns::resolving(&["ab.io"]));
    let whois = Arc::new(MockWhois::default());
    let checker = checker(dns, whois, CheckConfig::default());

    checker.check_bulk_hybrid(&strings(&["ab.io", "cd.io", "ef.io"])).await;

    let metrics = checker.get_metrics_snapshot();
    assert_eq!(metrics.dns_lookups, 3);
    assert_eq!(metrics.whois_lookups, 2);
    assert_eq!(metrics.lookups(), 5);
    assert_eq!(metrics.transport_errors, 0);
}

#[test]
fn test_classifier_is_conservative() {
    let classifier = WhoisClassifier::new();

    assert_eq!(classifier.classify(None), Verdict::Taken);
    assert_eq!(classifier.classify(Some("")), Verdict::Taken);
    assert_eq!(classifier.classify(Some("% rate limit exceeded")), Verdict::Taken);
    assert_eq!(
        classifier.classify(Some("NOT FOUND\nThis premium domain is available for purchase")),
        Verdict::Taken
    );
    assert_eq!(
        classifier.classify(Some("Domain not found.\nRegistrar: Someone")),
        Verdict::Taken
    );
    assert_eq!(classifier.classify(Some("No match for \"XY.IO\".")), Verdict::Available);
}

/// Nameserver on a local UDP port that answers every query with `rcode`
/// and an empty answer section.
async fn fake_nameserver(rcode: u8) -> std::net::SocketAddr {
    let socket = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    tokio::spawn(async move {
        let mut buf = [0u8; 512];
        loop {
            let Ok((n, peer)) = socket.recv_from(&mut buf).await else {
                return;
            };
            if n < 12 {
                continue;
            }
            // header plus the single question; anything after it is dropped
            let mut end = 12;
            while end < n && buf[end] != 0 {
                end += buf[end] as usize + 1;
            }
            let end = (end + 5).min(n);

            let mut reply = buf[..end].to_vec();
            reply[2] = 0x80 | (buf[2] & 0x01);
            reply[3] = 0x80 | rcode;
            reply[6..12].fill(0);
            let _ = socket.send_to(&reply, peer).await;
        }
    });
    addr
}

async fn dns_check_against(rcode: u8) -> (Result<bool>, domain_hunter::CheckResult) {
    let nameserver = fake_nameserver(rcode).await;
    let resolver = Arc::new(domain_hunter::domain::DnsResolver::new(
        nameserver,
        Duration::from_secs(2),
    ));
    let probe = resolver.probe("ab.io").await;
    let config = CheckConfig {
        nameserver,
        ..Default::default()
    };
    let checker =
        DomainChecker::with_adapters(config, resolver, Arc::new(MockWhois::default()));
    (probe, checker.check_dns("ab.io").await)
}

#[tokio::test]
async fn test_servfail_and_refused_follow_error_policy() {
    // SERVFAIL, REFUSED
    for rcode in [2u8, 5] {
        let (probe, result) = dns_check_against(rcode).await;
        assert!(
            matches!(probe, Err(DomainHunterError::Dns { .. })),
            "rcode {} gave {:?}",
            rcode,
            probe
        );
        assert_eq!(result.status, Verdict::Taken, "rcode {}", rcode);
        assert!(result.error.is_some());
    }
}

#[tokio::test]
async fn test_nxdomain_is_a_candidate() {
    let (probe, result) = dns_check_against(3).await;
    assert!(!probe.unwrap());
    assert_eq!(result.status, Verdict::Available);
    assert!(result.error.is_none());
}
