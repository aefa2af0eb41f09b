//! Domain Hunter - bulk domain availability checking
//!
//! Checks single domains, lists of domains, and exhaustive short-name scans,
//! and can email a daily report of what is available.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Parser, Subcommand};
use domain_hunter::{
    domain::validator::parse_domain_input,
    generator::{self, PREMIUM_TLDS},
    report::{ReportConfig, ReportSender},
    types::parse_nameserver,
    CheckConfig, CheckResult, CheckStrategy, DnsErrorPolicy, DomainChecker, DomainHunterError,
    Verdict,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

/// Upper bound on domains a single `scan` checks
const DEFAULT_SCAN_LIMIT: usize = 500;

#[derive(Parser, Debug)]
#[command(name = "domain-hunter", version, about = "Find unregistered domain names")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Concurrent DNS lookups
    #[arg(long, global = true, value_parser = concurrency_limit())]
    dns_concurrency: Option<usize>,

    /// Concurrent WHOIS lookups
    #[arg(long, global = true, value_parser = concurrency_limit())]
    whois_concurrency: Option<usize>,

    /// Nameserver for DNS probes (ip or ip:port)
    #[arg(long, global = true)]
    nameserver: Option<String>,

    /// How DNS failures other than NXDOMAIN are read: taken or available
    #[arg(long, global = true)]
    dns_error_policy: Option<DnsErrorPolicy>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a single domain
    Check {
        domain: String,
        /// whois (authoritative) or dns (fast)
        #[arg(long)]
        strategy: Option<CheckStrategy>,
    },
    /// Check a list of domains
    Bulk {
        domains: Vec<String>,
        /// Read domains from a file (comma, space or newline separated)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Skip the DNS sweep and WHOIS-check every domain
        #[arg(long)]
        whois_only: bool,
    },
    /// Scan every short name under one TLD and list the available ones
    Scan {
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        length: u8,
        #[arg(long, default_value = "com")]
        tld: String,
        /// Only names starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
        #[arg(long, default_value_t = DEFAULT_SCAN_LIMIT)]
        limit: usize,
        #[arg(long)]
        whois_only: bool,
    },
    /// Check one name across many TLDs
    Multi {
        name: String,
        /// Explicit TLDs, comma separated
        #[arg(long, value_delimiter = ',')]
        tlds: Vec<String>,
        /// Named TLD list used when --tlds is absent: premium, popular, common
        #[arg(long, default_value = "common")]
        tld_set: String,
        #[arg(long)]
        whois_only: bool,
    },
    /// Scan short names across premium TLDs and email what is available
    Daily {
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=3))]
        max_length: u8,
        /// Print the findings without sending email
        #[arg(long)]
        dry_run: bool,
    },
}

fn concurrency_limit() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = domain_hunter::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<DomainHunterError>() {
            Some(err) => eprintln!("{}", err.user_message()),
            None => eprintln!("❌ Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "domain_hunter=info",
        1 => "domain_hunter=debug",
        _ => "domain_hunter=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> anyhow::Result<CheckConfig> {
    let mut config = CheckConfig::from_env()?;
    if let Some(n) = cli.dns_concurrency {
        config.dns_concurrency = n;
    }
    if let Some(n) = cli.whois_concurrency {
        config.whois_concurrency = n;
    }
    if let Some(ns) = &cli.nameserver {
        config.nameserver = parse_nameserver(ns)?;
    }
    if let Some(policy) = cli.dns_error_policy {
        config.dns_error_policy = policy;
    }
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = build_config(&cli)?;
    if let Command::Check { strategy: Some(strategy), .. } = &cli.command {
        config.strategy = *strategy;
    }
    let checker = DomainChecker::with_config(config);
    let json = cli.json;

    match cli.command {
        Command::Check { domain, .. } => {
            let domain = checker.validator().normalize(&domain);
            let result = checker.check_domain(&domain).await?;
            print_results(&[result], json, false)?;
        }
        Command::Bulk { domains, file, whois_only } => {
            let mut inputs = domains;
            if let Some(path) = file {
                let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
                    DomainHunterError::io(e.to_string(), Some(path.display().to_string()))
                })?;
                inputs.extend(parse_domain_input(&text));
            }
            let domains = checker.validator().validate_list(&inputs)?;
            if domains.is_empty() {
                return Err(DomainHunterError::validation("No domains provided").into());
            }

            let started = Instant::now();
            let results = check_many(&checker, &domains, whois_only, json).await;
            print_results(&results, json, false)?;
            print_summary(&checker, &results, started.elapsed(), json);
        }
        Command::Scan { length, tld, prefix, limit, whois_only } => {
            let tld = tld.trim().trim_start_matches('.').to_lowercase();
            let mut domains = generator::short_domains(length as usize, &tld);
            if let Some(prefix) = prefix.map(|p| p.trim().to_lowercase()).filter(|p| !p.is_empty()) {
                domains.retain(|d| d.starts_with(&prefix));
            }
            domains.truncate(limit);
            if domains.is_empty() {
                println!("🔍 No domains match that scan.");
                return Ok(());
            }
            // Rejects a malformed TLD before any lookup.
            checker.validator().validate(&domains[0])?;

            let started = Instant::now();
            let results = check_many(&checker, &domains, whois_only, json).await;
            print_results(&results, json, true)?;
            print_summary(&checker, &results, started.elapsed(), json);
        }
        Command::Multi { name, tlds, tld_set, whois_only } => {
            let tlds = if tlds.is_empty() {
                generator::get_tld_list(&tld_set).ok_or_else(|| {
                    DomainHunterError::validation(format!(
                        "unknown TLD set '{}', expected one of: {}",
                        tld_set,
                        generator::get_tld_list_names().join(", ")
                    ))
                })?
            } else {
                tlds
            };
            let name = name.trim().to_lowercase();
            let domains = checker
                .validator()
                .validate_list(&generator::multi_tld(&name, &tlds))?;

            let started = Instant::now();
            let results = check_many(&checker, &domains, whois_only, json).await;
            print_results(&results, json, false)?;
            print_summary(&checker, &results, started.elapsed(), json);
        }
        Command::Daily { max_length, dry_run } => {
            let sender = if dry_run {
                None
            } else {
                Some(ReportSender::new(ReportConfig::from_env()?)?)
            };

            let mut available: Vec<CheckResult> = Vec::new();
            for length in 1..=max_length as usize {
                let domains = generator::short_domains_multi_tld(length, "", PREMIUM_TLDS);
                tracing::info!(length = %length, domains = %domains.len(), "Starting daily scan pass");
                let results = check_many(&checker, &domains, false, json).await;
                available.extend(results.into_iter().filter(|r| r.is_available()));
            }

            print_results(&available, json, true)?;
            if let Some(sender) = sender {
                if sender.send(&available).await.context("sending report")? {
                    println!("📧 Report sent");
                } else {
                    println!("📭 No available domains, report skipped");
                }
            }
        }
    }

    Ok(())
}

async fn check_many(
    checker: &DomainChecker,
    domains: &[String],
    whois_only: bool,
    quiet: bool,
) -> Vec<CheckResult> {
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Checking {} domains...", domains.len()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let results = if whois_only {
        checker.check_bulk(domains).await
    } else {
        let (results, stats) = checker.check_bulk_hybrid_with_stats(domains).await;
        tracing::debug!(
            dns_taken = %stats.dns_taken,
            candidates = %stats.candidates,
            confirmed_available = %stats.confirmed_available,
            "Hybrid check finished"
        );
        results
    };

    spinner.finish_and_clear();
    results
}

fn print_results(results: &[CheckResult], json: bool, available_only: bool) -> anyhow::Result<()> {
    let shown: Vec<&CheckResult> = results
        .iter()
        .filter(|r| !available_only || r.is_available())
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if available_only && shown.is_empty() {
        println!("😔 No available domains found.");
        return Ok(());
    }

    for result in shown {
        match result.status {
            Verdict::Available => println!("✅ {} - AVAILABLE", result.domain),
            Verdict::Taken => match &result.error {
                Some(error) => println!("❌ {} - TAKEN ({} check failed: {})", result.domain, result.method, error),
                None => println!("❌ {} - TAKEN", result.domain),
            },
            Verdict::Error | Verdict::Pending => {
                println!("⚠️  {} - {}", result.domain, result.status.to_string().to_uppercase())
            }
        }
    }
    Ok(())
}

fn print_summary(checker: &DomainChecker, results: &[CheckResult], elapsed: Duration, json: bool) {
    if json {
        return;
    }
    let available = results.iter().filter(|r| r.is_available()).count();
    let failed = results.iter().filter(|r| r.error.is_some()).count();
    let metrics = checker.get_metrics_snapshot();

    println!();
    println!("📈 Summary:");
    println!("   ✅ Available: {}", available);
    println!("   ❌ Taken: {}", results.len() - available);
    if failed > 0 {
        println!("   ⚠️  Lookup failures: {}", failed);
    }
    println!("   📊 Total checked: {}", results.len());
    println!("   🔎 DNS lookups: {}, WHOIS lookups: {}", metrics.dns_lookups, metrics.whois_lookups);
    println!("   ⏱️  Total time: {:.2}s", elapsed.as_secs_f32());
}
