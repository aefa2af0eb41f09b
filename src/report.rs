//! Email report of available domains, sent through the Resend API

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;

use crate::error::{DomainHunterError, Result};
use crate::types::CheckResult;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
const DEFAULT_FROM: &str = "Domain Hunter <onboarding@resend.dev>";

/// Delivery settings for the report
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub api_key: String,
    pub to: String,
    pub from: String,
    pub endpoint: String,
}

impl ReportConfig {
    /// Read `RESEND_API_KEY`, `EMAIL_TO` and optional `REPORT_FROM`
    pub fn from_env() -> Result<Self> {
        let require = |key: &str| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| DomainHunterError::config(format!("{} is not set", key)))
        };

        Ok(Self {
            api_key: require("RESEND_API_KEY")?,
            to: require("EMAIL_TO")?,
            from: std::env::var("REPORT_FROM").unwrap_or_else(|_| DEFAULT_FROM.to_string()),
            endpoint: RESEND_ENDPOINT.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: String,
    html: String,
}

/// Sends the available-domain report
pub struct ReportSender {
    config: ReportConfig,
    client: Client,
}

impl ReportSender {
    pub fn new(config: ReportConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("domain-hunter/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, client })
    }

    /// Email the available subset. Nothing is sent for an empty list.
    pub async fn send(&self, results: &[CheckResult]) -> Result<bool> {
        let available: Vec<&CheckResult> = results.iter().filter(|r| r.is_available()).collect();
        if available.is_empty() {
            tracing::info!("No available domains, skipping report");
            return Ok(false);
        }

        let now = Utc::now();
        let payload = EmailPayload {
            from: &self.config.from,
            to: vec![&self.config.to],
            subject: subject(available.len(), now),
            html: render_html(&available, now),
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainHunterError::network(
                format!("email API returned status {}", status),
                Some(status.as_u16()),
                Some(self.config.endpoint.clone()),
            ));
        }

        tracing::info!(domains = %available.len(), to = %self.config.to, "Report sent");
        Ok(true)
    }
}

pub fn subject(count: usize, date: DateTime<Utc>) -> String {
    format!("🎯 {} domains available - {}", count, date.format("%b %-d"))
}

/// Available domains grouped by TLD, TLDs in alphabetical order
pub fn group_by_tld<'a>(results: &[&'a CheckResult]) -> BTreeMap<String, Vec<&'a str>> {
    let mut groups: BTreeMap<String, Vec<&'a str>> = BTreeMap::new();
    for result in results {
        if let Some((_, tld)) = result.domain.rsplit_once('.') {
            groups.entry(tld.to_string()).or_default().push(result.domain.as_str());
        }
    }
    groups
}

/// HTML body of the report email
pub fn render_html(available: &[&CheckResult], date: DateTime<Utc>) -> String {
    let mut html = String::new();
    html.push_str(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="margin: 0; padding: 0; background-color: #f4f4f4;">
<table width="100%" cellpadding="0" cellspacing="0" style="background-color: #f4f4f4; padding: 20px 0;">
<tr><td align="center">
<table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px;">
<tr><td style="background-color: #14532d; padding: 30px; text-align: center;">
<h1 style="color: #22c55e; margin: 0; font-family: Arial, sans-serif;">🎯 Domain Hunter</h1>
<p style="color: #86efac; margin: 10px 0 0 0; font-family: Arial, sans-serif;">Daily Report</p>
</td></tr>
"#,
    );

    let _ = write!(
        html,
        r#"<tr><td style="padding: 30px; text-align: center; border-bottom: 1px solid #e5e5e5;">
<p style="font-family: Arial, sans-serif; font-size: 18px; color: #333; margin: 0;">Found <strong style="color: #22c55e; font-size: 32px;">{}</strong> available domains</p>
<p style="font-family: Arial, sans-serif; font-size: 12px; color: #999;">{}</p>
</td></tr>
<tr><td style="padding: 20px 30px;">
"#,
        available.len(),
        date.format("%B %-d, %Y")
    );

    for (tld, domains) in group_by_tld(available) {
        let _ = write!(
            html,
            r#"<table width="100%" cellpadding="0" cellspacing="0" style="margin-bottom: 20px;">
<tr><td style="background-color: #f0fdf4; padding: 10px 15px; border-left: 4px solid #22c55e;">
<strong style="font-family: Arial, sans-serif; color: #14532d;">.{}</strong>
<span style="font-family: Arial, sans-serif; font-size: 12px; color: #666;">({} domains)</span>
</td></tr>
<tr><td style="padding: 15px; background-color: #fafafa;">
"#,
            tld,
            domains.len()
        );
        for domain in domains {
            let _ = write!(
                html,
                r#"<code style="display: inline-block; border: 1px solid #d1d5db; padding: 6px 12px; margin: 3px; font-family: 'Courier New', monospace;">{}</code> "#,
                domain
            );
        }
        html.push_str("\n</td></tr>\n</table>\n");
    }

    html.push_str("</td></tr>\n</table>\n</td></tr>\n</table>\n</body>\n</html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CheckMethod, Verdict};
    use chrono::TimeZone;

    fn available(domain: &str) -> CheckResult {
        CheckResult::new(domain, Verdict::Available, CheckMethod::Whois)
    }

    #[test]
    fn test_group_by_tld() {
        let results = [available("x.io"), available("q.com"), available("y.io")];
        let refs: Vec<&CheckResult> = results.iter().collect();
        let groups = group_by_tld(&refs);

        let tlds: Vec<&String> = groups.keys().collect();
        assert_eq!(tlds, vec!["com", "io"]);
        assert_eq!(groups["io"], vec!["x.io", "y.io"]);
    }

    #[test]
    fn test_render_html() {
        let results = [available("x.io"), available("q.com")];
        let refs: Vec<&CheckResult> = results.iter().collect();
        let date = Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap();
        let html = render_html(&refs, date);

        assert!(html.contains("<strong style=\"color: #22c55e; font-size: 32px;\">2</strong>"));
        assert!(html.contains("October 18, 2026"));
        assert!(html.contains(">.io</strong>"));
        assert!(html.contains(">x.io</code>"));
        assert!(html.find(">.com</strong>").unwrap() < html.find(">.io</strong>").unwrap());
    }

    #[test]
    fn test_subject() {
        let date = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(subject(3, date), "🎯 3 domains available - Jan 2");
    }

    #[tokio::test]
    async fn test_send_skips_empty_report() {
        let sender = ReportSender::new(ReportConfig {
            api_key: "key".to_string(),
            to: "me@example.com".to_string(),
            from: DEFAULT_FROM.to_string(),
            // unroutable; must not be contacted
            endpoint: "http://127.0.0.1:9/emails".to_string(),
        })
        .unwrap();
        let taken = CheckResult::new("ab.io", Verdict::Taken, CheckMethod::Dns);
        assert!(!sender.send(&[taken]).await.unwrap());
    }
}
