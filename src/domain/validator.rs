//! Domain name validation utilities

use crate::error::{DomainHunterError, Result};
use crate::validation_error;
use regex::Regex;
use std::collections::HashSet;

/// TLD appended to bare names such as `example`
pub const DEFAULT_TLD: &str = "com";

/// Domain name validator
#[derive(Debug, Clone)]
pub struct DomainValidator {
    tld_whitelist: Option<HashSet<String>>,
    label: Regex,
    tld: Regex,
}

impl DomainValidator {
    /// Create a new domain validator
    pub fn new() -> Self {
        Self {
            tld_whitelist: None,
            label: Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("static regex"),
            tld: Regex::new(r"^[a-z]{2,63}$").expect("static regex"),
        }
    }

    /// Create validator with TLD whitelist
    pub fn with_tld_whitelist(mut self, tlds: Vec<String>) -> Self {
        self.tld_whitelist = Some(tlds.into_iter().map(|s| s.to_lowercase()).collect());
        self
    }

    /// Validate a domain name
    pub fn validate(&self, domain: &str) -> Result<ValidatedDomain> {
        let domain = domain.trim().trim_end_matches('.').to_lowercase();

        if domain.is_empty() {
            return Err(DomainHunterError::validation("Domain name cannot be empty"));
        }
        if domain.len() > 253 {
            return Err(DomainHunterError::validation("Domain name too long (max 253 characters)"));
        }

        let (name, tld) = domain
            .rsplit_once('.')
            .ok_or_else(|| validation_error!("'{}' has no TLD", domain))?;

        if !self.tld.is_match(tld) {
            return Err(validation_error!("Invalid TLD '{}'", tld));
        }
        if let Some(whitelist) = &self.tld_whitelist {
            if !whitelist.contains(tld) {
                return Err(validation_error!("TLD '{}' not in whitelist", tld));
            }
        }

        for label in name.split('.') {
            if !self.label.is_match(label) {
                return Err(validation_error!("Invalid label '{}' in '{}'", label, domain));
            }
        }

        Ok(ValidatedDomain {
            name: name.to_string(),
            tld: tld.to_string(),
            full_domain: domain.clone(),
        })
    }

    /// Normalize raw user input into a checkable domain: trim, lower-case,
    /// and append the default TLD to bare names.
    pub fn normalize(&self, input: &str) -> String {
        let domain = input.trim().to_lowercase();
        if domain.is_empty() || domain.contains('.') {
            domain
        } else {
            format!("{}.{}", domain, DEFAULT_TLD)
        }
    }

    /// Normalize then validate every entry; the first bad entry fails the list.
    pub fn validate_list(&self, inputs: &[String]) -> Result<Vec<String>> {
        inputs
            .iter()
            .map(|input| self.validate(&self.normalize(input)).map(|v| v.full_domain))
            .collect()
    }
}

impl Default for DomainValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Domain validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDomain {
    pub name: String,
    pub tld: String,
    pub full_domain: String,
}

/// Split a comma, whitespace or newline separated list, dropping blanks
pub fn parse_domain_input(input: &str) -> Vec<String> {
    input
        .split(&[',', ' ', '\n', '\r', '\t'][..])
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
