//! WHOIS reply classification
//!
//! Registries answer WHOIS queries in free text with no shared grammar, so the
//! verdict comes from ordered substring matching. Anything that is not clearly
//! unregistered is reported as taken.

use crate::types::Verdict;

/// Substrings implying the domain has a registration record.
pub const REGISTRATION_INDICATORS: &[&str] = &[
    "registrar:",
    "registrant:",
    "creation date:",
    "created:",
    "registry expiry date:",
    "expiration date:",
    "name server:",
    "nameserver:",
    "nserver:",
    "dnssec:",
    "registrar iana id:",
    "domain status:",
    "admin contact:",
    "tech contact:",
    "billing contact:",
];

/// Substrings implying the registry has no record of the domain.
pub const AVAILABILITY_INDICATORS: &[&str] = &[
    "no match for",
    "not found",
    "no entries found",
    "domain not found",
    "no data found",
    "status: free",
    "status: available",
    "no object found",
    "object does not exist",
    "nothing found",
    "no information available",
    "is available for registration",
    "is free",
    "domain is available",
    "the queried object does not exist",
    "no such domain",
    "domain name has not been registered",
    "no matching record",
];

pub const PREMIUM_MARKERS: &[&str] = &["premium", "platinum"];
pub const PREMIUM_ACTIONS: &[&str] = &["purchase", "contact", "offer", "reserved"];
pub const RESERVED_PHRASES: &[&str] = &["this name is reserved"];

/// Pattern lists consulted by [`WhoisClassifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierPatterns {
    pub registered: Vec<String>,
    pub premium_markers: Vec<String>,
    pub premium_actions: Vec<String>,
    pub reserved: Vec<String>,
    pub available: Vec<String>,
}

impl ClassifierPatterns {
    fn lowercased(self) -> Self {
        let lower = |v: Vec<String>| v.into_iter().map(|p| p.to_lowercase()).collect();
        Self {
            registered: lower(self.registered),
            premium_markers: lower(self.premium_markers),
            premium_actions: lower(self.premium_actions),
            reserved: lower(self.reserved),
            available: lower(self.available),
        }
    }
}

impl Default for ClassifierPatterns {
    fn default() -> Self {
        let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
        Self {
            registered: owned(REGISTRATION_INDICATORS),
            premium_markers: owned(PREMIUM_MARKERS),
            premium_actions: owned(PREMIUM_ACTIONS),
            reserved: owned(RESERVED_PHRASES),
            available: owned(AVAILABILITY_INDICATORS),
        }
    }
}

/// Which rule decided a classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The lookup produced no reply at all
    NoResponse,
    /// A registration indicator matched
    Registered(String),
    /// Offered for resale at a premium
    Premium,
    /// Withheld by the registry
    Reserved,
    /// An availability indicator matched
    Unregistered(String),
    /// Nothing matched
    Ambiguous,
}

impl Classification {
    pub fn verdict(&self) -> Verdict {
        match self {
            Classification::Unregistered(_) => Verdict::Available,
            _ => Verdict::Taken,
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::NoResponse => write!(f, "no response"),
            Classification::Registered(p) => write!(f, "registered ({})", p),
            Classification::Premium => write!(f, "premium listing"),
            Classification::Reserved => write!(f, "reserved"),
            Classification::Unregistered(p) => write!(f, "unregistered ({})", p),
            Classification::Ambiguous => write!(f, "ambiguous reply"),
        }
    }
}

/// Maps raw WHOIS replies to verdicts
#[derive(Debug, Clone, Default)]
pub struct WhoisClassifier {
    patterns: ClassifierPatterns,
}

impl WhoisClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom pattern lists. Patterns are matched case-insensitively.
    pub fn with_patterns(patterns: ClassifierPatterns) -> Self {
        Self {
            patterns: patterns.lowercased(),
        }
    }

    pub fn patterns(&self) -> &ClassifierPatterns {
        &self.patterns
    }

    /// Verdict for a reply; `None` means the lookup itself failed.
    pub fn classify(&self, raw: Option<&str>) -> Verdict {
        self.explain(raw).verdict()
    }

    /// Like [`classify`](Self::classify) but reports the rule that fired.
    ///
    /// Registration indicators are checked before availability indicators:
    /// some registries print "not found" boilerplate alongside a full record.
    pub fn explain(&self, raw: Option<&str>) -> Classification {
        let Some(raw) = raw else {
            return Classification::NoResponse;
        };
        let text = raw.to_lowercase();
        let contains_any = |list: &[String]| list.iter().any(|p| text.contains(p.as_str()));

        if let Some(p) = self.patterns.registered.iter().find(|p| text.contains(p.as_str())) {
            return Classification::Registered(p.clone());
        }

        if contains_any(&self.patterns.premium_markers) && contains_any(&self.patterns.premium_actions) {
            return Classification::Premium;
        }
        if contains_any(&self.patterns.reserved) {
            return Classification::Reserved;
        }

        match self.patterns.available.iter().find(|p| text.contains(p.as_str())) {
            Some(p) => Classification::Unregistered(p.clone()),
            None => Classification::Ambiguous,
        }
    }
}
