//! Short domain candidate generation

/// Shortest and longest names the short-domain scans enumerate
pub const MIN_SHORT_LENGTH: usize = 1;
pub const MAX_SHORT_LENGTH: usize = 3;

/// Valuable TLDs for short-name scanning
pub const PREMIUM_TLDS: &[&str] = &[
    "com", "net", "org", "io", "dev", "app", "ai", "co",
    "me", "tv", "gg", "so", "to", "is", "sh", "ly",
    "de", "uk", "es", "fr", "it", "nl", "ch", "at",
];

pub const POPULAR_TLDS: &[&str] = &[
    "com", "org", "net", "io", "ai", "co", "me", "app", "dev", "tech", "xyz",
];

/// Broad TLD spread for checking one name everywhere
pub const COMMON_TLDS: &[&str] = &[
    // Generic
    "com", "net", "org", "info", "biz", "name", "pro",
    // Tech
    "io", "dev", "app", "ai", "tech", "code", "software", "digital", "cloud", "data", "systems",
    // New gTLDs
    "co", "me", "tv", "cc", "fm", "gg", "xyz", "online", "site", "website", "web",
    "store", "shop", "buy", "sale", "market",
    "blog", "news", "media", "press", "video", "photos",
    "design", "studio", "art", "gallery", "agency", "creative",
    "live", "life", "world", "global", "international",
    "club", "social", "community", "network", "group", "team",
    "email", "link", "click", "page", "space", "zone", "one",
    // Country codes
    "us", "ca", "mx", "br", "ar", "cl", "pe", "ve",
    "uk", "de", "fr", "es", "it", "nl", "be", "ch", "at", "pl", "pt", "ie", "se", "no", "dk",
    "fi", "cz", "hu", "ro", "gr", "ru", "ua",
    "jp", "cn", "kr", "in", "au", "nz", "sg", "hk", "tw", "th", "my", "ph", "id", "vn",
    "za", "ae", "il", "tr", "eg", "ng", "ke",
    // Short
    "to", "is", "so", "sh", "sx", "vc", "ws", "la", "ly", "gl", "im", "ht", "mu", "nu", "pw", "tk",
];

/// Get TLD list by name
pub fn get_tld_list(name: &str) -> Option<Vec<String>> {
    let list = match name.to_lowercase().as_str() {
        "premium" => PREMIUM_TLDS,
        "popular" => POPULAR_TLDS,
        "common" => COMMON_TLDS,
        _ => return None,
    };
    Some(list.iter().map(|s| s.to_string()).collect())
}

/// Get all available TLD list names
pub fn get_tld_list_names() -> Vec<&'static str> {
    vec!["premium", "popular", "common"]
}

/// Character set for name generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// Only lowercase letters (a-z)
    Letters,
    /// Letters and digits (a-z, 0-9)
    #[default]
    Alphanumeric,
}

impl Charset {
    pub fn chars(&self) -> &'static [char] {
        match self {
            Charset::Letters => &[
                'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
                'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
            ],
            Charset::Alphanumeric => &[
                'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
                'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
                '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
            ],
        }
    }

    pub fn total_combinations(&self, length: usize) -> u64 {
        (self.chars().len() as u64).pow(length as u32)
    }
}

/// Enumerates every name of a fixed length in charset order
#[derive(Debug, Clone)]
pub struct NameGenerator {
    charset: Charset,
    length: usize,
    current_index: u64,
    total: u64,
}

impl NameGenerator {
    pub fn new(length: usize, charset: Charset) -> Self {
        Self {
            charset,
            length,
            current_index: 0,
            total: charset.total_combinations(length),
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Name at a position in the enumeration
    pub fn name_at(&self, index: u64) -> Option<String> {
        if index >= self.total {
            return None;
        }

        let chars = self.charset.chars();
        let base = chars.len() as u64;
        let mut result = vec![' '; self.length];
        let mut n = index;

        for i in (0..self.length).rev() {
            result[i] = chars[(n % base) as usize];
            n /= base;
        }

        Some(result.into_iter().collect())
    }
}

impl Iterator for NameGenerator {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.name_at(self.current_index)?;
        self.current_index += 1;
        Some(name)
    }
}

fn short_length(length: usize) -> bool {
    (MIN_SHORT_LENGTH..=MAX_SHORT_LENGTH).contains(&length)
}

/// Every alphanumeric name of `length` under one TLD.
/// Lengths outside 1..=3 give an empty list.
pub fn short_domains(length: usize, tld: &str) -> Vec<String> {
    if !short_length(length) {
        return Vec::new();
    }
    let tld = tld.trim_start_matches('.');
    NameGenerator::new(length, Charset::Alphanumeric)
        .map(|name| format!("{}.{}", name, tld))
        .collect()
}

/// Names of `length` starting with `prefix`, each crossed with every TLD
pub fn short_domains_multi_tld(length: usize, prefix: &str, tlds: &[&str]) -> Vec<String> {
    if !short_length(length) || prefix.len() > length {
        return Vec::new();
    }
    let prefix = prefix.to_lowercase();
    let names: Vec<String> = if prefix.len() == length {
        vec![prefix]
    } else {
        NameGenerator::new(length - prefix.len(), Charset::Alphanumeric)
            .map(|suffix| format!("{}{}", prefix, suffix))
            .collect()
    };

    names
        .iter()
        .flat_map(|name| tlds.iter().map(move |tld| format!("{}.{}", name, tld)))
        .collect()
}

/// The same name under each TLD
pub fn multi_tld(name: &str, tlds: &[String]) -> Vec<String> {
    tlds.iter()
        .map(|tld| format!("{}.{}", name, tld.trim_start_matches('.')))
        .collect()
}
