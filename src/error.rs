//! Error handling for domain-hunter

use thiserror::Error;

/// Main error type for domain-hunter
#[derive(Error, Debug, Clone)]
pub enum DomainHunterError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("DNS lookup failed for '{domain}': {message}")]
    Dns { domain: String, message: String },

    #[error("WHOIS lookup failed for '{domain}': {message}")]
    Whois {
        domain: String,
        message: String,
        server: Option<String>,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Timeout error: {operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainHunterError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a DNS error
    pub fn dns(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Dns {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a WHOIS error
    pub fn whois(
        domain: impl Into<String>,
        message: impl Into<String>,
        server: Option<String>,
    ) -> Self {
        Self::Whois {
            domain: domain.into(),
            message: message.into(),
            server,
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_secs,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error came from a lookup that never produced an answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Dns { .. } | Self::Whois { .. } | Self::Network { .. } | Self::Timeout { .. }
        )
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or DOMAIN_HUNTER_* variables", message)
            }
            Self::Dns { domain, message } => {
                format!("⚠️  DNS lookup for '{}' failed: {}\n💡 Try another --nameserver", domain, message)
            }
            Self::Whois { domain, message, server } => {
                let server = server.as_ref().map_or(String::new(), |s| format!(" via {}", s));
                format!("⚠️  WHOIS lookup for '{}'{} failed: {}", domain, server, message)
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Timeout { operation, timeout_secs } => {
                format!("⏱️  Operation '{}' timed out after {}s\n💡 Try increasing timeout or reducing concurrency", operation, timeout_secs)
            }
            Self::Parse { message } => {
                format!("❌ Parse error: {}", message)
            }
            Self::Validation { message } => {
                format!("❌ Validation error: {}\n💡 Check your input format", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

/// Convert from common error types
impl From<reqwest::Error> for DomainHunterError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::timeout("HTTP request", 10)
        } else if err.is_connect() {
            Self::network("Connection failed", status_code, url)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

impl From<hickory_resolver::error::ResolveError> for DomainHunterError {
    fn from(err: hickory_resolver::error::ResolveError) -> Self {
        Self::dns("unknown", err.to_string())
    }
}

impl From<serde_json::Error> for DomainHunterError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

impl From<std::io::Error> for DomainHunterError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

impl From<tokio::time::error::Elapsed> for DomainHunterError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::timeout("Operation", 0)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DomainHunterError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::DomainHunterError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::DomainHunterError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::DomainHunterError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::DomainHunterError::validation(format!($fmt, $($arg)*))
    };
}
