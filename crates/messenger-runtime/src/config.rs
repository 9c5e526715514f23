//! # Messenger Configuration
//!
//! Environment-driven configuration for a messenger run.
//!
//! ## Recognized Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LEDGER_ACCOUNT_ID` | (required) | Operator account on the ledger |
//! | `LEDGER_PRIVATE_KEY` | (required) | Operator signing key |
//! | `ENCRYPTION_KEY` | empty | 64-char hex (32 bytes) envelope key |
//! | `MESSENGER_USE_ENCRYPTION` | `false` | Enable the envelope codec |
//! | `MESSENGER_FILTER_KEYWORD` | empty | Inbound substring filter |
//! | `MESSENGER_SEND_DELAY_MS` | `1000` | Inter-message publish throttle |
//! | `MESSENGER_PROPAGATION_DELAY_MS` | `10000` | Readiness fallback delay |
//!
//! Missing credentials are a fatal startup error, caught before any
//! channel action.

use std::time::Duration;

use thiserror::Error;
use tracing::warn;

/// Default messages published by a demo run.
pub const DEFAULT_MESSAGES: [&str; 3] = ["Hello, Hedera!", "Learning HCS", "Message 3"];

/// Default inter-message publish throttle.
pub const DEFAULT_SEND_DELAY_MS: u64 = 1000;

/// Default readiness fallback delay for channels that cannot observe
/// topic propagation.
pub const DEFAULT_PROPAGATION_DELAY_MS: u64 = 10_000;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A mandatory credential variable is unset or empty.
    #[error("{variable} must be set in the environment")]
    MissingCredential {
        /// Name of the missing variable.
        variable: &'static str,
    },
}

/// Operator identity on the ledger network.
#[derive(Clone)]
pub struct OperatorCredentials {
    /// Account identifier.
    pub account_id: String,
    /// Private signing key.
    pub private_key: String,
}

impl std::fmt::Debug for OperatorCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        f.debug_struct("OperatorCredentials")
            .field("account_id", &self.account_id)
            .field("private_key", &"..")
            .finish()
    }
}

/// Complete messenger configuration.
#[derive(Debug, Clone)]
pub struct MessengerConfig {
    /// Channel credentials.
    pub operator: OperatorCredentials,
    /// Whether the envelope codec is enabled.
    pub use_encryption: bool,
    /// Raw envelope key material (hex-decoded); validated by the codec.
    pub encryption_key: Vec<u8>,
    /// Inbound substring filter; empty accepts everything.
    pub filter_keyword: String,
    /// Messages to publish, in order.
    pub messages_to_send: Vec<String>,
    /// Inter-message publish throttle.
    pub send_delay: Duration,
    /// Readiness fallback delay, consumed only by remote channel adapters
    /// that cannot observe propagation and must sleep in `await_ready`.
    /// The in-memory bus signals readiness immediately and ignores it.
    pub propagation_delay: Duration,
}

impl MessengerConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` if either credential
    /// variable is unset or empty. All other variables fall back to
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let operator = OperatorCredentials {
            account_id: require_env("LEDGER_ACCOUNT_ID")?,
            private_key: require_env("LEDGER_PRIVATE_KEY")?,
        };

        let use_encryption = std::env::var("MESSENGER_USE_ENCRYPTION")
            .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
            .unwrap_or(false);

        let encryption_key = match std::env::var("ENCRYPTION_KEY") {
            Ok(hex_str) => match hex::decode(hex_str.trim()) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(error = %e, "ENCRYPTION_KEY is not valid hex; treating as unset");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        let filter_keyword = std::env::var("MESSENGER_FILTER_KEYWORD").unwrap_or_default();

        let send_delay = Duration::from_millis(env_ms(
            "MESSENGER_SEND_DELAY_MS",
            DEFAULT_SEND_DELAY_MS,
        ));
        let propagation_delay = Duration::from_millis(env_ms(
            "MESSENGER_PROPAGATION_DELAY_MS",
            DEFAULT_PROPAGATION_DELAY_MS,
        ));

        Ok(Self {
            operator,
            use_encryption,
            encryption_key,
            filter_keyword,
            messages_to_send: DEFAULT_MESSAGES.iter().map(|s| (*s).to_string()).collect(),
            send_delay,
            propagation_delay,
        })
    }
}

/// Read a mandatory, non-empty environment variable.
fn require_env(variable: &'static str) -> Result<String, ConfigError> {
    match std::env::var(variable) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingCredential { variable }),
    }
}

/// Read an optional millisecond value, falling back on parse failure.
fn env_ms(variable: &str, default: u64) -> u64 {
    std::env::var(variable)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
