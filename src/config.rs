//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).
//!
//! | Variable          | Default        | Meaning                                  |
//! |-------------------|----------------|------------------------------------------|
//! | `LISTEN_ADDR`     | -              | Full bind address, overrides `PORT`      |
//! | `PORT`            | `6974`         | Port bound on `0.0.0.0`                  |
//! | `DEFAULT_TOPIC`   | `general`      | Topic assigned to every new connection   |
//! | `OUTBOUND_BUFFER` | `256`          | Per-connection outbound queue capacity   |
//! | `LOG_FORMAT`      | `text`         | `text` or `json` log output              |

use std::net::{Ipv4Addr, SocketAddr};

/// Default listen port when neither `LISTEN_ADDR` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 6974;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:6974`).
    pub listen_addr: SocketAddr,

    /// Topic assigned to every connection at upgrade time.
    pub default_topic: String,

    /// Capacity of each connection's outbound frame queue.
    pub outbound_buffer: usize,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            default_topic: "general".to_string(),
            outbound_buffer: 256,
            log_format: LogFormat::Text,
        }
    }
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(addr) => addr.parse::<SocketAddr>()?,
            Err(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, parse_env("PORT", DEFAULT_PORT))),
        };

        let default_topic = std::env::var("DEFAULT_TOPIC")
            .ok()
            .filter(|t| !t.is_empty())
            .unwrap_or(defaults.default_topic);

        let outbound_buffer = parse_env("OUTBOUND_BUFFER", defaults.outbound_buffer).max(1);

        let log_format = parse_log_format(std::env::var("LOG_FORMAT").ok().as_deref());

        Ok(Self {
            listen_addr,
            default_topic,
            outbound_buffer,
            log_format,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Accepts `"json"` (case-insensitive); anything else is text.
fn parse_log_format(value: Option<&str>) -> LogFormat {
    match value {
        Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Text,
    }
}
