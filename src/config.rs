//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The poll cadence and alert quiet
//! period are deliberately configuration, not constants.

use std::net::SocketAddr;
use std::time::Duration;

/// SMTP settings for outbound alert mail.
///
/// Built only when `SMTP_HOST`, `SMTP_USER` and `SMTP_PASS` are all
/// present; otherwise alert delivery is silently disabled.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP relay hostname.
    pub host: String,
    /// SMTP port. Defaults to 587.
    pub port: u16,
    /// SMTP username.
    pub username: String,
    /// SMTP password.
    pub password: String,
    /// `From` address on outgoing alert mail.
    pub from: String,
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:4000`).
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection string. When absent the gateway runs with
    /// in-memory history/alert stores.
    pub database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// How long a cached per-region pricing snapshot stays fresh.
    pub cache_ttl: Duration,

    /// Whether the background spot price poller runs at all.
    pub poller_enabled: bool,

    /// Interval between spot price poller ticks.
    pub poll_interval: Duration,

    /// Minimum elapsed time between repeat notifications for one alert.
    pub alert_quiet_period: Duration,

    /// Number of synthetic daily points generated when a price history
    /// query finds an empty series.
    pub history_seed_days: u32,

    /// Outbound mail settings, when configured.
    pub smtp: Option<SmtpConfig>,
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
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:4000".to_string())
            .parse()?;

        let database_url = std::env::var("DATABASE_URL").ok();
        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 10);

        let cache_ttl = Duration::from_secs(parse_env("CACHE_TTL_SECS", 600));

        let poller_enabled = parse_env_bool("SPOT_POLLER_ENABLED", true);
        // Default cadence: every 6 hours, quiet period: 12 hours.
        let poll_interval = Duration::from_secs(parse_env("SPOT_POLL_INTERVAL_SECS", 21_600));
        let alert_quiet_period =
            Duration::from_secs(parse_env("ALERT_QUIET_PERIOD_SECS", 43_200));

        let history_seed_days = parse_env("HISTORY_SEED_DAYS", 30);

        let smtp = match (
            std::env::var("SMTP_HOST").ok(),
            std::env::var("SMTP_USER").ok(),
            std::env::var("SMTP_PASS").ok(),
        ) {
            (Some(host), Some(username), Some(password)) => Some(SmtpConfig {
                host,
                port: parse_env("SMTP_PORT", 587),
                username,
                password,
                from: std::env::var("EMAIL_FROM")
                    .unwrap_or_else(|_| "noreply@example.com".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections,
            cache_ttl,
            poller_enabled,
            poll_interval,
            alert_quiet_period,
            history_seed_days,
            smtp,
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

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}
