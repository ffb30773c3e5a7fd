use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use ratecast_market_data::DEFAULT_ATTEMPT_TIMEOUT;
use ratecast_notifier::{MailgunConfig, DEFAULT_MAILGUN_API_BASE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub subscribers_file: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Time one rate provider gets before the next one is asked. Must be
    /// below `request_timeout` for the fallback to help a hung request.
    pub provider_timeout: Duration,
    /// Provider ids in fallback order; empty selects the default order.
    pub provider_order: Vec<String>,
    pub coinapi_key: Option<String>,
    /// `None` falls back to logging messages instead of sending them.
    pub mailgun: Option<MailgunConfig>,
    /// `None` disables the scheduled broadcast.
    pub broadcast_interval: Option<Duration>,
    pub broadcast_concurrency: usize,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: PathBuf::from("./data"),
            subscribers_file: "emails.txt".to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            provider_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            provider_order: Vec::new(),
            coinapi_key: None,
            mailgun: None,
            broadcast_interval: Some(Duration::from_secs(86_400)),
            broadcast_concurrency: 1,
            log_format: LogFormat::Text,
        }
    }
}

fn var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn validate_timeouts(request: Duration, provider: Duration) -> anyhow::Result<()> {
    if provider.is_zero() || provider >= request {
        anyhow::bail!(
            "RC_PROVIDER_TIMEOUT_MS ({} ms) must be non-zero and below RC_REQUEST_TIMEOUT_MS ({} ms)",
            provider.as_millis(),
            request.as_millis()
        );
    }
    Ok(())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match var("RC_LISTEN_ADDR") {
            Some(addr) => addr
                .parse()
                .with_context(|| format!("Invalid RC_LISTEN_ADDR: {addr}"))?,
            None => defaults.listen_addr,
        };

        let timeout_ms: u64 = var("RC_REQUEST_TIMEOUT_MS")
            .map(|v| v.parse().context("Invalid RC_REQUEST_TIMEOUT_MS"))
            .transpose()?
            .unwrap_or(30_000);
        let request_timeout = Duration::from_millis(timeout_ms);

        let provider_timeout = var("RC_PROVIDER_TIMEOUT_MS")
            .map(|v| v.parse::<u64>().context("Invalid RC_PROVIDER_TIMEOUT_MS"))
            .transpose()?
            .map(Duration::from_millis)
            .unwrap_or(defaults.provider_timeout);
        validate_timeouts(request_timeout, provider_timeout)?;

        let interval_secs: u64 = var("RC_BROADCAST_INTERVAL_SECS")
            .map(|v| v.parse().context("Invalid RC_BROADCAST_INTERVAL_SECS"))
            .transpose()?
            .unwrap_or(86_400);

        let broadcast_concurrency: usize = var("RC_BROADCAST_CONCURRENCY")
            .map(|v| v.parse().context("Invalid RC_BROADCAST_CONCURRENCY"))
            .transpose()?
            .unwrap_or(defaults.broadcast_concurrency);

        let mailgun = match (
            var("RC_MAILGUN_API_KEY"),
            var("RC_MAILGUN_DOMAIN"),
            var("RC_MAILGUN_FROM"),
        ) {
            (Some(api_key), Some(domain), Some(from)) => Some(MailgunConfig {
                api_key,
                domain,
                from,
                api_base: var("RC_MAILGUN_API_BASE")
                    .unwrap_or_else(|| DEFAULT_MAILGUN_API_BASE.to_string()),
            }),
            (None, None, None) => None,
            _ => anyhow::bail!(
                "RC_MAILGUN_API_KEY, RC_MAILGUN_DOMAIN and RC_MAILGUN_FROM must be set together"
            ),
        };

        let log_format = match var("RC_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            Some("text") | None => LogFormat::Text,
            Some(other) => anyhow::bail!("Invalid RC_LOG_FORMAT: {other} (expected text or json)"),
        };

        Ok(Self {
            listen_addr,
            data_dir: var("RC_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            subscribers_file: var("RC_SUBSCRIBERS_FILE").unwrap_or(defaults.subscribers_file),
            cors_allow: list(&var("RC_CORS_ALLOW_ORIGINS").unwrap_or_else(|| "*".into())),
            request_timeout,
            provider_timeout,
            provider_order: var("RC_PROVIDER_ORDER")
                .map(|v| list(&v))
                .unwrap_or_default(),
            coinapi_key: var("RC_COINAPI_KEY"),
            mailgun,
            broadcast_interval: (interval_secs > 0).then(|| Duration::from_secs(interval_secs)),
            broadcast_concurrency,
            log_format,
        })
    }
}
