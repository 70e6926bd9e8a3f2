use std::time::Duration;

use log::*;

const DEFAULT_ORDER_SERVICE_URL: &str = "http://order-service:8080";
const DEFAULT_FETCH_TIMEOUT: u64 = 30;
const DEFAULT_WEBHOOK_TIMEOUT: u64 = 10;

#[derive(Debug, Clone)]
pub struct SourceToolsConfig {
    /// Base URL of the order service. Orders are created with `POST {base}/orders`.
    pub order_service_url: String,
    /// Bound on each pull fetch
    pub fetch_timeout: Duration,
    /// Bound on each webhook POST
    pub webhook_timeout: Duration,
}

impl Default for SourceToolsConfig {
    fn default() -> Self {
        Self {
            order_service_url: DEFAULT_ORDER_SERVICE_URL.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT),
            webhook_timeout: Duration::from_secs(DEFAULT_WEBHOOK_TIMEOUT),
        }
    }
}

impl SourceToolsConfig {
    pub fn new_from_env_or_default() -> Self {
        let order_service_url = std::env::var("OIG_ORDER_SERVICE_URL").unwrap_or_else(|_| {
            warn!("🪛️ OIG_ORDER_SERVICE_URL not set, using {DEFAULT_ORDER_SERVICE_URL} as default");
            DEFAULT_ORDER_SERVICE_URL.to_string()
        });
        let fetch_timeout = Duration::from_secs(seconds_from_env("OIG_FETCH_TIMEOUT", DEFAULT_FETCH_TIMEOUT));
        let webhook_timeout = Duration::from_secs(seconds_from_env("OIG_WEBHOOK_TIMEOUT", DEFAULT_WEBHOOK_TIMEOUT));
        Self { order_service_url: order_service_url.trim_end_matches('/').to_string(), fetch_timeout, webhook_timeout }
    }
}

fn seconds_from_env(var: &str, default: u64) -> u64 {
    match std::env::var(var).ok().map(|s| s.parse::<u64>()) {
        Some(Ok(v)) if v > 0 => v,
        Some(_) => {
            warn!("🪛️ {var} is not a positive number of seconds. Using the default of {default}s");
            default
        },
        None => {
            info!("🪛️ {var} not set, using the default of {default}s");
            default
        },
    }
}
