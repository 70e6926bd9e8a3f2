use std::{env, time::Duration};

use log::*;
use order_integration_engine::DeliveryPolicy;
use source_tools::SourceToolsConfig;

const DEFAULT_OIG_HOST: &str = "127.0.0.1";
const DEFAULT_OIG_PORT: u16 = 8084;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/integrations.db";
const DEFAULT_SYNC_WORKER_INTERVAL: u64 = 60;
const DEFAULT_WEBHOOK_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_WEBHOOK_BASE_DELAY: u64 = 2;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// How often the poll worker looks for pull integrations that are due. Zero disables the worker.
    pub sync_worker_interval: Duration,
    /// Retry budget and per-attempt timeout for outbound webhooks.
    pub delivery_policy: DeliveryPolicy,
    /// Settings for the outbound HTTP clients
    pub tools: SourceToolsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OIG_HOST.to_string(),
            port: DEFAULT_OIG_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            sync_worker_interval: Duration::from_secs(DEFAULT_SYNC_WORKER_INTERVAL),
            delivery_policy: DeliveryPolicy::default(),
            tools: SourceToolsConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("OIG_HOST").ok().unwrap_or_else(|| DEFAULT_OIG_HOST.into());
        let port = env::var("OIG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for OIG_PORT. {e} Using the default, {DEFAULT_OIG_PORT}, instead."
                    );
                    DEFAULT_OIG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_OIG_PORT);
        let database_url = env::var("OIG_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ OIG_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let sync_worker_interval =
            Duration::from_secs(number_from_env("OIG_SYNC_WORKER_INTERVAL", DEFAULT_SYNC_WORKER_INTERVAL));
        if sync_worker_interval.is_zero() {
            info!("🪛️ OIG_SYNC_WORKER_INTERVAL is 0. Scheduled syncs are disabled.");
        }
        let tools = SourceToolsConfig::new_from_env_or_default();
        let delivery_policy = configure_delivery_policy(&tools);
        Self { host, port, database_url, sync_worker_interval, delivery_policy, tools }
    }
}

fn configure_delivery_policy(tools: &SourceToolsConfig) -> DeliveryPolicy {
    let max_attempts = match number_from_env("OIG_WEBHOOK_MAX_ATTEMPTS", DEFAULT_WEBHOOK_MAX_ATTEMPTS as u64) {
        0 => {
            warn!("🪛️ OIG_WEBHOOK_MAX_ATTEMPTS must be at least 1. Using {DEFAULT_WEBHOOK_MAX_ATTEMPTS} instead.");
            DEFAULT_WEBHOOK_MAX_ATTEMPTS
        },
        n => u32::try_from(n).unwrap_or(DEFAULT_WEBHOOK_MAX_ATTEMPTS),
    };
    let base_delay = Duration::from_secs(number_from_env("OIG_WEBHOOK_BASE_DELAY", DEFAULT_WEBHOOK_BASE_DELAY));
    DeliveryPolicy { max_attempts, base_delay, attempt_timeout: tools.webhook_timeout }
}

fn number_from_env(var: &str, default: u64) -> u64 {
    env::var(var)
        .map_err(|_| info!("🪛️ {var} is not set. Using the default value of {default}."))
        .and_then(|s| {
            s.trim().parse::<u64>().map_err(|e| warn!("🪛️ Invalid configuration value for {var}. {e}"))
        })
        .ok()
        .unwrap_or(default)
}
