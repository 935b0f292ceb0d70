//! Configuration module
//!
//! Environment-driven configuration for the API service, queue backend,
//! scanner client, and SMTP report delivery.
//!
//! Queue settings (region, queue URL, credentials) are optional here: their
//! absence is surfaced by the queue client at call time, not at startup.

use std::env;

// Common constants
const SERVER_PORT: u16 = 4000;
const RATE_LIMIT_WINDOW_MS: u64 = 60_000;
const ENQUEUE_RATE_LIMIT_PER_WINDOW: u32 = 10;
const SCAN_RATE_LIMIT_PER_WINDOW: u32 = 5;
const TRUSTED_PROXY_COUNT: usize = 1;
const WORKER_MAX_BATCH: i32 = 10;
const WORKER_DEFAULT_MAX_JOBS: usize = 1;
const WORKER_DEFAULT_TIMEOUT_MS: u64 = 30_000;
const QUEUE_VISIBILITY_TIMEOUT_SECS: i32 = 300;
const QUEUE_WAIT_TIME_SECS: i32 = 0;
const SCANNER_TIMEOUT_SECS: u64 = 300;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    // Rate limiting (fixed sliding windows, per client key)
    pub rate_limit_window_ms: u64,
    pub enqueue_rate_limit: u32,
    pub scan_rate_limit: u32,
    pub trusted_proxy_count: usize,
    // Worker endpoint
    // If unset, the worker endpoints are open (backward-compatibility
    // fallback, not a secure default).
    pub worker_secret: Option<String>,
    pub worker_max_batch: i32,
    pub worker_default_max_jobs: usize,
    pub worker_default_timeout_ms: u64,
    // Queue backing service
    pub queue_backend: String,
    pub aws_region: Option<String>,
    pub sqs_queue_url: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub queue_visibility_timeout_secs: i32,
    pub queue_wait_time_secs: i32,
    // External scanner engine
    pub scanner_endpoint: Option<String>,
    pub scanner_timeout_secs: u64,
    // SMTP report delivery
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            rate_limit_window_ms: RATE_LIMIT_WINDOW_MS,
            enqueue_rate_limit: ENQUEUE_RATE_LIMIT_PER_WINDOW,
            scan_rate_limit: SCAN_RATE_LIMIT_PER_WINDOW,
            trusted_proxy_count: TRUSTED_PROXY_COUNT,
            worker_secret: None,
            worker_max_batch: WORKER_MAX_BATCH,
            worker_default_max_jobs: WORKER_DEFAULT_MAX_JOBS,
            worker_default_timeout_ms: WORKER_DEFAULT_TIMEOUT_MS,
            queue_backend: "sqs".to_string(),
            aws_region: None,
            sqs_queue_url: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            queue_visibility_timeout_secs: QUEUE_VISIBILITY_TIMEOUT_SECS,
            queue_wait_time_secs: QUEUE_WAIT_TIME_SECS,
            scanner_endpoint: None,
            scanner_timeout_secs: SCANNER_TIMEOUT_SECS,
            smtp_host: None,
            smtp_port: None,
            smtp_user: None,
            smtp_password: None,
            smtp_from: None,
            smtp_tls: true,
        }
    }
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| defaults.environment.clone());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        Ok(Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| defaults.server_port.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            rate_limit_window_ms: parse_env("RATE_LIMIT_WINDOW_MS", defaults.rate_limit_window_ms),
            enqueue_rate_limit: parse_env(
                "ENQUEUE_RATE_LIMIT_PER_WINDOW",
                defaults.enqueue_rate_limit,
            ),
            scan_rate_limit: parse_env("SCAN_RATE_LIMIT_PER_WINDOW", defaults.scan_rate_limit),
            trusted_proxy_count: parse_env("TRUSTED_PROXY_COUNT", defaults.trusted_proxy_count),
            worker_secret: env::var("WORKER_SECRET").ok().filter(|s| !s.is_empty()),
            worker_max_batch: parse_env("WORKER_MAX_BATCH", defaults.worker_max_batch),
            worker_default_max_jobs: parse_env(
                "WORKER_DEFAULT_MAX_JOBS",
                defaults.worker_default_max_jobs,
            ),
            worker_default_timeout_ms: parse_env(
                "WORKER_DEFAULT_TIMEOUT_MS",
                defaults.worker_default_timeout_ms,
            ),
            queue_backend: env::var("QUEUE_BACKEND")
                .unwrap_or_else(|_| defaults.queue_backend.clone())
                .to_lowercase(),
            aws_region: env::var("AWS_REGION").ok(),
            sqs_queue_url: env::var("AWS_SQS_QUEUE_URL").ok(),
            aws_access_key_id: env::var("AWS_ACCESS_KEY_ID").ok(),
            aws_secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
            queue_visibility_timeout_secs: parse_env(
                "QUEUE_VISIBILITY_TIMEOUT_SECS",
                defaults.queue_visibility_timeout_secs,
            ),
            queue_wait_time_secs: parse_env("QUEUE_WAIT_TIME_SECS", defaults.queue_wait_time_secs),
            scanner_endpoint: env::var("SCANNER_ENDPOINT").ok(),
            scanner_timeout_secs: parse_env("SCANNER_TIMEOUT_SECS", defaults.scanner_timeout_secs),
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port: env::var("SMTP_PORT").ok().and_then(|s| s.parse().ok()),
            smtp_user: env::var("SMTP_USER").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            smtp_from: env::var("SMTP_FROM").ok(),
            smtp_tls: parse_env("SMTP_TLS", defaults.smtp_tls),
        })
    }
}

/// Parse an env var, falling back to the given default when unset or invalid.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
