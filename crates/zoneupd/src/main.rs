// # zoneupd - DNS reconciler daemon
//
// The daemon is a thin integration layer:
// 1. Read settings from environment variables
// 2. Load and validate the record configuration file
// 3. Initialize the runtime and tracing
// 4. Run the reconcile engine on a fixed interval until shutdown
//
// All reconciliation logic lives in zoneup-core.
//
// ## Settings
//
// - `ZONEUP_CONFIG`: Path to the YAML configuration file (default: config.yaml)
// - `ZONEUP_INTERVAL_SECS`: Seconds between runs (default: 120)
// - `ZONEUP_IP_SERVICE`: Public-IP lookup URL (default: https://www.cip.cc)
// - `ZONEUP_LOG_LEVEL`: trace, debug, info, warn or error (default: info)
//
// ## Configuration file
//
// ```yaml
// cloudflare:
//   - authentication:
//       auth_email: ops@example.com
//       auth_key: 0123456789abcdef
//     subdomains:
//       - zone_id: 023e105f4ecef8ad9ca31a8372d0c353
//         name: home.example.com
//       - zone_id: 023e105f4ecef8ad9ca31a8372d0c353
//         name: static.example.com
//         content: 198.51.100.9
// ```
//
// Records without `content` track the discovered public IP. `type`, `ttl`
// and `proxied` default to "A", 120 and false.

use anyhow::{Context, Result};
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;
use zoneup_core::{Config, ReconcileEngine};
use zoneup_ip_http::HttpIpSource;
use zoneup_provider_cloudflare::CloudflareFactory;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Daemon settings, read from environment variables
struct Settings {
    config_path: String,
    interval_secs: u64,
    ip_service_url: String,
    log_level: String,
}

impl Settings {
    /// Load settings from environment variables
    fn from_env() -> Self {
        Self {
            config_path: env::var("ZONEUP_CONFIG").unwrap_or_else(|_| "config.yaml".to_string()),
            interval_secs: env::var("ZONEUP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(120),
            ip_service_url: env::var("ZONEUP_IP_SERVICE")
                .unwrap_or_else(|_| zoneup_ip_http::DEFAULT_LOOKUP_URL.to_string()),
            log_level: env::var("ZONEUP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Validate the settings
    fn validate(&self) -> Result<()> {
        if self.config_path.is_empty() {
            anyhow::bail!("ZONEUP_CONFIG cannot be empty");
        }

        if !(10..=86_400).contains(&self.interval_secs) {
            anyhow::bail!(
                "ZONEUP_INTERVAL_SECS must be between 10 and 86400 seconds. Got: {}",
                self.interval_secs
            );
        }

        if !self.ip_service_url.starts_with("https://") && !self.ip_service_url.starts_with("http://")
        {
            anyhow::bail!(
                "ZONEUP_IP_SERVICE must use HTTP or HTTPS scheme. Got: {}",
                self.ip_service_url
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "ZONEUP_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

/// Load and validate the record configuration file
fn load_config(path: &str) -> Result<Config> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration file {path}"))?;

    let config: Config = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse configuration file {path}"))?;

    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let settings = Settings::from_env();

    if let Err(e) = settings.validate() {
        eprintln!("Configuration error: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    let log_level = match settings.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    let config = match load_config(&settings.config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration error: {e:#}");
            return DaemonExitCode::ConfigError.into();
        }
    };

    info!("Starting zoneupd");
    info!(
        "Managing {} record(s) across {} credential group(s), every {}s",
        config.record_count(),
        config.cloudflare.len(),
        settings.interval_secs
    );

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(settings, config).await {
            error!("Daemon error: {e:#}");
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the reconcile loop until a shutdown signal arrives
async fn run_daemon(settings: Settings, config: Config) -> Result<()> {
    let ip_source = HttpIpSource::new(&settings.ip_service_url);
    let engine = ReconcileEngine::new(Box::new(ip_source), Box::new(CloudflareFactory));

    let mut ticker = tokio::time::interval(Duration::from_secs(settings.interval_secs));
    // A run must finish before the next tick fires; a slow run delays the
    // schedule instead of stacking a second run on top of it.
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match engine.run_once(&config.cloudflare).await {
                    Ok(summary) => info!(
                        "run complete: {} created, {} updated",
                        summary.created, summary.updated
                    ),
                    // The next interval recomputes desired state from
                    // scratch, so a failed run needs no retry here.
                    Err(e) => error!("run failed: {e}"),
                }
            }

            received = &mut shutdown => {
                let name = received?;
                info!("Received {name}, shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Wait for a shutdown signal (SIGTERM or SIGINT)
#[cfg(unix)]
async fn shutdown_signal() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {e}"))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {e}"))?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    Ok(name)
}

/// Wait for a shutdown signal (CTRL-C only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {e}"))?;
    Ok("SIGINT")
}
