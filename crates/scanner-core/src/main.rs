mod config;
mod lifecycle;

use std::time::Duration;

use anyhow::Result;
use tracing::info;
use uuid::Uuid;

use config::ScannerConfig;
use lifecycle::ScanRuntime;
use platform_windows::WindowsCollector;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let config = ScannerConfig::load()?;
    let session_id = resolve_session_id(&config);

    info!(
        session = %session_id,
        platform = platform_windows::platform_name(),
        endpoint_configured = config.server_url.is_some(),
        "winready scanner started"
    );

    let collector = WindowsCollector::new(
        config.connectivity_probes.clone(),
        Duration::from_secs(config.connectivity_timeout_secs),
    );
    let runtime = ScanRuntime::new(config, session_id);
    let verdict = runtime.run(&collector).await?;

    info!(
        compatible = verdict.overall_compatible,
        "winready scan finished"
    );
    Ok(())
}

/// Positional argument wins over the configured session id; a generated
/// UUID covers the fully unconfigured case.
fn resolve_session_id(config: &ScannerConfig) -> String {
    std::env::args()
        .nth(1)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| config.session_id.clone())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
