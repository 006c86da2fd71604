use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use readiness::{
    evaluate_with_policy, Collector, CompatibilityVerdict, ProgressSink, SystemSnapshot,
};
use report_client::{ReportClient, ScanEnvelope};

use crate::config::ScannerConfig;

/// Sink that turns collector progress callbacks into log lines.
struct ProgressLogger;

impl ProgressSink for ProgressLogger {
    fn on_progress(&self, step: &str, percent: u8) {
        info!(step, percent, "scan progress");
    }
}

/// One scan from collection to verdict, with an optional submission at the
/// end.
pub struct ScanRuntime {
    config: ScannerConfig,
    session_id: String,
}

impl ScanRuntime {
    pub fn new(config: ScannerConfig, session_id: String) -> Self {
        Self { config, session_id }
    }

    /// Collects a snapshot, evaluates it, and logs every requirement outcome.
    /// A machine that fails requirements still completes the run; only a
    /// failed submission to a configured endpoint is an error.
    pub async fn run<C: Collector>(&self, collector: &C) -> Result<CompatibilityVerdict> {
        let snapshot = collector.collect(&ProgressLogger);
        let verdict = evaluate_with_policy(&self.config.policy, &snapshot);

        for (key, check) in verdict.checks.iter() {
            info!(
                requirement = %key,
                met = check.met,
                required = %check.requirement_text,
                current = %check.current_value_text,
                "requirement evaluated"
            );
        }
        info!(
            session = %self.session_id,
            compatible = verdict.overall_compatible,
            "compatibility verdict"
        );

        match self.config.server_url.as_deref() {
            Some(url) => self.submit(url, snapshot).await?,
            None => info!("no report endpoint configured, skipping submission"),
        }

        Ok(verdict)
    }

    async fn submit(&self, url: &str, snapshot: SystemSnapshot) -> Result<()> {
        let mut client = ReportClient::with_timeout(
            url,
            Duration::from_secs(self.config.request_timeout_secs),
        )?;
        client.set_api_key(self.config.api_key.clone());
        client.set_bearer_token(self.config.bearer_token.clone());

        let envelope = ScanEnvelope::new(self.session_id.clone(), snapshot);
        client.submit_scan(&envelope).await.with_context(|| {
            format!("failed submitting scan report for session {}", self.session_id)
        })
    }
}
