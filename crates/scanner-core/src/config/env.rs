use readiness::parse_policy_json;
use tracing::warn;

use super::types::ScannerConfig;
use super::util::{env_non_empty, env_u64, split_csv};

impl ScannerConfig {
    pub(super) fn apply_env_overrides(&mut self) {
        self.apply_env_scan();
        self.apply_env_server();
        self.apply_env_policy();
    }

    fn apply_env_scan(&mut self) {
        if let Some(v) = env_non_empty("WINREADY_SESSION_ID") {
            self.session_id = Some(v);
        }
        if let Some(v) = env_non_empty("WINREADY_CONNECTIVITY_PROBES") {
            self.connectivity_probes = split_csv(&v);
        }
        if let Some(v) = env_u64("WINREADY_CONNECTIVITY_TIMEOUT_SECS") {
            self.connectivity_timeout_secs = v;
        }
    }

    fn apply_env_server(&mut self) {
        if let Some(v) = env_non_empty("WINREADY_SERVER_URL") {
            self.server_url = Some(v);
        }
        if let Some(v) = env_non_empty("WINREADY_API_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = env_non_empty("WINREADY_BEARER_TOKEN") {
            self.bearer_token = Some(v);
        }
        if let Some(v) = env_u64("WINREADY_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = v;
        }
    }

    /// An unreadable or invalid policy never aborts a scan; the current
    /// policy (file layer or defaults) stays in effect.
    fn apply_env_policy(&mut self) {
        if let Some(path) = env_non_empty("WINREADY_POLICY_PATH") {
            match std::fs::read_to_string(&path) {
                Ok(raw) => match parse_policy_json(&raw) {
                    Ok(policy) => {
                        self.policy = policy;
                        return;
                    }
                    Err(err) => {
                        warn!(error = %err, path = %path, "invalid requirement policy file; keeping current policy")
                    }
                },
                Err(err) => {
                    warn!(error = %err, path = %path, "failed reading requirement policy file; keeping current policy")
                }
            }
        }

        if let Some(raw) = env_non_empty("WINREADY_POLICY_JSON") {
            match parse_policy_json(&raw) {
                Ok(policy) => self.policy = policy,
                Err(err) => {
                    warn!(error = %err, "invalid WINREADY_POLICY_JSON; keeping current policy")
                }
            }
        }
    }
}
