use platform_windows::network::{DEFAULT_CONNECTIVITY_PROBES, DEFAULT_CONNECTIVITY_TIMEOUT};
use readiness::RequirementPolicy;

use super::types::ScannerConfig;

pub(super) const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            session_id: None,
            server_url: None,
            api_key: None,
            bearer_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connectivity_probes: DEFAULT_CONNECTIVITY_PROBES
                .iter()
                .map(|probe| probe.to_string())
                .collect(),
            connectivity_timeout_secs: DEFAULT_CONNECTIVITY_TIMEOUT.as_secs(),
            policy: RequirementPolicy::default(),
        }
    }
}
