use readiness::RequirementPolicy;

/// Scanner settings built in layers: defaults, then the optional TOML file,
/// then environment overrides. Later layers win.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub session_id: Option<String>,
    pub server_url: Option<String>,
    pub api_key: Option<String>,
    pub bearer_token: Option<String>,
    pub request_timeout_secs: u64,
    pub connectivity_probes: Vec<String>,
    pub connectivity_timeout_secs: u64,
    pub policy: RequirementPolicy,
}
