use anyhow::{Context, Result};
use serde::Deserialize;

use super::paths::resolve_config_path;
use super::types::ScannerConfig;
use super::util::non_empty;

impl ScannerConfig {
    pub(super) fn apply_file_config(&mut self) -> Result<bool> {
        let path = resolve_config_path()?;
        let Some(path) = path else {
            return Ok(false);
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed reading config file {}", path.display()))?;
        let file_cfg: FileConfig = toml::from_str(&raw)
            .with_context(|| format!("failed parsing TOML config {}", path.display()))?;

        self.apply_file_scan(file_cfg.scan);
        self.apply_file_server(file_cfg.server);
        self.apply_file_policy(file_cfg.policy);

        Ok(true)
    }

    fn apply_file_scan(&mut self, scan: Option<FileScanConfig>) {
        let Some(scan) = scan else {
            return;
        };

        if let Some(v) = non_empty(scan.session_id) {
            self.session_id = Some(v);
        }
        if let Some(v) = scan.connectivity_probes {
            self.connectivity_probes = v;
        }
        if let Some(v) = scan.connectivity_timeout_secs {
            self.connectivity_timeout_secs = v;
        }
    }

    fn apply_file_server(&mut self, server: Option<FileServerConfig>) {
        let Some(server) = server else {
            return;
        };

        if let Some(v) = non_empty(server.url) {
            self.server_url = Some(v);
        }
        if let Some(v) = non_empty(server.api_key) {
            self.api_key = Some(v);
        }
        if let Some(v) = non_empty(server.bearer_token) {
            self.bearer_token = Some(v);
        }
        if let Some(v) = server.request_timeout_secs {
            self.request_timeout_secs = v;
        }
    }

    fn apply_file_policy(&mut self, policy: Option<FilePolicyConfig>) {
        let Some(policy) = policy else {
            return;
        };

        if let Some(v) = policy.processor_markers {
            self.policy.processor_markers = v;
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    scan: Option<FileScanConfig>,
    #[serde(default)]
    server: Option<FileServerConfig>,
    #[serde(default)]
    policy: Option<FilePolicyConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct FileScanConfig {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    connectivity_probes: Option<Vec<String>>,
    #[serde(default)]
    connectivity_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct FileServerConfig {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    bearer_token: Option<String>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct FilePolicyConfig {
    #[serde(default)]
    processor_markers: Option<Vec<String>>,
}
