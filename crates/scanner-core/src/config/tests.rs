use super::*;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use readiness::DEFAULT_PROCESSOR_MARKERS;

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn clear_env() {
    let vars = [
        "WINREADY_CONFIG",
        "WINREADY_SESSION_ID",
        "WINREADY_SERVER_URL",
        "WINREADY_API_KEY",
        "WINREADY_BEARER_TOKEN",
        "WINREADY_REQUEST_TIMEOUT_SECS",
        "WINREADY_CONNECTIVITY_PROBES",
        "WINREADY_CONNECTIVITY_TIMEOUT_SECS",
        "WINREADY_POLICY_JSON",
        "WINREADY_POLICY_PATH",
    ];
    for v in vars {
        std::env::remove_var(v);
    }
}

fn unique_temp_path(prefix: &str, ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "{}-{}.{}",
        prefix,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default(),
        ext
    ))
}

#[test]
fn defaults_apply_without_file_or_env() {
    let _guard = env_lock().lock().expect("env lock");
    clear_env();

    let cfg = ScannerConfig::load().expect("load config");

    assert_eq!(cfg.session_id, None);
    assert_eq!(cfg.server_url, None);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.connectivity_probes, vec!["1.1.1.1:443", "8.8.8.8:53"]);
    assert_eq!(cfg.connectivity_timeout_secs, 3);
    assert_eq!(cfg.policy.processor_markers, DEFAULT_PROCESSOR_MARKERS);

    clear_env();
}

#[test]
fn file_config_is_loaded() {
    let _guard = env_lock().lock().expect("env lock");
    clear_env();

    let path = unique_temp_path("winready-config", "toml");
    let mut f = std::fs::File::create(&path).expect("create file");
    writeln!(
        f,
        "[scan]\nsession_id=\"sess-from-file\"\nconnectivity_probes=[\"192.0.2.1:443\"]\nconnectivity_timeout_secs=5\n[server]\nurl=\"reports.example.com/functions/v1/submit-system-scan\"\napi_key=\"anon-key\"\nrequest_timeout_secs=10\n[policy]\nprocessor_markers=[\"i9-\",\"Threadripper\"]"
    )
    .expect("write file");

    std::env::set_var("WINREADY_CONFIG", &path);
    let cfg = ScannerConfig::load().expect("load config");

    assert_eq!(cfg.session_id.as_deref(), Some("sess-from-file"));
    assert_eq!(cfg.connectivity_probes, vec!["192.0.2.1:443"]);
    assert_eq!(cfg.connectivity_timeout_secs, 5);
    assert_eq!(
        cfg.server_url.as_deref(),
        Some("reports.example.com/functions/v1/submit-system-scan")
    );
    assert_eq!(cfg.api_key.as_deref(), Some("anon-key"));
    assert_eq!(cfg.bearer_token, None);
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.policy.processor_markers, vec!["i9-", "Threadripper"]);

    clear_env();
    let _ = std::fs::remove_file(path);
}

#[test]
fn env_overrides_file_config() {
    let _guard = env_lock().lock().expect("env lock");
    clear_env();

    let path = unique_temp_path("winready-config", "toml");
    let mut f = std::fs::File::create(&path).expect("create file");
    writeln!(
        f,
        "[scan]\nsession_id=\"sess-from-file\"\n[server]\nurl=\"file.example.com/submit\""
    )
    .expect("write file");

    std::env::set_var("WINREADY_CONFIG", &path);
    std::env::set_var("WINREADY_SESSION_ID", "sess-from-env");
    std::env::set_var("WINREADY_SERVER_URL", "env.example.com/submit");
    std::env::set_var(
        "WINREADY_CONNECTIVITY_PROBES",
        "203.0.113.5:443, 203.0.113.9:53",
    );
    std::env::set_var("WINREADY_REQUEST_TIMEOUT_SECS", "7");
    let cfg = ScannerConfig::load().expect("load config");

    assert_eq!(cfg.session_id.as_deref(), Some("sess-from-env"));
    assert_eq!(cfg.server_url.as_deref(), Some("env.example.com/submit"));
    assert_eq!(
        cfg.connectivity_probes,
        vec!["203.0.113.5:443", "203.0.113.9:53"]
    );
    assert_eq!(cfg.request_timeout_secs, 7);

    clear_env();
    let _ = std::fs::remove_file(path);
}

#[test]
fn missing_explicit_config_file_fails() {
    let _guard = env_lock().lock().expect("env lock");
    clear_env();

    std::env::set_var("WINREADY_CONFIG", "/tmp/definitely-missing-winready.toml");
    let err = ScannerConfig::load().expect_err("missing config file must fail");
    assert!(err.to_string().contains("does not exist"));

    clear_env();
}

#[test]
fn invalid_policy_json_keeps_current_policy() {
    let _guard = env_lock().lock().expect("env lock");
    clear_env();

    let path = unique_temp_path("winready-config", "toml");
    let mut f = std::fs::File::create(&path).expect("create file");
    writeln!(f, "[policy]\nprocessor_markers=[\"i9-\"]").expect("write file");

    std::env::set_var("WINREADY_CONFIG", &path);
    std::env::set_var("WINREADY_POLICY_JSON", "{not json");
    let cfg = ScannerConfig::load().expect("load config");

    assert_eq!(cfg.policy.processor_markers, vec!["i9-"]);

    clear_env();
    let _ = std::fs::remove_file(path);
}

#[test]
fn policy_file_wins_over_inline_policy_json() {
    let _guard = env_lock().lock().expect("env lock");
    clear_env();

    let policy_path = unique_temp_path("winready-policy", "json");
    let mut f = std::fs::File::create(&policy_path).expect("create policy file");
    writeln!(f, "{{\"processor_markers\":[\"Xeon\"]}}").expect("write policy file");

    std::env::set_var("WINREADY_POLICY_PATH", &policy_path);
    std::env::set_var("WINREADY_POLICY_JSON", "{\"processor_markers\":[\"EPYC\"]}");
    let cfg = ScannerConfig::load().expect("load config");

    assert_eq!(cfg.policy.processor_markers, vec!["Xeon"]);

    clear_env();
    let _ = std::fs::remove_file(policy_path);
}

#[test]
fn split_csv_trims_and_drops_empties() {
    assert_eq!(split_csv("a, b,, c ,"), vec!["a", "b", "c"]);
    assert!(split_csv("  ,").is_empty());
}
