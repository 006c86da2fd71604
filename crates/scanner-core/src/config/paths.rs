use std::path::{Path, PathBuf};

use anyhow::Result;

const CONFIG_PATH_ENV: &str = "WINREADY_CONFIG";

/// An unset variable means "no file layer"; a set variable pointing at a
/// missing file is a configuration mistake and fails loudly.
pub(super) fn resolve_config_path() -> Result<Option<PathBuf>> {
    let Ok(raw) = std::env::var(CONFIG_PATH_ENV) else {
        return Ok(None);
    };

    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let path = Path::new(raw);
    if !path.exists() {
        anyhow::bail!(
            "configured {} does not exist: {}",
            CONFIG_PATH_ENV,
            path.display()
        );
    }
    Ok(Some(path.to_path_buf()))
}
