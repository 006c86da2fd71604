//! Graphics probes: installed DirectX marker and primary display geometry.

use readiness::DirectxVersion;

use crate::registry::read_reg_string;
#[cfg(target_os = "windows")]
use crate::registry::run_powershell;
#[cfg(any(test, target_os = "windows"))]
use serde_json::Value;

/// Installed DirectX level from the registry marker. An absent or
/// unreadable marker reports as DirectX 11.
pub fn probe_directx_version() -> DirectxVersion {
    read_reg_string("HKLM", r"SOFTWARE\Microsoft\DirectX", "Version")
        .map(|marker| DirectxVersion::from_registry_marker(&marker))
        .unwrap_or_default()
}

/// Current mode of the first active video controller, formatted as
/// `"<width>x<height>"`. Controllers without a live mode (disconnected and
/// headless adapters report zero) are skipped.
pub fn probe_display_resolution() -> Option<String> {
    #[cfg(target_os = "windows")]
    {
        let cmd = "Get-CimInstance Win32_VideoController | Where-Object { $_.CurrentHorizontalResolution -gt 0 } | Select-Object -First 1 CurrentHorizontalResolution,CurrentVerticalResolution | ConvertTo-Json -Compress";
        let json = run_powershell(cmd)?;
        parse_display_resolution_json(&json)
    }
    #[cfg(not(target_os = "windows"))]
    {
        tracing::warn!("probe_display_resolution is a stub on non-Windows");
        None
    }
}

#[cfg(any(test, target_os = "windows"))]
fn parse_display_resolution_json(raw: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let width = value
        .get("CurrentHorizontalResolution")
        .and_then(Value::as_u64)?;
    let height = value
        .get("CurrentVerticalResolution")
        .and_then(Value::as_u64)?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(format!("{}x{}", width, height))
}
