//! Hardware probes via CIM.
//!
//! One PowerShell invocation per probe, each reduced to a single snapshot
//! field. Failures surface as `None` and become defaults in the collector.

#[cfg(target_os = "windows")]
use crate::registry::run_powershell;
#[cfg(any(test, target_os = "windows"))]
use serde_json::Value;

#[cfg(any(test, target_os = "windows"))]
const BYTES_PER_GIB: u64 = 1024 * 1024 * 1024;

/// Manufacturer and model as reported by `Win32_ComputerSystem`.
#[derive(Debug, Clone, Default)]
pub struct ComputerSystemIdentity {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
}

/// Name of the first enumerated processor.
pub fn probe_processor_name() -> Option<String> {
    #[cfg(target_os = "windows")]
    {
        let cmd =
            "Get-CimInstance Win32_Processor | Select-Object -First 1 Name | ConvertTo-Json -Compress";
        let json = run_powershell(cmd)?;
        parse_processor_name_json(&json)
    }
    #[cfg(not(target_os = "windows"))]
    {
        tracing::warn!("probe_processor_name is a stub on non-Windows");
        None
    }
}

/// Summed physical-memory capacity, reduced to whole gigabytes.
pub fn probe_ram_gigabytes() -> Option<u64> {
    #[cfg(target_os = "windows")]
    {
        let cmd = "$mem = Get-CimInstance Win32_PhysicalMemory | Measure-Object -Property Capacity -Sum; [pscustomobject]@{ total_bytes = [uint64]$mem.Sum } | ConvertTo-Json -Compress";
        let json = run_powershell(cmd)?;
        parse_ram_gigabytes_json(&json)
    }
    #[cfg(not(target_os = "windows"))]
    {
        tracing::warn!("probe_ram_gigabytes is a stub on non-Windows");
        None
    }
}

/// Total size of the first fixed volume, reduced to whole gigabytes.
pub fn probe_storage_gigabytes() -> Option<u64> {
    #[cfg(target_os = "windows")]
    {
        let cmd = "Get-CimInstance Win32_LogicalDisk -Filter 'DriveType=3' | Select-Object -First 1 Size | ConvertTo-Json -Compress";
        let json = run_powershell(cmd)?;
        parse_storage_gigabytes_json(&json)
    }
    #[cfg(not(target_os = "windows"))]
    {
        tracing::warn!("probe_storage_gigabytes is a stub on non-Windows");
        None
    }
}

/// Manufacturer and model from `Win32_ComputerSystem`.
pub fn probe_computer_system() -> ComputerSystemIdentity {
    #[cfg(target_os = "windows")]
    {
        let cmd = "Get-CimInstance Win32_ComputerSystem | Select-Object -First 1 Manufacturer,Model | ConvertTo-Json -Compress";
        if let Some(json) = run_powershell(cmd) {
            return parse_computer_system_json(&json).unwrap_or_default();
        }
        ComputerSystemIdentity::default()
    }
    #[cfg(not(target_os = "windows"))]
    {
        tracing::warn!("probe_computer_system is a stub on non-Windows");
        ComputerSystemIdentity::default()
    }
}

/// BIOS serial number.
pub fn probe_bios_serial() -> Option<String> {
    #[cfg(target_os = "windows")]
    {
        let cmd = "Get-CimInstance Win32_BIOS | Select-Object -First 1 SerialNumber | ConvertTo-Json -Compress";
        let json = run_powershell(cmd)?;
        parse_bios_serial_json(&json)
    }
    #[cfg(not(target_os = "windows"))]
    {
        tracing::warn!("probe_bios_serial is a stub on non-Windows");
        None
    }
}

#[cfg(any(test, target_os = "windows"))]
fn parse_processor_name_json(raw: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw).ok()?;
    json_trimmed_string(&value, "Name")
}

#[cfg(any(test, target_os = "windows"))]
fn parse_ram_gigabytes_json(raw: &str) -> Option<u64> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let total_bytes = value.get("total_bytes").and_then(Value::as_u64)?;
    if total_bytes == 0 {
        return None;
    }
    Some(total_bytes / BYTES_PER_GIB)
}

#[cfg(any(test, target_os = "windows"))]
fn parse_storage_gigabytes_json(raw: &str) -> Option<u64> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let size_bytes = value.get("Size").and_then(Value::as_u64)?;
    if size_bytes == 0 {
        return None;
    }
    Some(size_bytes / BYTES_PER_GIB)
}

#[cfg(any(test, target_os = "windows"))]
fn parse_computer_system_json(raw: &str) -> Option<ComputerSystemIdentity> {
    let value: Value = serde_json::from_str(raw).ok()?;
    Some(ComputerSystemIdentity {
        manufacturer: json_trimmed_string(&value, "Manufacturer"),
        model: json_trimmed_string(&value, "Model"),
    })
}

#[cfg(any(test, target_os = "windows"))]
fn parse_bios_serial_json(raw: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw).ok()?;
    json_trimmed_string(&value, "SerialNumber")
}

#[cfg(any(test, target_os = "windows"))]
fn json_trimmed_string(value: &Value, key: &str) -> Option<String> {
    let raw = value.get(key).and_then(Value::as_str)?.trim();
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_bios_serial_json, parse_computer_system_json, parse_processor_name_json,
        parse_ram_gigabytes_json, parse_storage_gigabytes_json,
    };

    #[test]
    fn parses_processor_name_and_trims_padding() {
        let raw = r#"{"Name":"Intel(R) Core(TM) i5-8250U CPU @ 1.60GHz   "}"#;
        assert_eq!(
            parse_processor_name_json(raw).as_deref(),
            Some("Intel(R) Core(TM) i5-8250U CPU @ 1.60GHz")
        );
    }

    #[test]
    fn rejects_blank_processor_name() {
        assert_eq!(parse_processor_name_json(r#"{"Name":"  "}"#), None);
        assert_eq!(parse_processor_name_json(r#"{"Name":null}"#), None);
    }

    #[test]
    fn reduces_memory_bytes_to_whole_gigabytes() {
        assert_eq!(
            parse_ram_gigabytes_json(r#"{"total_bytes":17179869184}"#),
            Some(16)
        );
        // Rounds down, never up.
        assert_eq!(
            parse_ram_gigabytes_json(r#"{"total_bytes":17179869183}"#),
            Some(15)
        );
        assert_eq!(parse_ram_gigabytes_json(r#"{"total_bytes":0}"#), None);
    }

    #[test]
    fn reduces_volume_size_to_whole_gigabytes() {
        assert_eq!(
            parse_storage_gigabytes_json(r#"{"Size":256052966400}"#),
            Some(238)
        );
        assert_eq!(parse_storage_gigabytes_json(r#"{"Size":null}"#), None);
    }

    #[test]
    fn parses_computer_system_identity() {
        let raw = r#"{"Manufacturer":"Dell Inc.","Model":"XPS 13 9370"}"#;
        let identity = parse_computer_system_json(raw).expect("parsed identity");
        assert_eq!(identity.manufacturer.as_deref(), Some("Dell Inc."));
        assert_eq!(identity.model.as_deref(), Some("XPS 13 9370"));
    }

    #[test]
    fn parses_bios_serial() {
        assert_eq!(
            parse_bios_serial_json(r#"{"SerialNumber":"5XJ1234"}"#).as_deref(),
            Some("5XJ1234")
        );
        assert_eq!(parse_bios_serial_json("not-json"), None);
    }
}
