//! Firmware and platform-security probes: boot firmware type, TPM level,
//! Secure Boot capability.

use readiness::TpmVersion;

use crate::registry::read_reg_dword;
#[cfg(target_os = "windows")]
use crate::registry::run_powershell;
#[cfg(any(test, target_os = "windows"))]
use serde_json::Value;

// PEFirmwareType: 1 = legacy BIOS, 2 = UEFI.
const FIRMWARE_TYPE_UEFI: u32 = 2;

/// Whether the machine booted through UEFI firmware.
pub fn probe_uefi_capable() -> bool {
    read_reg_dword("HKLM", r"SYSTEM\CurrentControlSet\Control", "PEFirmwareType")
        == Some(FIRMWARE_TYPE_UEFI)
}

/// TPM specification level from the platform TPM provider. Machines with
/// no TPM, or with an inaccessible provider, report not-detected.
pub fn probe_tpm_version() -> TpmVersion {
    #[cfg(target_os = "windows")]
    {
        let cmd = "Get-CimInstance -Namespace root/cimv2/Security/MicrosoftTpm -ClassName Win32_Tpm | Select-Object -First 1 SpecVersion | ConvertTo-Json -Compress";
        if let Some(json) = run_powershell(cmd) {
            if let Some(spec) = parse_tpm_spec_version_json(&json) {
                return TpmVersion::from_spec_version(&spec);
            }
        }
        TpmVersion::NotDetected
    }
    #[cfg(not(target_os = "windows"))]
    {
        tracing::warn!("probe_tpm_version is a stub on non-Windows");
        TpmVersion::NotDetected
    }
}

/// Whether the firmware answers the Secure Boot confirmation call. The
/// cmdlet errors out on legacy firmware, which reads as not capable. TPM
/// presence is never used as a proxy for this.
pub fn probe_secure_boot_capable() -> bool {
    #[cfg(target_os = "windows")]
    {
        run_powershell("Confirm-SecureBootUEFI").is_some()
    }
    #[cfg(not(target_os = "windows"))]
    {
        tracing::warn!("probe_secure_boot_capable is a stub on non-Windows");
        false
    }
}

#[cfg(any(test, target_os = "windows"))]
fn parse_tpm_spec_version_json(raw: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let spec = value.get("SpecVersion").and_then(Value::as_str)?.trim();
    if spec.is_empty() {
        None
    } else {
        Some(spec.to_string())
    }
}
