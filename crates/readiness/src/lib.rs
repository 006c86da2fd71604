//! Windows 11 readiness core: the system snapshot record, the fixed
//! nine-rule requirement table, and the evaluator reducing one to the other.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Processor substrings that mark a qualifying generation or family when no
/// policy overrides them.
pub const DEFAULT_PROCESSOR_MARKERS: [&str; 5] = ["i7-", "i5-", "Ryzen", "8th Gen", "11th Gen"];

const MIN_RAM_GIGABYTES: u64 = 4;
const MIN_STORAGE_GIGABYTES: u64 = 64;
const MIN_DISPLAY_HEIGHT: u32 = 720;

const UNKNOWN: &str = "Unknown";

#[derive(Debug)]
pub enum ReadinessError {
    PolicyParse(String),
}

impl fmt::Display for ReadinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PolicyParse(msg) => write!(f, "failed parsing requirement policy: {}", msg),
        }
    }
}

impl std::error::Error for ReadinessError {}

pub type Result<T> = std::result::Result<T, ReadinessError>;

/// TPM specification level as reported by the platform TPM provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TpmVersion {
    #[serde(rename = "2.0")]
    V2_0,
    #[serde(rename = "1.2")]
    V1_2,
    #[default]
    #[serde(rename = "Not Detected")]
    NotDetected,
}

impl TpmVersion {
    pub fn label(self) -> &'static str {
        match self {
            Self::V2_0 => "2.0",
            Self::V1_2 => "1.2",
            Self::NotDetected => "Not Detected",
        }
    }

    /// Maps a raw provider SpecVersion string (typically `"2.0, 0, 1.38"`)
    /// onto the closed label set. Anything that is not clearly a 2.x or 1.x
    /// spec counts as not detected.
    pub fn from_spec_version(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("2.") {
            Self::V2_0
        } else if trimmed.starts_with("1.") {
            Self::V1_2
        } else {
            Self::NotDetected
        }
    }
}

impl fmt::Display for TpmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Installed DirectX level derived from the registry marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DirectxVersion {
    #[default]
    #[serde(rename = "11")]
    Dx11,
    #[serde(rename = "12")]
    Dx12,
}

impl DirectxVersion {
    pub fn label(self) -> &'static str {
        match self {
            Self::Dx11 => "11",
            Self::Dx12 => "12",
        }
    }

    /// A marker mentioning 12 means DirectX 12; everything else, including
    /// an absent marker, reports as 11.
    pub fn from_registry_marker(raw: &str) -> Self {
        if raw.contains("12") {
            Self::Dx12
        } else {
            Self::Dx11
        }
    }
}

impl fmt::Display for DirectxVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Facts observed about one machine at one instant. Every field is always
/// populated: a failed probe contributes the field's default instead of
/// leaving a gap, so `SystemSnapshot::default()` is exactly the snapshot of
/// a machine on which every probe failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSnapshot {
    pub processor_name: String,
    pub ram_gigabytes: u64,
    pub storage_gigabytes: u64,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub tpm_version: TpmVersion,
    pub secure_boot_capable: bool,
    pub uefi_capable: bool,
    pub directx_version: DirectxVersion,
    pub display_resolution: String,
    pub internet_connected: bool,
}

impl Default for SystemSnapshot {
    fn default() -> Self {
        Self {
            processor_name: UNKNOWN.to_string(),
            ram_gigabytes: 0,
            storage_gigabytes: 0,
            manufacturer: UNKNOWN.to_string(),
            model: UNKNOWN.to_string(),
            serial_number: UNKNOWN.to_string(),
            tpm_version: TpmVersion::NotDetected,
            secure_boot_capable: false,
            uefi_capable: false,
            directx_version: DirectxVersion::Dx11,
            display_resolution: UNKNOWN.to_string(),
            internet_connected: false,
        }
    }
}

/// One evaluated requirement: whether it is met, the fixed requirement
/// text, and the observed value rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementCheck {
    pub met: bool,
    pub requirement_text: String,
    pub current_value_text: String,
}

/// The nine rule keys in their fixed output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementKey {
    Processor,
    Ram,
    Storage,
    Tpm,
    SecureBoot,
    Uefi,
    Directx,
    Display,
    Internet,
}

impl RequirementKey {
    pub const ALL: [RequirementKey; 9] = [
        Self::Processor,
        Self::Ram,
        Self::Storage,
        Self::Tpm,
        Self::SecureBoot,
        Self::Uefi,
        Self::Directx,
        Self::Display,
        Self::Internet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processor => "processor",
            Self::Ram => "ram",
            Self::Storage => "storage",
            Self::Tpm => "tpm",
            Self::SecureBoot => "secureBoot",
            Self::Uefi => "uefi",
            Self::Directx => "directx",
            Self::Display => "display",
            Self::Internet => "internet",
        }
    }
}

impl fmt::Display for RequirementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `RequirementCheck` per rule key. A struct rather than a map so the
/// nine-key table is closed at the type level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementChecks {
    pub processor: RequirementCheck,
    pub ram: RequirementCheck,
    pub storage: RequirementCheck,
    pub tpm: RequirementCheck,
    pub secure_boot: RequirementCheck,
    pub uefi: RequirementCheck,
    pub directx: RequirementCheck,
    pub display: RequirementCheck,
    pub internet: RequirementCheck,
}

impl RequirementChecks {
    pub fn get(&self, key: RequirementKey) -> &RequirementCheck {
        match key {
            RequirementKey::Processor => &self.processor,
            RequirementKey::Ram => &self.ram,
            RequirementKey::Storage => &self.storage,
            RequirementKey::Tpm => &self.tpm,
            RequirementKey::SecureBoot => &self.secure_boot,
            RequirementKey::Uefi => &self.uefi,
            RequirementKey::Directx => &self.directx,
            RequirementKey::Display => &self.display,
            RequirementKey::Internet => &self.internet,
        }
    }

    /// Checks in the fixed key order.
    pub fn iter(&self) -> impl Iterator<Item = (RequirementKey, &RequirementCheck)> {
        RequirementKey::ALL.iter().map(move |key| (*key, self.get(*key)))
    }

    pub fn all_met(&self) -> bool {
        RequirementKey::ALL.iter().all(|key| self.get(*key).met)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityVerdict {
    pub overall_compatible: bool,
    pub checks: RequirementChecks,
}

/// Configurable part of the requirement table. Thresholds and requirement
/// texts are fixed; only the qualifying-processor marker set is a business
/// rule that varies by deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementPolicy {
    #[serde(default = "default_processor_markers")]
    pub processor_markers: Vec<String>,
}

impl Default for RequirementPolicy {
    fn default() -> Self {
        Self {
            processor_markers: default_processor_markers(),
        }
    }
}

impl RequirementPolicy {
    /// An empty configured marker list falls back to the stock markers so a
    /// truncated policy cannot fail every machine.
    pub fn processor_qualifies(&self, name: &str) -> bool {
        if self.processor_markers.is_empty() {
            DEFAULT_PROCESSOR_MARKERS
                .iter()
                .any(|marker| name.contains(marker))
        } else {
            self.processor_markers
                .iter()
                .any(|marker| name.contains(marker.as_str()))
        }
    }
}

fn default_processor_markers() -> Vec<String> {
    DEFAULT_PROCESSOR_MARKERS
        .iter()
        .map(|marker| marker.to_string())
        .collect()
}

pub fn parse_policy_json(raw: &str) -> Result<RequirementPolicy> {
    serde_json::from_str(raw).map_err(|err| ReadinessError::PolicyParse(err.to_string()))
}

/// Progress listener the collector may call after each probe. Purely a
/// presentation aid: the collected snapshot never depends on whether a
/// listener is attached.
pub trait ProgressSink {
    fn on_progress(&self, step: &str, percent: u8);
}

/// Sink that drops every callback.
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn on_progress(&self, _step: &str, _percent: u8) {}
}

/// Produces one complete snapshot for the current host. Implementations
/// must not fail: a probe that cannot complete contributes the field's
/// default instead.
pub trait Collector {
    fn collect(&self, progress: &dyn ProgressSink) -> SystemSnapshot;
}

/// Evaluates a snapshot against the requirement table with the stock
/// processor markers.
pub fn evaluate(snapshot: &SystemSnapshot) -> CompatibilityVerdict {
    evaluate_with_policy(&RequirementPolicy::default(), snapshot)
}

/// Pure reduction of a snapshot to the nine-rule verdict. Deterministic for
/// equal inputs; the overall flag is the conjunction of the nine outcomes.
pub fn evaluate_with_policy(
    policy: &RequirementPolicy,
    snapshot: &SystemSnapshot,
) -> CompatibilityVerdict {
    let checks = RequirementChecks {
        processor: check_result(
            policy.processor_qualifies(&snapshot.processor_name),
            "1 GHz or faster with 2+ cores on compatible 64-bit processor (8th gen Intel or AMD Ryzen 2000+)",
            snapshot.processor_name.clone(),
        ),
        ram: check_result(
            snapshot.ram_gigabytes >= MIN_RAM_GIGABYTES,
            "4 GB RAM minimum (8 GB recommended)",
            format!("{} GB", snapshot.ram_gigabytes),
        ),
        storage: check_result(
            snapshot.storage_gigabytes >= MIN_STORAGE_GIGABYTES,
            "64 GB available storage minimum",
            format!("{} GB", snapshot.storage_gigabytes),
        ),
        tpm: check_result(
            snapshot.tpm_version == TpmVersion::V2_0,
            "TPM version 2.0 (Trusted Platform Module)",
            match snapshot.tpm_version {
                TpmVersion::NotDetected => "TPM not detected".to_string(),
                version => format!("TPM {}", version.label()),
            },
        ),
        secure_boot: check_result(
            snapshot.secure_boot_capable,
            "Secure Boot capable firmware",
            if snapshot.secure_boot_capable {
                "Supported"
            } else {
                "Not supported"
            },
        ),
        uefi: check_result(
            snapshot.uefi_capable,
            "UEFI firmware (Legacy BIOS not supported)",
            if snapshot.uefi_capable {
                "UEFI supported"
            } else {
                "Legacy BIOS detected"
            },
        ),
        directx: check_result(
            snapshot.directx_version == DirectxVersion::Dx12,
            "DirectX 12 or later with WDDM 2.0 driver",
            format!("DirectX {}", snapshot.directx_version.label()),
        ),
        display: check_result(
            display_height(&snapshot.display_resolution)
                .map(|height| height >= MIN_DISPLAY_HEIGHT)
                .unwrap_or(false),
            "High definition (720p) display, 9\" diagonal or greater",
            snapshot.display_resolution.clone(),
        ),
        internet: check_result(
            snapshot.internet_connected,
            "Internet connectivity for updates and activation",
            if snapshot.internet_connected {
                "Connected"
            } else {
                "Not connected"
            },
        ),
    };

    CompatibilityVerdict {
        overall_compatible: checks.all_met(),
        checks,
    }
}

fn check_result(met: bool, requirement: &str, current: impl Into<String>) -> RequirementCheck {
    RequirementCheck {
        met,
        requirement_text: requirement.to_string(),
        current_value_text: current.into(),
    }
}

/// Height component of a `"<width>x<height>"` resolution string. `None` for
/// anything malformed, which the display rule treats as unmet.
fn display_height(resolution: &str) -> Option<u32> {
    let (_, height) = resolution.split_once('x')?;
    height.trim().parse().ok()
}
