//! Platform-windows crate: native probes behind the `readiness::Collector`
//! contract.
//!
//! Each probe spawns one read-only query against a Windows management
//! surface (CIM via PowerShell, `reg.exe`, a TCP reachability check) and
//! reduces its output to one snapshot field. On non-Windows builds every
//! native probe is a stub that reports unavailability, so the collector
//! still completes with default values.

pub mod collector;
pub mod firmware;
pub mod graphics;
pub mod hardware;
pub mod network;
pub mod registry;
mod windows_cmd;

pub use collector::WindowsCollector;

pub fn platform_name() -> &'static str {
    "windows"
}
