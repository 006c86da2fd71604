//! The native collector: runs every probe in a fixed order, substitutes the
//! documented default for each failed probe, and reports progress after
//! every step.

use std::time::Duration;

use readiness::{Collector, ProgressSink, SystemSnapshot};

use crate::{firmware, graphics, hardware, network};

const UNKNOWN: &str = "Unknown";

/// Native Windows collector. Connectivity probing is configurable since it
/// is the only probe that leaves the machine.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowsCollector {
    connectivity_probes: Vec<String>,
    connectivity_timeout: Duration,
}

impl Default for WindowsCollector {
    fn default() -> Self {
        Self {
            connectivity_probes: network::DEFAULT_CONNECTIVITY_PROBES
                .iter()
                .map(|probe| probe.to_string())
                .collect(),
            connectivity_timeout: network::DEFAULT_CONNECTIVITY_TIMEOUT,
        }
    }
}

impl WindowsCollector {
    /// An empty probe list falls back to the stock probe targets.
    pub fn new(connectivity_probes: Vec<String>, connectivity_timeout: Duration) -> Self {
        let mut collector = Self {
            connectivity_timeout,
            ..Self::default()
        };
        if !connectivity_probes.is_empty() {
            collector.connectivity_probes = connectivity_probes;
        }
        collector
    }
}

impl Collector for WindowsCollector {
    fn collect(&self, progress: &dyn ProgressSink) -> SystemSnapshot {
        progress.on_progress("processor", 10);
        let processor_name =
            hardware::probe_processor_name().unwrap_or_else(|| UNKNOWN.to_string());

        progress.on_progress("memory", 20);
        let ram_gigabytes = hardware::probe_ram_gigabytes().unwrap_or(0);

        progress.on_progress("storage", 30);
        let storage_gigabytes = hardware::probe_storage_gigabytes().unwrap_or(0);

        progress.on_progress("system", 40);
        let identity = hardware::probe_computer_system();

        progress.on_progress("bios", 50);
        let serial_number = hardware::probe_bios_serial().unwrap_or_else(|| UNKNOWN.to_string());

        progress.on_progress("uefi", 55);
        let uefi_capable = firmware::probe_uefi_capable();

        progress.on_progress("tpm", 60);
        let tpm_version = firmware::probe_tpm_version();

        progress.on_progress("secure boot", 65);
        let secure_boot_capable = firmware::probe_secure_boot_capable();

        progress.on_progress("directx", 70);
        let directx_version = graphics::probe_directx_version();

        progress.on_progress("display", 80);
        let display_resolution =
            graphics::probe_display_resolution().unwrap_or_else(|| UNKNOWN.to_string());

        progress.on_progress("internet", 90);
        let internet_connected = network::probe_internet_connected(
            &self.connectivity_probes,
            self.connectivity_timeout,
        );

        progress.on_progress("complete", 100);

        SystemSnapshot {
            processor_name,
            ram_gigabytes,
            storage_gigabytes,
            manufacturer: identity.manufacturer.unwrap_or_else(|| UNKNOWN.to_string()),
            model: identity.model.unwrap_or_else(|| UNKNOWN.to_string()),
            serial_number,
            tpm_version,
            secure_boot_capable,
            uefi_capable,
            directx_version,
            display_resolution,
            internet_connected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readiness::NullProgress;
    use std::net::TcpListener;
    use std::sync::Mutex;

    struct RecordingSink {
        calls: Mutex<Vec<(String, u8)>>,
    }

    impl ProgressSink for RecordingSink {
        fn on_progress(&self, step: &str, percent: u8) {
            self.calls
                .lock()
                .expect("progress lock")
                .push((step.to_string(), percent));
        }
    }

    fn dead_probe_addr() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        listener.local_addr().expect("local addr").to_string()
    }

    #[test]
    fn empty_probe_list_falls_back_to_stock_targets() {
        let collector = WindowsCollector::new(Vec::new(), network::DEFAULT_CONNECTIVITY_TIMEOUT);
        assert_eq!(collector, WindowsCollector::default());
    }

    #[test]
    fn progress_runs_from_first_probe_to_completion() {
        let collector =
            WindowsCollector::new(vec![dead_probe_addr()], Duration::from_millis(100));
        let sink = RecordingSink {
            calls: Mutex::new(Vec::new()),
        };

        let _ = collector.collect(&sink);

        let calls = sink.calls.into_inner().expect("progress calls");
        assert_eq!(
            calls.first().map(|(step, pct)| (step.as_str(), *pct)),
            Some(("processor", 10))
        );
        assert_eq!(
            calls.last().map(|(step, pct)| (step.as_str(), *pct)),
            Some(("complete", 100))
        );
        let percents: Vec<u8> = calls.iter().map(|(_, pct)| *pct).collect();
        let mut sorted = percents.clone();
        sorted.sort_unstable();
        assert_eq!(percents, sorted, "progress percentages never regress");
    }

    // Off-Windows every native probe is a stub, so a collector pointed at a
    // dead connectivity target must come back with the all-default snapshot.
    #[cfg(not(target_os = "windows"))]
    #[test]
    fn collect_returns_defaults_when_no_probe_can_run() {
        let collector =
            WindowsCollector::new(vec![dead_probe_addr()], Duration::from_millis(100));

        let snapshot = collector.collect(&NullProgress);
        assert_eq!(snapshot, SystemSnapshot::default());
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn collect_always_completes() {
        let collector = WindowsCollector::default();
        let snapshot = collector.collect(&NullProgress);
        assert!(!snapshot.processor_name.is_empty());
    }
}
