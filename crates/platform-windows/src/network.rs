//! Network reachability probe.
//!
//! The one probe that can block, so every address gets a bounded connect
//! timeout. Works the same on every OS.

use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use tracing::debug;

/// Default probe targets: public resolvers answering on 443 and 53.
pub const DEFAULT_CONNECTIVITY_PROBES: [&str; 2] = ["1.1.1.1:443", "8.8.8.8:53"];

pub const DEFAULT_CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(3);

/// True when any probe address accepts a TCP connection within the
/// per-address timeout. Malformed addresses are skipped.
pub fn probe_internet_connected(probes: &[String], timeout: Duration) -> bool {
    for probe in probes {
        let Ok(addr) = probe.parse::<SocketAddr>() else {
            debug!(probe = %probe, "skipping unparsable connectivity probe address");
            continue;
        };
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(_) => return true,
            Err(err) => {
                debug!(probe = %probe, error = %err, "connectivity probe failed");
            }
        }
    }
    false
}
