use tracing::{debug, info};

use super::transport::builder;
use crate::{
    config::{PortName, SerialConfig},
    Error, Result,
};

const MAX_PORT_INDEX: u8 = 12;

/// Device names probed during auto-detection, highest index first.
pub fn default_candidates() -> Vec<String> {
    if cfg!(windows) {
        (1..=MAX_PORT_INDEX)
            .rev()
            .map(|i| format!("COM{}", i))
            .collect()
    } else {
        ["/dev/ttyACM", "/dev/ttyUSB"]
            .iter()
            .flat_map(|prefix| (0..10u8).rev().map(move |i| format!("{}{}", prefix, i)))
            .collect()
    }
}

/// Returns the first candidate `probe` accepts, without probing the rest.
pub fn detect_port<I, S, P>(candidates: I, mut probe: P) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    P: FnMut(&str) -> Result<()>,
{
    let mut tried = Vec::new();
    for candidate in candidates {
        let candidate = candidate.into();
        match probe(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) => {
                debug!("probe {} failed: {}", candidate, e);
                tried.push(candidate);
            }
        }
    }

    Err(Error::PortNotFound { tried })
}

/// Turns a configured port name into a concrete device path.
pub fn resolve_port(port: &PortName, cfg: &SerialConfig) -> Result<String> {
    match port {
        PortName::Named(name) => Ok(name.clone()),
        PortName::Auto => {
            info!("detecting cube port...");
            let found = detect_port(default_candidates(), |name| {
                // opened and dropped right away, the board is opened again later
                builder(name, cfg).open().map(drop).map_err(Error::from)
            })?;

            info!("detected cube port is {}", found);
            Ok(found)
        }
    }
}
