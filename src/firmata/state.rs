use crate::proto::{pin_bit, pin_port, PORT_COUNT};

/// Last requested output level of every pin, grouped per port.
///
/// A digital write carries the whole port, so single pin changes are merged
/// here first. Bits of other pins are never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PortState {
    ports: [u8; PORT_COUNT],
}

impl PortState {
    /// Merges one pin level and returns `(port, mask)` to put on the wire.
    pub(crate) fn set_pin(&mut self, pin: u8, value: bool) -> (u8, u8) {
        let port = pin_port(pin);
        let mask = 1u8 << pin_bit(pin);
        let slot = &mut self.ports[port as usize];
        if value {
            *slot |= mask;
        } else {
            *slot &= !mask;
        }

        (port, *slot)
    }

    pub(crate) fn port(&self, port: u8) -> u8 {
        self.ports.get(port as usize).copied().unwrap_or(0)
    }
}
