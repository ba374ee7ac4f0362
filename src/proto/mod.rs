//! Host-to-device frames of the firmata subset spoken by the cube firmware.
//!
//! Every data byte after the command byte carries 7 bits, so pins, modes and
//! port masks are limited to what fits the wire.

use std::io::Write;

use crate::{Error, Result};

pub mod cmd;

pub use cmd::{Command, DigitalMessage, PinMode, ReportAnalog, ReportDigital, SetPinMode};

pub const CMD_REPORT_ANALOG: u8 = 0xC0;
pub const CMD_REPORT_DIGITAL: u8 = 0xD0;
pub const CMD_SET_PIN_MODE: u8 = 0xF4;
pub const CMD_DIGITAL_MESSAGE: u8 = 0x90;

pub const MAX_DATA_BYTE: u8 = 0x7F;
pub const MAX_NIBBLE: u8 = 0x0F;

pub const PORT_COUNT: usize = 16;

/// Pins addressable by a single byte of data.
pub const MAX_PIN: u8 = MAX_DATA_BYTE;

#[inline]
pub const fn pin_port(pin: u8) -> u8 {
    (pin >> 3) & MAX_NIBBLE
}

#[inline]
pub const fn pin_bit(pin: u8) -> u8 {
    pin & 0x07
}

pub fn ensure_pin(pin: u8) -> Result<()> {
    if pin > MAX_PIN {
        return Err(Error::InvalidData(format!("pin {} out of range", pin).into()));
    }

    Ok(())
}

pub trait Serialize {
    /// Encoded length of the frame, used to reserve the buffer. Exact for the
    /// frame structs, an upper bound for [`Command`].
    const SIZE: usize;

    fn ser(&self, w: &mut impl Write) -> Result<()>;
}

pub fn pack<S: Serialize>(msg: &S) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(S::SIZE);
    msg.ser(&mut buf)?;
    Ok(buf)
}
