use std::io::Write;

use byteorder::WriteBytesExt;

use super::{
    ensure_pin, Serialize, CMD_DIGITAL_MESSAGE, CMD_REPORT_ANALOG, CMD_REPORT_DIGITAL,
    CMD_SET_PIN_MODE, MAX_DATA_BYTE, MAX_NIBBLE,
};
use crate::{ensure_buf_size, util::macros::impl_num_enums, Error, Result};

impl_num_enums!(
    /// Capability a pin is switched to before use.
    PinMode,
    Input = 0,
    Output = 1,
    Analog = 2,
    Pwm = 3,
    Servo = 4,
);

fn ensure_nibble(val: u8, what: &'static str) -> Result<()> {
    if val > MAX_NIBBLE {
        return Err(Error::InvalidData(
            format!("{} {} does not fit the command nibble", what, val).into(),
        ));
    }

    Ok(())
}

fn data_byte(buf: &[u8], idx: usize) -> Result<u8> {
    let b = buf[idx];
    if b > MAX_DATA_BYTE {
        return Err(Error::InvalidData(
            format!("data byte {:#04x} at {} has the command bit set", b, idx).into(),
        ));
    }

    Ok(b)
}

/// Turns reporting of one analog channel on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportAnalog {
    pub channel: u8,
    pub enable: bool,
}

impl Serialize for ReportAnalog {
    const SIZE: usize = 2;

    fn ser(&self, w: &mut impl Write) -> Result<()> {
        ensure_nibble(self.channel, "analog channel")?;
        w.write_u8(CMD_REPORT_ANALOG | self.channel)?;
        w.write_u8(self.enable as u8)?;
        Ok(())
    }
}

/// Turns reporting of one digital port on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportDigital {
    pub port: u8,
    pub enable: bool,
}

impl Serialize for ReportDigital {
    const SIZE: usize = 2;

    fn ser(&self, w: &mut impl Write) -> Result<()> {
        ensure_nibble(self.port, "digital port")?;
        w.write_u8(CMD_REPORT_DIGITAL | self.port)?;
        w.write_u8(self.enable as u8)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPinMode {
    pub pin: u8,
    pub mode: PinMode,
}

impl Serialize for SetPinMode {
    const SIZE: usize = 3;

    fn ser(&self, w: &mut impl Write) -> Result<()> {
        ensure_pin(self.pin)?;
        w.write_all(&[CMD_SET_PIN_MODE, self.pin, self.mode as u8])?;
        Ok(())
    }
}

/// Output levels of all eight pins of a port.
///
/// The full mask travels on every write, split into a low 7-bit byte and a
/// high byte carrying bit 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitalMessage {
    pub port: u8,
    pub state: u8,
}

impl DigitalMessage {
    #[inline]
    pub fn lsb(&self) -> u8 {
        self.state & MAX_DATA_BYTE
    }

    #[inline]
    pub fn msb(&self) -> u8 {
        self.state >> 7
    }
}

impl Serialize for DigitalMessage {
    const SIZE: usize = 3;

    fn ser(&self, w: &mut impl Write) -> Result<()> {
        ensure_nibble(self.port, "digital port")?;
        w.write_u8(CMD_DIGITAL_MESSAGE | self.port)?;
        w.write_u8(self.lsb())?;
        w.write_u8(self.msb())?;
        Ok(())
    }
}

/// Any frame the host sends to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ReportAnalog(ReportAnalog),
    ReportDigital(ReportDigital),
    SetPinMode(SetPinMode),
    DigitalMessage(DigitalMessage),
}

impl Command {
    /// Decodes the frame at the head of `buf`, returning it with the number of
    /// bytes consumed.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        ensure_buf_size!(buf, 1, "command byte");
        let head = buf[0];

        if head == CMD_SET_PIN_MODE {
            ensure_buf_size!(buf, SetPinMode::SIZE, "set pin mode");
            let pin = data_byte(buf, 1)?;
            let mode = PinMode::try_from(data_byte(buf, 2)?)?;
            return Ok((Command::SetPinMode(SetPinMode { pin, mode }), SetPinMode::SIZE));
        }

        let low = head & MAX_NIBBLE;
        match head & !MAX_NIBBLE {
            CMD_REPORT_ANALOG => {
                ensure_buf_size!(buf, ReportAnalog::SIZE, "report analog");
                let enable = data_byte(buf, 1)? != 0;
                Ok((
                    Command::ReportAnalog(ReportAnalog {
                        channel: low,
                        enable,
                    }),
                    ReportAnalog::SIZE,
                ))
            }

            CMD_REPORT_DIGITAL => {
                ensure_buf_size!(buf, ReportDigital::SIZE, "report digital");
                let enable = data_byte(buf, 1)? != 0;
                Ok((
                    Command::ReportDigital(ReportDigital { port: low, enable }),
                    ReportDigital::SIZE,
                ))
            }

            CMD_DIGITAL_MESSAGE => {
                ensure_buf_size!(buf, DigitalMessage::SIZE, "digital message");
                let lsb = data_byte(buf, 1)?;
                let msb = data_byte(buf, 2)?;
                if msb > 1 {
                    return Err(Error::InvalidData(
                        format!("digital message high byte {} exceeds one bit", msb).into(),
                    ));
                }

                Ok((
                    Command::DigitalMessage(DigitalMessage {
                        port: low,
                        state: lsb | (msb << 7),
                    }),
                    DigitalMessage::SIZE,
                ))
            }

            _ => Err(Error::InvalidData(
                format!("unsupported command byte {:#04x}", head).into(),
            )),
        }
    }

    /// Decodes a buffer holding a whole sequence of frames.
    pub fn decode_all(mut buf: &[u8]) -> Result<Vec<Self>> {
        let mut out = Vec::new();
        while !buf.is_empty() {
            let (cmd, consumed) = Self::decode(buf)?;
            out.push(cmd);
            buf = &buf[consumed..];
        }

        Ok(out)
    }
}

impl Serialize for Command {
    // largest frame; report frames encode to 2 bytes
    const SIZE: usize = 3;

    fn ser(&self, w: &mut impl Write) -> Result<()> {
        match self {
            Command::ReportAnalog(c) => c.ser(w),
            Command::ReportDigital(c) => c.ser(w),
            Command::SetPinMode(c) => c.ser(w),
            Command::DigitalMessage(c) => c.ser(w),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::pack;

    #[test]
    fn report_frames() {
        let frame = pack(&ReportAnalog {
            channel: 5,
            enable: true,
        })
        .unwrap();
        assert_eq!(frame, vec![0xC5, 0x01]);

        let frame = pack(&ReportDigital {
            port: 1,
            enable: true,
        })
        .unwrap();
        assert_eq!(frame, vec![0xD1, 0x01]);

        assert!(matches!(
            pack(&ReportAnalog {
                channel: 16,
                enable: true
            }),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn set_pin_mode_frame() {
        let frame = pack(&SetPinMode {
            pin: 10,
            mode: PinMode::Output,
        })
        .unwrap();
        assert_eq!(frame, vec![0xF4, 10, 1]);

        assert!(pack(&SetPinMode {
            pin: 128,
            mode: PinMode::Output,
        })
        .is_err());
    }

    #[test]
    fn digital_message_splits_high_bit() {
        for state in [0x00u8, 0x20, 0x7F, 0x80, 0xA6, 0xFF] {
            let msg = DigitalMessage { port: 1, state };
            let frame = pack(&msg).unwrap();
            assert_eq!(frame[0], 0x91);
            assert!(frame[1] <= MAX_DATA_BYTE);
            assert_eq!(frame[2] as u16 * 128 + frame[1] as u16, state as u16);
        }
    }

    #[test]
    fn decode_sequence() {
        let buf = [0xC0, 0x01, 0xD1, 0x01, 0xF4, 0x06, 0x01, 0x90, 0x20, 0x01];
        let cmds = Command::decode_all(&buf).unwrap();
        assert_eq!(
            cmds,
            vec![
                Command::ReportAnalog(ReportAnalog {
                    channel: 0,
                    enable: true
                }),
                Command::ReportDigital(ReportDigital {
                    port: 1,
                    enable: true
                }),
                Command::SetPinMode(SetPinMode {
                    pin: 6,
                    mode: PinMode::Output
                }),
                Command::DigitalMessage(DigitalMessage {
                    port: 0,
                    state: 0xA0
                }),
            ]
        );
    }

    #[test]
    fn command_writes_inner_frame_length() {
        let report = Command::ReportDigital(ReportDigital {
            port: 0,
            enable: true,
        });
        assert_eq!(pack(&report).unwrap(), vec![0xD0, 0x01]);

        let write = Command::DigitalMessage(DigitalMessage {
            port: 1,
            state: 0x84,
        });
        assert_eq!(pack(&write).unwrap(), vec![0x91, 0x04, 0x01]);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            Command::decode(&[]),
            Err(Error::NotEnoughData { want: 1, got: 0, .. })
        ));
        assert!(matches!(
            Command::decode(&[0x90, 0x01]),
            Err(Error::NotEnoughData { want: 3, got: 2, .. })
        ));
        assert!(matches!(
            Command::decode(&[0xF4, 0x05, 0x09]),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            Command::decode(&[0x90, 0x01, 0x02]),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            Command::decode(&[0xE0, 0x00, 0x00]),
            Err(Error::InvalidData(_))
        ));
    }
}
