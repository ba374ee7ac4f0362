use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::{
    config::CubeConfig,
    conn::{resolve_port, Serial, Transport},
    proto::{
        ensure_pin, pack, DigitalMessage, PinMode, ReportAnalog, ReportDigital, Serialize,
        SetPinMode,
    },
    time::Delay,
    util::hex,
    Result,
};

mod state;
use state::PortState;

pub const ANALOG_REPORT_CHANNELS: u8 = 6;
pub const DIGITAL_REPORT_PORTS: u8 = 2;

/// Pin level control of a firmata device.
pub trait Firmata {
    fn pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<()>;

    fn digital_write(&mut self, pin: u8, value: bool) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

impl<F: Firmata + ?Sized> Firmata for Box<F> {
    fn pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        (**self).pin_mode(pin, mode)
    }

    fn digital_write(&mut self, pin: u8, value: bool) -> Result<()> {
        (**self).digital_write(pin, value)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// A firmata device behind a transport, tracking the output mask of each
/// port.
pub struct Board<T: Transport> {
    trans: T,
    state: PortState,
}

impl Board<Serial> {
    /// Opens the configured serial port and runs the handshake.
    pub fn connect(cfg: &CubeConfig, delay: &mut impl Delay) -> Result<Self> {
        let path = resolve_port(&cfg.port, &cfg.serial)?;
        let trans = Serial::open(&path, &cfg.serial).map_err(|e| {
            warn!("unable to open port {}: {}", path, e);
            e
        })?;

        Self::open(trans, cfg.settle_delay, delay)
    }
}

impl<T: Transport> Board<T> {
    /// Waits for the device to reboot after the line reset, then enables
    /// reporting.
    pub fn open(trans: T, settle: Duration, delay: &mut impl Delay) -> Result<Self> {
        let mut board = Board {
            trans,
            state: PortState::default(),
        };

        delay.delay(settle);
        board.handshake()?;
        Ok(board)
    }

    fn handshake(&mut self) -> Result<()> {
        debug!("enabling analog and digital reporting");
        for channel in 0..ANALOG_REPORT_CHANNELS {
            self.send(&ReportAnalog {
                channel,
                enable: true,
            })?;
        }

        for port in 0..DIGITAL_REPORT_PORTS {
            self.send(&ReportDigital { port, enable: true })?;
        }

        Ok(())
    }

    fn send<S: Serialize>(&mut self, msg: &S) -> Result<()> {
        let frame = pack(msg)?;
        trace!("-> {}", hex(&frame));
        self.trans.send(&frame).map_err(|e| {
            warn!("write error: {}", e);
            e.into()
        })
    }

    /// Last output mask sent for `port`.
    pub fn port_state(&self, port: u8) -> u8 {
        self.state.port(port)
    }

    pub fn transport(&self) -> &T {
        &self.trans
    }
}

impl<T: Transport> Firmata for Board<T> {
    fn pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        self.send(&SetPinMode { pin, mode })
    }

    fn digital_write(&mut self, pin: u8, value: bool) -> Result<()> {
        // a rejected pin must leave the state untouched
        ensure_pin(pin)?;
        let (port, state) = self.state.set_pin(pin, value);
        self.send(&DigitalMessage { port, state })
    }

    fn close(&mut self) -> Result<()> {
        self.trans.close().map_err(|e| {
            warn!("close error: {}", e);
            e.into()
        })
    }
}
