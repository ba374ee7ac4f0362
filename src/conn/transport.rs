use std::io::{Error, ErrorKind, Result, Write};

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::config::SerialConfig;

/// Byte sink towards the device.
pub trait Transport: Send {
    /// Writes the whole frame and flushes it before returning.
    fn send(&mut self, data: &[u8]) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        (**self).send(data)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

pub(crate) fn builder(path: &str, cfg: &SerialConfig) -> serialport::SerialPortBuilder {
    serialport::new(path, cfg.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(cfg.timeout)
}

pub struct Serial {
    name: String,
    inner: Option<Box<dyn SerialPort>>,
}

impl Serial {
    pub fn open(path: &str, cfg: &SerialConfig) -> crate::Result<Self> {
        let inner = builder(path, cfg).open()?;
        Ok(Serial {
            name: path.to_owned(),
            inner: Some(inner),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Transport for Serial {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        match self.inner.as_mut() {
            Some(inner) => {
                inner.write_all(data)?;
                inner.flush()
            }
            None => Err(Error::new(ErrorKind::NotConnected, "serial port closed")),
        }
    }

    fn close(&mut self) -> Result<()> {
        match self.inner.take() {
            Some(mut inner) => inner.flush(),
            None => Err(Error::new(ErrorKind::NotConnected, "serial port closed")),
        }
    }
}
