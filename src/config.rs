use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::{Error, Result};

pub const AUTO_DETECT_PORT: &str = "AUTO";
pub const PORT_ENV: &str = "CUBE_PORT";

pub const DEFAULT_BAUD_RATE: u32 = 57600;
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

pub const DEFAULT_RED_PINS: [u8; 2] = [5, 9];
pub const DEFAULT_GREEN_PINS: [u8; 2] = [6, 10];

/// Serial device the cube is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortName {
    /// Probe the candidate device names and take the first that opens.
    Auto,
    Named(String),
}

impl Default for PortName {
    fn default() -> Self {
        Self::Auto
    }
}

impl FromStr for PortName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidData("empty port name".into()));
        }

        if s.eq_ignore_ascii_case(AUTO_DETECT_PORT) {
            return Ok(Self::Auto);
        }

        Ok(Self::Named(s.to_owned()))
    }
}

impl fmt::Display for PortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortName::Auto => f.write_str(AUTO_DETECT_PORT),
            PortName::Named(name) => f.write_str(name),
        }
    }
}

/// Line settings; the firmware expects 8N1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Electrical level that lights a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Default for Polarity {
    fn default() -> Self {
        Self::ActiveHigh
    }
}

impl Polarity {
    #[inline]
    pub fn level(self, lit: bool) -> bool {
        match self {
            Polarity::ActiveHigh => lit,
            Polarity::ActiveLow => !lit,
        }
    }
}

/// Which pins drive which color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubePins {
    pub red: Vec<u8>,
    pub green: Vec<u8>,
    pub polarity: Polarity,
}

impl Default for CubePins {
    fn default() -> Self {
        Self {
            red: DEFAULT_RED_PINS.to_vec(),
            green: DEFAULT_GREEN_PINS.to_vec(),
            polarity: Polarity::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeConfig {
    pub port: PortName,
    pub serial: SerialConfig,
    pub settle_delay: Duration,
    pub pins: CubePins,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            port: PortName::default(),
            serial: SerialConfig::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            pins: CubePins::default(),
        }
    }
}

impl CubeConfig {
    /// Defaults, with the port taken from `CUBE_PORT` when set.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        if let Ok(port) = env::var(PORT_ENV) {
            cfg.port = port.parse()?;
        }

        Ok(cfg)
    }

    pub fn with_port(mut self, port: PortName) -> Self {
        self.port = port;
        self
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.serial.baud_rate = baud_rate;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn with_pins(mut self, red: &[u8], green: &[u8]) -> Self {
        self.pins.red = red.to_vec();
        self.pins.green = green.to_vec();
        self
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.pins.polarity = polarity;
        self
    }
}
