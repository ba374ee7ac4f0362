//! Host side driver for a red/green LED cube running firmata firmware.

mod error;
pub mod config;
pub mod conn;
pub mod cube;
pub mod firmata;
pub mod proto;
pub mod time;
pub(crate) mod util;
pub mod worker;

pub use error::*;
pub(crate) use error::ensure_buf_size;

pub use config::{CubeConfig, CubePins, PortName, Polarity};
pub use cube::{BlinkMode, Cube};
