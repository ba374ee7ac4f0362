use std::borrow::Cow;
use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    Serial(serialport::Error),
    PortNotFound {
        tried: Vec<String>,
    },
    NotEnoughData {
        want: usize,
        got: usize,
        msg: Option<Cow<'static, str>>,
    },
    InvalidData(Cow<'static, str>),
    Other(Cow<'static, str>),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IO(e)
    }
}

impl From<serialport::Error> for Error {
    fn from(e: serialport::Error) -> Self {
        Self::Serial(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IO(e) => write!(f, "io: {}", e),
            Error::Serial(e) => write!(f, "serial: {}", e),
            Error::PortNotFound { tried } => {
                write!(f, "unable to auto-detect cube port, tried {:?}", tried)
            }
            Error::NotEnoughData { want, got, msg } => {
                write!(f, "not enough data: want {}, got {}", want, got)?;
                if let Some(msg) = msg {
                    write!(f, " ({})", msg)?;
                }
                Ok(())
            }
            Error::InvalidData(msg) => write!(f, "invalid data: {}", msg),
            Error::Other(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IO(e) => Some(e),
            Error::Serial(e) => Some(e),
            _ => None,
        }
    }
}

macro_rules! ensure_buf_size {
    ($buf:expr, $size:expr) => {
        if $buf.len() < $size {
            return Err($crate::Error::NotEnoughData {
                want: $size,
                got: $buf.len(),
                msg: None,
            });
        }
    };

    ($buf:expr, $size:expr, $msg:expr) => {
        if $buf.len() < $size {
            return Err($crate::Error::NotEnoughData {
                want: $size,
                got: $buf.len(),
                msg: Some($msg.into()),
            });
        }
    };
}

pub(crate) use ensure_buf_size;
