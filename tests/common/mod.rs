#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cube_rs::{
    conn::Transport,
    cube::Phase,
    firmata::Firmata,
    proto::{Command, PinMode},
    time::Delay,
    Result,
};

// ============================================================================
// Recording transport
// ============================================================================

#[derive(Default, Clone)]
pub struct WireLog {
    pub frames: Arc<Mutex<Vec<Vec<u8>>>>,
    pub closed: Arc<Mutex<bool>>,
}

impl WireLog {
    pub fn commands(&self) -> Vec<Command> {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .map(|f| {
                let (cmd, consumed) = Command::decode(f).unwrap();
                assert_eq!(consumed, f.len(), "one frame per send");
                cmd
            })
            .collect()
    }

    pub fn clear(&self) {
        self.frames.lock().unwrap().clear();
    }
}

pub struct RecordingTransport {
    pub log: WireLog,
    pub fail_after: Option<usize>,
}

impl RecordingTransport {
    pub fn new() -> (Self, WireLog) {
        let log = WireLog::default();
        (
            RecordingTransport {
                log: log.clone(),
                fail_after: None,
            },
            log,
        )
    }
}

impl Transport for RecordingTransport {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        let mut frames = self.log.frames.lock().unwrap();
        if let Some(limit) = self.fail_after {
            if frames.len() >= limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"));
            }
        }

        frames.push(data.to_vec());
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        *self.log.closed.lock().unwrap() = true;
        Ok(())
    }
}

// ============================================================================
// Recording firmata
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Mode(u8, PinMode),
    Write(u8, bool),
    Close,
}

#[derive(Default, Clone)]
pub struct MockFirmata {
    pub calls: Arc<Mutex<Vec<Call>>>,
    /// Number of digital writes that succeed before every further one fails.
    pub fail_after_writes: Option<usize>,
    writes: usize,
}

impl MockFirmata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(writes: usize) -> Self {
        MockFirmata {
            fail_after_writes: Some(writes),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<(u8, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Write(pin, value) => Some((pin, value)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Firmata for MockFirmata {
    fn pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Mode(pin, mode));
        Ok(())
    }

    fn digital_write(&mut self, pin: u8, value: bool) -> Result<()> {
        if let Some(limit) = self.fail_after_writes {
            if self.writes >= limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged").into());
            }
        }

        self.writes += 1;
        self.calls.lock().unwrap().push(Call::Write(pin, value));
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Close);
        Ok(())
    }
}

// ============================================================================
// Recording delay
// ============================================================================

#[derive(Default, Clone)]
pub struct RecordingDelay {
    pub waits: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingDelay {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

impl Delay for RecordingDelay {
    fn delay(&mut self, dur: Duration) {
        self.waits.lock().unwrap().push(dur);
    }
}

// ============================================================================
// Phase readback
// ============================================================================

/// Reads back the phase shown by each group of four pin writes, for the
/// default red `{5, 9}` and green `{6, 10}` pins.
pub fn phases(writes: &[(u8, bool)]) -> Vec<Phase> {
    assert_eq!(writes.len() % 4, 0, "partial phase in {:?}", writes);
    writes
        .chunks(4)
        .map(|chunk| {
            let lit = |pin: u8| chunk.iter().any(|&(p, v)| p == pin && v);
            match (lit(5) && lit(9), lit(6) && lit(10)) {
                (false, false) => Phase::Off,
                (true, false) => Phase::Red,
                (false, true) => Phase::Green,
                (true, true) => panic!("both colors lit in {:?}", chunk),
            }
        })
        .collect()
}
