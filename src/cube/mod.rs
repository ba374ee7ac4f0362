//! Cube level control on top of a [`Firmata`] device.

use tracing::{info, warn};

use crate::{
    config::{CubeConfig, CubePins},
    conn::Serial,
    firmata::{Board, Firmata},
    proto::{ensure_pin, PinMode},
    time::{Delay, ThreadSleep},
    Result,
};

pub mod blink;
pub use blink::{Blink, BlinkMode, Phase, Speed, BLINK_CYCLES};

pub struct Cube<F: Firmata, D: Delay = ThreadSleep> {
    fm: F,
    pins: CubePins,
    delay: D,
}

impl Cube<Board<Serial>, ThreadSleep> {
    /// Opens the configured port and leaves the cube dark.
    pub fn connect(cfg: &CubeConfig) -> Result<Self> {
        info!("connecting to cube at {}...", cfg.port);
        let mut delay = ThreadSleep;
        let board = Board::connect(cfg, &mut delay)?;
        let port = board.transport().name().to_owned();

        let mut cube = Cube::new(board, cfg.pins.clone(), delay)?;
        cube.off()?;

        info!("connected to cube at {}", port);
        Ok(cube)
    }
}

impl<F: Firmata, D: Delay> Cube<F, D> {
    /// Switches every color pin to output.
    pub fn new(fm: F, pins: CubePins, delay: D) -> Result<Self> {
        for pin in pins.red.iter().chain(pins.green.iter()) {
            ensure_pin(*pin)?;
        }

        let mut cube = Cube { fm, pins, delay };
        cube.initialize()?;
        Ok(cube)
    }

    fn initialize(&mut self) -> Result<()> {
        for pin in self.pins.red.iter().chain(self.pins.green.iter()) {
            self.fm.pin_mode(*pin, PinMode::Output)?;
        }

        Ok(())
    }

    pub fn off(&mut self) -> Result<()> {
        info!("cube is OFF");
        self.show(Phase::Off)
    }

    pub fn red(&mut self) -> Result<()> {
        info!("cube is RED");
        self.show(Phase::Red)
    }

    pub fn green(&mut self) -> Result<()> {
        info!("cube is GREEN");
        self.show(Phase::Green)
    }

    /// Runs [`BLINK_CYCLES`] cycles and ends dark.
    ///
    /// An error aborts right away and leaves the cube in the last phase that
    /// was written.
    pub fn blink(&mut self, mode: BlinkMode) -> Result<()> {
        info!("cube is BLINKING {}", mode);
        let blink = Blink::from(mode);
        let phases = blink.phases();
        let dur = blink.duration();

        for _ in 0..BLINK_CYCLES {
            for phase in &phases {
                self.show(*phase)?;
                self.delay.delay(dur);
            }
        }

        self.show(Phase::Off)?;
        info!("cube is OFF");
        Ok(())
    }

    /// Turns the cube off on a best-effort basis, then releases the device.
    pub fn close(mut self) -> Result<()> {
        if let Err(e) = self.show(Phase::Off) {
            warn!("unable to turn cube off before close: {}", e);
        }

        self.fm.close()
    }

    pub fn pins(&self) -> &CubePins {
        &self.pins
    }

    pub fn firmata(&self) -> &F {
        &self.fm
    }

    fn show(&mut self, phase: Phase) -> Result<()> {
        match phase {
            Phase::Off => self.write(false, false),
            Phase::Red => self.write(true, false),
            Phase::Green => self.write(false, true),
        }
    }

    /// Pins going dark are written before pins lighting up, red group first
    /// within each step.
    fn write(&mut self, red: bool, green: bool) -> Result<()> {
        let Cube { fm, pins, .. } = self;
        let groups = [(&pins.red, red), (&pins.green, green)];

        for lit in [false, true] {
            for (group, _) in groups.iter().filter(|(_, on)| *on == lit) {
                for pin in group.iter() {
                    fm.digital_write(*pin, pins.polarity.level(lit))?;
                }
            }
        }

        Ok(())
    }
}
