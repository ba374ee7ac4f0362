use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;
use std::time::Duration;

use crate::{Error, Result};

pub const BLINK_CYCLES: usize = 5;

pub const FAST_DURATION: Duration = Duration::from_millis(120);
pub const SLOW_DURATION: Duration = Duration::from_millis(250);

/// Speed and color flags of a blink, combined with `|`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BlinkMode(u8);

impl BlinkMode {
    pub const FAST: BlinkMode = BlinkMode(0x01);
    pub const SLOW: BlinkMode = BlinkMode(0x02);

    pub const RED: BlinkMode = BlinkMode(0x10);
    pub const GREEN: BlinkMode = BlinkMode(0x20);

    pub const fn empty() -> Self {
        BlinkMode(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        BlinkMode(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: BlinkMode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for BlinkMode {
    type Output = BlinkMode;

    fn bitor(self, rhs: Self) -> Self::Output {
        BlinkMode(self.0 | rhs.0)
    }
}

impl BitOrAssign for BlinkMode {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for BlinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blink = Blink::from(*self);
        match blink.speed {
            Speed::Fast => f.write_str("FAST")?,
            Speed::Slow => f.write_str("SLOW")?,
        }

        match (blink.red, blink.green) {
            (true, true) => f.write_str(" RED/GREEN"),
            (true, false) => f.write_str(" RED"),
            (false, true) => f.write_str(" GREEN"),
            (false, false) => Ok(()),
        }
    }
}

/// Parses `-` separated tokens, e.g. `fast-red` or `slow-both`.
impl FromStr for BlinkMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut mode = BlinkMode::empty();
        for token in s.split(|c: char| c == '-' || c == '+' || c == ',') {
            mode |= match token.trim().to_ascii_lowercase().as_str() {
                "" => continue,
                "fast" => BlinkMode::FAST,
                "slow" => BlinkMode::SLOW,
                "red" => BlinkMode::RED,
                "green" => BlinkMode::GREEN,
                "both" => BlinkMode::RED | BlinkMode::GREEN,
                other => {
                    return Err(Error::InvalidData(
                        format!("unknown blink flag {:?}", other).into(),
                    ))
                }
            };
        }

        Ok(mode)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    Fast,
    Slow,
}

impl Speed {
    pub fn duration(self) -> Duration {
        match self {
            Speed::Fast => FAST_DURATION,
            Speed::Slow => SLOW_DURATION,
        }
    }
}

/// One timed state of a blink cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Red,
    Green,
    Off,
}

/// A decoded [`BlinkMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    pub speed: Speed,
    pub red: bool,
    pub green: bool,
}

impl From<BlinkMode> for Blink {
    fn from(mode: BlinkMode) -> Self {
        // fast wins when both speed bits are set, and is the fallback
        let speed = if !mode.contains(BlinkMode::FAST) && mode.contains(BlinkMode::SLOW) {
            Speed::Slow
        } else {
            Speed::Fast
        };

        Blink {
            speed,
            red: mode.contains(BlinkMode::RED),
            green: mode.contains(BlinkMode::GREEN),
        }
    }
}

impl Blink {
    pub fn duration(&self) -> Duration {
        self.speed.duration()
    }

    /// Phases of a single cycle. A single color alternates with dark, two
    /// colors alternate with each other. With no color the cube stays dark
    /// for the whole cycle.
    pub fn phases(&self) -> Vec<Phase> {
        let mut phases = Vec::with_capacity(2);
        if self.red {
            phases.push(Phase::Red);
        }

        if self.green {
            phases.push(Phase::Green);
        }

        if !(self.red && self.green) {
            phases.push(Phase::Off);
        }

        phases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_selection() {
        assert_eq!(Blink::from(BlinkMode::FAST).duration(), FAST_DURATION);
        assert_eq!(Blink::from(BlinkMode::SLOW).duration(), SLOW_DURATION);
        assert_eq!(Blink::from(BlinkMode::RED).duration(), FAST_DURATION);
        assert_eq!(
            Blink::from(BlinkMode::FAST | BlinkMode::SLOW).duration(),
            FAST_DURATION
        );
    }

    #[test]
    fn cycle_phases() {
        let red = Blink::from(BlinkMode::FAST | BlinkMode::RED);
        assert_eq!(red.phases(), vec![Phase::Red, Phase::Off]);

        let green = Blink::from(BlinkMode::GREEN);
        assert_eq!(green.phases(), vec![Phase::Green, Phase::Off]);

        let both = Blink::from(BlinkMode::SLOW | BlinkMode::RED | BlinkMode::GREEN);
        assert_eq!(both.phases(), vec![Phase::Red, Phase::Green]);

        assert_eq!(Blink::from(BlinkMode::SLOW).phases(), vec![Phase::Off]);
    }

    #[test]
    fn mode_bits() {
        let mode = BlinkMode::SLOW | BlinkMode::GREEN;
        assert_eq!(mode.bits(), 0x22);
        assert!(mode.contains(BlinkMode::GREEN));
        assert!(!mode.contains(BlinkMode::RED));
        assert!(!mode.contains(BlinkMode::RED | BlinkMode::GREEN));
        assert_eq!(BlinkMode::from_bits(0x31), BlinkMode::FAST | BlinkMode::RED | BlinkMode::GREEN);
    }

    #[test]
    fn parse_and_display() {
        let mode: BlinkMode = "slow-both".parse().unwrap();
        assert_eq!(mode, BlinkMode::SLOW | BlinkMode::RED | BlinkMode::GREEN);
        assert_eq!(mode.to_string(), "SLOW RED/GREEN");

        let mode: BlinkMode = "Fast+Red".parse().unwrap();
        assert_eq!(mode.to_string(), "FAST RED");

        assert_eq!("green".parse::<BlinkMode>().unwrap().to_string(), "FAST GREEN");
        assert!("purple".parse::<BlinkMode>().is_err());
    }
}
