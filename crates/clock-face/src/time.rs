//! Wall-clock time and the hand angles derived from it.

use std::f32::consts::{FRAC_PI_2, TAU};

use chrono::Timelike;

/// Time of day with whole-second resolution.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ClockTime {
    hour: u32,
    minute: u32,
    second: u32,
}

impl ClockTime {
    /// Creates a time, clamping each component into range.
    ///
    /// Leap seconds (reported as second 60) show as 59.
    pub fn new(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour: hour.min(23),
            minute: minute.min(59),
            second: second.min(59),
        }
    }

    pub fn hour(self) -> u32 {
        self.hour
    }

    pub fn minute(self) -> u32 {
        self.minute
    }

    pub fn second(self) -> u32 {
        self.second
    }
}

impl<T: Timelike> From<&T> for ClockTime {
    fn from(t: &T) -> Self {
        Self::new(t.hour(), t.minute(), t.second())
    }
}

/// Source of the time shown on the clock.
pub trait TimeSource {
    fn now(&self) -> ClockTime;
}

/// Reads the local wall clock.
#[derive(Debug, Default, Copy, Clone)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn now(&self) -> ClockTime {
        ClockTime::from(&chrono::Local::now())
    }
}

/// Always reports the same time.
#[derive(Debug, Copy, Clone)]
pub struct FixedTime(pub ClockTime);

impl TimeSource for FixedTime {
    fn now(&self) -> ClockTime {
        self.0
    }
}

/// Hand rotations in radians, counter-clockwise from +X.
///
/// Each angle is `π/2 − swept`, so 12:00:00 points every hand straight up and
/// the hands turn clockwise as time advances. The hour hand moves in whole-hour
/// steps.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClockAngles {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl ClockAngles {
    pub fn from_time(t: ClockTime) -> Self {
        Self {
            hour: FRAC_PI_2 - TAU * (t.hour % 12) as f32 / 12.0,
            minute: FRAC_PI_2 - TAU * t.minute as f32 / 60.0,
            second: FRAC_PI_2 - TAU * t.second as f32 / 60.0,
        }
    }
}
