//! Wall clock to hand angles, and hand angles to the per-frame hand set

use chrono::{DateTime, Timelike};
use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, TAU};

pub const SECOND_PERIOD_MS: i64 = 60_000;
pub const MINUTE_PERIOD_MS: i64 = 3_600_000;
/// Twelve hours: the hour hand turns twice a day
pub const HOUR_PERIOD_MS: i64 = 43_200_000;

/// 2D vector in canvas units, y pointing down
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Hand angles for one frame, in radians; 0 points right, -pi/2 points up
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeSample {
    /// Shifted time the angles were taken from (ms)
    pub time: i64,
    pub s: f64,
    pub m: f64,
    pub h: f64,
}

fn hand_angle(time: i64, period: i64) -> f64 {
    time.rem_euclid(period) as f64 / period as f64 * TAU - FRAC_PI_2
}

impl TimeSample {
    /// Map a timestamp (ms since the epoch) to hand angles
    pub fn at(now: i64, timezone_offset: i64, time_shift: i64) -> Self {
        let time = now
            .saturating_sub(timezone_offset)
            .saturating_add(time_shift);
        Self {
            time,
            s: hand_angle(time, SECOND_PERIOD_MS),
            m: hand_angle(time, MINUTE_PERIOD_MS),
            h: hand_angle(time, HOUR_PERIOD_MS),
        }
    }

    /// Hand set `[second, minute, hour]`, each `scaled_length` long
    pub fn hands(&self, scaled_length: f64) -> [Vec2; 3] {
        [self.s, self.m, self.h].map(|angle| {
            Vec2::new(angle.cos() * scaled_length, angle.sin() * scaled_length)
        })
    }

    /// 12-hour readout `H:MM.SS`; hour 0 reads 12
    pub fn readout(&self) -> Option<String> {
        let date = DateTime::from_timestamp_millis(self.time)?;
        let hour = match date.hour() % 12 {
            0 => 12,
            h => h,
        };
        Some(format!("{}:{:02}.{:02}", hour, date.minute(), date.second()))
    }
}
