use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound for repetitions so a single frame stays cheap
pub const MAX_REPETITIONS: i64 = 500;
/// Upper bound for connections per repetition
pub const MAX_CONNECTIONS: i64 = 100;

/// How each hand is chained onto the running point
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Mode {
    #[default]
    Normal,
    Star,
    Nebula,
    Blackhole,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Normal, Mode::Star, Mode::Nebula, Mode::Blackhole];

    /// Parse a mode name; unknown names fall back to `Normal`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "normal" | "" => Mode::Normal,
            "star" => Mode::Star,
            "nebula" => Mode::Nebula,
            "blackhole" | "black-hole" => Mode::Blackhole,
            other => {
                log::warn!("Unknown mode {:?}, using normal", other);
                Mode::Normal
            }
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl From<String> for Mode {
    fn from(name: String) -> Self {
        Mode::parse(&name)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Normal => "normal",
            Mode::Star => "star",
            Mode::Nebula => "nebula",
            Mode::Blackhole => "blackhole",
        };
        f.write_str(name)
    }
}

/// Direction of the per-level alpha progression
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AlphaFalloff {
    /// Alpha grows level by level and holds across a level's connections
    #[default]
    Accumulate,
    /// Each level starts at its accumulated alpha and fades to zero across its connections
    Decay,
}

impl AlphaFalloff {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "decay" | "decreasing" => AlphaFalloff::Decay,
            "accumulate" | "increasing" | "" => AlphaFalloff::Accumulate,
            other => {
                log::warn!("Unknown alpha falloff {:?}, using accumulate", other);
                AlphaFalloff::Accumulate
            }
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AlphaFalloff::Accumulate => AlphaFalloff::Decay,
            AlphaFalloff::Decay => AlphaFalloff::Accumulate,
        }
    }
}

impl From<String> for AlphaFalloff {
    fn from(name: String) -> Self {
        AlphaFalloff::parse(&name)
    }
}

/// Fractional placement of the pattern centre on the canvas
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Origin {
    pub left: f64,
    pub top: f64,
}

impl Default for Origin {
    fn default() -> Self {
        Self { left: 0.5, top: 0.5 }
    }
}

/// Canvas size the default hand length was tuned for
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ReferenceSize {
    fn default() -> Self {
        Self { width: 898.0, height: 506.0 }
    }
}

/// Total hue travel across repetitions and across connections
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorShift {
    pub repetitions: f64,
    pub connections: f64,
}

impl Default for ColorShift {
    fn default() -> Self {
        Self { repetitions: 100.0, connections: 100.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub hue: u8,
    pub saturation: u8,
    pub lightness: u8,
    pub alpha: u8,
    pub fill: u8,
    pub shift: ColorShift,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            hue: 150,
            saturation: 255,
            lightness: 255,
            alpha: 220,
            fill: 127,
            shift: ColorShift::default(),
        }
    }
}

/// Configuration for the fractal clock
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub hand_length: f64,
    pub hand_width: f64,
    pub repetitions: i64,
    pub connections: i64,
    pub mode: Mode,
    pub alpha_falloff: AlphaFalloff,
    pub speed: f64,
    pub phase: f64,
    /// Milliseconds added to the wall clock
    pub time_shift: i64,
    /// Milliseconds subtracted from UTC to get local time (positive west of Greenwich)
    pub timezone_offset: i64,
    pub origin: Origin,
    pub reference_size: ReferenceSize,
    pub color: ColorConfig,
    pub show_time: bool,
    pub debug: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            timezone_offset: local_timezone_offset(),
            ..Self::base()
        }
    }
}

/// Local zone offset in the clock's convention: UTC minus local, in milliseconds
pub fn local_timezone_offset() -> i64 {
    let local_minus_utc = chrono::Local::now().offset().local_minus_utc() as i64;
    -local_minus_utc * 1000
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { fallback }
}

impl ClockConfig {
    /// Copy of this config that is safe to hand to the renderer.
    ///
    /// Counts are clamped into `1..=MAX`, non-finite numbers are replaced by
    /// their defaults and the origin is pulled back onto the canvas.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::base();
        let mut out = self.clone();

        out.repetitions = self.repetitions.clamp(1, MAX_REPETITIONS);
        out.connections = self.connections.clamp(1, MAX_CONNECTIONS);
        if out.repetitions != self.repetitions || out.connections != self.connections {
            log::debug!(
                "Clamped repetitions {} -> {}, connections {} -> {}",
                self.repetitions, out.repetitions, self.connections, out.connections
            );
        }

        out.hand_length = positive_or(self.hand_length, defaults.hand_length);
        out.hand_width = positive_or(self.hand_width, defaults.hand_width);
        out.speed = finite_or(self.speed, defaults.speed);
        out.phase = finite_or(self.phase, defaults.phase);
        out.origin.left = finite_or(self.origin.left, defaults.origin.left).clamp(0.0, 1.0);
        out.origin.top = finite_or(self.origin.top, defaults.origin.top).clamp(0.0, 1.0);
        out.reference_size.width =
            positive_or(self.reference_size.width, defaults.reference_size.width);
        out.reference_size.height =
            positive_or(self.reference_size.height, defaults.reference_size.height);
        out.color.shift.repetitions =
            finite_or(self.color.shift.repetitions, defaults.color.shift.repetitions);
        out.color.shift.connections =
            finite_or(self.color.shift.connections, defaults.color.shift.connections);
        out
    }

    // Defaults without the local zone lookup
    fn base() -> Self {
        Self {
            hand_length: 80.0,
            hand_width: 2.5,
            repetitions: 40,
            connections: 8,
            mode: Mode::Normal,
            alpha_falloff: AlphaFalloff::Accumulate,
            speed: 1.0,
            phase: 0.0,
            time_shift: 0,
            timezone_offset: 0,
            origin: Origin::default(),
            reference_size: ReferenceSize::default(),
            color: ColorConfig::default(),
            show_time: false,
            debug: false,
        }
    }
}
