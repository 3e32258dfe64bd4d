/// Upper bound of every HSB component in the clock's colour space
pub const COLOR_MAX: f64 = 255.0;

/// Add `amount` to `value`, wrapping once around `max` when the result leaves `[0, max]`.
///
/// Only a single correction is applied: an `amount` larger than `max` in
/// magnitude can still land outside the range. Hue steps are always small.
pub fn cycle(value: f64, amount: f64, max: f64) -> f64 {
    let v = value + amount;
    if v < 0.0 {
        v + max
    } else if v > max {
        v - max
    } else {
        v
    }
}

/// Subtract `amount` from `value`, saturating at zero
pub fn step_down(value: f64, amount: f64) -> f64 {
    let v = value - amount;
    if v < 0.0 {
        0.0
    } else {
        v
    }
}

/// Hue/saturation/brightness/alpha colour, components in `[0, max]` of the active colour space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsba {
    pub h: f64,
    pub s: f64,
    pub b: f64,
    pub a: f64,
}

impl Hsba {
    pub fn new(h: f64, s: f64, b: f64, a: f64) -> Self {
        Self { h, s, b, a }
    }

    /// Alpha as a unit fraction for a colour space with the given max
    pub fn opacity(&self, max: f64) -> f64 {
        (self.a / max).clamp(0.0, 1.0)
    }

    /// Convert to linear RGB in [0, 1]
    pub fn to_rgb(self, max: f64) -> (f64, f64, f64) {
        hsb_to_rgb(self.h / max, self.s / max, self.b / max)
    }
}

/// HSB to RGB, all inputs as unit fractions; hue wraps.
pub fn hsb_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = h6 as u32;
    let frac = h6 - sector as f64;

    let c = s * v;
    let x = if sector & 1 == 0 { c * frac } else { c * (1.0 - frac) };
    let m = v - c;

    let (r, g, b) = match sector {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    (r + m, g + m, b + m)
}

/// Perceived brightness of a linear RGB triple
pub fn luminance((r, g, b): (f64, f64, f64)) -> f64 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}
