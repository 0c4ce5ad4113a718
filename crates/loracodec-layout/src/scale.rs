//! Reconstruction of quantized readings and coordinates.

/// Largest value of a 24-bit coordinate triple.
pub const COORDINATE_FULL_SCALE: f64 = 16_777_215.0;

/// Decimal digits kept for latitude and longitude (about 1.1 m).
pub const COORDINATE_DIGITS: i32 = 5;

/// Round half toward positive infinity, the rule the device backend fixtures use.
fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round `value` to `digits` decimal places.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    round_half_up(value * factor) / factor
}

/// Convert a quantized reading `x` of `precision` bits back onto `[min, max]`,
/// rounded to `round` decimal places.
///
/// A reconstructed value of zero maps to `min`. A value equal to the width of
/// the range (`max - min`, not `max`) maps to `max`.
pub fn get_num(x: f64, min: f64, max: f64, precision: u32, round: i32) -> f64 {
    let range = max - min;
    let scale = (2f64.powi(precision as i32) - 1.0) / range;
    let raw = x / scale;

    let value = if raw == 0.0 {
        min
    } else if raw == range {
        max
    } else {
        raw + min
    };

    round_to(value, round)
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// The no-fix sentinel.
    pub const NO_FIX: Coordinates = Coordinates { lat: 0.0, lon: 0.0 };

    /// Rescale raw 24-bit triples to degrees.
    ///
    /// Both raw values zero is the no-fix sentinel and stays `(0, 0)`.
    pub fn from_raw(lat_raw: u32, lon_raw: u32) -> Self {
        if lat_raw == 0 && lon_raw == 0 {
            return Self::NO_FIX;
        }

        let lat = f64::from(lat_raw) / COORDINATE_FULL_SCALE * 180.0 - 90.0;
        let lon = f64::from(lon_raw) / COORDINATE_FULL_SCALE * 360.0 - 180.0;

        Self {
            lat: round_to(lat, COORDINATE_DIGITS),
            lon: round_to(lon, COORDINATE_DIGITS),
        }
    }

    /// Whether this is an actual fix rather than the sentinel.
    pub fn is_fix(&self) -> bool {
        *self != Self::NO_FIX
    }
}
