//! Sample decoding utilities.
//!
//! The device reports each axis as a left-justified two's complement value
//! split across a low and a high register. The low nibble of the low byte is
//! always zero padding, so the assembled `i16` already spans the full signed
//! range and is scaled without any shift.

use crate::params::FullScale;

/// Number of consecutive bytes spanning the X, Y and Z samples.
pub const RAW_SAMPLE_BYTES: usize = 6;

/// Acceleration along each axis in units of standard gravity (g).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Acceleration {
    /// X-axis acceleration in g.
    pub x: f32,
    /// Y-axis acceleration in g.
    pub y: f32,
    /// Z-axis acceleration in g.
    pub z: f32,
}

#[inline]
fn unpack_axis(low: u8, high: u8) -> i16 {
    i16::from_le_bytes([low, high])
}

/// Assembles the raw burst starting at `OUT_X_L` into signed X, Y, Z samples.
pub fn decode_raw(raw: &[u8; RAW_SAMPLE_BYTES]) -> [i16; 3] {
    [
        unpack_axis(raw[0], raw[1]),
        unpack_axis(raw[2], raw[3]),
        unpack_axis(raw[4], raw[5]),
    ]
}

/// Linearly maps `value` from `input` to `output`.
///
/// Either range may be given in descending order; both are normalised before
/// mapping and `value` is clamped to the input range.
pub fn map_range(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let (in_min, in_max) = (input.0.min(input.1), input.0.max(input.1));
    let (out_min, out_max) = (output.0.min(output.1), output.0.max(output.1));

    let shifted = value.clamp(in_min, in_max) - in_min;
    let ratio = (out_max - out_min) / (in_max - in_min);
    shifted * ratio + out_min
}

/// Converts a single signed sample to g for the given full-scale setting.
pub fn scale_axis(sample: i16, full_scale: FullScale) -> f32 {
    let limit = full_scale.output_limit();
    map_range(
        f32::from(sample),
        (f32::from(i16::MAX), f32::from(i16::MIN)),
        (limit, -limit),
    )
}

/// Decodes a raw six-byte burst into physical units.
pub fn decode(raw: &[u8; RAW_SAMPLE_BYTES], full_scale: FullScale) -> Acceleration {
    let [x, y, z] = decode_raw(raw);
    Acceleration {
        x: scale_axis(x, full_scale),
        y: scale_axis(y, full_scale),
        z: scale_axis(z, full_scale),
    }
}
