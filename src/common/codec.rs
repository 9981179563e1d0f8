// src/common/codec.rs

//! Conversions between typed property values and the register byte layout.
//!
//! Register words are little-endian. Some boolean properties live on the
//! device as 32-bit integers; [`Encoding::BoolWord`] covers those: `false`
//! is written as 0, `true` as 1, and any nonzero word reads back as `true`.
//!
//! Nothing in here fails. Short input is zero-extended, which only happens
//! if a caller hands in a slice narrower than [`Encoding::width`].

use arrayvec::ArrayVec;

/// Largest scalar register payload (a 64-bit word).
pub const MAX_SCALAR_WIDTH: usize = 8;

/// Encoded scalar register payload.
pub type RegisterBytes = ArrayVec<u8, MAX_SCALAR_WIDTH>;

/// On-device layout of a scalar property.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Encoding {
    /// Boolean stored as a 32-bit integer word.
    BoolWord,
    Int32,
    UInt64,
    Float32,
    /// IEEE 754 binary16.
    Float16,
}

impl Encoding {
    /// Number of register bytes this encoding occupies.
    pub const fn width(&self) -> usize {
        match self {
            Encoding::BoolWord | Encoding::Int32 | Encoding::Float32 => 4,
            Encoding::UInt64 => 8,
            Encoding::Float16 => 2,
        }
    }
}

/// Width of floating-point values in the sensor's output stream.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FloatWidth {
    Single,
    Half,
}

impl FloatWidth {
    pub const fn size_in_bytes(&self) -> usize {
        match self {
            FloatWidth::Single => 4,
            FloatWidth::Half => 2,
        }
    }
}

/// A decoded scalar property value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    Int32(i32),
    UInt64(u64),
    Float(f32),
}

impl ScalarValue {
    pub fn as_bool(&self) -> bool {
        match *self {
            ScalarValue::Bool(b) => b,
            ScalarValue::Int32(v) => v != 0,
            ScalarValue::UInt64(v) => v != 0,
            ScalarValue::Float(v) => v != 0.0,
        }
    }

    pub fn as_i32(&self) -> i32 {
        match *self {
            ScalarValue::Bool(b) => b as i32,
            ScalarValue::Int32(v) => v,
            ScalarValue::UInt64(v) => v as i32,
            ScalarValue::Float(v) => v as i32,
        }
    }

    pub fn as_u64(&self) -> u64 {
        match *self {
            ScalarValue::Bool(b) => b as u64,
            ScalarValue::Int32(v) => v as u64,
            ScalarValue::UInt64(v) => v,
            ScalarValue::Float(v) => v as u64,
        }
    }

    pub fn as_f32(&self) -> f32 {
        match *self {
            ScalarValue::Bool(b) => b as u8 as f32,
            ScalarValue::Int32(v) => v as f32,
            ScalarValue::UInt64(v) => v as f32,
            ScalarValue::Float(v) => v,
        }
    }
}

// --- Scalar encode/decode ---

/// Encodes `value` into the register layout described by `encoding`.
pub fn encode_scalar(encoding: Encoding, value: ScalarValue) -> RegisterBytes {
    let mut out = RegisterBytes::new();
    match encoding {
        Encoding::BoolWord => out.extend(encode_bool_word(value.as_bool())),
        Encoding::Int32 => out.extend(value.as_i32().to_le_bytes()),
        Encoding::UInt64 => out.extend(value.as_u64().to_le_bytes()),
        Encoding::Float32 => out.extend(value.as_f32().to_le_bytes()),
        Encoding::Float16 => out.extend(f32_to_f16(value.as_f32()).to_le_bytes()),
    }
    out
}

/// Decodes the register bytes in `raw` according to `encoding`.
pub fn decode_scalar(encoding: Encoding, raw: &[u8]) -> ScalarValue {
    match encoding {
        Encoding::BoolWord => ScalarValue::Bool(decode_bool_word(raw)),
        Encoding::Int32 => ScalarValue::Int32(i32::from_le_bytes(take(raw))),
        Encoding::UInt64 => ScalarValue::UInt64(u64::from_le_bytes(take(raw))),
        Encoding::Float32 => ScalarValue::Float(f32::from_le_bytes(take(raw))),
        Encoding::Float16 => ScalarValue::Float(f16_to_f32(u16::from_le_bytes(take(raw)))),
    }
}

/// `false` -> 0, `true` -> 1, as a little-endian 32-bit word.
#[inline]
pub fn encode_bool_word(value: bool) -> [u8; 4] {
    (value as u32).to_le_bytes()
}

/// Any nonzero word decodes to `true`.
#[inline]
pub fn decode_bool_word(raw: &[u8]) -> bool {
    u32::from_le_bytes(take(raw)) != 0
}

/// Decodes one float of the given width, or `None` if `raw` is too short.
pub fn decode_float(raw: &[u8], width: FloatWidth) -> Option<f32> {
    if raw.len() < width.size_in_bytes() {
        return None;
    }
    Some(match width {
        FloatWidth::Single => f32::from_le_bytes(take(raw)),
        FloatWidth::Half => f16_to_f32(u16::from_le_bytes(take(raw))),
    })
}

/// Writes `values` as little-endian words into `out`, returning bytes written.
/// `out` must hold at least `values.len() * 4` bytes; extra values are dropped.
pub fn encode_i32_array(values: &[i32], out: &mut [u8]) -> usize {
    let mut written = 0;
    for (value, chunk) in values.iter().zip(out.chunks_exact_mut(4)) {
        chunk.copy_from_slice(&value.to_le_bytes());
        written += 4;
    }
    written
}

fn take<const N: usize>(raw: &[u8]) -> [u8; N] {
    let mut word = [0u8; N];
    let n = raw.len().min(N);
    word[..n].copy_from_slice(&raw[..n]);
    word
}

// --- binary16 ---

/// Converts a binary16 bit pattern to `f32`. Exact for every input.
pub fn f16_to_f32(half: u16) -> f32 {
    let sign = ((half as u32) & 0x8000) << 16;
    let exp = ((half >> 10) & 0x1f) as u32;
    let mant = (half & 0x03ff) as u32;

    match exp {
        0 if mant == 0 => f32::from_bits(sign),
        0 => {
            // subnormal: mant * 2^-24
            let magnitude = mant as f32 * (1.0 / 16_777_216.0);
            if sign != 0 { -magnitude } else { magnitude }
        }
        0x1f => f32::from_bits(sign | 0x7f80_0000 | (mant << 13)),
        _ => f32::from_bits(sign | ((exp + 112) << 23) | (mant << 13)),
    }
}

/// Converts `f32` to binary16 with round-to-nearest-even.
/// Out-of-range magnitudes saturate to infinity.
pub fn f32_to_f16(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exp = ((bits >> 23) & 0xff) as i32;
    let mant = bits & 0x007f_ffff;

    if exp == 0xff {
        return if mant == 0 { sign | 0x7c00 } else { sign | 0x7e00 };
    }

    let e = exp - 127 + 15;
    if e >= 0x1f {
        return sign | 0x7c00;
    }

    if e <= 0 {
        if e < -10 {
            return sign;
        }
        let full = mant | 0x0080_0000;
        let shift = (14 - e) as u32;
        let half = full >> shift;
        let rem = full & ((1 << shift) - 1);
        let halfway = 1 << (shift - 1);
        let rounded = if rem > halfway || (rem == halfway && half & 1 == 1) { half + 1 } else { half };
        return sign | rounded as u16;
    }

    let half = ((e as u32) << 10) | (mant >> 13);
    let rem = mant & 0x1fff;
    let rounded = if rem > 0x1000 || (rem == 0x1000 && half & 1 == 1) { half + 1 } else { half };
    sign | rounded as u16
}
