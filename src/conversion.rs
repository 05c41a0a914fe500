//! Raw code to physical unit conversion
//!
//! Pressure codes are left-aligned: the 24-bit output occupies the upper 24 bits of
//! an `i32`, so the divisors below include the extra factor of 256.

/// Pressure in hPa from a left-aligned code, 1260 hPa full scale
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn from_fs1260_to_hpa(lsb: i32) -> f32 {
    lsb as f32 / 1_048_576.0 // 4096 LSB/hPa * 256
}

/// Pressure in hPa from a left-aligned code, 4060 hPa full scale
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn from_fs4060_to_hpa(lsb: i32) -> f32 {
    lsb as f32 / 524_288.0 // 2048 LSB/hPa * 256
}

/// Temperature in degrees Celsius
#[must_use]
pub fn from_lsb_to_celsius(lsb: i16) -> f32 {
    f32::from(lsb) / 100.0
}

/// QVAR voltage in mV from a right-aligned 24-bit code
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn from_lsb_to_mv(lsb: i32) -> f32 {
    lsb as f32 / 426_000.0
}
