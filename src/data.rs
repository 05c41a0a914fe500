//! Output sample types and decoding
//!
//! The pressure output (and each FIFO slot) is a 24-bit two's complement word.
//! It is stored left-aligned in an `i32` (`raw = code << 8`) so that sign extension
//! falls out of ordinary 32-bit arithmetic.
//!
//! With interleaved mode active the same output carries both pressure and QVAR
//! samples. Bit 0 of the lowest byte tags the sample:
//! - `0`: pressure, converted with the active full-scale range
//! - `1`: QVAR, `raw / 256` is the right-aligned QVAR code

use crate::conversion::{from_lsb_to_celsius, from_lsb_to_mv};
use crate::mode::Md;

/// Kind of a decoded primary-channel sample
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleKind {
    /// Pressure sample
    #[default]
    Pressure,
    /// QVAR sample (interleaved mode only)
    Qvar,
}

/// Pressure channel of a [`Data`] sample
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pressure {
    /// Pressure in hPa (0.0 for a QVAR sample)
    pub hpa: f32,
    /// Left-aligned raw code
    pub raw: i32,
}

/// QVAR channel of a [`Data`] sample
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Qvar {
    /// QVAR voltage in mV (0.0 for a pressure sample)
    pub mv: f32,
    /// Right-aligned QVAR code (0 for a pressure sample)
    pub lsb: i32,
}

/// Temperature channel of a [`Data`] sample
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Heat {
    /// Temperature in degrees Celsius
    pub deg_c: f32,
    /// Raw code (0.01 degC/LSB)
    pub raw: i16,
}

/// One converted output sample
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Data {
    /// Pressure channel
    pub pressure: Pressure,
    /// QVAR channel
    pub qvar: Qvar,
    /// Temperature channel
    pub heat: Heat,
}

impl Data {
    /// Decode `PRESS_OUT_XL` .. `TEMP_OUT_H` (5 bytes)
    #[must_use]
    pub fn from_bytes(buf: &[u8; 5], md: &Md) -> Self {
        let primary = decode_primary([buf[0], buf[1], buf[2]], md);
        let heat_raw = i16::from_le_bytes([buf[3], buf[4]]);

        Self {
            pressure: Pressure {
                hpa: primary.hpa,
                raw: primary.raw,
            },
            qvar: Qvar {
                mv: primary.qvar_mv,
                lsb: primary.qvar_lsb,
            },
            heat: Heat {
                deg_c: from_lsb_to_celsius(heat_raw),
                raw: heat_raw,
            },
        }
    }

    /// Returns the kind of the primary-channel sample
    #[must_use]
    pub fn kind(&self, md: &Md) -> SampleKind {
        sample_kind(self.pressure.raw, md)
    }
}

/// One converted FIFO slot
///
/// The FIFO stores only the primary channel, never temperature.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoSample {
    /// Left-aligned raw code
    pub raw: i32,
    /// Pressure in hPa (0.0 for a QVAR sample)
    pub hpa: f32,
    /// Right-aligned QVAR code (0 for a pressure sample)
    pub qvar_lsb: i32,
    /// QVAR voltage in mV (0.0 for a pressure sample)
    pub qvar_mv: f32,
    /// Sample tag
    pub kind: SampleKind,
}

impl FifoSample {
    /// Decode one `FIFO_DATA_OUT_PRESS` slot (3 bytes)
    #[must_use]
    pub fn from_bytes(buf: &[u8; 3], md: &Md) -> Self {
        decode_primary(*buf, md)
    }
}

/// QVAR reading from the pressure output registers
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QvarData {
    /// Left-aligned raw code
    pub raw: i32,
    /// Right-aligned QVAR code
    pub lsb: i32,
    /// QVAR voltage in mV
    pub mv: f32,
}

impl QvarData {
    /// Decode `PRESS_OUT_XL` .. `PRESS_OUT_H` as a QVAR reading
    #[must_use]
    pub fn from_bytes(buf: &[u8; 3]) -> Self {
        let raw = left_aligned(*buf);
        let lsb = raw / 256;
        Self {
            raw,
            lsb,
            mv: from_lsb_to_mv(lsb),
        }
    }
}

/// Assemble a 24-bit little-endian code into the upper bits of an `i32`
#[must_use]
pub const fn left_aligned(buf: [u8; 3]) -> i32 {
    i32::from_le_bytes([0, buf[0], buf[1], buf[2]])
}

fn sample_kind(raw: i32, md: &Md) -> SampleKind {
    // Tag bit is bit 0 of the lowest output byte, bit 8 once left-aligned
    if md.interleaved_mode && raw & 0x100 != 0 {
        SampleKind::Qvar
    } else {
        SampleKind::Pressure
    }
}

fn decode_primary(buf: [u8; 3], md: &Md) -> FifoSample {
    let raw = left_aligned(buf);
    let kind = sample_kind(raw, md);

    match kind {
        SampleKind::Pressure => FifoSample {
            raw,
            hpa: md.fs.to_hpa(raw),
            qvar_lsb: 0,
            qvar_mv: 0.0,
            kind,
        },
        SampleKind::Qvar => {
            let lsb = raw / 256;
            FifoSample {
                raw,
                hpa: 0.0,
                qvar_lsb: lsb,
                qvar_mv: from_lsb_to_mv(lsb),
                kind,
            }
        }
    }
}
