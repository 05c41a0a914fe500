//! Operating mode types
//!
//! [`Md`] describes how the sensor samples: output data rate, averaging, low-pass
//! filter, full-scale range and whether pressure and QVAR are sampled interleaved.
//!
//! The driver keeps no copy of the active mode. Data decoding needs the full-scale
//! range and the interleaved flag, so callers keep the [`Md`] they last wrote (or
//! read back with `mode()`) and pass it to every read that converts samples.
//!
//! Every field decodes totally: register patterns outside a type's domain map to
//! that type's [`Default`] value.

/// Output data rate
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Odr {
    /// Power-down; conversions only on one-shot trigger
    #[default]
    OneShot = 0,
    /// 1 Hz
    Hz1 = 1,
    /// 4 Hz
    Hz4 = 2,
    /// 10 Hz
    Hz10 = 3,
    /// 25 Hz
    Hz25 = 4,
    /// 50 Hz
    Hz50 = 5,
    /// 75 Hz
    Hz75 = 6,
    /// 100 Hz
    Hz100 = 7,
    /// 200 Hz
    Hz200 = 8,
}

impl Odr {
    /// Decode the `CTRL_REG1.ODR` field
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits {
            1 => Self::Hz1,
            2 => Self::Hz4,
            3 => Self::Hz10,
            4 => Self::Hz25,
            5 => Self::Hz50,
            6 => Self::Hz75,
            7 => Self::Hz100,
            8 => Self::Hz200,
            _ => Self::OneShot,
        }
    }

    /// Register encoding
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Output data rate in Hz (0 for one-shot)
    #[must_use]
    pub const fn hz(self) -> u8 {
        match self {
            Self::OneShot => 0,
            Self::Hz1 => 1,
            Self::Hz4 => 4,
            Self::Hz10 => 10,
            Self::Hz25 => 25,
            Self::Hz50 => 50,
            Self::Hz75 => 75,
            Self::Hz100 => 100,
            Self::Hz200 => 200,
        }
    }
}

/// Number of internal samples averaged per output sample
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Avg {
    /// 4 samples
    #[default]
    Avg4 = 0,
    /// 8 samples
    Avg8 = 1,
    /// 16 samples
    Avg16 = 2,
    /// 32 samples
    Avg32 = 3,
    /// 64 samples
    Avg64 = 4,
    /// 128 samples
    Avg128 = 5,
    /// 256 samples
    Avg256 = 6,
    /// 512 samples
    Avg512 = 7,
}

impl Avg {
    /// Decode the `CTRL_REG1.AVG` field
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            1 => Self::Avg8,
            2 => Self::Avg16,
            3 => Self::Avg32,
            4 => Self::Avg64,
            5 => Self::Avg128,
            6 => Self::Avg256,
            7 => Self::Avg512,
            _ => Self::Avg4,
        }
    }

    /// Register encoding
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Number of averaged samples
    #[must_use]
    pub const fn samples(self) -> u16 {
        4 << (self as u16)
    }
}

/// Pressure full-scale range
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FullScale {
    /// 260 to 1260 hPa
    #[default]
    Hpa1260 = 0,
    /// 260 to 4060 hPa
    Hpa4060 = 1,
}

impl FullScale {
    /// Decode the `CTRL_REG2.FS_MODE` bit
    #[must_use]
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Self::Hpa4060
        } else {
            Self::Hpa1260
        }
    }

    /// Register encoding
    #[must_use]
    pub const fn bit(self) -> bool {
        matches!(self, Self::Hpa4060)
    }

    /// Convert a left-aligned raw pressure code to hPa for this range
    #[must_use]
    pub fn to_hpa(self, raw: i32) -> f32 {
        match self {
            Self::Hpa1260 => crate::conversion::from_fs1260_to_hpa(raw),
            Self::Hpa4060 => crate::conversion::from_fs4060_to_hpa(raw),
        }
    }
}

/// Pressure low-pass filter
///
/// Encoded as `EN_LPFP` (bit 0) and `LFPF_CFG` (bit 1).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LowPassFilter {
    /// Filter disabled
    #[default]
    Disabled = 0,
    /// Bandwidth ODR/4
    OdrDiv4 = 1,
    /// Bandwidth ODR/9
    OdrDiv9 = 3,
}

impl LowPassFilter {
    /// Decode from the `EN_LPFP` and `LFPF_CFG` bits
    #[must_use]
    pub const fn from_bits(en_lpfp: bool, lfpf_cfg: bool) -> Self {
        match ((lfpf_cfg as u8) << 1) | en_lpfp as u8 {
            1 => Self::OdrDiv4,
            3 => Self::OdrDiv9,
            _ => Self::Disabled,
        }
    }

    /// `EN_LPFP` bit
    #[must_use]
    pub const fn en_lpfp(self) -> bool {
        (self as u8) & 0x01 != 0
    }

    /// `LFPF_CFG` bit
    #[must_use]
    pub const fn lfpf_cfg(self) -> bool {
        (self as u8) & 0x02 != 0
    }
}

/// Mode descriptor
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Md {
    /// Output data rate
    pub odr: Odr,
    /// Averaging
    pub avg: Avg,
    /// Low-pass filter
    pub lpf: LowPassFilter,
    /// Full-scale range
    pub fs: FullScale,
    /// Interleaved pressure / QVAR sampling
    pub interleaved_mode: bool,
}

impl Md {
    /// Returns `true` if the rate selector is one-shot
    #[must_use]
    pub const fn is_one_shot(&self) -> bool {
        matches!(self.odr, Odr::OneShot)
    }
}

/// Step numbers of a mode change, as reported in
/// [`Error::PartiallyApplied`](crate::Error::PartiallyApplied)
///
/// Steps that are not needed (power-down when already stopped, QVAR disable
/// when QVAR is off) are skipped and keep their bit clear.
pub mod step {
    /// `CTRL_REG1` power-down
    pub const POWER_DOWN: u8 = 0;
    /// `CTRL_REG3` QVAR disable
    pub const QVAR_DISABLE: u8 = 1;
    /// `CTRL_REG3` interleave selection
    pub const INTERLEAVE_CTRL: u8 = 2;
    /// `FIFO_CTRL` interleave selection
    pub const INTERLEAVE_FIFO: u8 = 3;
    /// `CTRL_REG1`..`CTRL_REG3` final mode write
    pub const APPLY_MODE: u8 = 4;
}
