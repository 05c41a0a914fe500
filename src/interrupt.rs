//! Interrupt, threshold and reference pressure configuration
//!
//! The ILPS28QSW raises a pressure event when the (optionally referenced) pressure
//! crosses a programmable threshold. Events are reported in `INT_SOURCE` and can be
//! latched until read.
//!
//! The threshold is an unsigned 15-bit value split over `THS_P_L` and `THS_P_H`.
//! It is written in the same 3-byte burst as `INTERRUPT_CFG`.

/// Interrupt request behaviour
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptMode {
    /// Latch events into `INT_SOURCE` until it is read
    pub latched: bool,
}

/// Pressure threshold interrupt configuration
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThresholdConfig {
    /// Event on pressure above the threshold
    pub over_threshold: bool,
    /// Event on pressure below the threshold
    pub under_threshold: bool,
    /// Threshold (0-32767, 16 LSB/hPa at 1260 hPa full scale)
    pub threshold: u16,
}

impl ThresholdConfig {
    /// Split the threshold into `(THS_P_L, THS_P_H)`
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn threshold_bytes(&self) -> (u8, u8) {
        let high = self.threshold / 256;
        let low = self.threshold - high * 256;
        (low as u8, high as u8)
    }

    /// Join `THS_P_L` and `THS_P_H` into a threshold
    #[must_use]
    pub const fn threshold_from_bytes(low: u8, high: u8) -> u16 {
        (high as u16) * 256 + low as u16
    }

    /// Returns `true` if the threshold fits the 15-bit register pair
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.threshold <= crate::MAX_THRESHOLD
    }
}

/// How the captured reference pressure is applied
///
/// Encoded as `AUTOREFP` (bit 0) and `RESET_AZ` / `RESET_ARP` (bit 1).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApplyReference {
    /// Output and threshold both use `P - REF_P` (AUTOZERO)
    OutputAndInterrupt = 0,
    /// Only the threshold comparison uses the reference (AUTOREFP)
    InterruptOnly = 1,
    /// Reset both reference functions
    #[default]
    ResetReferences = 2,
}

impl ApplyReference {
    /// Decode from the `RESET_AZ` and `AUTOREFP` bits
    #[must_use]
    pub const fn from_bits(reset_az: bool, autorefp: bool) -> Self {
        match ((reset_az as u8) << 1) | autorefp as u8 {
            0 => Self::OutputAndInterrupt,
            1 => Self::InterruptOnly,
            _ => Self::ResetReferences,
        }
    }

    /// `AUTOREFP` bit
    #[must_use]
    pub const fn autorefp(self) -> bool {
        (self as u8) & 0x01 != 0
    }

    /// `RESET_AZ` / `RESET_ARP` bit
    #[must_use]
    pub const fn reset(self) -> bool {
        (self as u8) & 0x02 != 0
    }
}

/// Reference pressure configuration
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReferenceConfig {
    /// Capture the current pressure as reference (`AUTOZERO`)
    pub get_ref: bool,
    /// How the reference is applied
    pub apply_ref: ApplyReference,
}

/// All event flags, gathered from `STATUS`, `INT_SOURCE` and `FIFO_STATUS2`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct InterruptSources {
    /// Pressure data ready
    pub drdy_pres: bool,
    /// Temperature data ready
    pub drdy_temp: bool,
    /// Pressure over threshold
    pub over_pres: bool,
    /// Pressure under threshold
    pub under_pres: bool,
    /// Threshold interrupt active
    pub threshold_pres: bool,
    /// FIFO full
    pub fifo_full: bool,
    /// FIFO overrun
    pub fifo_overrun: bool,
    /// FIFO watermark reached
    pub fifo_watermark: bool,
}

impl InterruptSources {
    /// Check if any flag is set
    pub const fn any_set(&self) -> bool {
        self.drdy_pres
            || self.drdy_temp
            || self.over_pres
            || self.under_pres
            || self.threshold_pres
            || self.fifo_full
            || self.fifo_overrun
            || self.fifo_watermark
    }
}
