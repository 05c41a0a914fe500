#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod conversion;
pub mod device;
pub mod interface;
pub mod registers;

pub mod control;
pub mod data;
pub mod fifo;
pub mod interrupt;
pub mod mode;
mod sequence;

// Re-export main types
pub use control::{
    AntiSpikeFilter, BusAvailableTime, BusConfig, DeviceStatus, Init, PinConfig,
};
pub use conversion::{
    from_fs1260_to_hpa, from_fs4060_to_hpa, from_lsb_to_celsius, from_lsb_to_mv,
};
pub use data::{Data, FifoSample, Heat, Pressure, Qvar, QvarData, SampleKind};
pub use device::Ilps28qswDriver;
pub use fifo::{FifoConfig, FifoOperation};
pub use interface::{I2cInterface, SpiInterface};
pub use interrupt::{
    ApplyReference, InterruptMode, InterruptSources, ReferenceConfig, ThresholdConfig,
};
pub use mode::{Avg, FullScale, LowPassFilter, Md, Odr};

/// ILPS28QSW 7-bit I2C address (fixed: 0x5C)
///
/// Use [`I2cInterface::default()`] for this configuration.
pub const I2C_ADDRESS: u8 = 0x5C;

/// Expected value of `WHO_AM_I` register
pub const WHO_AM_I_VALUE: u8 = 0xB4;

/// FIFO depth in samples
pub const FIFO_DEPTH: usize = 128;

/// Highest programmable FIFO watermark
pub const MAX_WATERMARK: u8 = 127;

/// Highest programmable pressure threshold (15 bits, `THS_P_H` bit 7 is reserved)
pub const MAX_THRESHOLD: u16 = 0x7FFF;

/// Driver errors
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// Invalid `WHO_AM_I` register value (contains the actual value read)
    InvalidDevice(u8),
    /// Invalid configuration parameter
    InvalidConfig,
    /// Initialization timed out (software reset never completed)
    InitializationTimeout,
    /// One or more bus transfers of a multi-step operation failed
    ///
    /// The remaining steps were still attempted. After
    /// [`set_mode`](Ilps28qswDriver::set_mode) the device configuration may be
    /// partially applied; re-read it before relying on it. After
    /// [`fifo_read`](Ilps28qswDriver::fifo_read) the samples that were read are
    /// kept in the output buffer.
    PartiallyApplied {
        /// Bitmask of the failed steps, bit N = step N
        ///
        /// Step numbers are fixed per operation: see [`mode::step`] for
        /// `set_mode`; for `fifo_read` step N is sample slot N.
        failed_steps: u128,
        /// Number of steps attempted
        attempted_steps: u8,
        /// Error reported by the first failing step
        source: E,
    },
}

impl<E> Error<E> {
    /// Returns `true` if the device may have been left partially configured
    pub const fn is_partial(&self) -> bool {
        matches!(self, Self::PartiallyApplied { .. })
    }
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
