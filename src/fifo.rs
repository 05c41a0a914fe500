//! FIFO (First In First Out) buffer management
//!
//! The ILPS28QSW has a 128-slot FIFO that stores the primary output channel
//! (pressure, or interleaved pressure / QVAR). Temperature is never buffered.
//! Each read of `FIFO_DATA_OUT_PRESS` pops one slot.
//!
//! # Example
//!
//! ```ignore
//! # use ilps28qsw::{Ilps28qswDriver, Md, fifo::{FifoConfig, FifoOperation}};
//! # let mut sensor: Ilps28qswDriver<_> = todo!();
//! # let md = Md::default();
//! sensor.set_fifo_mode(&FifoConfig {
//!     operation: FifoOperation::Stream,
//!     watermark: 32,
//! })?;
//!
//! // Later, drain what is buffered
//! let level = sensor.fifo_level()?;
//! let mut samples = heapless::Vec::new();
//! sensor.fifo_read(level, &md, &mut samples)?;
//! # Ok::<(), ilps28qsw::Error<()>>(())
//! ```

/// FIFO operation mode
///
/// Encoded as `F_MODE` (bits 1:0) and `TRIG_MODES` (bit 2).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoOperation {
    /// FIFO disabled
    #[default]
    Bypass = 0,
    /// Stop collecting when full
    Fifo = 1,
    /// Continuous mode, oldest samples are overwritten
    Stream = 2,
    /// Bypass until trigger, then FIFO
    BypassToFifo = 5,
    /// Bypass until trigger, then stream
    BypassToStream = 6,
    /// Stream until trigger, then FIFO
    StreamToFifo = 7,
}

impl FifoOperation {
    /// Decode from the `TRIG_MODES` and `F_MODE` fields
    #[must_use]
    pub const fn from_bits(trig_modes: bool, f_mode: u8) -> Self {
        match ((trig_modes as u8) << 2) | (f_mode & 0x03) {
            1 => Self::Fifo,
            2 => Self::Stream,
            5 => Self::BypassToFifo,
            6 => Self::BypassToStream,
            7 => Self::StreamToFifo,
            _ => Self::Bypass,
        }
    }

    /// `F_MODE` field
    #[must_use]
    pub const fn f_mode(self) -> u8 {
        (self as u8) & 0x03
    }

    /// `TRIG_MODES` bit
    #[must_use]
    pub const fn trig_modes(self) -> bool {
        (self as u8) & 0x04 != 0
    }
}

/// FIFO configuration
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoConfig {
    /// Operation mode
    pub operation: FifoOperation,
    /// Watermark level (0-127)
    ///
    /// A non-zero watermark also enables stop-on-watermark; 0 disables it.
    pub watermark: u8,
}

impl FifoConfig {
    /// Returns `true` if this configuration enables stop-on-watermark
    #[must_use]
    pub const fn stop_on_watermark(&self) -> bool {
        self.watermark != 0
    }

    /// Returns `true` if the watermark fits the 7-bit `FIFO_WTM` field
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.watermark <= crate::MAX_WATERMARK
    }
}
