//! Device control and status types
//!
//! Boot / reset sequencing, bus interface options, pin configuration and the
//! aggregated device status.

/// Initialization action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Init {
    /// Reload trimming parameters from non-volatile memory
    Boot,
    /// Software reset of the user registers
    Reset,
    /// Enable block data update and register address auto-increment
    ///
    /// Multi-byte operations of this driver rely on auto-increment.
    DriverReady,
}

/// Anti-spike filter on the I3C / I2C lines
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AntiSpikeFilter {
    /// Enabled only in I2C mode
    #[default]
    Auto = 0,
    /// Always enabled
    AlwaysOn = 1,
}

impl AntiSpikeFilter {
    /// Decode the `ASF_ON` bit
    #[must_use]
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Self::AlwaysOn
        } else {
            Self::Auto
        }
    }
}

/// I3C bus available time for in-band interrupts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusAvailableTime {
    /// 50 µs
    #[default]
    Us50 = 0,
    /// 2 µs
    Us2 = 1,
    /// 1 ms
    Ms1 = 2,
    /// 25 ms
    Ms25 = 3,
}

impl BusAvailableTime {
    /// Decode the `I3C_BUS_AVB_SEL` field
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            1 => Self::Us2,
            2 => Self::Ms1,
            3 => Self::Ms25,
            _ => Self::Us50,
        }
    }
}

/// Bus interface configuration (`I3C_IF_CTRL`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Anti-spike filter
    pub filter: AntiSpikeFilter,
    /// Bus available time
    pub bus_avb_time: BusAvailableTime,
}

/// Electrical pin configuration (`IF_CTRL`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// Enable the SDA internal pull-up
    pub sda_pull_up: bool,
}

/// Device status, gathered from `CTRL_REG2`, `INT_SOURCE`, `STATUS` and `INTERRUPT_CFG`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct DeviceStatus {
    /// Software reset in progress
    pub sw_reset: bool,
    /// Boot phase running
    pub boot: bool,
    /// Pressure data ready
    pub drdy_pres: bool,
    /// Temperature data ready
    pub drdy_temp: bool,
    /// Pressure data overrun
    pub ovr_pres: bool,
    /// Temperature data overrun
    pub ovr_temp: bool,
    /// One-shot measurement finished (`ONESHOT` cleared)
    pub end_meas: bool,
    /// Reference capture finished (`AUTOZERO` cleared)
    pub ref_done: bool,
}

impl DeviceStatus {
    /// Returns `true` once reset and boot have both completed
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        !self.sw_reset && !self.boot
    }
}
