//! High-level driver API for the ILPS28QSW
//!
//! This module provides the register-level operations of the sensor: identity and
//! reset sequencing, operating mode management, data acquisition (single sample and
//! FIFO batch), and interrupt / reference / offset configuration.
//!
//! The driver holds no configuration state besides the bus interface. Operations
//! that convert raw codes take the active [`Md`] from the caller.

use crate::control::{
    AntiSpikeFilter, BusAvailableTime, BusConfig, DeviceStatus, Init, PinConfig,
};
use crate::data::{left_aligned, Data, FifoSample, QvarData};
use crate::fifo::{FifoConfig, FifoOperation};
use crate::interrupt::{
    ApplyReference, InterruptMode, InterruptSources, ReferenceConfig, ThresholdConfig,
};
use crate::mode::{step, Avg, FullScale, LowPassFilter, Md, Odr};
use crate::registers::{
    Ilps28qsw as RegisterDevice, FIFO_DATA_OUT_PRESS_XL, PRESS_OUT_XL, REF_P_L, RPDS_L,
    TEMP_OUT_L,
};
use crate::sequence::Steps;
use crate::{Error, FIFO_DEPTH, WHO_AM_I_VALUE};

// Only import RegisterInterface when not using async feature
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

/// Software reset poll budget
const RESET_MAX_WAIT_MS: u32 = 50;
/// Software reset poll interval
const RESET_POLL_INTERVAL_MS: u32 = 1;

/// Main driver for the ILPS28QSW
pub struct Ilps28qswDriver<I> {
    device: RegisterDevice<I>,
}

impl<I> Ilps28qswDriver<I> {
    /// Consume the driver and return the interface
    pub fn release(self) -> I {
        self.device.interface
    }

    /// Get a reference to the underlying register device (for advanced usage)
    pub const fn device(&self) -> &RegisterDevice<I> {
        &self.device
    }
}

#[cfg(not(feature = "async"))]
impl<I> Ilps28qswDriver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a new ILPS28QSW driver instance
    ///
    /// This will verify the `WHO_AM_I` register but will not initialize the device.
    /// Call `init()` after construction to configure the device.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The `WHO_AM_I` register contains an unexpected value
    pub fn new(interface: I) -> Result<Self, Error<I::Error>> {
        let mut driver = Self {
            device: RegisterDevice::new(interface),
        };

        let who_am_i = driver.read_who_am_i()?;
        if who_am_i != WHO_AM_I_VALUE {
            return Err(Error::InvalidDevice(who_am_i));
        }

        Ok(driver)
    }

    /// Initialize the device
    ///
    /// Issues a software reset, waits for it to complete, then enables block data
    /// update and register address auto-increment ([`Init::DriverReady`]).
    ///
    /// # Arguments
    ///
    /// * `delay` - Delay provider implementing `embedded_hal::delay::DelayNs`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails, including while
    /// polling for reset completion, or [`Error::InitializationTimeout`] if the
    /// reset bit never clears.
    pub fn init<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        self.set_init(Init::Reset)?;

        let mut reset_done = false;
        for _ in 0..(RESET_MAX_WAIT_MS / RESET_POLL_INTERVAL_MS) {
            delay.delay_ms(RESET_POLL_INTERVAL_MS);
            if !self.device.ctrl_reg_2().read()?.swreset() {
                reset_done = true;
                break;
            }
        }

        if !reset_done {
            #[cfg(feature = "defmt")]
            defmt::warn!("Software reset did not complete within {} ms", RESET_MAX_WAIT_MS);
            return Err(Error::InitializationTimeout);
        }

        self.set_init(Init::DriverReady)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("ILPS28QSW initialized");

        Ok(())
    }

    /// Read the `WHO_AM_I` register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_who_am_i(&mut self) -> Result<u8, Error<I::Error>> {
        let reg = self.device.who_am_i().read()?;
        Ok(reg.who_am_i())
    }

    /// Boot, reset, or mark the driver ready
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_init(&mut self, init: Init) -> Result<(), Error<I::Error>> {
        match init {
            Init::Boot => self.device.ctrl_reg_2().modify(|w| w.set_boot(true))?,
            Init::Reset => self.device.ctrl_reg_2().modify(|w| w.set_swreset(true))?,
            // CTRL_REG2 and CTRL_REG3 in one burst
            Init::DriverReady => self.device.init_block().modify(|w| {
                w.set_bdu(true);
                w.set_if_add_inc(true);
            })?,
        }
        Ok(())
    }

    /// Read the device status
    ///
    /// Reads `CTRL_REG2`, `INT_SOURCE`, `STATUS` and `INTERRUPT_CFG`, stopping at
    /// the first failing read.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn status(&mut self) -> Result<DeviceStatus, Error<I::Error>> {
        let ctrl_reg_2 = self.device.ctrl_reg_2().read()?;
        let int_source = self.device.int_source().read()?;
        let status = self.device.status().read()?;
        let interrupt_cfg = self.device.interrupt_cfg().read()?;

        Ok(DeviceStatus {
            sw_reset: ctrl_reg_2.swreset(),
            boot: int_source.boot_on(),
            drdy_pres: status.p_da(),
            drdy_temp: status.t_da(),
            ovr_pres: status.p_or(),
            ovr_temp: status.t_or(),
            end_meas: !ctrl_reg_2.oneshot(),
            ref_done: !interrupt_cfg.autozero(),
        })
    }

    /// Configure the bus interface (`I3C_IF_CTRL`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_bus_config(&mut self, config: &BusConfig) -> Result<(), Error<I::Error>> {
        self.device.bus_if_ctrl().modify(|w| {
            w.set_asf_on(matches!(config.filter, AntiSpikeFilter::AlwaysOn));
            w.set_bus_avb_sel(config.bus_avb_time as u8);
        })?;
        Ok(())
    }

    /// Read the bus interface configuration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn bus_config(&mut self) -> Result<BusConfig, Error<I::Error>> {
        let reg = self.device.bus_if_ctrl().read()?;
        Ok(BusConfig {
            filter: AntiSpikeFilter::from_bit(reg.asf_on()),
            bus_avb_time: BusAvailableTime::from_bits(reg.bus_avb_sel()),
        })
    }

    /// Configure the electrical pin settings (`IF_CTRL`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_pin_config(&mut self, config: &PinConfig) -> Result<(), Error<I::Error>> {
        self.device
            .if_ctrl()
            .modify(|w| w.set_sda_pu_en(config.sda_pull_up))?;
        Ok(())
    }

    /// Read the electrical pin settings
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn pin_config(&mut self) -> Result<PinConfig, Error<I::Error>> {
        let reg = self.device.if_ctrl().read()?;
        Ok(PinConfig {
            sda_pull_up: reg.sda_pu_en(),
        })
    }

    /// Read all event flags
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn interrupt_sources(&mut self) -> Result<InterruptSources, Error<I::Error>> {
        let status = self.device.status().read()?;
        let int_source = self.device.int_source().read()?;
        let fifo_status = self.device.fifo_status_2().read()?;

        Ok(InterruptSources {
            drdy_pres: status.p_da(),
            drdy_temp: status.t_da(),
            over_pres: int_source.ph(),
            under_pres: int_source.pl(),
            threshold_pres: int_source.ia(),
            fifo_full: fifo_status.fifo_full_ia(),
            fifo_overrun: fifo_status.fifo_ovr_ia(),
            fifo_watermark: fifo_status.fifo_wtm_ia(),
        })
    }

    // ==================== Operating mode ====================

    /// Apply an operating mode
    ///
    /// The interleave selection must not change while the sensor is converting, so
    /// the update is a fixed sequence:
    /// 1. one burst read of `CTRL_REG1`..`CTRL_REG3`
    /// 2. power-down (`ODR = 0`) if the sensor is running
    /// 3. QVAR disable if QVAR is enabled
    /// 4. interleave selection into `CTRL_REG3`, then into `FIFO_CTRL`
    /// 5. one burst write of `CTRL_REG1`..`CTRL_REG3` with the requested rate,
    ///    averaging, filter and full scale, and the previous QVAR enable
    ///
    /// Steps 2 to 5 are all attempted even if one of them fails. The
    /// intermediate writes carry the reserved bits of the initial read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the initial read fails (nothing is written), or
    /// [`Error::PartiallyApplied`] if any later step fails, with failed steps
    /// numbered as in [`crate::mode::step`]. In the latter case the mode may be
    /// partially applied; read it back with [`Self::mode`].
    pub fn set_mode(&mut self, md: &Md) -> Result<(), Error<I::Error>> {
        let mut block = self.device.mode_block().read()?;
        let mut steps = Steps::new();
        let qvar_enabled = block.ah_qvar_en();

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "set_mode: odr {} -> {}, interleaved {} -> {}",
            block.odr(),
            md.odr.bits(),
            block.ah_qvar_p_auto_en(),
            md.interleaved_mode
        );

        if block.odr() != 0 {
            block.set_odr(0);
            steps.record(
                step::POWER_DOWN,
                self.device.ctrl_reg_1().write(|w| {
                    w.set_avg(block.avg());
                    w.set_odr(0);
                    w.set_odr_reserved(block.odr_reserved());
                }),
            );
        }

        if qvar_enabled {
            block.set_ah_qvar_en(false);
            steps.record(
                step::QVAR_DISABLE,
                self.device.ctrl_reg_3().write(|w| {
                    w.set_if_add_inc(block.if_add_inc());
                    w.set_inc_reserved(block.inc_reserved());
                    w.set_ah_qvar_p_auto_en(block.ah_qvar_p_auto_en());
                    w.set_qvar_reserved(block.qvar_reserved());
                    w.set_ah_qvar_en(block.ah_qvar_en());
                }),
            );
        }

        block.set_ah_qvar_p_auto_en(md.interleaved_mode);
        steps.record(
            step::INTERLEAVE_CTRL,
            self.device.ctrl_reg_3().write(|w| {
                w.set_if_add_inc(block.if_add_inc());
                w.set_inc_reserved(block.inc_reserved());
                w.set_ah_qvar_p_auto_en(block.ah_qvar_p_auto_en());
                w.set_qvar_reserved(block.qvar_reserved());
                w.set_ah_qvar_en(block.ah_qvar_en());
            }),
        );

        // Without a valid FIFO_CTRL read nothing is written back
        steps.record(
            step::INTERLEAVE_FIFO,
            self.device
                .fifo_ctrl()
                .modify(|w| w.set_ah_qvar_p_fifo_en(md.interleaved_mode)),
        );

        block.set_ah_qvar_en(qvar_enabled);
        block.set_odr(md.odr.bits());
        block.set_avg(md.avg.bits());
        block.set_en_lpfp(md.lpf.en_lpfp());
        block.set_lfpf_cfg(md.lpf.lfpf_cfg());
        block.set_fs_mode(md.fs.bit());
        steps.record(
            step::APPLY_MODE,
            self.device.mode_block().write(|w| *w = block),
        );

        steps.finish()
    }

    /// Read the operating mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn mode(&mut self) -> Result<Md, Error<I::Error>> {
        let block = self.device.mode_block().read()?;
        Ok(Md {
            odr: Odr::from_bits(block.odr()),
            avg: Avg::from_bits(block.avg()),
            lpf: LowPassFilter::from_bits(block.en_lpfp(), block.lfpf_cfg()),
            fs: FullScale::from_bit(block.fs_mode()),
            interleaved_mode: block.ah_qvar_p_auto_en(),
        })
    }

    /// Start a single conversion
    ///
    /// Does nothing unless `md.odr` is [`Odr::OneShot`].
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn trigger_one_shot(&mut self, md: &Md) -> Result<(), Error<I::Error>> {
        if md.is_one_shot() {
            self.device.ctrl_reg_2().modify(|w| w.set_oneshot(true))?;
        }
        Ok(())
    }

    /// Enable or disable the analog hub / QVAR channel
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_qvar_enable(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        self.device
            .ctrl_reg_3()
            .modify(|w| w.set_ah_qvar_en(enable))?;
        Ok(())
    }

    /// Returns `true` if the analog hub / QVAR channel is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn qvar_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.device.ctrl_reg_3().read()?.ah_qvar_en())
    }

    // ==================== Data acquisition ====================

    /// Read and convert one pressure (or QVAR) and temperature sample
    ///
    /// `md` must describe the active mode: it selects the full-scale conversion
    /// and whether the interleave tag bit is honoured.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_data(&mut self, md: &Md) -> Result<Data, Error<I::Error>> {
        let mut buf = [0u8; 5];
        self.device
            .interface
            .read_register(PRESS_OUT_XL, 40, &mut buf)?;
        Ok(Data::from_bytes(&buf, md))
    }

    /// Read the left-aligned raw pressure code
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_pressure_raw(&mut self) -> Result<i32, Error<I::Error>> {
        let mut buf = [0u8; 3];
        self.device
            .interface
            .read_register(PRESS_OUT_XL, 24, &mut buf)?;
        Ok(left_aligned(buf))
    }

    /// Read the raw temperature code (0.01 degC/LSB)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_temperature_raw(&mut self) -> Result<i16, Error<I::Error>> {
        let mut buf = [0u8; 2];
        self.device
            .interface
            .read_register(TEMP_OUT_L, 16, &mut buf)?;
        Ok(i16::from_le_bytes(buf))
    }

    /// Read the pressure output registers as a QVAR sample
    ///
    /// For use with QVAR enabled and interleaved mode disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_qvar_data(&mut self) -> Result<QvarData, Error<I::Error>> {
        let mut buf = [0u8; 3];
        self.device
            .interface
            .read_register(PRESS_OUT_XL, 24, &mut buf)?;
        Ok(QvarData::from_bytes(&buf))
    }

    // ==================== FIFO ====================

    /// Configure the FIFO
    ///
    /// A watermark of 0 disables stop-on-watermark, any other value enables it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the watermark exceeds 127, or an error if
    /// communication with the device fails.
    pub fn set_fifo_mode(&mut self, config: &FifoConfig) -> Result<(), Error<I::Error>> {
        if !config.is_valid() {
            return Err(Error::InvalidConfig);
        }

        // FIFO_CTRL and FIFO_WTM in one burst
        self.device.fifo_block().modify(|w| {
            w.set_f_mode(config.operation.f_mode());
            w.set_trig_modes(config.operation.trig_modes());
            w.set_stop_on_wtm(config.stop_on_watermark());
            w.set_wtm(config.watermark);
        })?;
        Ok(())
    }

    /// Read the FIFO configuration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn fifo_mode(&mut self) -> Result<FifoConfig, Error<I::Error>> {
        let block = self.device.fifo_block().read()?;
        Ok(FifoConfig {
            operation: FifoOperation::from_bits(block.trig_modes(), block.f_mode()),
            watermark: block.wtm(),
        })
    }

    /// Number of unread FIFO samples
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn fifo_level(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.device.fifo_status_1().read()?.fss())
    }

    /// Pop and convert `count` FIFO samples into `samples`
    ///
    /// Performs exactly `count` 3-byte reads of `FIFO_DATA_OUT_PRESS`, also when
    /// some of them fail, since every read pops a sample from the device.
    /// `samples` is cleared and then holds one entry per read in FIFO order; a
    /// slot whose read failed holds [`FifoSample::default()`]. Query
    /// [`Self::fifo_level`] first; reading past the stored level returns whatever
    /// the device outputs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `count` exceeds the FIFO depth (nothing
    /// is read and `samples` is left untouched), or [`Error::PartiallyApplied`]
    /// if any read failed, with bit N of `failed_steps` set for each failed slot N.
    pub fn fifo_read(
        &mut self,
        count: u8,
        md: &Md,
        samples: &mut heapless::Vec<FifoSample, FIFO_DEPTH>,
    ) -> Result<(), Error<I::Error>> {
        if usize::from(count) > FIFO_DEPTH {
            return Err(Error::InvalidConfig);
        }

        samples.clear();
        samples
            .resize_default(usize::from(count))
            .map_err(|()| Error::InvalidConfig)?;

        let mut steps = Steps::new();
        for (slot, sample) in (0u8..).zip(samples.iter_mut()) {
            let mut buf = [0u8; 3];
            let result = self
                .device
                .interface
                .read_register(FIFO_DATA_OUT_PRESS_XL, 24, &mut buf);
            if steps.record(slot, result).is_some() {
                *sample = FifoSample::from_bytes(&buf, md);
            }
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("Read {} FIFO samples", count);

        steps.finish()
    }

    // ==================== Interrupts ====================

    /// Configure interrupt latching
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_interrupt_mode(&mut self, mode: &InterruptMode) -> Result<(), Error<I::Error>> {
        self.device
            .interrupt_cfg()
            .modify(|w| w.set_lir(mode.latched))?;
        Ok(())
    }

    /// Read interrupt latching
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn interrupt_mode(&mut self) -> Result<InterruptMode, Error<I::Error>> {
        Ok(InterruptMode {
            latched: self.device.interrupt_cfg().read()?.lir(),
        })
    }

    /// Configure the pressure threshold interrupt
    ///
    /// `INTERRUPT_CFG`, `THS_P_L` and `THS_P_H` are written in one burst.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the threshold exceeds 0x7FFF, or an error
    /// if communication with the device fails.
    pub fn set_threshold(&mut self, config: &ThresholdConfig) -> Result<(), Error<I::Error>> {
        if !config.is_valid() {
            return Err(Error::InvalidConfig);
        }

        let (low, high) = config.threshold_bytes();
        self.device.threshold_block().modify(|w| {
            w.set_phe(config.over_threshold);
            w.set_ple(config.under_threshold);
            w.set_ths_low(low);
            w.set_ths_high(high);
        })?;
        Ok(())
    }

    /// Read the pressure threshold interrupt configuration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn threshold(&mut self) -> Result<ThresholdConfig, Error<I::Error>> {
        let block = self.device.threshold_block().read()?;
        Ok(ThresholdConfig {
            over_threshold: block.phe(),
            under_threshold: block.ple(),
            threshold: ThresholdConfig::threshold_from_bytes(block.ths_low(), block.ths_high()),
        })
    }

    // ==================== Reference and offset ====================

    /// Configure reference pressure capture and use
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_reference_mode(
        &mut self,
        config: &ReferenceConfig,
    ) -> Result<(), Error<I::Error>> {
        self.device.interrupt_cfg().modify(|w| {
            w.set_autozero(config.get_ref);
            w.set_autorefp(config.apply_ref.autorefp());
            w.set_reset_az(config.apply_ref.reset());
            w.set_reset_arp(config.apply_ref.reset());
        })?;
        Ok(())
    }

    /// Read the reference pressure configuration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn reference_mode(&mut self) -> Result<ReferenceConfig, Error<I::Error>> {
        let reg = self.device.interrupt_cfg().read()?;
        Ok(ReferenceConfig {
            get_ref: reg.autozero(),
            apply_ref: ApplyReference::from_bits(reg.reset_az(), reg.autorefp()),
        })
    }

    /// Read the captured reference pressure (`REF_P`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_reference_pressure(&mut self) -> Result<i16, Error<I::Error>> {
        let mut buf = [0u8; 2];
        self.device.interface.read_register(REF_P_L, 16, &mut buf)?;
        Ok(i16::from_le_bytes(buf))
    }

    /// Write the pressure offset (`RPDS`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_pressure_offset(&mut self, offset: i16) -> Result<(), Error<I::Error>> {
        self.device
            .interface
            .write_register(RPDS_L, 16, &offset.to_le_bytes())?;
        Ok(())
    }

    /// Read the pressure offset (`RPDS`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn pressure_offset(&mut self) -> Result<i16, Error<I::Error>> {
        let mut buf = [0u8; 2];
        self.device.interface.read_register(RPDS_L, 16, &mut buf)?;
        Ok(i16::from_le_bytes(buf))
    }
}

#[cfg(feature = "async")]
impl<I> Ilps28qswDriver<I>
where
    I: device_driver::AsyncRegisterInterface<AddressType = u8>,
{
    /// Create a new ILPS28QSW driver instance
    ///
    /// This will verify the `WHO_AM_I` register but will not initialize the device.
    /// Call `init()` after construction to configure the device.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The `WHO_AM_I` register contains an unexpected value
    pub async fn new(interface: I) -> Result<Self, Error<I::Error>> {
        let mut driver = Self {
            device: RegisterDevice::new(interface),
        };

        let who_am_i = driver.read_who_am_i().await?;
        if who_am_i != WHO_AM_I_VALUE {
            return Err(Error::InvalidDevice(who_am_i));
        }

        Ok(driver)
    }

    /// Initialize the device
    ///
    /// Issues a software reset, waits for it to complete, then enables block data
    /// update and register address auto-increment ([`Init::DriverReady`]).
    ///
    /// # Arguments
    ///
    /// * `delay` - Delay provider implementing `embedded_hal_async::delay::DelayNs`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails, including while
    /// polling for reset completion, or [`Error::InitializationTimeout`] if the
    /// reset bit never clears.
    pub async fn init<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        self.set_init(Init::Reset).await?;

        let mut reset_done = false;
        for _ in 0..(RESET_MAX_WAIT_MS / RESET_POLL_INTERVAL_MS) {
            delay.delay_ms(RESET_POLL_INTERVAL_MS).await;
            if !self.device.ctrl_reg_2().read_async().await?.swreset() {
                reset_done = true;
                break;
            }
        }

        if !reset_done {
            #[cfg(feature = "defmt")]
            defmt::warn!("Software reset did not complete within {} ms", RESET_MAX_WAIT_MS);
            return Err(Error::InitializationTimeout);
        }

        self.set_init(Init::DriverReady).await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("ILPS28QSW initialized");

        Ok(())
    }

    /// Read the `WHO_AM_I` register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_who_am_i(&mut self) -> Result<u8, Error<I::Error>> {
        let reg = self.device.who_am_i().read_async().await?;
        Ok(reg.who_am_i())
    }

    /// Boot, reset, or mark the driver ready
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_init(&mut self, init: Init) -> Result<(), Error<I::Error>> {
        match init {
            Init::Boot => {
                self.device
                    .ctrl_reg_2()
                    .modify_async(|w| w.set_boot(true))
                    .await?;
            }
            Init::Reset => {
                self.device
                    .ctrl_reg_2()
                    .modify_async(|w| w.set_swreset(true))
                    .await?;
            }
            // CTRL_REG2 and CTRL_REG3 in one burst
            Init::DriverReady => {
                self.device
                    .init_block()
                    .modify_async(|w| {
                        w.set_bdu(true);
                        w.set_if_add_inc(true);
                    })
                    .await?;
            }
        }
        Ok(())
    }

    /// Read the device status
    ///
    /// Reads `CTRL_REG2`, `INT_SOURCE`, `STATUS` and `INTERRUPT_CFG`, stopping at
    /// the first failing read.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn status(&mut self) -> Result<DeviceStatus, Error<I::Error>> {
        let ctrl_reg_2 = self.device.ctrl_reg_2().read_async().await?;
        let int_source = self.device.int_source().read_async().await?;
        let status = self.device.status().read_async().await?;
        let interrupt_cfg = self.device.interrupt_cfg().read_async().await?;

        Ok(DeviceStatus {
            sw_reset: ctrl_reg_2.swreset(),
            boot: int_source.boot_on(),
            drdy_pres: status.p_da(),
            drdy_temp: status.t_da(),
            ovr_pres: status.p_or(),
            ovr_temp: status.t_or(),
            end_meas: !ctrl_reg_2.oneshot(),
            ref_done: !interrupt_cfg.autozero(),
        })
    }

    /// Configure the bus interface (`I3C_IF_CTRL`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_bus_config(&mut self, config: &BusConfig) -> Result<(), Error<I::Error>> {
        self.device
            .bus_if_ctrl()
            .modify_async(|w| {
                w.set_asf_on(matches!(config.filter, AntiSpikeFilter::AlwaysOn));
                w.set_bus_avb_sel(config.bus_avb_time as u8);
            })
            .await?;
        Ok(())
    }

    /// Read the bus interface configuration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn bus_config(&mut self) -> Result<BusConfig, Error<I::Error>> {
        let reg = self.device.bus_if_ctrl().read_async().await?;
        Ok(BusConfig {
            filter: AntiSpikeFilter::from_bit(reg.asf_on()),
            bus_avb_time: BusAvailableTime::from_bits(reg.bus_avb_sel()),
        })
    }

    /// Configure the electrical pin settings (`IF_CTRL`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_pin_config(&mut self, config: &PinConfig) -> Result<(), Error<I::Error>> {
        self.device
            .if_ctrl()
            .modify_async(|w| w.set_sda_pu_en(config.sda_pull_up))
            .await?;
        Ok(())
    }

    /// Read the electrical pin settings
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn pin_config(&mut self) -> Result<PinConfig, Error<I::Error>> {
        let reg = self.device.if_ctrl().read_async().await?;
        Ok(PinConfig {
            sda_pull_up: reg.sda_pu_en(),
        })
    }

    /// Read all event flags
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn interrupt_sources(&mut self) -> Result<InterruptSources, Error<I::Error>> {
        let status = self.device.status().read_async().await?;
        let int_source = self.device.int_source().read_async().await?;
        let fifo_status = self.device.fifo_status_2().read_async().await?;

        Ok(InterruptSources {
            drdy_pres: status.p_da(),
            drdy_temp: status.t_da(),
            over_pres: int_source.ph(),
            under_pres: int_source.pl(),
            threshold_pres: int_source.ia(),
            fifo_full: fifo_status.fifo_full_ia(),
            fifo_overrun: fifo_status.fifo_ovr_ia(),
            fifo_watermark: fifo_status.fifo_wtm_ia(),
        })
    }

    // ==================== Operating mode ====================

    /// Apply an operating mode
    ///
    /// The interleave selection must not change while the sensor is converting, so
    /// the update is a fixed sequence:
    /// 1. one burst read of `CTRL_REG1`..`CTRL_REG3`
    /// 2. power-down (`ODR = 0`) if the sensor is running
    /// 3. QVAR disable if QVAR is enabled
    /// 4. interleave selection into `CTRL_REG3`, then into `FIFO_CTRL`
    /// 5. one burst write of `CTRL_REG1`..`CTRL_REG3` with the requested rate,
    ///    averaging, filter and full scale, and the previous QVAR enable
    ///
    /// Steps 2 to 5 are all attempted even if one of them fails. The
    /// intermediate writes carry the reserved bits of the initial read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the initial read fails (nothing is written), or
    /// [`Error::PartiallyApplied`] if any later step fails, with failed steps
    /// numbered as in [`crate::mode::step`]. In the latter case the mode may be
    /// partially applied; read it back with [`Self::mode`].
    pub async fn set_mode(&mut self, md: &Md) -> Result<(), Error<I::Error>> {
        let mut block = self.device.mode_block().read_async().await?;
        let mut steps = Steps::new();
        let qvar_enabled = block.ah_qvar_en();

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "set_mode: odr {} -> {}, interleaved {} -> {}",
            block.odr(),
            md.odr.bits(),
            block.ah_qvar_p_auto_en(),
            md.interleaved_mode
        );

        if block.odr() != 0 {
            block.set_odr(0);
            steps.record(
                step::POWER_DOWN,
                self.device
                    .ctrl_reg_1()
                    .write_async(|w| {
                        w.set_avg(block.avg());
                        w.set_odr(0);
                        w.set_odr_reserved(block.odr_reserved());
                    })
                    .await,
            );
        }

        if qvar_enabled {
            block.set_ah_qvar_en(false);
            steps.record(
                step::QVAR_DISABLE,
                self.device
                    .ctrl_reg_3()
                    .write_async(|w| {
                        w.set_if_add_inc(block.if_add_inc());
                        w.set_inc_reserved(block.inc_reserved());
                        w.set_ah_qvar_p_auto_en(block.ah_qvar_p_auto_en());
                        w.set_qvar_reserved(block.qvar_reserved());
                        w.set_ah_qvar_en(block.ah_qvar_en());
                    })
                    .await,
            );
        }

        block.set_ah_qvar_p_auto_en(md.interleaved_mode);
        steps.record(
            step::INTERLEAVE_CTRL,
            self.device
                .ctrl_reg_3()
                .write_async(|w| {
                    w.set_if_add_inc(block.if_add_inc());
                    w.set_inc_reserved(block.inc_reserved());
                    w.set_ah_qvar_p_auto_en(block.ah_qvar_p_auto_en());
                    w.set_qvar_reserved(block.qvar_reserved());
                    w.set_ah_qvar_en(block.ah_qvar_en());
                })
                .await,
        );

        // Without a valid FIFO_CTRL read nothing is written back
        steps.record(
            step::INTERLEAVE_FIFO,
            self.device
                .fifo_ctrl()
                .modify_async(|w| w.set_ah_qvar_p_fifo_en(md.interleaved_mode))
                .await,
        );

        block.set_ah_qvar_en(qvar_enabled);
        block.set_odr(md.odr.bits());
        block.set_avg(md.avg.bits());
        block.set_en_lpfp(md.lpf.en_lpfp());
        block.set_lfpf_cfg(md.lpf.lfpf_cfg());
        block.set_fs_mode(md.fs.bit());
        steps.record(
            step::APPLY_MODE,
            self.device
                .mode_block()
                .write_async(|w| *w = block)
                .await,
        );

        steps.finish()
    }

    /// Read the operating mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn mode(&mut self) -> Result<Md, Error<I::Error>> {
        let block = self.device.mode_block().read_async().await?;
        Ok(Md {
            odr: Odr::from_bits(block.odr()),
            avg: Avg::from_bits(block.avg()),
            lpf: LowPassFilter::from_bits(block.en_lpfp(), block.lfpf_cfg()),
            fs: FullScale::from_bit(block.fs_mode()),
            interleaved_mode: block.ah_qvar_p_auto_en(),
        })
    }

    /// Start a single conversion
    ///
    /// Does nothing unless `md.odr` is [`Odr::OneShot`].
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn trigger_one_shot(&mut self, md: &Md) -> Result<(), Error<I::Error>> {
        if md.is_one_shot() {
            self.device
                .ctrl_reg_2()
                .modify_async(|w| w.set_oneshot(true))
                .await?;
        }
        Ok(())
    }

    /// Enable or disable the analog hub / QVAR channel
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_qvar_enable(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        self.device
            .ctrl_reg_3()
            .modify_async(|w| w.set_ah_qvar_en(enable))
            .await?;
        Ok(())
    }

    /// Returns `true` if the analog hub / QVAR channel is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn qvar_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.device.ctrl_reg_3().read_async().await?.ah_qvar_en())
    }

    // ==================== Data acquisition ====================

    /// Read and convert one pressure (or QVAR) and temperature sample
    ///
    /// `md` must describe the active mode: it selects the full-scale conversion
    /// and whether the interleave tag bit is honoured.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_data(&mut self, md: &Md) -> Result<Data, Error<I::Error>> {
        let mut buf = [0u8; 5];
        self.device
            .interface
            .read_register(PRESS_OUT_XL, 40, &mut buf)
            .await?;
        Ok(Data::from_bytes(&buf, md))
    }

    /// Read the left-aligned raw pressure code
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_pressure_raw(&mut self) -> Result<i32, Error<I::Error>> {
        let mut buf = [0u8; 3];
        self.device
            .interface
            .read_register(PRESS_OUT_XL, 24, &mut buf)
            .await?;
        Ok(left_aligned(buf))
    }

    /// Read the raw temperature code (0.01 degC/LSB)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_temperature_raw(&mut self) -> Result<i16, Error<I::Error>> {
        let mut buf = [0u8; 2];
        self.device
            .interface
            .read_register(TEMP_OUT_L, 16, &mut buf)
            .await?;
        Ok(i16::from_le_bytes(buf))
    }

    /// Read the pressure output registers as a QVAR sample
    ///
    /// For use with QVAR enabled and interleaved mode disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_qvar_data(&mut self) -> Result<QvarData, Error<I::Error>> {
        let mut buf = [0u8; 3];
        self.device
            .interface
            .read_register(PRESS_OUT_XL, 24, &mut buf)
            .await?;
        Ok(QvarData::from_bytes(&buf))
    }

    // ==================== FIFO ====================

    /// Configure the FIFO
    ///
    /// A watermark of 0 disables stop-on-watermark, any other value enables it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the watermark exceeds 127, or an error if
    /// communication with the device fails.
    pub async fn set_fifo_mode(&mut self, config: &FifoConfig) -> Result<(), Error<I::Error>> {
        if !config.is_valid() {
            return Err(Error::InvalidConfig);
        }

        // FIFO_CTRL and FIFO_WTM in one burst
        self.device
            .fifo_block()
            .modify_async(|w| {
                w.set_f_mode(config.operation.f_mode());
                w.set_trig_modes(config.operation.trig_modes());
                w.set_stop_on_wtm(config.stop_on_watermark());
                w.set_wtm(config.watermark);
            })
            .await?;
        Ok(())
    }

    /// Read the FIFO configuration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn fifo_mode(&mut self) -> Result<FifoConfig, Error<I::Error>> {
        let block = self.device.fifo_block().read_async().await?;
        Ok(FifoConfig {
            operation: FifoOperation::from_bits(block.trig_modes(), block.f_mode()),
            watermark: block.wtm(),
        })
    }

    /// Number of unread FIFO samples
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn fifo_level(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.device.fifo_status_1().read_async().await?.fss())
    }

    /// Pop and convert `count` FIFO samples into `samples`
    ///
    /// Performs exactly `count` 3-byte reads of `FIFO_DATA_OUT_PRESS`, also when
    /// some of them fail, since every read pops a sample from the device.
    /// `samples` is cleared and then holds one entry per read in FIFO order; a
    /// slot whose read failed holds [`FifoSample::default()`]. Query
    /// [`Self::fifo_level`] first; reading past the stored level returns whatever
    /// the device outputs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `count` exceeds the FIFO depth (nothing
    /// is read and `samples` is left untouched), or [`Error::PartiallyApplied`]
    /// if any read failed, with bit N of `failed_steps` set for each failed slot N.
    pub async fn fifo_read(
        &mut self,
        count: u8,
        md: &Md,
        samples: &mut heapless::Vec<FifoSample, FIFO_DEPTH>,
    ) -> Result<(), Error<I::Error>> {
        if usize::from(count) > FIFO_DEPTH {
            return Err(Error::InvalidConfig);
        }

        samples.clear();
        samples
            .resize_default(usize::from(count))
            .map_err(|()| Error::InvalidConfig)?;

        let mut steps = Steps::new();
        for (slot, sample) in (0u8..).zip(samples.iter_mut()) {
            let mut buf = [0u8; 3];
            let result = self
                .device
                .interface
                .read_register(FIFO_DATA_OUT_PRESS_XL, 24, &mut buf)
                .await;
            if steps.record(slot, result).is_some() {
                *sample = FifoSample::from_bytes(&buf, md);
            }
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("Read {} FIFO samples", count);

        steps.finish()
    }

    // ==================== Interrupts ====================

    /// Configure interrupt latching
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_interrupt_mode(&mut self, mode: &InterruptMode) -> Result<(), Error<I::Error>> {
        self.device
            .interrupt_cfg()
            .modify_async(|w| w.set_lir(mode.latched))
            .await?;
        Ok(())
    }

    /// Read interrupt latching
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn interrupt_mode(&mut self) -> Result<InterruptMode, Error<I::Error>> {
        Ok(InterruptMode {
            latched: self.device.interrupt_cfg().read_async().await?.lir(),
        })
    }

    /// Configure the pressure threshold interrupt
    ///
    /// `INTERRUPT_CFG`, `THS_P_L` and `THS_P_H` are written in one burst.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the threshold exceeds 0x7FFF, or an error
    /// if communication with the device fails.
    pub async fn set_threshold(&mut self, config: &ThresholdConfig) -> Result<(), Error<I::Error>> {
        if !config.is_valid() {
            return Err(Error::InvalidConfig);
        }

        let (low, high) = config.threshold_bytes();
        self.device
            .threshold_block()
            .modify_async(|w| {
                w.set_phe(config.over_threshold);
                w.set_ple(config.under_threshold);
                w.set_ths_low(low);
                w.set_ths_high(high);
            })
            .await?;
        Ok(())
    }

    /// Read the pressure threshold interrupt configuration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn threshold(&mut self) -> Result<ThresholdConfig, Error<I::Error>> {
        let block = self.device.threshold_block().read_async().await?;
        Ok(ThresholdConfig {
            over_threshold: block.phe(),
            under_threshold: block.ple(),
            threshold: ThresholdConfig::threshold_from_bytes(block.ths_low(), block.ths_high()),
        })
    }

    // ==================== Reference and offset ====================

    /// Configure reference pressure capture and use
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_reference_mode(
        &mut self,
        config: &ReferenceConfig,
    ) -> Result<(), Error<I::Error>> {
        self.device
            .interrupt_cfg()
            .modify_async(|w| {
                w.set_autozero(config.get_ref);
                w.set_autorefp(config.apply_ref.autorefp());
                w.set_reset_az(config.apply_ref.reset());
                w.set_reset_arp(config.apply_ref.reset());
            })
            .await?;
        Ok(())
    }

    /// Read the reference pressure configuration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn reference_mode(&mut self) -> Result<ReferenceConfig, Error<I::Error>> {
        let reg = self.device.interrupt_cfg().read_async().await?;
        Ok(ReferenceConfig {
            get_ref: reg.autozero(),
            apply_ref: ApplyReference::from_bits(reg.reset_az(), reg.autorefp()),
        })
    }

    /// Read the captured reference pressure (`REF_P`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_reference_pressure(&mut self) -> Result<i16, Error<I::Error>> {
        let mut buf = [0u8; 2];
        self.device
            .interface
            .read_register(REF_P_L, 16, &mut buf)
            .await?;
        Ok(i16::from_le_bytes(buf))
    }

    /// Write the pressure offset (`RPDS`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_pressure_offset(&mut self, offset: i16) -> Result<(), Error<I::Error>> {
        self.device
            .interface
            .write_register(RPDS_L, 16, &offset.to_le_bytes())
            .await?;
        Ok(())
    }

    /// Read the pressure offset (`RPDS`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn pressure_offset(&mut self) -> Result<i16, Error<I::Error>> {
        let mut buf = [0u8; 2];
        self.device
            .interface
            .read_register(RPDS_L, 16, &mut buf)
            .await?;
        Ok(i16::from_le_bytes(buf))
    }
}
