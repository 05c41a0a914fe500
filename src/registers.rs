//! Register definitions for the ILPS28QSW
//!
//! The ILPS28QSW has a flat, little-endian register map with automatic address
//! increment on multi-byte accesses (`CTRL_REG3.IF_ADD_INC`).
//!
//! ## Register groups
//! Several logical settings are split across adjacent registers. Those groups are
//! declared a second time as one wide register so that a single read or write is a
//! single bus burst:
//! - **`ModeBlock`**: `CTRL_REG1`..`CTRL_REG3` (0x10-0x12), operating mode
//! - **`InitBlock`**: `CTRL_REG2`..`CTRL_REG3` (0x11-0x12), driver-ready bits
//! - **`FifoBlock`**: `FIFO_CTRL`..`FIFO_WTM` (0x14-0x15), FIFO mode and watermark
//! - **`ThresholdBlock`**: `INTERRUPT_CFG`..`THS_P_H` (0x0B-0x0D), threshold interrupt
//!
//! Registers that share addresses with a group use `ALLOW_ADDRESS_OVERLAP = true`.
//! Output data (pressure, temperature, FIFO head, reference and offset words) is
//! accessed as raw bytes through the interface, see [`crate::device`].

device_driver::create_device!(
    device_name: Ilps28qsw,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = LE;
        }

        // ==================== INTERRUPT AND THRESHOLD ====================

        /// INTERRUPT_CFG - Interrupt mode for pressure acquisition (0x0B)
        register InterruptCfg {
            const ADDRESS = 0x0B;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// Interrupt on pressure higher than threshold
            phe: bool = 0,
            /// Interrupt on pressure lower than threshold
            ple: bool = 1,
            /// Latch interrupt request into INT_SOURCE
            lir: bool = 2,
            reserved_3: uint = 3..4,
            /// Reset AUTOZERO function
            reset_az: bool = 4,
            /// AUTOZERO enable
            autozero: bool = 5,
            /// Reset AUTOREFP function
            reset_arp: bool = 6,
            /// AUTOREFP enable
            autorefp: bool = 7,
        },

        /// INTERRUPT_CFG, THS_P_L, THS_P_H as one 3-byte burst (0x0B-0x0D)
        register ThresholdBlock {
            const ADDRESS = 0x0B;
            const SIZE_BITS = 24;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// Interrupt on pressure higher than threshold
            phe: bool = 0,
            /// Interrupt on pressure lower than threshold
            ple: bool = 1,
            /// Latch interrupt request into INT_SOURCE
            lir: bool = 2,
            /// Reset AUTOZERO function
            reset_az: bool = 4,
            /// AUTOZERO enable
            autozero: bool = 5,
            /// Reset AUTOREFP function
            reset_arp: bool = 6,
            /// AUTOREFP enable
            autorefp: bool = 7,
            /// THS_P_L - threshold low byte
            ths_low: uint = 8..16,
            /// THS_P_H - threshold high bits (bit 7 of THS_P_H is reserved)
            ths_high: uint = 16..23,
        },

        /// IF_CTRL - Interface control (0x0E)
        register IfCtrl {
            const ADDRESS = 0x0E;
            const SIZE_BITS = 8;

            reserved_3_0: uint = 0..4,
            /// SDA pin internal pull-up enable
            sda_pu_en: bool = 4,
            reserved_7_5: uint = 5..8,
        },

        /// WHO_AM_I - Device ID Register (0x0F)
        /// Expected value: 0xB4
        register WhoAmI {
            const ADDRESS = 0x0F;
            const SIZE_BITS = 8;

            /// Device ID (should read 0xB4)
            who_am_i: uint = 0..8,
        },

        // ==================== CONTROL ====================

        /// CTRL_REG1 - Output data rate and averaging (0x10)
        register CtrlReg1 {
            const ADDRESS = 0x10;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// Averaging selection
            avg: uint = 0..3,
            /// Output data rate selection (0 = power-down / one-shot)
            odr: uint = 3..7,
            /// Reserved, written back as read
            odr_reserved: uint = 7..8,
        },

        /// CTRL_REG2 - One-shot, reset, filter and full scale (0x11)
        register CtrlReg2 {
            const ADDRESS = 0x11;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// One-shot trigger (self-clearing)
            oneshot: bool = 0,
            reserved_1: uint = 1..2,
            /// Software reset (self-clearing)
            swreset: bool = 2,
            /// Block data update
            bdu: bool = 3,
            /// Low-pass filter enable
            en_lpfp: bool = 4,
            /// Low-pass filter bandwidth (0 = ODR/4, 1 = ODR/9)
            lfpf_cfg: bool = 5,
            /// Full-scale mode (0 = 1260 hPa, 1 = 4060 hPa)
            fs_mode: bool = 6,
            /// Reboot memory content (self-clearing)
            boot: bool = 7,
        },

        /// CTRL_REG3 - Address increment and analog hub / QVAR control (0x12)
        register CtrlReg3 {
            const ADDRESS = 0x12;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// Register address auto-increment on multi-byte access
            if_add_inc: bool = 0,
            /// Reserved, written back as read
            inc_reserved: uint = 1..5,
            /// Interleaved pressure / QVAR sampling
            ah_qvar_p_auto_en: bool = 5,
            /// Reserved, written back as read
            qvar_reserved: uint = 6..7,
            /// Analog hub / QVAR enable
            ah_qvar_en: bool = 7,
        },

        /// CTRL_REG1, CTRL_REG2, CTRL_REG3 as one 3-byte burst (0x10-0x12)
        register ModeBlock {
            const ADDRESS = 0x10;
            const SIZE_BITS = 24;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// CTRL_REG1 - averaging selection
            avg: uint = 0..3,
            /// CTRL_REG1 - output data rate selection
            odr: uint = 3..7,
            /// CTRL_REG1 - reserved
            odr_reserved: uint = 7..8,
            /// CTRL_REG2 - one-shot trigger
            oneshot: bool = 8,
            /// CTRL_REG2 - software reset
            swreset: bool = 10,
            /// CTRL_REG2 - block data update
            bdu: bool = 11,
            /// CTRL_REG2 - low-pass filter enable
            en_lpfp: bool = 12,
            /// CTRL_REG2 - low-pass filter bandwidth
            lfpf_cfg: bool = 13,
            /// CTRL_REG2 - full-scale mode
            fs_mode: bool = 14,
            /// CTRL_REG2 - reboot memory content
            boot: bool = 15,
            /// CTRL_REG3 - address auto-increment
            if_add_inc: bool = 16,
            /// CTRL_REG3 - reserved
            inc_reserved: uint = 17..21,
            /// CTRL_REG3 - interleaved pressure / QVAR sampling
            ah_qvar_p_auto_en: bool = 21,
            /// CTRL_REG3 - reserved
            qvar_reserved: uint = 22..23,
            /// CTRL_REG3 - analog hub / QVAR enable
            ah_qvar_en: bool = 23,
        },

        /// CTRL_REG2, CTRL_REG3 as one 2-byte burst (0x11-0x12)
        register InitBlock {
            const ADDRESS = 0x11;
            const SIZE_BITS = 16;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// CTRL_REG2 - one-shot trigger
            oneshot: bool = 0,
            /// CTRL_REG2 - software reset
            swreset: bool = 2,
            /// CTRL_REG2 - block data update
            bdu: bool = 3,
            /// CTRL_REG2 - low-pass filter enable
            en_lpfp: bool = 4,
            /// CTRL_REG2 - low-pass filter bandwidth
            lfpf_cfg: bool = 5,
            /// CTRL_REG2 - full-scale mode
            fs_mode: bool = 6,
            /// CTRL_REG2 - reboot memory content
            boot: bool = 7,
            /// CTRL_REG3 - address auto-increment
            if_add_inc: bool = 8,
            /// CTRL_REG3 - interleaved pressure / QVAR sampling
            ah_qvar_p_auto_en: bool = 13,
            /// CTRL_REG3 - analog hub / QVAR enable
            ah_qvar_en: bool = 15,
        },

        // ==================== FIFO ====================

        /// FIFO_CTRL - FIFO control (0x14)
        register FifoCtrl {
            const ADDRESS = 0x14;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// FIFO mode bits [1:0]
            f_mode: uint = 0..2,
            /// Triggered FIFO modes enable (mode bit 2)
            trig_modes: bool = 2,
            /// Stop filling at watermark
            stop_on_wtm: bool = 3,
            /// Store interleaved pressure / QVAR samples in FIFO
            ah_qvar_p_fifo_en: bool = 4,
            reserved_7_5: uint = 5..8,
        },

        /// FIFO_CTRL, FIFO_WTM as one 2-byte burst (0x14-0x15)
        register FifoBlock {
            const ADDRESS = 0x14;
            const SIZE_BITS = 16;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// FIFO mode bits [1:0]
            f_mode: uint = 0..2,
            /// Triggered FIFO modes enable (mode bit 2)
            trig_modes: bool = 2,
            /// Stop filling at watermark
            stop_on_wtm: bool = 3,
            /// Store interleaved pressure / QVAR samples in FIFO
            ah_qvar_p_fifo_en: bool = 4,
            /// FIFO_WTM - watermark level (0-127)
            wtm: uint = 8..15,
        },

        // ==================== INTERFACE ====================

        /// I3C_IF_CTRL - I3C interface control (0x19)
        register BusIfCtrl {
            const ADDRESS = 0x19;
            const SIZE_BITS = 8;

            /// Bus available time selection for in-band interrupts
            bus_avb_sel: uint = 0..2,
            reserved_4_2: uint = 2..5,
            /// Anti-spike filter always on
            asf_on: bool = 5,
            reserved_7_6: uint = 6..8,
        },

        // ==================== STATUS ====================

        /// INT_SOURCE - Interrupt source (0x24)
        register IntSource {
            const ADDRESS = 0x24;
            const SIZE_BITS = 8;

            /// Pressure high event
            ph: bool = 0,
            /// Pressure low event
            pl: bool = 1,
            /// Interrupt active
            ia: bool = 2,
            reserved_6_3: uint = 3..7,
            /// Boot phase running
            boot_on: bool = 7,
        },

        /// FIFO_STATUS1 - FIFO stored data level (0x25)
        register FifoStatus1 {
            const ADDRESS = 0x25;
            const SIZE_BITS = 8;

            /// Number of unread samples (0-128)
            fss: uint = 0..8,
        },

        /// FIFO_STATUS2 - FIFO flags (0x26)
        register FifoStatus2 {
            const ADDRESS = 0x26;
            const SIZE_BITS = 8;

            reserved_4_0: uint = 0..5,
            /// FIFO full
            fifo_full_ia: bool = 5,
            /// FIFO overrun
            fifo_ovr_ia: bool = 6,
            /// FIFO level at or above watermark
            fifo_wtm_ia: bool = 7,
        },

        /// STATUS - Data available and overrun flags (0x27)
        register Status {
            const ADDRESS = 0x27;
            const SIZE_BITS = 8;

            /// Pressure data available
            p_da: bool = 0,
            /// Temperature data available
            t_da: bool = 1,
            reserved_3_2: uint = 2..4,
            /// Pressure data overrun
            p_or: bool = 4,
            /// Temperature data overrun
            t_or: bool = 5,
            reserved_7_6: uint = 6..8,
        }
    }
);

// Re-export commonly used types for convenience
pub use Ilps28qsw as RegisterDevice;

/// `REF_P_L` .. `REF_P_H` reference pressure word (0x16)
pub const REF_P_L: u8 = 0x16;
/// `RPDS_L` .. `RPDS_H` pressure offset word (0x1A)
pub const RPDS_L: u8 = 0x1A;
/// `PRESS_OUT_XL` .. `PRESS_OUT_H` pressure output (0x28)
pub const PRESS_OUT_XL: u8 = 0x28;
/// `TEMP_OUT_L` .. `TEMP_OUT_H` temperature output (0x2B)
pub const TEMP_OUT_L: u8 = 0x2B;
/// `FIFO_DATA_OUT_PRESS_XL` .. `FIFO_DATA_OUT_PRESS_H` FIFO head (0x78)
pub const FIFO_DATA_OUT_PRESS_XL: u8 = 0x78;
