//! Bus interface implementations for the ILPS28QSW
//!
//! This module provides implementations of the `device-driver` traits for
//! I2C (and I3C devices in legacy I2C mode) and SPI communication.
//!
//! Multi-byte transfers rely on register address auto-increment
//! (`CTRL_REG3.IF_ADD_INC`, enabled by `Init::DriverReady`).

use crate::I2C_ADDRESS;

use device_driver::RegisterInterface;

/// Largest register burst the driver issues
const MAX_BURST: usize = 8;

/// I2C interface for the ILPS28QSW
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface with the fixed device address (0x5C)
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let mut sensor = Ilps28qswDriver::new(interface)?;
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS,
        }
    }

    /// Create a new I2C interface with a custom device address
    ///
    /// Useful behind address translators or I3C-to-I2C bridges.
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    /// * `address` - The I2C device address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Device address used by this interface
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Prefix `data` with the register address
fn framed(address: u8, data: &[u8]) -> ([u8; MAX_BURST + 1], usize) {
    let mut buffer = [0u8; MAX_BURST + 1];
    buffer[0] = address;
    let len = data.len().min(MAX_BURST);
    buffer[1..=len].copy_from_slice(&data[..len]);
    (buffer, len)
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c.write_read(self.address, &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits;
        let (buffer, len) = framed(address, write_data);
        self.i2c.write(self.address, &buffer[..=len])
    }
}

#[cfg(feature = "async")]
impl<I2C, E> device_driver::AsyncRegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c
            .write_read(self.address, &[address], read_data)
            .await
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits;
        let (buffer, len) = framed(address, write_data);
        self.i2c.write(self.address, &buffer[..=len]).await
    }
}

/// SPI interface
///
/// # Note on Chip Select
///
/// This interface uses the `SpiDevice` trait from `embedded-hal`, which manages
/// the chip select (CS) pin automatically.
///
/// ```ignore
/// let spi_device = embedded_hal_bus::spi::ExclusiveDevice::new(spi_bus, cs_pin, delay);
/// let interface = SpiInterface::new(spi_device);
/// ```
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Create a new SPI interface with the given SPI device
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Consume the interface and return the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI, E> RegisterInterface for SpiInterface<SPI>
where
    SPI: embedded_hal::spi::SpiDevice<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for SPI
        // For SPI reads, set MSB to 1
        let read_address = address | 0x80;

        let mut operations = [
            embedded_hal::spi::Operation::Write(&[read_address]),
            embedded_hal::spi::Operation::Read(read_data),
        ];

        self.spi.transaction(&mut operations)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits;
        let (buffer, len) = framed(address & 0x7F, write_data);
        self.spi.write(&buffer[..=len])
    }
}

#[cfg(feature = "async")]
impl<SPI, E> device_driver::AsyncRegisterInterface for SpiInterface<SPI>
where
    SPI: embedded_hal_async::spi::SpiDevice<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for SPI
        // For SPI reads, set MSB to 1
        let read_address = address | 0x80;

        let mut operations = [
            embedded_hal_async::spi::Operation::Write(&[read_address]),
            embedded_hal_async::spi::Operation::Read(read_data),
        ];

        self.spi.transaction(&mut operations).await
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits;
        let (buffer, len) = framed(address & 0x7F, write_data);
        self.spi.write(&buffer[..=len]).await
    }
}
