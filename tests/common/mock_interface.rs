//! Mock interface implementation for testing the ILPS28QSW driver

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;
use device_driver::RegisterInterface;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// `WHO_AM_I` register address
const WHO_AM_I: u8 = 0x0F;
/// `CTRL_REG2` register address
const CTRL_REG2: u8 = 0x11;
/// `FIFO_DATA_OUT_PRESS_XL` register address
const FIFO_DATA_OUT: u8 = 0x78;

/// Records bus transactions performed on the mock interface
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Burst read
    Read {
        /// First register address
        address: u8,
        /// Number of bytes read
        len: usize,
    },
    /// Burst write
    Write {
        /// First register address
        address: u8,
        /// Bytes written
        data: Vec<u8>,
    },
}

/// Shared state for mock interface (uses interior mutability)
#[derive(Debug)]
struct MockState {
    /// Simulated register values
    registers: HashMap<u8, u8>,

    /// Operations log for verification
    operations: Vec<Operation>,

    /// Failure injection flags
    fail_next_read: bool,
    fail_next_write: bool,
    /// Number of reads to let through before failing one
    fail_read_after: Option<usize>,
    /// Number of writes to let through before failing one
    fail_write_after: Option<usize>,

    /// Keep `CTRL_REG2.SWRESET` set after a reset request
    hold_reset: bool,

    /// Queued FIFO slots, popped on each `FIFO_DATA_OUT_PRESS` read
    fifo: VecDeque<[u8; 3]>,
}

impl MockState {
    fn new() -> Self {
        let mut state = Self {
            registers: HashMap::new(),
            operations: Vec::new(),
            fail_next_read: false,
            fail_next_write: false,
            fail_read_after: None,
            fail_write_after: None,
            hold_reset: false,
            fifo: VecDeque::new(),
        };

        // Set default WHO_AM_I value (0xB4)
        state.registers.insert(WHO_AM_I, 0xB4);

        state
    }

    fn register(&self, address: u8) -> u8 {
        self.registers.get(&address).copied().unwrap_or(0)
    }
}

/// Mock interface for testing
#[derive(Clone)]
pub struct MockInterface {
    state: Rc<RefCell<MockState>>,
}

impl MockInterface {
    /// Create a new mock interface with default register values
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState::new())),
        }
    }

    /// Set a register value
    #[allow(dead_code)]
    pub fn set_register(&self, address: u8, value: u8) {
        self.state.borrow_mut().registers.insert(address, value);
    }

    /// Set consecutive register values starting at `address`
    #[allow(dead_code)]
    pub fn set_registers(&self, address: u8, values: &[u8]) {
        let mut state = self.state.borrow_mut();
        for (i, &value) in values.iter().enumerate() {
            state.registers.insert(address.wrapping_add(i as u8), value);
        }
    }

    /// Get a register value
    #[allow(dead_code)]
    pub fn get_register(&self, address: u8) -> u8 {
        self.state.borrow().register(address)
    }

    /// Set WHO_AM_I register value
    #[allow(dead_code)]
    pub fn set_who_am_i(&self, value: u8) {
        self.set_register(WHO_AM_I, value);
    }

    /// Set the pressure output (24-bit code, little-endian)
    #[allow(dead_code)]
    pub fn set_pressure_code(&self, code: i32) {
        let [b0, b1, b2, _] = code.to_le_bytes();
        self.set_registers(0x28, &[b0, b1, b2]);
    }

    /// Set the temperature output
    #[allow(dead_code)]
    pub fn set_temperature_raw(&self, raw: i16) {
        self.set_registers(0x2B, &raw.to_le_bytes());
    }

    /// Queue FIFO slots
    #[allow(dead_code)]
    pub fn push_fifo(&self, slots: &[[u8; 3]]) {
        self.state.borrow_mut().fifo.extend(slots.iter().copied());
    }

    /// Keep the software reset bit set so reset never completes
    #[allow(dead_code)]
    pub fn hold_reset(&self, enable: bool) {
        self.state.borrow_mut().hold_reset = enable;
    }

    /// Inject a read failure on the next read operation
    #[allow(dead_code)]
    pub fn fail_next_read(&self) {
        self.state.borrow_mut().fail_next_read = true;
    }

    /// Inject a write failure on the next write operation
    #[allow(dead_code)]
    pub fn fail_next_write(&self) {
        self.state.borrow_mut().fail_next_write = true;
    }

    /// Let `count` reads succeed, then fail the following one
    #[allow(dead_code)]
    pub fn fail_read_after(&self, count: usize) {
        self.state.borrow_mut().fail_read_after = Some(count);
    }

    /// Let `count` writes succeed, then fail the following one
    #[allow(dead_code)]
    pub fn fail_write_after(&self, count: usize) {
        self.state.borrow_mut().fail_write_after = Some(count);
    }

    /// Get the operations log
    #[allow(dead_code)]
    pub fn operations(&self) -> Vec<Operation> {
        self.state.borrow().operations.clone()
    }

    /// Get only the writes from the operations log
    #[allow(dead_code)]
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.state
            .borrow()
            .operations
            .iter()
            .filter_map(|op| match op {
                Operation::Write { address, data } => Some((*address, data.clone())),
                Operation::Read { .. } => None,
            })
            .collect()
    }

    /// Clear the operations log
    #[allow(dead_code)]
    pub fn clear_operations(&self) {
        self.state.borrow_mut().operations.clear();
    }
}

/// Mock error type
#[derive(Debug, Clone, PartialEq)]
pub enum MockError {
    /// Simulated communication error
    Communication,
}

impl RegisterInterface for MockInterface {
    type Error = MockError;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        // Check for injected failure
        if state.fail_next_read {
            state.fail_next_read = false;
            return Err(MockError::Communication);
        }
        if let Some(remaining) = state.fail_read_after {
            if remaining == 0 {
                state.fail_read_after = None;
                return Err(MockError::Communication);
            }
            state.fail_read_after = Some(remaining - 1);
        }

        state.operations.push(Operation::Read {
            address,
            len: read_data.len(),
        });

        // FIFO output pops one slot per read
        if address == FIFO_DATA_OUT {
            let slot = state.fifo.pop_front().unwrap_or([0; 3]);
            let len = read_data.len().min(3);
            read_data[..len].copy_from_slice(&slot[..len]);
            return Ok(());
        }

        for (i, byte) in read_data.iter_mut().enumerate() {
            *byte = state.register(address.wrapping_add(i as u8));
        }

        Ok(())
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        // Check for injected failure
        if state.fail_next_write {
            state.fail_next_write = false;
            return Err(MockError::Communication);
        }
        if let Some(remaining) = state.fail_write_after {
            if remaining == 0 {
                state.fail_write_after = None;
                return Err(MockError::Communication);
            }
            state.fail_write_after = Some(remaining - 1);
        }

        state.operations.push(Operation::Write {
            address,
            data: write_data.to_vec(),
        });

        for (i, &byte) in write_data.iter().enumerate() {
            let reg_addr = address.wrapping_add(i as u8);
            let mut value = byte;

            // SWRESET and BOOT self-clear unless the test holds the reset
            if reg_addr == CTRL_REG2 && !state.hold_reset {
                value &= !0x84;
            }

            state.registers.insert(reg_addr, value);
        }

        Ok(())
    }
}

#[cfg(feature = "async")]
impl AsyncRegisterInterface for MockInterface {
    type Error = MockError;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        // Delegate to synchronous implementation
        RegisterInterface::read_register(self, address, size_bits, read_data)
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        // Delegate to synchronous implementation
        RegisterInterface::write_register(self, address, size_bits, write_data)
    }
}

impl Default for MockInterface {
    fn default() -> Self {
        Self::new()
    }
}
