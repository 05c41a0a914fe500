//! Unit tests for error handling and recovery

use crate::common::{create_mock_driver, default_md, MockDelay, MockError};
use ilps28qsw::fifo::{FifoConfig, FifoOperation};
use ilps28qsw::mode::step;
use ilps28qsw::Error;

/// Running at 25 Hz with QVAR and auto-increment enabled
fn running_with_qvar() -> (
    ilps28qsw::Ilps28qswDriver<crate::common::mock_interface::MockInterface>,
    crate::common::mock_interface::MockInterface,
) {
    let (driver, interface) = create_mock_driver();
    interface.set_registers(0x10, &[0x22, 0x08, 0x81]);
    interface.clear_operations();
    (driver, interface)
}

#[test]
fn test_read_failure_basic() {
    let (mut driver, interface) = create_mock_driver();
    interface.fail_next_read();

    let result = driver.read_data(&default_md());

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
}

#[test]
fn test_read_failure_recovery() {
    let (mut driver, interface) = create_mock_driver();
    interface.fail_next_read();
    assert!(driver.read_data(&default_md()).is_err());

    interface.set_temperature_raw(2000);
    let data = driver.read_data(&default_md()).unwrap();
    assert_eq!(data.heat.raw, 2000);
}

#[test]
fn test_write_failure_basic() {
    let (mut driver, interface) = create_mock_driver();
    interface.fail_next_write();

    let result = driver.set_fifo_mode(&FifoConfig {
        operation: FifoOperation::Stream,
        watermark: 4,
    });

    assert!(matches!(result, Err(Error::Bus(_))));
    assert!(interface.writes().is_empty());
}

#[test]
fn test_set_mode_initial_read_failure_writes_nothing() {
    let (mut driver, interface) = running_with_qvar();
    interface.fail_next_read();

    let result = driver.set_mode(&default_md());

    assert!(matches!(result, Err(Error::Bus(_))));
    assert!(!result.unwrap_err().is_partial());
    assert!(interface.operations().is_empty());
}

#[test]
fn test_set_mode_continues_after_failed_step() {
    let (mut driver, interface) = running_with_qvar();
    // Power-down succeeds, QVAR disable fails
    interface.fail_write_after(1);

    let result = driver.set_mode(&default_md());

    match result {
        Err(Error::PartiallyApplied {
            failed_steps,
            attempted_steps,
            source,
        }) => {
            assert_eq!(failed_steps, 1 << step::QVAR_DISABLE);
            assert_eq!(attempted_steps, 5);
            assert_eq!(source, MockError::Communication);
        }
        other => panic!("Expected PartiallyApplied, got {:?}", other),
    }

    // Remaining steps still reached the bus
    let writes = interface.writes();
    assert_eq!(writes.len(), 4);
    assert_eq!(writes[3], (0x10, vec![0x22, 0x18, 0x81]));
}

#[test]
fn test_set_mode_fifo_step_failure() {
    let (mut driver, interface) = running_with_qvar();
    // Power-down, QVAR disable and interleave selection succeed
    interface.fail_write_after(3);

    let result = driver.set_mode(&default_md());

    assert!(matches!(
        result,
        Err(Error::PartiallyApplied {
            failed_steps: 0b0_1000,
            attempted_steps: 5,
            ..
        })
    ));
    assert_eq!(interface.get_register(0x10), 0x22);
    assert_eq!(interface.get_register(0x11), 0x18);
}

#[test]
fn test_set_mode_step_numbers_fixed_when_steps_skipped() {
    let (mut driver, interface) = create_mock_driver();
    // Powered down with QVAR off: power-down and QVAR disable are skipped
    interface.set_registers(0x10, &[0x00, 0x08, 0x01]);
    interface.fail_write_after(0);

    let result = driver.set_mode(&default_md());

    match result {
        Err(Error::PartiallyApplied {
            failed_steps,
            attempted_steps,
            ..
        }) => {
            assert_eq!(failed_steps, 1 << step::INTERLEAVE_CTRL);
            assert_eq!(attempted_steps, 3);
        }
        other => panic!("Expected PartiallyApplied, got {:?}", other),
    }
}

#[test]
fn test_set_mode_every_step_failing() {
    let (mut driver, interface) = running_with_qvar();
    interface.fail_write_after(0);

    let err = driver.set_mode(&default_md()).unwrap_err();

    assert!(err.is_partial());
    // Only the first write was failed, the rest went through
    assert_eq!(interface.writes().len(), 4);
}

#[test]
fn test_wrong_device_reported() {
    let interface = crate::common::mock_interface::MockInterface::new();
    interface.set_who_am_i(0x00);

    match ilps28qsw::Ilps28qswDriver::new(interface) {
        Err(Error::InvalidDevice(value)) => assert_eq!(value, 0x00),
        _ => panic!("Expected InvalidDevice"),
    }
}

#[test]
fn test_init_reset_write_failure() {
    let (mut driver, interface) = create_mock_driver();
    interface.fail_next_write();

    let result = driver.init(&mut MockDelay);

    assert!(matches!(result, Err(Error::Bus(_))));
}

#[test]
fn test_init_poll_failure_reported_as_bus_error() {
    let (mut driver, interface) = create_mock_driver();
    interface.clear_operations();
    // Reset request goes through, the first completion poll fails
    interface.fail_read_after(1);

    let result = driver.init(&mut MockDelay);

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
    assert_eq!(interface.writes(), vec![(0x11, vec![0x04])]);
}

#[test]
fn test_init_timeout() {
    let (mut driver, interface) = create_mock_driver();
    interface.hold_reset(true);

    let result = driver.init(&mut MockDelay);

    assert!(matches!(result, Err(Error::InitializationTimeout)));
    // DriverReady never written
    assert_eq!(interface.get_register(0x12), 0x00);
}

#[test]
fn test_bus_error_conversion() {
    let err: Error<MockError> = MockError::Communication.into();
    assert!(matches!(err, Error::Bus(MockError::Communication)));
    assert!(!err.is_partial());
}
