//! Unit tests for FIFO configuration and batch reads

use crate::common::{create_mock_driver, default_md, Operation};
use ilps28qsw::fifo::{FifoConfig, FifoOperation};
use ilps28qsw::{Error, FifoSample, FullScale, Md, SampleKind, FIFO_DEPTH};

type Samples = heapless::Vec<FifoSample, FIFO_DEPTH>;

#[test]
fn test_watermark_zero_disables_stop_on_watermark() {
    let (mut driver, interface) = create_mock_driver();

    // Stop-on-watermark previously enabled
    interface.set_registers(0x14, &[0x08, 0x20]);

    driver
        .set_fifo_mode(&FifoConfig {
            operation: FifoOperation::Fifo,
            watermark: 0,
        })
        .unwrap();

    assert_eq!(interface.get_register(0x14) & 0x08, 0x00);
    assert_eq!(interface.get_register(0x15), 0);
}

#[test]
fn test_watermark_enables_stop_on_watermark() {
    let (mut driver, interface) = create_mock_driver();

    driver
        .set_fifo_mode(&FifoConfig {
            operation: FifoOperation::Stream,
            watermark: 50,
        })
        .unwrap();

    assert_eq!(interface.get_register(0x14), 0x0A);
    assert_eq!(interface.get_register(0x15), 50);
}

#[test]
fn test_fifo_mode_written_in_one_burst() {
    let (mut driver, interface) = create_mock_driver();
    interface.clear_operations();

    driver
        .set_fifo_mode(&FifoConfig {
            operation: FifoOperation::StreamToFifo,
            watermark: 10,
        })
        .unwrap();

    assert_eq!(
        interface.writes(),
        vec![(0x14, vec![0x0F, 10])],
        "FIFO_CTRL and FIFO_WTM must be written together"
    );
}

#[test]
fn test_fifo_mode_preserves_interleave_bit() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_register(0x14, 0x10);

    driver
        .set_fifo_mode(&FifoConfig {
            operation: FifoOperation::Stream,
            watermark: 0,
        })
        .unwrap();

    assert_eq!(interface.get_register(0x14), 0x12);
}

#[test]
fn test_fifo_mode_roundtrip() {
    let (mut driver, _interface) = create_mock_driver();

    for operation in [
        FifoOperation::Bypass,
        FifoOperation::Fifo,
        FifoOperation::Stream,
        FifoOperation::BypassToFifo,
        FifoOperation::BypassToStream,
        FifoOperation::StreamToFifo,
    ] {
        for watermark in [0, 1, 64, 127] {
            let config = FifoConfig {
                operation,
                watermark,
            };
            driver.set_fifo_mode(&config).unwrap();
            assert_eq!(driver.fifo_mode().unwrap(), config);
        }
    }
}

#[test]
fn test_fifo_reserved_mode_decodes_bypass() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_register(0x14, 0x03);

    assert_eq!(driver.fifo_mode().unwrap().operation, FifoOperation::Bypass);
}

#[test]
fn test_watermark_out_of_range_rejected() {
    let (mut driver, interface) = create_mock_driver();
    interface.clear_operations();

    let result = driver.set_fifo_mode(&FifoConfig {
        operation: FifoOperation::Fifo,
        watermark: 128,
    });

    assert!(matches!(result, Err(Error::InvalidConfig)));
    assert!(interface.operations().is_empty(), "No bus access expected");
}

#[test]
fn test_fifo_level() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_register(0x25, 42);

    assert_eq!(driver.fifo_level().unwrap(), 42);
}

#[test]
fn test_fifo_read_performs_exactly_count_reads() {
    let (mut driver, interface) = create_mock_driver();
    interface.push_fifo(&[[0x00, 0x00, 0x10], [0x00, 0x00, 0x20], [0x00, 0x00, 0x30]]);
    interface.clear_operations();

    let mut samples = Samples::new();
    driver.fifo_read(2, &default_md(), &mut samples).unwrap();

    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].hpa, 256.0);
    assert_eq!(samples[1].hpa, 512.0);
    assert_eq!(
        interface.operations(),
        vec![
            Operation::Read {
                address: 0x78,
                len: 3
            },
            Operation::Read {
                address: 0x78,
                len: 3
            },
        ]
    );
}

#[test]
fn test_fifo_read_demultiplexes_interleaved_samples() {
    let (mut driver, interface) = create_mock_driver();
    interface.push_fifo(&[
        [0x00, 0x00, 0x10], // pressure
        [0x01, 0x10, 0x00], // QVAR
        [0x00, 0x00, 0x20], // pressure
    ]);

    let md = Md {
        interleaved_mode: true,
        fs: FullScale::Hpa4060,
        ..default_md()
    };
    let mut samples = Samples::new();
    driver.fifo_read(3, &md, &mut samples).unwrap();

    assert_eq!(samples[0].kind, SampleKind::Pressure);
    assert_eq!(samples[0].hpa, 512.0);
    assert_eq!(samples[0].qvar_lsb, 0);

    assert_eq!(samples[1].kind, SampleKind::Qvar);
    assert_eq!(samples[1].hpa, 0.0);
    assert_eq!(samples[1].qvar_lsb, 0x1001);

    assert_eq!(samples[2].kind, SampleKind::Pressure);
    assert_eq!(samples[2].hpa, 1024.0);
}

#[test]
fn test_fifo_read_zero_count() {
    let (mut driver, interface) = create_mock_driver();
    interface.clear_operations();

    let mut samples = Samples::new();
    driver.fifo_read(0, &default_md(), &mut samples).unwrap();

    assert!(samples.is_empty());
    assert!(interface.operations().is_empty());
}

#[test]
fn test_fifo_read_full_depth() {
    let (mut driver, interface) = create_mock_driver();
    let slots: Vec<[u8; 3]> = (0..FIFO_DEPTH).map(|i| [0x00, i as u8, 0x00]).collect();
    interface.push_fifo(&slots);

    let mut samples = Samples::new();
    driver
        .fifo_read(FIFO_DEPTH as u8, &default_md(), &mut samples)
        .unwrap();

    assert_eq!(samples.len(), FIFO_DEPTH);
    assert_eq!(samples[127].raw, 127 << 16);
}

#[test]
fn test_fifo_read_over_depth_rejected() {
    let (mut driver, interface) = create_mock_driver();
    interface.clear_operations();

    let mut samples = Samples::new();
    samples.push(FifoSample::default()).unwrap();
    let result = driver.fifo_read(129, &default_md(), &mut samples);

    assert!(matches!(result, Err(Error::InvalidConfig)));
    assert!(interface.operations().is_empty());
    assert_eq!(samples.len(), 1, "Output buffer untouched");
}

#[test]
fn test_fifo_read_clears_previous_samples() {
    let (mut driver, interface) = create_mock_driver();
    interface.push_fifo(&[[0x00, 0x00, 0x10]]);

    let mut samples = Samples::new();
    samples.push(FifoSample::default()).unwrap();
    samples.push(FifoSample::default()).unwrap();
    driver.fifo_read(1, &default_md(), &mut samples).unwrap();

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].hpa, 256.0);
}

#[test]
fn test_fifo_read_failure_keeps_remaining_samples() {
    let (mut driver, interface) = create_mock_driver();
    interface.push_fifo(&[
        [0x00, 0x00, 0x10],
        [0x00, 0x00, 0x20],
        [0x00, 0x00, 0x30],
        [0x00, 0x00, 0x40],
    ]);
    // First FIFO read succeeds, the second fails
    interface.fail_read_after(1);
    interface.clear_operations();

    let mut samples = Samples::new();
    let result = driver.fifo_read(4, &default_md(), &mut samples);

    match result {
        Err(Error::PartiallyApplied {
            failed_steps,
            attempted_steps,
            ..
        }) => {
            assert_eq!(failed_steps, 0b0010);
            assert_eq!(attempted_steps, 4);
        }
        other => panic!("Expected PartiallyApplied, got {:?}", other),
    }

    // Every read was still issued; the failed one is not logged by the mock
    let reads = interface
        .operations()
        .iter()
        .filter(|op| matches!(op, Operation::Read { address: 0x78, .. }))
        .count();
    assert_eq!(reads, 3);

    // Slots line up with FIFO order, the failed slot is a placeholder
    assert_eq!(samples.len(), 4);
    assert_eq!(samples[0].hpa, 256.0);
    assert_eq!(samples[1], FifoSample::default());
    assert_eq!(samples[2].hpa, 512.0);
    assert_eq!(samples[3].hpa, 768.0);
}
