//! Configuration tests

use chrono::{TimeZone, Utc};

use crate::*;

#[test]
fn test_default_config() {
    let config = GeneratorConfig::default();
    assert_eq!(config.epoch(), Epoch::EKO);
    assert_eq!(config.process_id(), 0);
    assert_eq!(config.worker_id(), 0);
    assert_eq!(config.layout(), Layout::CANONICAL);
    assert!(config.spin_enabled());
}

#[test]
fn test_builder_settings() {
    let config = GeneratorConfig::builder()
        .epoch(Epoch::DISCORD)
        .process_id(4)
        .worker_id(5)
        .enable_spin(false)
        .spin_loops(3)
        .spin_yield_every(1)
        .build()
        .unwrap();

    assert_eq!(config.epoch(), Epoch::DISCORD);
    assert_eq!(config.process_id(), 4);
    assert_eq!(config.worker_id(), 5);
    assert!(!config.spin_enabled());
    assert_eq!(config.spin_loops(), 3);
    assert_eq!(config.spin_yield_every(), 1);
}

#[test]
fn test_wider_node_fields() {
    let layout = Layout::new(10, 6, 6, FieldOrder::WorkerHigh).unwrap();
    let config = GeneratorConfig::builder()
        .layout(layout)
        .process_id(63)
        .worker_id(63)
        .build()
        .unwrap();
    assert_eq!(config.layout().max_process_id(), 63);

    let generator = SnowflakeGenerator::with_config(config);
    assert!(generator.generate().is_ok());
}

#[test]
fn test_epoch_from_text() {
    let epoch: Epoch = "2019-04-15T04:12:00Z".parse().unwrap();
    assert_eq!(epoch, Epoch::EKO);
    assert_eq!("1,555,301,520,000".parse::<Epoch>().unwrap(), Epoch::EKO);
    assert!(matches!(
        "yesterday".parse::<Epoch>(),
        Err(Error::InvalidEpochFormat { .. })
    ));
}

#[test]
fn test_epoch_above_signed_range_is_rejected() {
    let result = GeneratorConfig::builder()
        .epoch(Epoch::from_millis(u64::MAX))
        .build();
    assert!(matches!(result, Err(Error::EpochOutOfRange { .. })));
}

#[test]
fn test_sequence_step_bounds() {
    assert_eq!(
        GeneratorConfig::builder().sequence_step(0).build(),
        Err(Error::OutOfRange {
            field: Field::SequenceStep,
            value: 0,
            max: 4095
        })
    );
    assert_eq!(
        GeneratorConfig::builder().sequence_step(4096).build(),
        Err(Error::OutOfRange {
            field: Field::SequenceStep,
            value: 4096,
            max: 4095
        })
    );
    let config = GeneratorConfig::builder().sequence_step(4095).build().unwrap();
    assert_eq!(config.sequence_step(), 4095);
}

#[test]
fn test_pre_unix_datetime_is_not_clamped() {
    let sixties = Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap();
    assert!(matches!(
        Epoch::try_from(sixties),
        Err(Error::EpochOutOfRange { .. })
    ));
}
