use std::sync::Arc;

use approx::assert_relative_eq;

use adc_capture_core::{AcquireOptions, AcquisitionConfig, AdcError, MemoryClass, NullLog};
use adc_capture_sim::{
    host_acquirer, HeapAllocator, SimAcquirer, SimCounters, SimFaults, SimulatedAdc,
};

fn scenario_a() -> AcquisitionConfig {
    AcquisitionConfig::new(10240, 0, &[0, 3], 2, 16000, 0)
}

fn quiet(adc: SimulatedAdc, heap: HeapAllocator) -> SimAcquirer {
    let mut acquirer = host_acquirer(adc, heap);
    acquirer.set_log(Arc::new(NullLog));
    acquirer
}

#[test]
fn scenario_a_full_capture() {
    let adc = SimulatedAdc::new();
    let counters = adc.counters();
    let heap = HeapAllocator::new();
    let heap_stats = heap.stats();
    let mut acquirer = quiet(adc, heap);

    let capture = acquirer.acquire(&scenario_a()).unwrap();

    assert_eq!(capture.len(), 40960);
    let report = capture.report();
    assert_eq!(report.samples_observed(), 20480);
    assert!(report.stats.min < 0 && report.stats.max > 0);
    assert!(report.stats.max <= 16000 && report.stats.min >= -16000);
    assert_relative_eq!(report.duration_secs, 0.64);
    assert!(report.checksum.is_some());

    assert!(counters.lock().is_balanced());
    assert_eq!(counters.lock().live_handles(), 0);
    assert!(heap_stats.lock().is_balanced());
    assert_eq!(heap_stats.lock().peak_bytes, 40960);
}

#[test]
fn config_errors_never_reach_the_codec() {
    let adc = SimulatedAdc::new();
    let counters = adc.counters();
    let mut acquirer = quiet(adc, HeapAllocator::new());

    let too_many = AcquisitionConfig::new(16, 0, &[0; 11], 11, 16000, 0);
    let short_list = AcquisitionConfig::new(16, 0, &[0], 3, 16000, 0);

    assert!(matches!(
        acquirer.acquire(&too_many),
        Err(AdcError::InvalidChannelCount { .. })
    ));
    assert!(matches!(
        acquirer.acquire(&short_list),
        Err(AdcError::InvalidChannelList { .. })
    ));
    assert_eq!(*counters.lock(), SimCounters::default());
}

#[test]
fn each_setup_fault_unwinds_completely() {
    let cases = [
        (
            SimFaults {
                fail_data_interface: true,
                ..SimFaults::default()
            },
            AdcError::CodecInterfaceInitFailed,
        ),
        (
            SimFaults {
                fail_device: true,
                ..SimFaults::default()
            },
            AdcError::CodecDeviceCreateFailed,
        ),
        (
            SimFaults {
                open_status: Some(-4),
                ..SimFaults::default()
            },
            AdcError::CodecOpenFailed(-4),
        ),
    ];

    for (faults, expected) in cases {
        let adc = SimulatedAdc::new().with_faults(faults);
        let counters = adc.counters();
        let heap = HeapAllocator::new();
        let heap_stats = heap.stats();
        let mut acquirer = quiet(adc, heap);

        assert_eq!(acquirer.acquire(&scenario_a()).unwrap_err(), expected);
        assert!(counters.lock().is_balanced());
        assert_eq!(heap_stats.lock().allocations, 0);
    }
}

#[test]
fn internal_ram_exhaustion_is_out_of_memory() {
    let adc = SimulatedAdc::new();
    let counters = adc.counters();
    let heap = HeapAllocator::new().with_internal_limit(32 * 1024);
    let mut acquirer = quiet(adc, heap);

    let err = acquirer.acquire(&scenario_a()).unwrap_err();

    assert_eq!(err, AdcError::OutOfMemory { bytes: 40960 });
    let counters = counters.lock();
    assert_eq!(counters.opens, 1);
    assert_eq!(counters.closes, 1);
    assert!(counters.is_balanced());
}

#[test]
fn external_memory_avoids_internal_cap() {
    let heap = HeapAllocator::new().with_internal_limit(32 * 1024);
    let mut acquirer = quiet(SimulatedAdc::new(), heap);
    acquirer.set_options(AcquireOptions {
        memory_class: MemoryClass::External,
        ..AcquireOptions::default()
    });

    assert_eq!(acquirer.acquire(&scenario_a()).unwrap().len(), 40960);
}

#[test]
fn read_failure_on_final_chunk_returns_empty() {
    let adc = SimulatedAdc::new().with_faults(SimFaults {
        fail_read_at: Some(2),
        ..SimFaults::default()
    });
    let counters = adc.counters();
    let heap = HeapAllocator::new();
    let heap_stats = heap.stats();
    let mut acquirer = quiet(adc, heap);
    acquirer.set_options(AcquireOptions {
        chunk_count: 3,
        ..AcquireOptions::default()
    });

    let capture = acquirer.acquire(&AcquisitionConfig::default()).unwrap();

    assert!(capture.is_empty());
    assert_eq!(capture.report().chunks_read, 2);
    assert!(counters.lock().is_balanced());
    assert!(heap_stats.lock().is_balanced());
}

#[test]
fn repeated_acquisitions_stay_balanced() {
    let adc = SimulatedAdc::new();
    let counters = adc.counters();
    let mut acquirer = quiet(adc, HeapAllocator::new());
    let config = AcquisitionConfig::for_pin(2);

    for _ in 0..3 {
        let capture = acquirer.acquire(&config).unwrap();
        assert_eq!(capture.len(), config.chunk_samples * 2);
    }

    let counters = counters.lock();
    assert_eq!(counters.interfaces_created, 3);
    assert!(counters.is_balanced());
}

#[test]
fn report_exports_as_json() {
    let mut acquirer = quiet(SimulatedAdc::new(), HeapAllocator::new());

    let capture = acquirer.acquire(&scenario_a()).unwrap();
    let json = capture.report().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["channels"], serde_json::json!([0, 3]));
    assert_eq!(value["chunks_read"], 1);
    assert_eq!(value["stats"]["samples"], 20480);
}
