//! Simulated ADC codec.
//!
//! Stands in for the hardware codec on a desktop host. Every read produces
//! a continuous sine tone, identical on every configured channel, so the
//! full acquisition path can run without a board attached.

use std::f64::consts::PI;
use std::sync::Arc;

use parking_lot::Mutex;

use adc_capture_core::models::config::BYTES_PER_SAMPLE;
use adc_capture_core::models::error::CodecStatus;
use adc_capture_core::traits::codec::{CodecBackend, DataInterfaceConfig, DeviceDirection, SampleFormat};

/// A4.
pub const DEFAULT_TONE_HZ: f64 = 440.0;
/// About half of 16-bit full scale.
pub const DEFAULT_AMPLITUDE: f64 = 16000.0;

/// Failures to inject, one per setup stage plus one read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimFaults {
    pub fail_data_interface: bool,
    pub fail_device: bool,
    /// Status returned by `open` instead of success.
    pub open_status: Option<i32>,
    /// Zero-based read (counted across the codec's lifetime) that fails.
    pub fail_read_at: Option<u32>,
}

/// Lifetime counters of a `SimulatedAdc`, shared with the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimCounters {
    pub interfaces_created: u32,
    pub interfaces_deleted: u32,
    pub devices_created: u32,
    pub devices_deleted: u32,
    pub opens: u32,
    pub closes: u32,
    pub reads: u32,
    pub failed_reads: u32,
}

impl SimCounters {
    /// Every handle deleted and every open matched by a close.
    pub fn is_balanced(&self) -> bool {
        self.interfaces_created == self.interfaces_deleted
            && self.devices_created == self.devices_deleted
            && self.opens == self.closes
    }

    pub fn live_handles(&self) -> u32 {
        (self.interfaces_created - self.interfaces_deleted) + (self.devices_created - self.devices_deleted)
    }
}

/// Data interface handle.
#[derive(Debug)]
pub struct SimInterface {
    cfg: DataInterfaceConfig,
}

/// Input device handle. Tracks tone phase across reads.
#[derive(Debug)]
pub struct SimDevice {
    channels: usize,
    sample_rate: u32,
    opened: bool,
    frame_offset: u64,
}

/// Host-side `CodecBackend` producing a sine tone.
pub struct SimulatedAdc {
    faults: SimFaults,
    counters: Arc<Mutex<SimCounters>>,
    tone_hz: f64,
    amplitude: f64,
}

impl SimulatedAdc {
    pub fn new() -> Self {
        Self {
            faults: SimFaults::default(),
            counters: Arc::new(Mutex::new(SimCounters::default())),
            tone_hz: DEFAULT_TONE_HZ,
            amplitude: DEFAULT_AMPLITUDE,
        }
    }

    pub fn with_faults(mut self, faults: SimFaults) -> Self {
        self.faults = faults;
        self
    }

    pub fn with_tone(mut self, tone_hz: f64, amplitude: f64) -> Self {
        self.tone_hz = tone_hz;
        self.amplitude = amplitude;
        self
    }

    /// Handle to the live counters; stays valid after the codec is moved
    /// into an `Acquirer`.
    pub fn counters(&self) -> Arc<Mutex<SimCounters>> {
        Arc::clone(&self.counters)
    }

    fn sample_at(&self, frame: u64, sample_rate: u32) -> i16 {
        let t = frame as f64 / f64::from(sample_rate);
        let value = self.amplitude * (2.0 * PI * self.tone_hz * t).sin();
        value.round().clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
    }
}

impl Default for SimulatedAdc {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecBackend for SimulatedAdc {
    type DataInterface = SimInterface;
    type Device = SimDevice;

    fn new_data_interface(&mut self, cfg: &DataInterfaceConfig) -> Option<SimInterface> {
        if self.faults.fail_data_interface {
            log::error!("simulated ADC: data interface refused (unit {})", cfg.unit_id);
            return None;
        }
        self.counters.lock().interfaces_created += 1;
        log::debug!(
            "simulated ADC: data interface for unit {} channels {:?} at {} Hz",
            cfg.unit_id,
            cfg.channels.as_slice(),
            cfg.sample_rate_hz
        );
        Some(SimInterface { cfg: cfg.clone() })
    }

    fn new_device(&mut self, direction: DeviceDirection, data_if: &SimInterface) -> Option<SimDevice> {
        if self.faults.fail_device || direction != DeviceDirection::Input {
            log::error!("simulated ADC: cannot create {:?} device", direction);
            return None;
        }
        self.counters.lock().devices_created += 1;
        Some(SimDevice {
            channels: data_if.cfg.channels.len(),
            sample_rate: data_if.cfg.sample_rate_hz,
            opened: false,
            frame_offset: 0,
        })
    }

    fn open(&mut self, device: &mut SimDevice, format: &SampleFormat) -> Result<(), CodecStatus> {
        if let Some(code) = self.faults.open_status {
            log::error!("simulated ADC: open failed with {}", code);
            return Err(CodecStatus(code));
        }
        if format.channels == 0 || format.sample_rate == 0 {
            return Err(CodecStatus::DRIVER_ERROR);
        }
        device.channels = usize::from(format.channels);
        device.sample_rate = format.sample_rate;
        device.opened = true;
        self.counters.lock().opens += 1;
        Ok(())
    }

    fn read(&mut self, device: &mut SimDevice, buf: &mut [u8]) -> Result<usize, CodecStatus> {
        if !device.opened {
            log::warn!("simulated ADC: read on a device that is not open");
            return Err(CodecStatus::WRONG_STATE);
        }

        let index = {
            let mut counters = self.counters.lock();
            let index = counters.reads + counters.failed_reads;
            if self.faults.fail_read_at == Some(index) {
                counters.failed_reads += 1;
                None
            } else {
                counters.reads += 1;
                Some(index)
            }
        };
        if index.is_none() {
            log::warn!("simulated ADC: injected read failure");
            return Err(CodecStatus::DRIVER_ERROR);
        }

        let frame_bytes = device.channels * BYTES_PER_SAMPLE;
        let mut frames = 0u64;
        for frame in buf.chunks_exact_mut(frame_bytes) {
            let sample = self.sample_at(device.frame_offset + frames, device.sample_rate);
            for slot in frame.chunks_exact_mut(BYTES_PER_SAMPLE) {
                slot.copy_from_slice(&sample.to_le_bytes());
            }
            frames += 1;
        }
        device.frame_offset += frames;

        Ok(buf.len())
    }

    fn close(&mut self, device: &mut SimDevice) {
        device.opened = false;
        self.counters.lock().closes += 1;
    }

    fn delete_device(&mut self, _device: SimDevice) {
        self.counters.lock().devices_deleted += 1;
    }

    fn delete_data_interface(&mut self, _data_if: SimInterface) {
        self.counters.lock().interfaces_deleted += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adc_capture_core::models::config::AcquisitionConfig;
    use adc_capture_core::models::config::AcquireOptions;
    use adc_capture_core::processing::pcm;

    fn interface_config(channels: &[u8]) -> DataInterfaceConfig {
        AcquisitionConfig::new(16, 0, channels, channels.len(), 16000, 2)
            .validate()
            .unwrap()
            .data_interface_config(&AcquireOptions::default())
    }

    fn format(channels: u8) -> SampleFormat {
        SampleFormat {
            sample_rate: 16000,
            channels,
            bits_per_sample: 16,
        }
    }

    #[test]
    fn tone_is_identical_across_channels() {
        let mut adc = SimulatedAdc::new();
        let data_if = adc.new_data_interface(&interface_config(&[0, 3])).unwrap();
        let mut dev = adc.new_device(DeviceDirection::Input, &data_if).unwrap();
        adc.open(&mut dev, &format(2)).unwrap();

        let mut buf = vec![0u8; 64];
        assert_eq!(adc.read(&mut dev, &mut buf), Ok(64));

        let samples: Vec<i16> = pcm::decode_le(&buf).collect();
        for frame in samples.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert_eq!(samples[0], 0);
        assert!(samples.iter().all(|s| s.unsigned_abs() <= 16000));
    }

    #[test]
    fn phase_continues_across_reads() {
        let mut adc = SimulatedAdc::new();
        let data_if = adc.new_data_interface(&interface_config(&[0])).unwrap();
        let mut dev = adc.new_device(DeviceDirection::Input, &data_if).unwrap();
        adc.open(&mut dev, &format(1)).unwrap();

        let mut first = vec![0u8; 8];
        let mut second = vec![0u8; 8];
        adc.read(&mut dev, &mut first).unwrap();
        adc.read(&mut dev, &mut second).unwrap();

        let expected = adc.sample_at(4, 16000);
        assert_eq!(pcm::decode_le(&second).next(), Some(expected));
    }

    #[test]
    fn read_before_open_is_wrong_state() {
        let mut adc = SimulatedAdc::new();
        let data_if = adc.new_data_interface(&interface_config(&[0])).unwrap();
        let mut dev = adc.new_device(DeviceDirection::Input, &data_if).unwrap();

        let mut buf = [0u8; 2];
        assert_eq!(adc.read(&mut dev, &mut buf), Err(CodecStatus::WRONG_STATE));
    }

    #[test]
    fn output_devices_are_refused() {
        let mut adc = SimulatedAdc::new();
        let data_if = adc.new_data_interface(&interface_config(&[0])).unwrap();

        assert!(adc.new_device(DeviceDirection::Output, &data_if).is_none());
        assert_eq!(adc.counters().lock().devices_created, 0);
    }

    #[test]
    fn counters_track_lifecycle() {
        let mut adc = SimulatedAdc::new();
        let counters = adc.counters();
        let data_if = adc.new_data_interface(&interface_config(&[0])).unwrap();
        let mut dev = adc.new_device(DeviceDirection::Input, &data_if).unwrap();
        adc.open(&mut dev, &format(1)).unwrap();
        assert_eq!(counters.lock().live_handles(), 2);

        adc.close(&mut dev);
        adc.delete_device(dev);
        adc.delete_data_interface(data_if);

        assert!(counters.lock().is_balanced());
        assert_eq!(counters.lock().live_handles(), 0);
    }

    #[test]
    fn injected_read_failure_hits_one_read() {
        let mut adc = SimulatedAdc::new().with_faults(SimFaults {
            fail_read_at: Some(1),
            ..SimFaults::default()
        });
        let data_if = adc.new_data_interface(&interface_config(&[0])).unwrap();
        let mut dev = adc.new_device(DeviceDirection::Input, &data_if).unwrap();
        adc.open(&mut dev, &format(1)).unwrap();

        let mut buf = [0u8; 4];
        assert!(adc.read(&mut dev, &mut buf).is_ok());
        assert_eq!(adc.read(&mut dev, &mut buf), Err(CodecStatus::DRIVER_ERROR));
        assert!(adc.read(&mut dev, &mut buf).is_ok());
        assert_eq!(adc.counters().lock().failed_reads, 1);
    }
}
