use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::error::AdcError;
use crate::traits::allocator::MemoryClass;
use crate::traits::codec::{DataInterfaceConfig, SampleFormat};

/// Hardware limit on channels sampled in one conversion sequence.
pub const MAX_CHANNELS: usize = 10;

/// Samples are always 16-bit.
pub const BITS_PER_SAMPLE: u8 = 16;
pub const BYTES_PER_SAMPLE: usize = 2;

/// Bounded, ordered list of ADC channel identifiers (at most `MAX_CHANNELS`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelList(heapless::Vec<u8, MAX_CHANNELS>);

impl ChannelList {
    /// Build from the first `count` entries of `channels`.
    pub fn from_prefix(channels: &[u8], count: usize) -> Result<Self, AdcError> {
        if count > MAX_CHANNELS {
            return Err(AdcError::InvalidChannelCount {
                requested: count,
                max: MAX_CHANNELS,
            });
        }
        if channels.len() < count {
            return Err(AdcError::InvalidChannelList {
                provided: channels.len(),
                required: count,
            });
        }

        let mut list = heapless::Vec::new();
        for &channel in channels.iter().take(count) {
            list.push(channel).map_err(|_| AdcError::InvalidChannelCount {
                requested: count,
                max: MAX_CHANNELS,
            })?;
        }
        Ok(Self(list))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// ADC input attenuation (raw values follow the hardware driver's table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attenuation {
    Db0,
    Db2_5,
    Db6,
    Db12,
}

impl Attenuation {
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Db0 => 0,
            Self::Db2_5 => 1,
            Self::Db6 => 2,
            Self::Db12 => 3,
        }
    }
}

impl TryFrom<i32> for Attenuation {
    type Error = i32;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Db0),
            1 => Ok(Self::Db2_5),
            2 => Ok(Self::Db6),
            3 => Ok(Self::Db12),
            other => Err(other),
        }
    }
}

impl fmt::Display for Attenuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Db0 => "0 dB",
            Self::Db2_5 => "2.5 dB",
            Self::Db6 => "6 dB",
            Self::Db12 => "12 dB",
        };
        f.write_str(label)
    }
}

/// Caller-supplied acquisition parameters.
///
/// Unchecked as constructed; `validate` turns it into an `AcquisitionPlan`
/// without touching any hardware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Samples per channel in one chunk.
    pub chunk_samples: usize,

    /// Hardware ADC unit selector (0 = ADC_UNIT_1).
    pub unit_id: i32,

    /// Channel identifiers; only the first `channel_num` are used.
    pub channel_list: Vec<u8>,

    /// Number of channels to sample (max 10).
    pub channel_num: usize,

    pub sample_rate_hz: u32,

    /// Raw attenuation level, passed through to the codec.
    pub atten: i32,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            chunk_samples: 4096,
            unit_id: 0,
            channel_list: vec![0],
            channel_num: 1,
            sample_rate_hz: 16000,
            atten: Attenuation::Db6.as_raw(),
        }
    }
}

impl AcquisitionConfig {
    pub fn new(
        chunk_samples: usize,
        unit_id: i32,
        channel_list: &[u8],
        channel_num: usize,
        sample_rate_hz: u32,
        atten: i32,
    ) -> Self {
        Self {
            chunk_samples,
            unit_id,
            channel_list: channel_list.to_vec(),
            channel_num,
            sample_rate_hz,
            atten,
        }
    }

    /// Single-channel config for a board microphone GPIO.
    ///
    /// GPIO1 → unit 0 channel 0, GPIO2 → unit 0 channel 1. Other pins use
    /// the default unit and channel.
    pub fn for_pin(gpio: u8) -> Self {
        let (unit_id, channel) = match gpio {
            1 => (0, 0),
            2 => (0, 1),
            _ => (0, 0),
        };
        Self {
            unit_id,
            channel_list: vec![channel],
            channel_num: 1,
            ..Self::default()
        }
    }

    pub fn with_attenuation(mut self, atten: Attenuation) -> Self {
        self.atten = atten.as_raw();
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the config and derive the plan for one acquisition.
    ///
    /// Channel count is checked before the channel list; both before
    /// anything else.
    pub fn validate(&self) -> Result<AcquisitionPlan, AdcError> {
        let channels = ChannelList::from_prefix(&self.channel_list, self.channel_num)?;
        if channels.is_empty() {
            return Err(AdcError::InvalidChannelCount {
                requested: 0,
                max: MAX_CHANNELS,
            });
        }
        if self.sample_rate_hz == 0 {
            return Err(AdcError::InvalidSampleRate);
        }

        let chunk_bytes = self
            .chunk_samples
            .checked_mul(channels.len())
            .and_then(|n| n.checked_mul(BYTES_PER_SAMPLE))
            .ok_or(AdcError::InvalidChunkSize {
                chunk_samples: self.chunk_samples,
                channels: channels.len(),
            })?;

        Ok(AcquisitionPlan {
            unit_id: self.unit_id,
            channels,
            chunk_samples: self.chunk_samples,
            chunk_bytes,
            sample_rate_hz: self.sample_rate_hz,
            atten: self.atten,
        })
    }
}

/// Validated acquisition parameters. The chunk byte size is fixed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionPlan {
    unit_id: i32,
    channels: ChannelList,
    chunk_samples: usize,
    chunk_bytes: usize,
    sample_rate_hz: u32,
    atten: i32,
}

impl AcquisitionPlan {
    pub fn unit_id(&self) -> i32 {
        self.unit_id
    }

    pub fn channels(&self) -> &ChannelList {
        &self.channels
    }

    pub fn chunk_samples(&self) -> usize {
        self.chunk_samples
    }

    /// `chunk_samples × channels × 2`.
    pub fn chunk_bytes(&self) -> usize {
        self.chunk_bytes
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn atten(&self) -> i32 {
        self.atten
    }

    pub fn sample_format(&self) -> SampleFormat {
        SampleFormat {
            sample_rate: self.sample_rate_hz,
            channels: u8::try_from(self.channels.len()).unwrap_or(u8::MAX),
            bits_per_sample: BITS_PER_SAMPLE,
        }
    }

    pub fn data_interface_config(&self, options: &AcquireOptions) -> DataInterfaceConfig {
        DataInterfaceConfig {
            unit_id: self.unit_id,
            channels: self.channels.clone(),
            sample_rate_hz: self.sample_rate_hz,
            atten: self.atten,
            max_store_buf_size: options.max_store_buf_size,
            conv_frame_size: options.conv_frame_size,
        }
    }
}

/// Knobs for how an acquisition runs, independent of what is sampled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireOptions {
    /// Chunks to read; only the last one is returned.
    pub chunk_count: u32,

    /// Cooperative yield after every read.
    pub yield_interval: Duration,

    /// Core the acquisition task is pinned to (reported in logs).
    pub task_core: u8,

    /// ADC driver store buffer size in bytes.
    pub max_store_buf_size: usize,

    /// ADC conversion frame size in bytes.
    pub conv_frame_size: usize,

    /// Leading chunks whose first samples are dumped at debug level.
    pub debug_chunks: u32,

    pub memory_class: MemoryClass,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            chunk_count: 1,
            yield_interval: Duration::from_millis(1),
            task_core: 0,
            max_store_buf_size: 1024 * 2,
            conv_frame_size: 1024,
            debug_chunks: 0,
            memory_class: MemoryClass::Internal,
        }
    }
}
