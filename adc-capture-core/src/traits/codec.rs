use crate::models::config::ChannelList;
use crate::models::error::CodecStatus;

/// Parameters used to build the ADC data interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataInterfaceConfig {
    pub unit_id: i32,
    pub channels: ChannelList,
    pub sample_rate_hz: u32,
    pub atten: i32,
    /// Driver-side store buffer, in bytes.
    pub max_store_buf_size: usize,
    /// Bytes per ADC conversion frame.
    pub conv_frame_size: usize,
}

/// Direction of a codec device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceDirection {
    Input,
    Output,
}

/// Sample format the device is opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleFormat {
    pub sample_rate: u32,
    pub channels: u8,
    pub bits_per_sample: u8,
}

/// Hardware codec abstraction over an audio-capturing peripheral.
///
/// Handles are opaque to the core. Every handle returned by
/// `new_data_interface` or `new_device` is handed back exactly once to the
/// matching delete call; `close` is only called on a device that opened.
/// Implemented by:
/// - `SimulatedAdc` (host, adc-capture-sim)
/// - `MockCodec` (tests)
pub trait CodecBackend {
    type DataInterface;
    type Device;

    /// Build the data interface; `None` if the driver refused.
    fn new_data_interface(&mut self, cfg: &DataInterfaceConfig) -> Option<Self::DataInterface>;

    /// Create a device bound to `data_if`; `None` on failure.
    fn new_device(
        &mut self,
        direction: DeviceDirection,
        data_if: &Self::DataInterface,
    ) -> Option<Self::Device>;

    fn open(&mut self, device: &mut Self::Device, format: &SampleFormat) -> Result<(), CodecStatus>;

    /// Fill `buf` with interleaved little-endian samples.
    ///
    /// May block for up to one chunk of sample time.
    fn read(&mut self, device: &mut Self::Device, buf: &mut [u8]) -> Result<usize, CodecStatus>;

    fn close(&mut self, device: &mut Self::Device);

    fn delete_device(&mut self, device: Self::Device);

    fn delete_data_interface(&mut self, data_if: Self::DataInterface);
}
