use crate::models::config::{AcquireOptions, AcquisitionPlan};
use crate::models::error::{AdcError, CodecStatus};
use crate::models::state::SessionState;
use crate::processing::chunk_reader::ChunkSource;
use crate::traits::codec::{CodecBackend, DeviceDirection};
use crate::traits::log_sink::CaptureLog;

/// An opened input device on the ADC codec, plus its data interface.
///
/// Acts as a release guard: whatever was created is torn down in reverse
/// order (close, delete device, delete interface) exactly once, either by
/// `close` or on drop. Failed `open` steps unwind the same way before the
/// error is returned.
pub struct CodecSession<'a, C: CodecBackend> {
    codec: &'a mut C,
    log: &'a dyn CaptureLog,
    data_if: Option<C::DataInterface>,
    device: Option<C::Device>,
    state: SessionState,
}

impl<'a, C: CodecBackend> CodecSession<'a, C> {
    /// Build the data interface, create an input device and open it.
    pub fn open(
        codec: &'a mut C,
        plan: &AcquisitionPlan,
        options: &AcquireOptions,
        log: &'a dyn CaptureLog,
    ) -> Result<Self, AdcError> {
        let mut session = Self {
            codec,
            log,
            data_if: None,
            device: None,
            state: SessionState::Uninitialized,
        };

        let cfg = plan.data_interface_config(options);
        let Some(data_if) = session.codec.new_data_interface(&cfg) else {
            log.error(format_args!("failed to initialize ADC data interface"));
            return Err(AdcError::CodecInterfaceInitFailed);
        };
        session.data_if = Some(data_if);
        session.advance(SessionState::InterfaceReady);

        let device = match session.data_if.as_ref() {
            Some(data_if) => session.codec.new_device(DeviceDirection::Input, data_if),
            None => None,
        };
        let Some(device) = device else {
            log.error(format_args!("failed to create codec device"));
            return Err(AdcError::CodecDeviceCreateFailed);
        };
        session.device = Some(device);
        session.advance(SessionState::DeviceReady);

        let format = plan.sample_format();
        let opened = match session.device.as_mut() {
            Some(device) => session.codec.open(device, &format),
            None => Err(CodecStatus::WRONG_STATE),
        };
        if let Err(status) = opened {
            log.error(format_args!("codec device open failed: {}", status));
            return Err(AdcError::CodecOpenFailed(status.code()));
        }
        session.advance(SessionState::Opened);

        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Read one chunk into `buf`. Fails with `WRONG_STATE` unless opened.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, CodecStatus> {
        if !self.state.is_opened() {
            return Err(CodecStatus::WRONG_STATE);
        }
        match self.device.as_mut() {
            Some(device) => self.codec.read(device, buf),
            None => Err(CodecStatus::WRONG_STATE),
        }
    }

    /// Close the device, delete it, delete the data interface.
    pub fn close(mut self) {
        self.release();
    }

    fn advance(&mut self, next: SessionState) {
        debug_assert!(self.state.can_advance_to(next));
        self.state = next;
    }

    fn release(&mut self) {
        if self.state.is_closed() {
            return;
        }
        if self.state.has_device() {
            if let Some(mut device) = self.device.take() {
                if self.state.is_opened() {
                    self.codec.close(&mut device);
                }
                self.codec.delete_device(device);
            }
        }
        if let Some(data_if) = self.data_if.take() {
            self.codec.delete_data_interface(data_if);
        }
        if self.state != SessionState::Uninitialized {
            self.log.debug(format_args!("codec session released"));
        }
        self.state = SessionState::Closed;
    }
}

impl<C: CodecBackend> ChunkSource for CodecSession<'_, C> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, CodecStatus> {
        self.read(buf)
    }
}

impl<C: CodecBackend> Drop for CodecSession<'_, C> {
    fn drop(&mut self) {
        self.release();
    }
}
