/// Codec session lifecycle.
///
/// State transitions:
/// ```text
/// uninitialized → interface-ready → device-ready → opened
///        ↓               ↓               ↓            ↓
///        └───────────────┴───────┬───────┴────────────┘
///                             closed
/// ```
/// Every handle created on the way in is released on the way to `closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionState {
    Uninitialized,
    InterfaceReady,
    DeviceReady,
    Opened,
    Closed,
}

impl SessionState {
    pub fn is_opened(&self) -> bool {
        matches!(self, Self::Opened)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Whether a device handle exists in this state.
    pub fn has_device(&self) -> bool {
        matches!(self, Self::DeviceReady | Self::Opened)
    }

    /// Forward-only transition check.
    pub fn can_advance_to(&self, next: SessionState) -> bool {
        next > *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_only_move_forward() {
        assert!(SessionState::Uninitialized.can_advance_to(SessionState::InterfaceReady));
        assert!(SessionState::DeviceReady.can_advance_to(SessionState::Closed));
        assert!(!SessionState::Opened.can_advance_to(SessionState::DeviceReady));
        assert!(!SessionState::Closed.can_advance_to(SessionState::Closed));
    }

    #[test]
    fn device_presence() {
        assert!(!SessionState::InterfaceReady.has_device());
        assert!(SessionState::DeviceReady.has_device());
        assert!(SessionState::Opened.has_device());
        assert!(!SessionState::Closed.has_device());
    }
}
