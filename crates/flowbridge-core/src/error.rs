use flowbridge_state::RepositoryError;
use thiserror::Error;

use crate::{handle::FlowKey, host::HostError, vendor::VendorError};

/// Errors returned synchronously to the caller of a [`FlowBridge`](crate::FlowBridge) operation.
/// None of these are delivered through a native callback.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Flow {0} is already pending")]
    HandleInUse(FlowKey),

    #[error("No pending flow for {0}")]
    UnknownFlow(FlowKey),

    #[error("Failed to launch hosting context: {0}")]
    Host(#[from] HostError),

    #[error("Vendor SDK error: {0}")]
    Vendor(#[from] VendorError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result type for bridge operations
pub type Result<T, E = BridgeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{flow::FlowKind, handle::CallbackHandle};

    #[test]
    fn test_error_display() {
        let key = FlowKey::new(FlowKind::WidgetLogin, CallbackHandle::new(3));
        assert_eq!(
            BridgeError::HandleInUse(key).to_string(),
            "Flow widget_login:3 is already pending"
        );
        assert!(BridgeError::Host(HostError("no activity".to_string()))
            .to_string()
            .contains("no activity"));
    }
}
