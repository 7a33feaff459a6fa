use flowbridge_core::{flow::ParseProviderError, BridgeError, FlowKey};

pub type Result<T, E = FlowBridgeError> = std::result::Result<T, E>;
pub type Error = FlowBridgeError;

// Name is converted from *Error to *Exception on the foreign side. Foreign implementations of the
// delegate interfaces throw this same type, so every variant carries only FFI-safe fields.
#[derive(uniffi::Error, thiserror::Error, Debug)]
pub enum FlowBridgeError {
    #[error("Flow {key} is already pending")]
    HandleInUse { key: FlowKey },

    #[error("No pending flow for {key}")]
    UnknownFlow { key: FlowKey },

    #[error("Unknown social provider: {provider}")]
    UnknownProvider { provider: String },

    #[error("Failed to launch hosting context: {message}")]
    Host { message: String },

    #[error("Vendor SDK error: {message}")]
    Vendor { message: String },

    #[error("Flow record storage failed: {message}")]
    Storage { message: String },

    #[error("Callback invocation failed")]
    CallbackError,
}

impl FlowBridgeError {
    /// The message a foreign implementation attached, without the variant's prefix.
    pub(crate) fn into_message(self) -> String {
        match self {
            Self::Host { message } | Self::Vendor { message } | Self::Storage { message } => message,
            Self::UnknownProvider { provider } => provider,
            other => other.to_string(),
        }
    }
}

impl From<BridgeError> for FlowBridgeError {
    fn from(e: BridgeError) -> Self {
        match e {
            BridgeError::HandleInUse(key) => Self::HandleInUse { key },
            BridgeError::UnknownFlow(key) => Self::UnknownFlow { key },
            BridgeError::Host(e) => Self::Host { message: e.0 },
            BridgeError::Vendor(e) => Self::Vendor { message: e.0 },
            BridgeError::Repository(e) => Self::Storage {
                message: e.to_string(),
            },
        }
    }
}

impl From<ParseProviderError> for FlowBridgeError {
    fn from(e: ParseProviderError) -> Self {
        Self::UnknownProvider { provider: e.0 }
    }
}

/// Required From implementation for UNIFFI callback error handling
/// Converts unexpected foreign exceptions into FlowBridgeError
impl From<uniffi::UnexpectedUniFFICallbackError> for FlowBridgeError {
    fn from(_: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::CallbackError
    }
}
