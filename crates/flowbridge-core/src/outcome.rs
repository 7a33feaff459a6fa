//! Terminal outcomes and how each flow kind encodes them into a native callback.

use chrono::{DateTime, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{callbacks::TerminalCallback, flow::FlowKind};

/// Placeholder delivered when the vendor SDK reports an error without a description.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Message delivered by three-way purchase flows when the user cancels the payment.
pub const CANCELLED_MESSAGE: &str = "Cancelled";

/// Returns the vendor supplied message, or [`UNKNOWN_ERROR`] when it is missing or empty. Callers
/// always receive a non-empty diagnostic.
pub fn error_message(message: Option<&str>) -> String {
    match message {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => UNKNOWN_ERROR.to_string(),
    }
}

/// What the vendor SDK reported when the external flow ended.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum VendorOutcome {
    /// The flow completed.
    Success,
    /// The user backed out or the platform cancelled the flow.
    Cancelled,
    /// The SDK reported a failure, possibly without a description.
    Error {
        #[allow(missing_docs)]
        message: Option<String>,
    },
}

impl VendorOutcome {
    #[allow(missing_docs)]
    pub fn error(message: impl Into<String>) -> Self {
        VendorOutcome::Error {
            message: Some(message.into()),
        }
    }
}

/// Status returned by the payment SDK when the payment page closes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[allow(missing_docs)]
pub enum PurchaseStatus {
    Completed,
    Cancelled,
    Unknown,
}

impl From<PurchaseStatus> for VendorOutcome {
    fn from(status: PurchaseStatus) -> Self {
        match status {
            PurchaseStatus::Completed => VendorOutcome::Success,
            PurchaseStatus::Cancelled => VendorOutcome::Cancelled,
            PurchaseStatus::Unknown => VendorOutcome::Error { message: None },
        }
    }
}

/// Tokens delivered on a successful login.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginTokens {
    #[allow(missing_docs)]
    pub access_token: String,
    #[allow(missing_docs)]
    pub refresh_token: String,
    /// Expiry of the access token in Unix seconds.
    pub expires_at: i64,
    /// The flag supplied when the flow was started.
    pub remember_me: bool,
}

impl LoginTokens {
    /// Expiry as a UTC timestamp. `None` if the SDK reported a value out of range.
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.expires_at, 0).single()
    }

    /// Whether the access token is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now.timestamp()
    }
}

/// Payload of a successful flow.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum FlowPayload {
    Login(LoginTokens),
    Completed,
}

/// The single terminal result of a flow.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum FlowResult {
    Success(FlowPayload),
    Cancelled,
    /// Never empty, see [`error_message`].
    Error(String),
}

impl FlowResult {
    /// Build an error result, substituting [`UNKNOWN_ERROR`] for an empty message.
    pub fn error(message: Option<&str>) -> Self {
        FlowResult::Error(error_message(message))
    }
}

impl FlowKind {
    /// Encode a terminal result into the native callback this kind of flow reports it with.
    ///
    /// Login flows report all three outcomes separately. Three-way purchases fold a cancellation
    /// into the error callback with the message [`CANCELLED_MESSAGE`]. Browser purchases only say
    /// whether the browser was closed manually, which is the case exactly when the user cancelled.
    pub fn encode(self, result: FlowResult) -> TerminalCallback {
        match (self, result) {
            (FlowKind::SocialLogin | FlowKind::WidgetLogin, FlowResult::Success(payload)) => {
                match payload {
                    FlowPayload::Login(tokens) => TerminalCallback::LoginSuccess(tokens),
                    FlowPayload::Completed => TerminalCallback::LoginError {
                        message: "Login completed without tokens".to_string(),
                    },
                }
            }
            (FlowKind::SocialLogin | FlowKind::WidgetLogin, FlowResult::Cancelled) => {
                TerminalCallback::LoginCancel
            }
            (FlowKind::SocialLogin | FlowKind::WidgetLogin, FlowResult::Error(message)) => {
                TerminalCallback::LoginError { message }
            }

            (FlowKind::Purchase, FlowResult::Success(_)) => TerminalCallback::PurchaseSuccess,
            (FlowKind::Purchase, FlowResult::Cancelled) => TerminalCallback::PurchaseError {
                message: CANCELLED_MESSAGE.to_string(),
            },
            (FlowKind::Purchase, FlowResult::Error(message)) => {
                TerminalCallback::PurchaseError { message }
            }

            (FlowKind::PurchaseBrowser, FlowResult::Cancelled) => {
                TerminalCallback::BrowserClosed { is_manual: true }
            }
            (FlowKind::PurchaseBrowser, FlowResult::Success(_) | FlowResult::Error(_)) => {
                TerminalCallback::BrowserClosed { is_manual: false }
            }
        }
    }
}
