use thiserror::Error;

use crate::{
    flow::{PurchaseRequest, SocialLoginRequest, WidgetLoginRequest},
    settings::{AnalyticsConfig, LoginSdkConfig},
};

/// A failure reported by the vendor SDK.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct VendorError(pub String);

impl VendorError {
    /// The description supplied by the SDK, if it supplied a non-empty one.
    pub fn message(&self) -> Option<&str> {
        Some(self.0.as_str()).filter(|m| !m.is_empty())
    }
}

/// The capabilities the bridge needs from the login and payments SDKs.
///
/// The start methods launch the external flow and return as soon as it is running; the terminal
/// outcome is reported later through
/// [`FlowBridge::on_flow_terminal`](crate::FlowBridge::on_flow_terminal). A start method returning
/// an error means the flow never started.
pub trait VendorSdk: Send + Sync {
    /// Initialize the login SDK. Must be called before any login flow is started.
    fn initialize(&self, config: &LoginSdkConfig) -> Result<(), VendorError>;

    /// Tell the SDK which engine it is embedded in, for its analytics.
    fn configure_analytics(&self, config: &AnalyticsConfig) -> Result<(), VendorError>;

    #[allow(missing_docs)]
    fn start_social_login(&self, request: &SocialLoginRequest) -> Result<(), VendorError>;

    #[allow(missing_docs)]
    fn start_widget_login(&self, request: &WidgetLoginRequest) -> Result<(), VendorError>;

    /// Open the payment page. Redirect scheme and host are only applied when present.
    fn start_purchase(&self, request: &PurchaseRequest) -> Result<(), VendorError>;

    /// Access token of the session established by the last successful login.
    fn access_token(&self) -> Result<String, VendorError>;

    /// Refresh token of the session established by the last successful login.
    fn refresh_token(&self) -> Result<String, VendorError>;

    /// Expiry of the access token in Unix seconds.
    fn token_expires_at(&self) -> Result<i64, VendorError>;
}
