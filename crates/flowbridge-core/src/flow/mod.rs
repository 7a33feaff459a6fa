//! Flow requests: what the native caller asks the bridge to start.

mod provider;
mod request;

use std::fmt;

pub use provider::{ParseProviderError, SocialProvider};
pub use request::{
    FlowRequest, PayStationVersion, PurchaseRequest, SocialLoginRequest, WidgetLoginRequest,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The kinds of flows the bridge can host. The kind decides how a terminal outcome is encoded
/// into a native callback, see [`FlowKind::encode`](crate::outcome).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum FlowKind {
    /// Login through a social network provider.
    SocialLogin,
    /// Login through the vendor's hosted web widget.
    WidgetLogin,
    /// Purchase reporting success, cancellation and errors separately.
    Purchase,
    /// Purchase reporting only whether the browser was closed manually.
    PurchaseBrowser,
}

impl FlowKind {
    /// Whether the flow produces login tokens on success.
    pub fn is_login(self) -> bool {
        matches!(self, FlowKind::SocialLogin | FlowKind::WidgetLogin)
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowKind::SocialLogin => "social_login",
            FlowKind::WidgetLogin => "widget_login",
            FlowKind::Purchase => "purchase",
            FlowKind::PurchaseBrowser => "purchase_browser",
        };
        f.write_str(name)
    }
}
