use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{FlowKind, SocialProvider};

/// Parameters of a social network login.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct SocialLoginRequest {
    /// The social network to authenticate with.
    pub provider: SocialProvider,
    /// Echoed back on success so the caller knows whether to persist the session.
    pub remember_me: bool,
    /// Log out of the provider before authenticating, invalidating any cached provider token.
    pub invalidate_token: bool,
}

/// Parameters of a login through the vendor's hosted widget.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct WidgetLoginRequest {
    /// Widget locale, e.g. `en_US`. The widget picks its own default when `None`.
    pub locale: Option<String>,
    /// Echoed back on success so the caller knows whether to persist the session.
    pub remember_me: bool,
}

/// Version of the hosted payment page.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[allow(missing_docs)]
pub enum PayStationVersion {
    V3,
    #[default]
    V4,
}

/// Parameters of a purchase through the hosted payment page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct PurchaseRequest {
    /// Payment token issued by the store backend for this order.
    pub token: String,
    /// Use the sandbox payment environment.
    pub sandbox: bool,
    /// Scheme of the deep link the payment page redirects to when done.
    pub redirect_scheme: Option<String>,
    /// Host of the deep link the payment page redirects to when done.
    pub redirect_host: Option<String>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub pay_station_version: PayStationVersion,
}

/// A request to start one flow. Immutable once started.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum FlowRequest {
    SocialLogin(SocialLoginRequest),
    WidgetLogin(WidgetLoginRequest),
    Purchase(PurchaseRequest),
    PurchaseBrowser(PurchaseRequest),
}

impl FlowRequest {
    #[allow(missing_docs)]
    pub fn kind(&self) -> FlowKind {
        match self {
            FlowRequest::SocialLogin(_) => FlowKind::SocialLogin,
            FlowRequest::WidgetLogin(_) => FlowKind::WidgetLogin,
            FlowRequest::Purchase(_) => FlowKind::Purchase,
            FlowRequest::PurchaseBrowser(_) => FlowKind::PurchaseBrowser,
        }
    }

    /// The remember-me flag to echo back on login success. Purchases never carry one.
    pub fn remember_me(&self) -> bool {
        match self {
            FlowRequest::SocialLogin(r) => r.remember_me,
            FlowRequest::WidgetLogin(r) => r.remember_me,
            FlowRequest::Purchase(_) | FlowRequest::PurchaseBrowser(_) => false,
        }
    }
}
