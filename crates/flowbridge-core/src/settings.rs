use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What to do when a hosting context is recreated from saved state while its flow is pending.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum RestorePolicy {
    /// Finish the context and forget the flow without invoking any callback. Callers that need an
    /// answer must apply their own timeout.
    #[default]
    Drop,
    /// Finish the context and deliver the flow's cancellation callback.
    DeliverCancelled,
}

/// Engine identification reported to the vendor's analytics.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct AnalyticsConfig {
    /// e.g. `unreal`
    pub game_engine: String,
    /// e.g. `5.3.2`
    pub game_engine_version: String,
}

/// Behavior settings of the bridge. They are optional and uneditable once the bridge is created.
///
/// Defaults to
///
/// ```
/// # use flowbridge_core::{BridgeSettings, RestorePolicy};
/// let settings = BridgeSettings {
///     restore_policy: RestorePolicy::Drop,
///     analytics: None,
/// };
/// assert_eq!(settings, BridgeSettings::default());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct BridgeSettings {
    /// Policy for hosting contexts recreated from saved state.
    pub restore_policy: RestorePolicy,
    /// When set, forwarded to the vendor SDK during [`FlowBridge::initialize`](crate::FlowBridge::initialize).
    pub analytics: Option<AnalyticsConfig>,
}

/// App ids of the native social SDKs the login SDK can delegate to. Providers without an id fall
/// back to the web flow.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
#[allow(missing_docs)]
pub struct SocialConfig {
    pub facebook_app_id: Option<String>,
    pub facebook_client_token: Option<String>,
    pub google_app_id: Option<String>,
    pub wechat_app_id: Option<String>,
    pub qq_app_id: Option<String>,
}

/// How the login SDK issues tokens.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[allow(missing_docs)]
pub enum LoginMode {
    Jwt { callback_url: String },
    OAuth { client_id: i32 },
}

impl LoginMode {
    /// OAuth mode from a client id as configured in the engine's project settings. An id that is
    /// not a number selects client `0` instead of failing initialization.
    pub fn oauth_from_str(client_id: &str) -> Self {
        LoginMode::OAuth {
            client_id: client_id.trim().parse().unwrap_or(0),
        }
    }
}

/// Configuration passed to the login SDK on initialization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct LoginSdkConfig {
    /// Login project id.
    pub project_id: String,
    #[allow(missing_docs)]
    pub mode: LoginMode,
    #[allow(missing_docs)]
    pub social: SocialConfig,
}
