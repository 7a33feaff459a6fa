#![doc = include_str!("../README.md")]

#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

mod bridge;
mod callbacks;
pub mod delivery;
mod error;
pub mod flow;
mod handle;
mod host;
pub mod outcome;
mod record;
mod settings;
mod vendor;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use bridge::{FlowBridge, HostDecision};
pub use callbacks::{NativeCallbacks, TerminalCallback};
pub use error::{BridgeError, Result};
pub use handle::{CallbackHandle, FlowKey};
pub use host::{FlowHost, HostError};
pub use record::{FlowRecord, FlowState};
pub use settings::{
    AnalyticsConfig, BridgeSettings, LoginMode, LoginSdkConfig, RestorePolicy, SocialConfig,
};
pub use vendor::{VendorError, VendorSdk};
