use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::flow::FlowKind;

/// Opaque correlation token supplied by the native caller when a flow is started and echoed back
/// unchanged when the flow reaches its terminal outcome.
///
/// The bridge never interprets the value. Every `i64` is valid, including `0` and negative
/// values, which is why this is not an `Option` or a `NonZero` type.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(transparent)]
pub struct CallbackHandle(i64);

#[cfg(feature = "uniffi")]
uniffi::custom_newtype!(CallbackHandle, i64);

impl CallbackHandle {
    /// Wrap a raw handle received from the native caller.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw value, bit-identical to the one supplied by the caller.
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for CallbackHandle {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<CallbackHandle> for i64 {
    fn from(handle: CallbackHandle) -> Self {
        handle.0
    }
}

impl fmt::Display for CallbackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one pending flow. Handles only have to be unique among pending flows of the same
/// kind, so the pair is the key.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FlowKey {
    /// The kind of flow the handle belongs to.
    pub kind: FlowKind,
    /// The caller supplied handle.
    pub handle: CallbackHandle,
}

impl FlowKey {
    #[allow(missing_docs)]
    pub fn new(kind: FlowKind, handle: CallbackHandle) -> Self {
        Self { kind, handle }
    }

    /// Key under which the flow record is persisted, e.g. `social_login:42`.
    pub fn storage_key(&self) -> String {
        format!("{}:{}", self.kind, self.handle)
    }
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.storage_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_round_trips_extreme_values() {
        for value in [0, -1, 42, i64::MIN, i64::MAX] {
            let handle = CallbackHandle::from(value);
            assert_eq!(i64::from(handle), value);

            let json = serde_json::to_string(&handle).unwrap();
            assert_eq!(json, value.to_string());
            let parsed: CallbackHandle = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed.value(), value);
        }
    }

    #[test]
    fn storage_key_includes_kind() {
        let key = FlowKey::new(FlowKind::Purchase, CallbackHandle::new(-7));
        assert_eq!(key.storage_key(), "purchase:-7");
    }
}
