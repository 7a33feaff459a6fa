use flowbridge_state::register_repository_item;
use serde::{Deserialize, Serialize};

use crate::{
    flow::FlowRequest,
    handle::{CallbackHandle, FlowKey},
};

/// Progress of a pending flow.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    /// Persisted and waiting for its hosting context to be created.
    Pending,
    /// The vendor flow has been started from a hosting context.
    Launched,
}

/// Everything needed to finish a flow, persisted from start until the terminal outcome so that it
/// survives the hosting context being suspended or recreated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FlowRecord {
    #[allow(missing_docs)]
    pub handle: CallbackHandle,
    #[allow(missing_docs)]
    pub request: FlowRequest,
    #[allow(missing_docs)]
    pub state: FlowState,
}

register_repository_item!(FlowRecord, "FlowRecord");

impl FlowRecord {
    #[allow(missing_docs)]
    pub fn new(handle: CallbackHandle, request: FlowRequest) -> Self {
        Self {
            handle,
            request,
            state: FlowState::Pending,
        }
    }

    #[allow(missing_docs)]
    pub fn key(&self) -> FlowKey {
        FlowKey::new(self.request.kind(), self.handle)
    }
}
