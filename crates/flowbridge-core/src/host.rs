use thiserror::Error;

use crate::handle::FlowKey;

#[allow(missing_docs)]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HostError(pub String);

/// The platform side that owns hosting contexts, e.g. Android activities.
///
/// After [`launch`](FlowHost::launch) the host creates a context for the flow and reports it with
/// [`FlowBridge::on_host_created`](crate::FlowBridge::on_host_created). The context may be
/// destroyed and recreated by the platform at any time while the flow is pending.
pub trait FlowHost: Send + Sync {
    /// Create the hosting context for the flow identified by `key`.
    fn launch(&self, key: FlowKey) -> Result<(), HostError>;

    /// Tear down the hosting context for `key`. Called once the flow is over, whether a callback
    /// was delivered or not.
    fn finish(&self, key: FlowKey);
}
