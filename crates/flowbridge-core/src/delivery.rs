//! Terminal callbacks as one-shot futures, for callers living on the Rust side of the bridge.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, Weak,
    },
    time::Duration,
};

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::warn;

use crate::{
    callbacks::{NativeCallbacks, TerminalCallback},
    handle::CallbackHandle,
    outcome::LoginTokens,
};

#[allow(missing_docs)]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("A ticket for handle {0} already exists")]
    AlreadySubscribed(CallbackHandle),

    #[error("The result for handle {0} will never be delivered")]
    Dropped(CallbackHandle),

    #[error("Timed out while waiting for the result of handle {0}")]
    Timeout(CallbackHandle),
}

/// A [`NativeCallbacks`] implementation that routes every terminal callback to the
/// [`FlowTicket`] subscribed for its handle.
///
/// Subscribe before starting the flow. Callbacks for handles nobody subscribed to are logged and
/// discarded. Handles must be unique across all outstanding tickets, regardless of flow kind.
#[derive(Debug, Default)]
pub struct PendingResults {
    senders: Arc<Mutex<Senders>>,
    next_id: AtomicU64,
}

type Senders = HashMap<CallbackHandle, Subscription>;

#[derive(Debug)]
struct Subscription {
    id: u64,
    sender: oneshot::Sender<TerminalCallback>,
}

impl PendingResults {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in the terminal callback for `handle`.
    pub fn subscribe(&self, handle: CallbackHandle) -> Result<FlowTicket, DeliveryError> {
        let mut senders = self.senders.lock().expect("Mutex should not be poisoned");
        if senders.contains_key(&handle) {
            return Err(DeliveryError::AlreadySubscribed(handle));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = oneshot::channel();
        senders.insert(handle, Subscription { id, sender });
        Ok(FlowTicket {
            handle,
            id,
            receiver,
            senders: Arc::downgrade(&self.senders),
        })
    }

    /// Stop waiting for `handle`. Its ticket resolves to [`DeliveryError::Dropped`].
    pub fn unsubscribe(&self, handle: CallbackHandle) {
        self.senders
            .lock()
            .expect("Mutex should not be poisoned")
            .remove(&handle);
    }

    /// Number of tickets still waiting for their callback.
    pub fn outstanding(&self) -> usize {
        self.senders
            .lock()
            .expect("Mutex should not be poisoned")
            .len()
    }

    fn resolve(&self, handle: CallbackHandle, callback: TerminalCallback) {
        let sender = self
            .senders
            .lock()
            .expect("Mutex should not be poisoned")
            .remove(&handle);

        match sender {
            Some(subscription) => {
                if subscription.sender.send(callback).is_err() {
                    warn!(%handle, "Ticket was dropped before its result arrived");
                }
            }
            None => warn!(%handle, ?callback, "No ticket for delivered result, discarding"),
        }
    }
}

impl NativeCallbacks for PendingResults {
    fn on_auth_success(
        &self,
        handle: CallbackHandle,
        access_token: String,
        refresh_token: String,
        expires_at: i64,
        remember_me: bool,
    ) {
        self.resolve(
            handle,
            TerminalCallback::LoginSuccess(LoginTokens {
                access_token,
                refresh_token,
                expires_at,
                remember_me,
            }),
        );
    }

    fn on_auth_cancel(&self, handle: CallbackHandle) {
        self.resolve(handle, TerminalCallback::LoginCancel);
    }

    fn on_auth_error(&self, handle: CallbackHandle, message: String) {
        self.resolve(handle, TerminalCallback::LoginError { message });
    }

    fn on_purchase_success(&self, handle: CallbackHandle) {
        self.resolve(handle, TerminalCallback::PurchaseSuccess);
    }

    fn on_purchase_error(&self, handle: CallbackHandle, message: String) {
        self.resolve(handle, TerminalCallback::PurchaseError { message });
    }

    fn on_browser_closed(&self, handle: CallbackHandle, is_manual: bool) {
        self.resolve(handle, TerminalCallback::BrowserClosed { is_manual });
    }
}

/// The pending terminal callback of one flow. Dropping the ticket, or a [`wait`](Self::wait)
/// that ends without a result, releases its handle.
#[derive(Debug)]
pub struct FlowTicket {
    handle: CallbackHandle,
    id: u64,
    receiver: oneshot::Receiver<TerminalCallback>,
    senders: Weak<Mutex<Senders>>,
}

impl FlowTicket {
    #[allow(missing_docs)]
    pub fn handle(&self) -> CallbackHandle {
        self.handle
    }

    /// Wait for the terminal callback. Setting the timeout to `None` will wait indefinitely; the
    /// bridge itself never times a flow out.
    pub async fn wait(
        mut self,
        timeout: Option<Duration>,
    ) -> Result<TerminalCallback, DeliveryError> {
        let handle = self.handle;
        let received = match timeout {
            Some(timeout) => tokio::time::timeout(timeout, &mut self.receiver)
                .await
                .map_err(|_| DeliveryError::Timeout(handle))?,
            None => (&mut self.receiver).await,
        };
        received.map_err(|_| DeliveryError::Dropped(handle))
    }
}

impl Drop for FlowTicket {
    fn drop(&mut self) {
        let Some(senders) = self.senders.upgrade() else {
            return;
        };
        let Ok(mut senders) = senders.lock() else {
            return;
        };
        // The handle may already belong to a newer ticket once this one was resolved.
        if senders.get(&self.handle).is_some_and(|s| s.id == self.id) {
            senders.remove(&self.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        flow::{FlowRequest, PayStationVersion, PurchaseRequest},
        outcome::VendorOutcome,
        settings::BridgeSettings,
        testing::{FakeVendorSdk, RecordingHost},
        FlowBridge,
    };

    #[tokio::test]
    async fn ticket_receives_its_callback() {
        let results = PendingResults::new();
        let ticket = results.subscribe(CallbackHandle::new(1)).unwrap();

        results.on_purchase_error(CallbackHandle::new(1), "declined".to_string());

        assert_eq!(
            ticket.wait(None).await,
            Ok(TerminalCallback::PurchaseError {
                message: "declined".to_string()
            })
        );
        assert_eq!(results.outstanding(), 0);
    }

    #[tokio::test]
    async fn duplicate_subscription_is_rejected() {
        let results = PendingResults::new();
        let _ticket = results.subscribe(CallbackHandle::new(1)).unwrap();

        assert_eq!(
            results.subscribe(CallbackHandle::new(1)).unwrap_err(),
            DeliveryError::AlreadySubscribed(CallbackHandle::new(1))
        );
    }

    #[tokio::test]
    async fn dropped_ticket_frees_the_handle() {
        let results = PendingResults::new();
        drop(results.subscribe(CallbackHandle::new(1)).unwrap());

        assert!(results.subscribe(CallbackHandle::new(1)).is_ok());
    }

    #[tokio::test]
    async fn unsubscribed_ticket_resolves_dropped() {
        let results = PendingResults::new();
        let ticket = results.subscribe(CallbackHandle::new(2)).unwrap();

        results.unsubscribe(CallbackHandle::new(2));

        assert_eq!(
            ticket.wait(None).await,
            Err(DeliveryError::Dropped(CallbackHandle::new(2)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn wait_times_out() {
        let results = PendingResults::new();
        let ticket = results.subscribe(CallbackHandle::new(3)).unwrap();

        assert_eq!(
            ticket.wait(Some(Duration::from_secs(30))).await,
            Err(DeliveryError::Timeout(CallbackHandle::new(3)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_tickets_release_their_handles() {
        let results = PendingResults::new();

        for handle in 0..1000 {
            let ticket = results.subscribe(CallbackHandle::new(handle)).unwrap();
            let _ = ticket.wait(Some(Duration::from_secs(1))).await;
        }

        assert_eq!(results.outstanding(), 0);
        assert!(results.senders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stale_ticket_does_not_release_a_newer_subscription() {
        let results = PendingResults::new();
        let stale = results.subscribe(CallbackHandle::new(4)).unwrap();
        results.on_purchase_success(CallbackHandle::new(4));

        let fresh = results.subscribe(CallbackHandle::new(4)).unwrap();
        drop(stale);
        results.on_purchase_success(CallbackHandle::new(4));

        assert_eq!(
            fresh.wait(None).await,
            Ok(TerminalCallback::PurchaseSuccess)
        );
    }

    #[tokio::test]
    async fn bridge_delivers_into_ticket() {
        let results = Arc::new(PendingResults::new());
        let bridge = FlowBridge::in_memory(
            Arc::new(FakeVendorSdk::default()),
            Arc::new(RecordingHost::default()),
            results.clone(),
            BridgeSettings::default(),
        );
        let ticket = results.subscribe(CallbackHandle::new(0)).unwrap();

        let key = bridge
            .start_flow(
                CallbackHandle::new(0),
                FlowRequest::Purchase(PurchaseRequest {
                    token: "abc".to_string(),
                    sandbox: false,
                    redirect_scheme: None,
                    redirect_host: None,
                    pay_station_version: PayStationVersion::V3,
                }),
            )
            .await
            .unwrap();
        bridge.on_host_created(key, false).await.unwrap();
        bridge
            .on_flow_terminal(key, VendorOutcome::Success)
            .await
            .unwrap();

        assert_eq!(
            ticket.wait(None).await,
            Ok(TerminalCallback::PurchaseSuccess)
        );
    }
}
