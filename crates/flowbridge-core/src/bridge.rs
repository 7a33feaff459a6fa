use std::sync::Arc;

use flowbridge_state::{MemoryRepository, Repository};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument, warn};

use crate::{
    callbacks::{NativeCallbacks, TerminalCallback},
    error::{BridgeError, Result},
    flow::FlowRequest,
    handle::{CallbackHandle, FlowKey},
    host::FlowHost,
    outcome::{FlowPayload, FlowResult, LoginTokens, VendorOutcome},
    record::{FlowRecord, FlowState},
    settings::{AnalyticsConfig, BridgeSettings, LoginSdkConfig, RestorePolicy},
    vendor::{VendorError, VendorSdk},
};

/// What the bridge did in response to a hosting context being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum HostDecision {
    /// The vendor flow was started; a terminal outcome will follow.
    Started,
    /// The flow ended immediately and its callback was delivered.
    Delivered,
    /// The context was recreated from saved state and the flow was dropped without a callback.
    Dropped,
    /// The flow had already ended; the context was finished.
    Finished,
}

/// Starts externally hosted login and purchase flows and delivers exactly one terminal callback
/// per started flow, correlated by the caller's [`CallbackHandle`].
///
/// # Lifecycle
///
/// 1. [`start_flow`](FlowBridge::start_flow) persists the request and asks the host to launch a
///    hosting context.
/// 2. The host reports the context with [`on_host_created`](FlowBridge::on_host_created), which
///    starts the vendor flow, or applies the [`RestorePolicy`] if the context was recreated.
/// 3. The host forwards the vendor's result to [`on_flow_terminal`](FlowBridge::on_flow_terminal),
///    which takes the persisted request, invokes the native callback and finishes the context.
///
/// Each step takes or updates the persisted record under a lock, and the record is removed
/// before its callback fires, so a replayed or duplicated lifecycle event can never produce a
/// second callback.
pub struct FlowBridge {
    vendor: Arc<dyn VendorSdk>,
    host: Arc<dyn FlowHost>,
    callbacks: Arc<dyn NativeCallbacks>,
    records: Arc<dyn Repository<FlowRecord>>,
    settings: BridgeSettings,
    lifecycle: Mutex<()>,
}

impl std::fmt::Debug for FlowBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowBridge")
            .field("settings", &self.settings)
            .finish()
    }
}

impl FlowBridge {
    #[allow(missing_docs)]
    pub fn new(
        vendor: Arc<dyn VendorSdk>,
        host: Arc<dyn FlowHost>,
        callbacks: Arc<dyn NativeCallbacks>,
        records: Arc<dyn Repository<FlowRecord>>,
        settings: BridgeSettings,
    ) -> Self {
        Self {
            vendor,
            host,
            callbacks,
            records,
            settings,
            lifecycle: Mutex::new(()),
        }
    }

    /// Create a bridge that keeps pending flows in memory.
    pub fn in_memory(
        vendor: Arc<dyn VendorSdk>,
        host: Arc<dyn FlowHost>,
        callbacks: Arc<dyn NativeCallbacks>,
        settings: BridgeSettings,
    ) -> Self {
        Self::new(
            vendor,
            host,
            callbacks,
            Arc::new(MemoryRepository::<FlowRecord>::default()),
            settings,
        )
    }

    #[allow(missing_docs)]
    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    /// Initialize the login SDK, and its analytics if the settings carry an [`AnalyticsConfig`].
    #[instrument(err, skip_all, fields(project_id = %config.project_id))]
    pub fn initialize(&self, config: &LoginSdkConfig) -> Result<()> {
        self.vendor.initialize(config)?;
        if let Some(analytics) = &self.settings.analytics {
            self.configure_analytics(analytics)?;
        }
        Ok(())
    }

    #[allow(missing_docs)]
    pub fn configure_analytics(&self, config: &AnalyticsConfig) -> Result<()> {
        debug!(
            game_engine = %config.game_engine,
            version = %config.game_engine_version,
            "Configuring analytics"
        );
        Ok(self.vendor.configure_analytics(config)?)
    }

    /// Persist `request` and launch its hosting context. Returns immediately; the terminal outcome
    /// is delivered to the native callbacks with `handle`.
    ///
    /// The handle must not be in use by another pending flow of the same kind. If the host fails
    /// to launch, the flow never started and no callback will fire.
    #[instrument(err, skip_all, fields(kind = %request.kind(), handle = %handle))]
    pub async fn start_flow(&self, handle: CallbackHandle, request: FlowRequest) -> Result<FlowKey> {
        let key = FlowKey::new(request.kind(), handle);

        {
            let _guard = self.lifecycle.lock().await;
            if self.records.get(key.storage_key()).await?.is_some() {
                return Err(BridgeError::HandleInUse(key));
            }
            self.records
                .set(key.storage_key(), FlowRecord::new(handle, request))
                .await?;
        }

        if let Err(e) = self.host.launch(key) {
            self.take(key).await?;
            return Err(e.into());
        }

        debug!("Flow persisted and hosting context launched");
        Ok(key)
    }

    /// Called by the host when the hosting context for `key` is created. `restored` is set when
    /// the platform recreated the context from saved state rather than creating it fresh.
    #[instrument(err, skip_all, fields(key = %key, restored = restored))]
    pub async fn on_host_created(&self, key: FlowKey, restored: bool) -> Result<HostDecision> {
        let guard = self.lifecycle.lock().await;

        let Some(mut record) = self.records.get(key.storage_key()).await? else {
            drop(guard);
            debug!("No pending flow, finishing hosting context");
            self.host.finish(key);
            return Ok(HostDecision::Finished);
        };

        if restored || record.state == FlowState::Launched {
            self.records.remove(key.storage_key()).await?;
            drop(guard);
            return Ok(self.apply_restore_policy(key));
        }

        record.state = FlowState::Launched;
        self.records.set(key.storage_key(), record.clone()).await?;
        drop(guard);

        match self.start_vendor_flow(&record.request) {
            Ok(()) => {
                debug!("Vendor flow started");
                Ok(HostDecision::Started)
            }
            Err(e) => {
                warn!("Vendor failed to start flow: {e}");
                // The outcome may already have been delivered by a racing terminal event.
                if self.take_or_fail(key).await?.is_none() {
                    return Ok(HostDecision::Finished);
                }
                self.deliver(key, FlowResult::error(e.message()));
                Ok(HostDecision::Delivered)
            }
        }
    }

    /// Called by the host when the vendor flow for `key` reaches a terminal state. Invokes exactly
    /// one native callback and finishes the hosting context.
    ///
    /// Returns [`BridgeError::UnknownFlow`] without invoking anything if the flow already
    /// received its outcome or was dropped. If the persisted request cannot be read, the flow is
    /// failed with an error callback and the storage error is returned.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn on_flow_terminal(&self, key: FlowKey, outcome: VendorOutcome) -> Result<()> {
        let Some(record) = self.take_or_fail(key).await? else {
            warn!("Terminal outcome for a flow that is not pending, ignoring");
            return Err(BridgeError::UnknownFlow(key));
        };

        let result = self.resolve(&record, outcome);
        self.deliver(key, result);
        Ok(())
    }

    /// Flows that have been started and are still waiting for their outcome.
    pub async fn pending(&self) -> Result<Vec<FlowRecord>> {
        Ok(self.records.list().await?)
    }

    async fn take(&self, key: FlowKey) -> Result<Option<FlowRecord>> {
        let _guard = self.lifecycle.lock().await;
        Ok(self.records.remove(key.storage_key()).await?)
    }

    /// [`take`](Self::take) for the terminal paths. A store may have deleted the record before
    /// failing to decode it, so a storage error ends the flow with an error callback instead of
    /// leaving it without one.
    async fn take_or_fail(&self, key: FlowKey) -> Result<Option<FlowRecord>> {
        match self.take(key).await {
            Err(BridgeError::Repository(e)) => {
                error!("Failed to read pending flow, failing it: {e}");
                self.deliver(key, FlowResult::error(Some(&e.to_string())));
                Err(e.into())
            }
            other => other,
        }
    }

    fn apply_restore_policy(&self, key: FlowKey) -> HostDecision {
        match self.settings.restore_policy {
            RestorePolicy::Drop => {
                warn!("Hosting context recreated from saved state, dropping flow");
                self.host.finish(key);
                HostDecision::Dropped
            }
            RestorePolicy::DeliverCancelled => {
                warn!("Hosting context recreated from saved state, cancelling flow");
                self.deliver(key, FlowResult::Cancelled);
                HostDecision::Delivered
            }
        }
    }

    fn start_vendor_flow(&self, request: &FlowRequest) -> Result<(), VendorError> {
        match request {
            FlowRequest::SocialLogin(r) => self.vendor.start_social_login(r),
            FlowRequest::WidgetLogin(r) => self.vendor.start_widget_login(r),
            FlowRequest::Purchase(r) | FlowRequest::PurchaseBrowser(r) => {
                self.vendor.start_purchase(r)
            }
        }
    }

    fn resolve(&self, record: &FlowRecord, outcome: VendorOutcome) -> FlowResult {
        match outcome {
            VendorOutcome::Success if record.request.kind().is_login() => {
                match self.login_tokens(record.request.remember_me()) {
                    Ok(tokens) => FlowResult::Success(FlowPayload::Login(tokens)),
                    Err(e) => {
                        warn!("Login succeeded but the session could not be read: {e}");
                        FlowResult::error(e.message())
                    }
                }
            }
            VendorOutcome::Success => FlowResult::Success(FlowPayload::Completed),
            VendorOutcome::Cancelled => FlowResult::Cancelled,
            VendorOutcome::Error { message } => FlowResult::error(message.as_deref()),
        }
    }

    fn login_tokens(&self, remember_me: bool) -> Result<LoginTokens, VendorError> {
        Ok(LoginTokens {
            access_token: self.vendor.access_token()?,
            refresh_token: self.vendor.refresh_token()?,
            expires_at: self.vendor.token_expires_at()?,
            remember_me,
        })
    }

    fn deliver(&self, key: FlowKey, result: FlowResult) {
        let callback = key.kind.encode(result);
        debug!(?callback, "Delivering terminal callback");
        if let TerminalCallback::LoginSuccess(tokens) = &callback {
            if tokens.is_expired_at(Utc::now()) {
                warn!(
                    expires_at = ?tokens.expires_at_utc(),
                    "Vendor session is already expired"
                );
            }
        }
        callback.dispatch(key.handle, self.callbacks.as_ref());
        self.host.finish(key);
    }
}
