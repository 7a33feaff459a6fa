#![doc = include_str!("../README.md")]

uniffi::setup_scaffolding!();

use std::sync::Arc;

use delegates::{CallbackBridge, HostBridge, VendorBridge};
use flowbridge_core::{
    flow::{
        FlowRequest, PayStationVersion, PurchaseRequest, SocialLoginRequest, SocialProvider,
        WidgetLoginRequest,
    },
    outcome::{PurchaseStatus, VendorOutcome},
    AnalyticsConfig, BridgeSettings, CallbackHandle, FlowBridge, FlowKey, HostDecision, LoginMode,
    LoginSdkConfig, SocialConfig,
};
use store::StoreRepositoryBridge;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt};

mod delegates;
#[allow(missing_docs)]
pub mod error;
mod log_callback;
mod store;
mod uniffi_support;

pub use delegates::{FlowHostDelegate, NativeCallbackDelegate, VendorSdkDelegate};
use error::Result;
pub use log_callback::LogCallback;
use log_callback::CallbackLayer;
pub use store::FlowRecordStore;

/// The bridge as seen from the host engine. Every `auth_*` and `open_purchase_*` call starts one
/// flow and leads to exactly one callback on the [`NativeCallbackDelegate`], unless it returns an
/// error or the flow is dropped by the restore policy.
#[derive(uniffi::Object)]
pub struct FlowBridgeClient(pub(crate) FlowBridge);

#[uniffi::export(async_runtime = "tokio")]
impl FlowBridgeClient {
    /// Create a bridge. Pending flows are kept in memory unless a `store` is provided.
    #[uniffi::constructor]
    pub fn new(
        vendor: Arc<dyn VendorSdkDelegate>,
        host: Arc<dyn FlowHostDelegate>,
        callbacks: Arc<dyn NativeCallbackDelegate>,
        store: Option<Arc<dyn FlowRecordStore>>,
        settings: Option<BridgeSettings>,
    ) -> Self {
        let vendor = Arc::new(VendorBridge(vendor));
        let host = Arc::new(HostBridge(host));
        let callbacks = Arc::new(CallbackBridge(callbacks));
        let settings = settings.unwrap_or_default();

        Self(match store {
            Some(store) => FlowBridge::new(
                vendor,
                host,
                callbacks,
                Arc::new(StoreRepositoryBridge::new(store)),
                settings,
            ),
            None => FlowBridge::in_memory(vendor, host, callbacks, settings),
        })
    }

    /// Initialize the login SDK
    pub fn initialize(&self, config: LoginSdkConfig) -> Result<()> {
        Ok(self.0.initialize(&config)?)
    }

    /// Initialize the login SDK for OAuth. An unparsable `client_id` falls back to 0.
    pub fn initialize_oauth(
        &self,
        project_id: String,
        client_id: String,
        social: Option<SocialConfig>,
    ) -> Result<()> {
        self.initialize(LoginSdkConfig {
            project_id,
            mode: LoginMode::oauth_from_str(&client_id),
            social: social.unwrap_or_default(),
        })
    }

    #[allow(missing_docs)]
    pub fn configure_analytics(
        &self,
        game_engine: String,
        game_engine_version: String,
    ) -> Result<()> {
        Ok(self.0.configure_analytics(&AnalyticsConfig {
            game_engine,
            game_engine_version,
        })?)
    }

    /// Start a social network login. `provider` is matched case-insensitively.
    pub async fn auth_social(
        &self,
        provider: String,
        remember_me: bool,
        invalidate_token: bool,
        callback: i64,
    ) -> Result<FlowKey> {
        let provider: SocialProvider = provider.parse()?;
        self.start(
            callback,
            FlowRequest::SocialLogin(SocialLoginRequest {
                provider,
                remember_me,
                invalidate_token,
            }),
        )
        .await
    }

    /// Start a login through the vendor's web widget.
    pub async fn auth_widget(
        &self,
        locale: Option<String>,
        remember_me: bool,
        callback: i64,
    ) -> Result<FlowKey> {
        self.start(
            callback,
            FlowRequest::WidgetLogin(WidgetLoginRequest {
                locale,
                remember_me,
            }),
        )
        .await
    }

    /// Open the payment UI. The outcome is reported through `on_purchase_success` or
    /// `on_purchase_error`.
    pub async fn open_purchase_ui(
        &self,
        token: String,
        sandbox: bool,
        redirect_scheme: Option<String>,
        redirect_host: Option<String>,
        pay_station_version: PayStationVersion,
        callback: i64,
    ) -> Result<FlowKey> {
        self.start(
            callback,
            FlowRequest::Purchase(PurchaseRequest {
                token,
                sandbox,
                redirect_scheme,
                redirect_host,
                pay_station_version,
            }),
        )
        .await
    }

    /// Open the payment page in a browser. The outcome is reported through `on_browser_closed`.
    pub async fn open_purchase_browser(
        &self,
        token: String,
        sandbox: bool,
        redirect_scheme: Option<String>,
        redirect_host: Option<String>,
        pay_station_version: PayStationVersion,
        callback: i64,
    ) -> Result<FlowKey> {
        self.start(
            callback,
            FlowRequest::PurchaseBrowser(PurchaseRequest {
                token,
                sandbox,
                redirect_scheme,
                redirect_host,
                pay_station_version,
            }),
        )
        .await
    }

    /// Report that the hosting context for `key` was created, or recreated from saved state when
    /// `restored` is set.
    pub async fn on_host_created(&self, key: FlowKey, restored: bool) -> Result<HostDecision> {
        Ok(self.0.on_host_created(key, restored).await?)
    }

    /// Report the vendor's outcome for a login flow, or for any flow whose outcome is already
    /// known as success, cancellation or error.
    pub async fn on_login_result(&self, key: FlowKey, outcome: VendorOutcome) -> Result<()> {
        Ok(self.0.on_flow_terminal(key, outcome).await?)
    }

    /// Report the payment status for a purchase flow.
    pub async fn on_purchase_result(&self, key: FlowKey, status: PurchaseStatus) -> Result<()> {
        Ok(self.0.on_flow_terminal(key, status.into()).await?)
    }

    /// Keys of the flows still waiting for their outcome.
    pub async fn pending_flows(&self) -> Result<Vec<FlowKey>> {
        Ok(self
            .0
            .pending()
            .await?
            .iter()
            .map(|record| record.key())
            .collect())
    }
}

impl FlowBridgeClient {
    async fn start(&self, callback: i64, request: FlowRequest) -> Result<FlowKey> {
        Ok(self
            .0
            .start_flow(CallbackHandle::new(callback), request)
            .await?)
    }
}

/// Install the global log subscriber. Only the first call has any effect.
///
/// Events at `info` and above are logged unless `RUST_LOG` says otherwise. They go to logcat on
/// Android, the unified logging system on iOS and stderr everywhere else, and to `callback` if
/// one is given.
#[uniffi::export]
pub fn init_logger(callback: Option<Arc<dyn LogCallback>>) {
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(callback.map(CallbackLayer::new));

    #[cfg(not(any(target_os = "android", target_os = "ios")))]
    let registry = registry.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    // Not `try_init`, which would also claim the `log` facade the platform loggers need.
    if tracing::subscriber::set_global_default(registry).is_err() {
        return;
    }

    // With the `log-always` feature every tracing event is also emitted through `log`.
    #[cfg(target_os = "ios")]
    let _ = oslog::OsLogger::new("com.flowbridge.sdk")
        .level_filter(log::LevelFilter::Info)
        .init();

    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_tag("com.flowbridge.sdk")
            .with_max_level(log::LevelFilter::Info),
    );
}
