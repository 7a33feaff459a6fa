//! End-to-end flows through the exported client, with the delegates implemented the way a host
//! engine would implement them.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use flowbridge_core::{
    flow::{FlowKind, PayStationVersion, PurchaseRequest, SocialLoginRequest, WidgetLoginRequest},
    outcome::{PurchaseStatus, VendorOutcome},
    AnalyticsConfig, BridgeSettings, CallbackHandle, FlowKey, HostDecision, LoginMode,
    LoginSdkConfig, RestorePolicy,
};
use flowbridge_uniffi::{error::FlowBridgeError, *};

type Result<T> = std::result::Result<T, FlowBridgeError>;

#[derive(Default)]
struct Engine {
    vendor_calls: Mutex<Vec<String>>,
    launched: Mutex<Vec<FlowKey>>,
    finished: Mutex<Vec<FlowKey>>,
    callbacks: Mutex<Vec<String>>,
    fail_start: Mutex<Option<String>>,
}

impl Engine {
    fn callbacks(&self) -> Vec<String> {
        self.callbacks.lock().unwrap().clone()
    }

    fn start(&self, call: String) -> Result<()> {
        if let Some(message) = self.fail_start.lock().unwrap().clone() {
            return Err(FlowBridgeError::Vendor { message });
        }
        self.vendor_calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl VendorSdkDelegate for Engine {
    fn initialize(&self, config: LoginSdkConfig) -> Result<()> {
        self.vendor_calls
            .lock()
            .unwrap()
            .push(format!("init {} {:?}", config.project_id, config.mode));
        Ok(())
    }

    fn configure_analytics(&self, config: AnalyticsConfig) -> Result<()> {
        self.vendor_calls.lock().unwrap().push(format!(
            "analytics {} {}",
            config.game_engine, config.game_engine_version
        ));
        Ok(())
    }

    fn start_social_login(&self, request: SocialLoginRequest) -> Result<()> {
        self.start(format!("social {}", request.provider.as_str()))
    }

    fn start_widget_login(&self, request: WidgetLoginRequest) -> Result<()> {
        self.start(format!("widget {:?}", request.locale))
    }

    fn start_purchase(&self, request: PurchaseRequest) -> Result<()> {
        self.start(format!("purchase {}", request.token))
    }

    fn access_token(&self) -> Result<String> {
        Ok("access".to_string())
    }

    fn refresh_token(&self) -> Result<String> {
        Ok("refresh".to_string())
    }

    fn token_expires_at(&self) -> Result<i64> {
        Ok(1_700_000_000)
    }
}

impl FlowHostDelegate for Engine {
    fn launch(&self, key: FlowKey) -> Result<()> {
        self.launched.lock().unwrap().push(key);
        Ok(())
    }

    fn finish(&self, key: FlowKey) -> Result<()> {
        self.finished.lock().unwrap().push(key);
        Ok(())
    }
}

impl NativeCallbackDelegate for Engine {
    fn on_auth_success(
        &self,
        callback: i64,
        access_token: String,
        refresh_token: String,
        expires_at: i64,
        remember_me: bool,
    ) -> Result<()> {
        self.callbacks.lock().unwrap().push(format!(
            "auth_success {callback} {access_token} {refresh_token} {expires_at} {remember_me}"
        ));
        Ok(())
    }

    fn on_auth_cancel(&self, callback: i64) -> Result<()> {
        self.callbacks
            .lock()
            .unwrap()
            .push(format!("auth_cancel {callback}"));
        Ok(())
    }

    fn on_auth_error(&self, callback: i64, message: String) -> Result<()> {
        self.callbacks
            .lock()
            .unwrap()
            .push(format!("auth_error {callback} {message}"));
        Ok(())
    }

    fn on_purchase_success(&self, callback: i64) -> Result<()> {
        self.callbacks
            .lock()
            .unwrap()
            .push(format!("purchase_success {callback}"));
        Ok(())
    }

    fn on_purchase_error(&self, callback: i64, message: String) -> Result<()> {
        self.callbacks
            .lock()
            .unwrap()
            .push(format!("purchase_error {callback} {message}"));
        Ok(())
    }

    fn on_browser_closed(&self, callback: i64, is_manual: bool) -> Result<()> {
        self.callbacks
            .lock()
            .unwrap()
            .push(format!("browser_closed {callback} {is_manual}"));
        Ok(())
    }
}

#[derive(Default)]
struct SharedPreferences(Mutex<HashMap<String, String>>);

#[async_trait::async_trait]
impl FlowRecordStore for SharedPreferences {
    async fn get(&self, key: String) -> Result<Option<String>> {
        Ok(self.0.lock().unwrap().get(&key).cloned())
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.0.lock().unwrap().values().cloned().collect())
    }

    async fn set(&self, key: String, value: String) -> Result<()> {
        self.0.lock().unwrap().insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: String) -> Result<Option<String>> {
        Ok(self.0.lock().unwrap().remove(&key))
    }
}

fn client(engine: &Arc<Engine>, settings: Option<BridgeSettings>) -> FlowBridgeClient {
    FlowBridgeClient::new(engine.clone(), engine.clone(), engine.clone(), None, settings)
}

#[tokio::test]
async fn social_login_round_trip() {
    let engine = Arc::new(Engine::default());
    let client = client(&engine, None);

    let key = client
        .auth_social("google".to_string(), true, false, 0x7fff_0000_1234)
        .await
        .unwrap();
    assert_eq!(
        key,
        FlowKey::new(FlowKind::SocialLogin, CallbackHandle::new(0x7fff_0000_1234))
    );
    assert_eq!(*engine.launched.lock().unwrap(), vec![key]);

    assert_eq!(
        client.on_host_created(key, false).await.unwrap(),
        HostDecision::Started
    );
    client
        .on_login_result(key, VendorOutcome::Success)
        .await
        .unwrap();

    assert_eq!(
        engine.callbacks(),
        vec![format!(
            "auth_success {} access refresh 1700000000 true",
            0x7fff_0000_1234_i64
        )]
    );
    assert_eq!(*engine.finished.lock().unwrap(), vec![key]);
    assert!(client.pending_flows().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_provider_is_rejected_before_launch() {
    let engine = Arc::new(Engine::default());
    let client = client(&engine, None);

    let result = client.auth_social("myspace".to_string(), false, false, 1).await;

    assert!(matches!(
        result,
        Err(FlowBridgeError::UnknownProvider { provider }) if provider == "myspace"
    ));
    assert!(engine.launched.lock().unwrap().is_empty());
}

#[tokio::test]
async fn purchase_kinds_encode_cancellation_differently() {
    let engine = Arc::new(Engine::default());
    let client = client(&engine, None);

    let ui = client
        .open_purchase_ui("t1".to_string(), true, None, None, PayStationVersion::V4, 5)
        .await
        .unwrap();
    let browser = client
        .open_purchase_browser("t2".to_string(), true, None, None, PayStationVersion::V4, 5)
        .await
        .unwrap();
    client.on_host_created(ui, false).await.unwrap();
    client.on_host_created(browser, false).await.unwrap();

    client
        .on_purchase_result(ui, PurchaseStatus::Cancelled)
        .await
        .unwrap();
    client
        .on_purchase_result(browser, PurchaseStatus::Cancelled)
        .await
        .unwrap();

    assert_eq!(
        engine.callbacks(),
        vec!["purchase_error 5 Cancelled", "browser_closed 5 true"]
    );
}

#[tokio::test]
async fn vendor_failure_with_empty_message_reports_unknown_error() {
    let engine = Arc::new(Engine::default());
    *engine.fail_start.lock().unwrap() = Some(String::new());
    let client = client(&engine, None);

    let key = client.auth_widget(None, false, 11).await.unwrap();

    assert_eq!(
        client.on_host_created(key, false).await.unwrap(),
        HostDecision::Delivered
    );
    assert_eq!(engine.callbacks(), vec!["auth_error 11 Unknown error"]);
}

#[tokio::test]
async fn restored_context_follows_restore_policy() {
    let engine = Arc::new(Engine::default());
    let client = client(
        &engine,
        Some(BridgeSettings {
            restore_policy: RestorePolicy::DeliverCancelled,
            analytics: None,
        }),
    );

    let key = client.auth_widget(None, false, 3).await.unwrap();

    assert_eq!(
        client.on_host_created(key, true).await.unwrap(),
        HostDecision::Delivered
    );
    assert_eq!(engine.callbacks(), vec!["auth_cancel 3"]);
    assert!(matches!(
        client.on_login_result(key, VendorOutcome::Success).await,
        Err(FlowBridgeError::UnknownFlow { .. })
    ));
}

#[tokio::test]
async fn pending_flow_survives_client_recreation() {
    let engine = Arc::new(Engine::default());
    let store = Arc::new(SharedPreferences::default());

    let first = FlowBridgeClient::new(
        engine.clone(),
        engine.clone(),
        engine.clone(),
        Some(store.clone()),
        None,
    );
    let key = first
        .open_purchase_ui("t".to_string(), false, None, None, PayStationVersion::V3, 21)
        .await
        .unwrap();
    drop(first);

    let second = FlowBridgeClient::new(
        engine.clone(),
        engine.clone(),
        engine.clone(),
        Some(store.clone()),
        None,
    );
    assert_eq!(second.pending_flows().await.unwrap(), vec![key]);

    second.on_host_created(key, false).await.unwrap();
    second
        .on_purchase_result(key, PurchaseStatus::Completed)
        .await
        .unwrap();

    assert_eq!(engine.callbacks(), vec!["purchase_success 21"]);
    assert!(store.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_stored_record_still_fires_one_callback() {
    let engine = Arc::new(Engine::default());
    let store = Arc::new(SharedPreferences::default());
    let client = FlowBridgeClient::new(
        engine.clone(),
        engine.clone(),
        engine.clone(),
        Some(store.clone()),
        None,
    );

    let key = client
        .open_purchase_ui("t".to_string(), false, None, None, PayStationVersion::V4, 7)
        .await
        .unwrap();
    client.on_host_created(key, false).await.unwrap();
    store
        .0
        .lock()
        .unwrap()
        .insert(key.storage_key(), "{".to_string());

    assert!(matches!(
        client
            .on_purchase_result(key, PurchaseStatus::Completed)
            .await,
        Err(FlowBridgeError::Storage { .. })
    ));
    assert!(matches!(
        client
            .on_purchase_result(key, PurchaseStatus::Completed)
            .await,
        Err(FlowBridgeError::UnknownFlow { .. })
    ));

    let callbacks = engine.callbacks();
    assert_eq!(callbacks.len(), 1);
    assert!(callbacks[0].starts_with("purchase_error 7 "));
    assert!(store.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn oauth_client_id_is_parsed_leniently() {
    let engine = Arc::new(Engine::default());
    let client = client(
        &engine,
        Some(BridgeSettings {
            restore_policy: RestorePolicy::Drop,
            analytics: Some(AnalyticsConfig {
                game_engine: "unreal".to_string(),
                game_engine_version: "5.3".to_string(),
            }),
        }),
    );

    client
        .initialize_oauth("p1".to_string(), "not-a-number".to_string(), None)
        .unwrap();

    assert_eq!(
        *engine.vendor_calls.lock().unwrap(),
        vec![
            format!("init p1 {:?}", LoginMode::OAuth { client_id: 0 }),
            "analytics unreal 5.3".to_string(),
        ]
    );
}
