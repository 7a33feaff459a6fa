//! Test doubles for the interfaces the bridge depends on.

use std::sync::Mutex;

use crate::{
    callbacks::{NativeCallbacks, TerminalCallback},
    flow::{PurchaseRequest, SocialLoginRequest, WidgetLoginRequest},
    handle::{CallbackHandle, FlowKey},
    host::{FlowHost, HostError},
    outcome::LoginTokens,
    settings::{AnalyticsConfig, LoginSdkConfig},
    vendor::{VendorError, VendorSdk},
};

/// Records every native callback in the order it fired.
#[derive(Debug, Default)]
pub struct RecordingCallbacks {
    calls: Mutex<Vec<(CallbackHandle, TerminalCallback)>>,
}

impl RecordingCallbacks {
    #[allow(missing_docs)]
    pub fn calls(&self) -> Vec<(CallbackHandle, TerminalCallback)> {
        self.calls.lock().expect("Mutex should not be poisoned").clone()
    }

    fn record(&self, handle: CallbackHandle, callback: TerminalCallback) {
        self.calls
            .lock()
            .expect("Mutex should not be poisoned")
            .push((handle, callback));
    }
}

impl NativeCallbacks for RecordingCallbacks {
    fn on_auth_success(
        &self,
        handle: CallbackHandle,
        access_token: String,
        refresh_token: String,
        expires_at: i64,
        remember_me: bool,
    ) {
        self.record(
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
        self.record(handle, TerminalCallback::LoginCancel);
    }

    fn on_auth_error(&self, handle: CallbackHandle, message: String) {
        self.record(handle, TerminalCallback::LoginError { message });
    }

    fn on_purchase_success(&self, handle: CallbackHandle) {
        self.record(handle, TerminalCallback::PurchaseSuccess);
    }

    fn on_purchase_error(&self, handle: CallbackHandle, message: String) {
        self.record(handle, TerminalCallback::PurchaseError { message });
    }

    fn on_browser_closed(&self, handle: CallbackHandle, is_manual: bool) {
        self.record(handle, TerminalCallback::BrowserClosed { is_manual });
    }
}

/// A call made into [`FakeVendorSdk`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum VendorCall {
    Initialize(LoginSdkConfig),
    ConfigureAnalytics(AnalyticsConfig),
    SocialLogin(SocialLoginRequest),
    WidgetLogin(WidgetLoginRequest),
    Purchase(PurchaseRequest),
}

#[derive(Debug, Default)]
struct Session {
    access_token: String,
    refresh_token: String,
    expires_at: i64,
}

/// Vendor SDK double. Records every call, can be told to fail starting flows, and serves a fixed
/// session for the token accessors.
#[derive(Debug, Default)]
pub struct FakeVendorSdk {
    calls: Mutex<Vec<VendorCall>>,
    start_error: Mutex<Option<String>>,
    session: Mutex<Option<Session>>,
}

impl FakeVendorSdk {
    /// A vendor whose token accessors return the given session.
    pub fn with_session(access_token: &str, refresh_token: &str, expires_at: i64) -> Self {
        let vendor = Self::default();
        *vendor.session.lock().expect("Mutex should not be poisoned") = Some(Session {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            expires_at,
        });
        vendor
    }

    /// Make every following start method fail with `message`.
    pub fn fail_start_with(&self, message: &str) {
        *self.start_error.lock().expect("Mutex should not be poisoned") =
            Some(message.to_string());
    }

    /// Make the token accessors fail.
    pub fn clear_session(&self) {
        *self.session.lock().expect("Mutex should not be poisoned") = None;
    }

    #[allow(missing_docs)]
    pub fn calls(&self) -> Vec<VendorCall> {
        self.calls.lock().expect("Mutex should not be poisoned").clone()
    }

    fn record(&self, call: VendorCall) {
        self.calls
            .lock()
            .expect("Mutex should not be poisoned")
            .push(call);
    }

    fn start(&self, call: VendorCall) -> Result<(), VendorError> {
        if let Some(message) = self
            .start_error
            .lock()
            .expect("Mutex should not be poisoned")
            .clone()
        {
            return Err(VendorError(message));
        }
        self.record(call);
        Ok(())
    }

    fn session<T>(&self, read: impl FnOnce(&Session) -> T) -> Result<T, VendorError> {
        self.session
            .lock()
            .expect("Mutex should not be poisoned")
            .as_ref()
            .map(read)
            .ok_or_else(|| VendorError("No active session".to_string()))
    }
}

impl VendorSdk for FakeVendorSdk {
    fn initialize(&self, config: &LoginSdkConfig) -> Result<(), VendorError> {
        self.record(VendorCall::Initialize(config.clone()));
        Ok(())
    }

    fn configure_analytics(&self, config: &AnalyticsConfig) -> Result<(), VendorError> {
        self.record(VendorCall::ConfigureAnalytics(config.clone()));
        Ok(())
    }

    fn start_social_login(&self, request: &SocialLoginRequest) -> Result<(), VendorError> {
        self.start(VendorCall::SocialLogin(request.clone()))
    }

    fn start_widget_login(&self, request: &WidgetLoginRequest) -> Result<(), VendorError> {
        self.start(VendorCall::WidgetLogin(request.clone()))
    }

    fn start_purchase(&self, request: &PurchaseRequest) -> Result<(), VendorError> {
        self.start(VendorCall::Purchase(request.clone()))
    }

    fn access_token(&self) -> Result<String, VendorError> {
        self.session(|s| s.access_token.clone())
    }

    fn refresh_token(&self) -> Result<String, VendorError> {
        self.session(|s| s.refresh_token.clone())
    }

    fn token_expires_at(&self) -> Result<i64, VendorError> {
        self.session(|s| s.expires_at)
    }
}

/// Host double recording launched and finished contexts.
#[derive(Debug, Default)]
pub struct RecordingHost {
    launched: Mutex<Vec<FlowKey>>,
    finished: Mutex<Vec<FlowKey>>,
    launch_error: Mutex<Option<String>>,
}

impl RecordingHost {
    /// Make every following launch fail with `message`.
    pub fn fail_launch_with(&self, message: &str) {
        *self.launch_error.lock().expect("Mutex should not be poisoned") =
            Some(message.to_string());
    }

    #[allow(missing_docs)]
    pub fn launched(&self) -> Vec<FlowKey> {
        self.launched
            .lock()
            .expect("Mutex should not be poisoned")
            .clone()
    }

    #[allow(missing_docs)]
    pub fn finished(&self) -> Vec<FlowKey> {
        self.finished
            .lock()
            .expect("Mutex should not be poisoned")
            .clone()
    }
}

impl FlowHost for RecordingHost {
    fn launch(&self, key: FlowKey) -> Result<(), HostError> {
        if let Some(message) = self
            .launch_error
            .lock()
            .expect("Mutex should not be poisoned")
            .clone()
        {
            return Err(HostError(message));
        }
        self.launched
            .lock()
            .expect("Mutex should not be poisoned")
            .push(key);
        Ok(())
    }

    fn finish(&self, key: FlowKey) {
        self.finished
            .lock()
            .expect("Mutex should not be poisoned")
            .push(key);
    }
}
