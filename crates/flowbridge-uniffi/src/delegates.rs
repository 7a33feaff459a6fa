//! Foreign implementations of the interfaces the bridge depends on, and the adapters that plug them
//! into [`FlowBridge`](flowbridge_core::FlowBridge).

use std::sync::Arc;

use flowbridge_core::{
    flow::{PurchaseRequest, SocialLoginRequest, WidgetLoginRequest},
    AnalyticsConfig, CallbackHandle, FlowHost, FlowKey, HostError, LoginSdkConfig,
    NativeCallbacks, VendorError, VendorSdk,
};
use tracing::warn;

use crate::error::Result;

/// The vendor login and payments SDKs, as wrapped by the host engine.
///
/// Start methods return once the vendor flow is running. Its outcome is reported back through
/// [`FlowBridgeClient::on_login_result`](crate::FlowBridgeClient::on_login_result) or
/// [`FlowBridgeClient::on_purchase_result`](crate::FlowBridgeClient::on_purchase_result).
#[uniffi::export(with_foreign)]
pub trait VendorSdkDelegate: Send + Sync {
    #[allow(missing_docs)]
    fn initialize(&self, config: LoginSdkConfig) -> Result<()>;
    #[allow(missing_docs)]
    fn configure_analytics(&self, config: AnalyticsConfig) -> Result<()>;
    #[allow(missing_docs)]
    fn start_social_login(&self, request: SocialLoginRequest) -> Result<()>;
    #[allow(missing_docs)]
    fn start_widget_login(&self, request: WidgetLoginRequest) -> Result<()>;
    #[allow(missing_docs)]
    fn start_purchase(&self, request: PurchaseRequest) -> Result<()>;
    /// Access token of the current session.
    fn access_token(&self) -> Result<String>;
    /// Refresh token of the current session.
    fn refresh_token(&self) -> Result<String>;
    /// Expiry of the access token, in Unix seconds.
    fn token_expires_at(&self) -> Result<i64>;
}

/// Launches and finishes hosting contexts. `launch` must eventually lead to
/// [`FlowBridgeClient::on_host_created`](crate::FlowBridgeClient::on_host_created) being called
/// with the same key.
#[uniffi::export(with_foreign)]
pub trait FlowHostDelegate: Send + Sync {
    #[allow(missing_docs)]
    fn launch(&self, key: FlowKey) -> Result<()>;
    #[allow(missing_docs)]
    fn finish(&self, key: FlowKey) -> Result<()>;
}

/// The engine's native callbacks. `callback` is the handle passed when the flow was started.
///
/// Errors returned from these methods are logged and otherwise ignored; the flow counts as
/// delivered either way.
#[uniffi::export(with_foreign)]
pub trait NativeCallbackDelegate: Send + Sync {
    #[allow(missing_docs)]
    fn on_auth_success(
        &self,
        callback: i64,
        access_token: String,
        refresh_token: String,
        expires_at: i64,
        remember_me: bool,
    ) -> Result<()>;
    #[allow(missing_docs)]
    fn on_auth_cancel(&self, callback: i64) -> Result<()>;
    #[allow(missing_docs)]
    fn on_auth_error(&self, callback: i64, message: String) -> Result<()>;
    #[allow(missing_docs)]
    fn on_purchase_success(&self, callback: i64) -> Result<()>;
    #[allow(missing_docs)]
    fn on_purchase_error(&self, callback: i64, message: String) -> Result<()>;
    #[allow(missing_docs)]
    fn on_browser_closed(&self, callback: i64, is_manual: bool) -> Result<()>;
}

type VendorResult<T> = std::result::Result<T, VendorError>;

pub(crate) struct VendorBridge(pub Arc<dyn VendorSdkDelegate>);

fn vendor_error(e: crate::error::Error) -> VendorError {
    VendorError(e.into_message())
}

impl VendorSdk for VendorBridge {
    fn initialize(&self, config: &LoginSdkConfig) -> VendorResult<()> {
        self.0.initialize(config.clone()).map_err(vendor_error)
    }

    fn configure_analytics(&self, config: &AnalyticsConfig) -> VendorResult<()> {
        self.0.configure_analytics(config.clone()).map_err(vendor_error)
    }

    fn start_social_login(&self, request: &SocialLoginRequest) -> VendorResult<()> {
        self.0.start_social_login(request.clone()).map_err(vendor_error)
    }

    fn start_widget_login(&self, request: &WidgetLoginRequest) -> VendorResult<()> {
        self.0.start_widget_login(request.clone()).map_err(vendor_error)
    }

    fn start_purchase(&self, request: &PurchaseRequest) -> VendorResult<()> {
        self.0.start_purchase(request.clone()).map_err(vendor_error)
    }

    fn access_token(&self) -> VendorResult<String> {
        self.0.access_token().map_err(vendor_error)
    }

    fn refresh_token(&self) -> VendorResult<String> {
        self.0.refresh_token().map_err(vendor_error)
    }

    fn token_expires_at(&self) -> VendorResult<i64> {
        self.0.token_expires_at().map_err(vendor_error)
    }
}

pub(crate) struct HostBridge(pub Arc<dyn FlowHostDelegate>);

impl FlowHost for HostBridge {
    fn launch(&self, key: FlowKey) -> std::result::Result<(), HostError> {
        self.0.launch(key).map_err(|e| HostError(e.into_message()))
    }

    fn finish(&self, key: FlowKey) {
        if let Err(e) = self.0.finish(key) {
            warn!(%key, error = %e, "Host failed to finish its context");
        }
    }
}

pub(crate) struct CallbackBridge(pub Arc<dyn NativeCallbackDelegate>);

impl CallbackBridge {
    fn report(handle: CallbackHandle, result: Result<()>) {
        if let Err(e) = result {
            warn!(%handle, error = %e, "Native callback failed");
        }
    }
}

impl NativeCallbacks for CallbackBridge {
    fn on_auth_success(
        &self,
        handle: CallbackHandle,
        access_token: String,
        refresh_token: String,
        expires_at: i64,
        remember_me: bool,
    ) {
        Self::report(
            handle,
            self.0.on_auth_success(
                handle.value(),
                access_token,
                refresh_token,
                expires_at,
                remember_me,
            ),
        );
    }

    fn on_auth_cancel(&self, handle: CallbackHandle) {
        Self::report(handle, self.0.on_auth_cancel(handle.value()));
    }

    fn on_auth_error(&self, handle: CallbackHandle, message: String) {
        Self::report(handle, self.0.on_auth_error(handle.value(), message));
    }

    fn on_purchase_success(&self, handle: CallbackHandle) {
        Self::report(handle, self.0.on_purchase_success(handle.value()));
    }

    fn on_purchase_error(&self, handle: CallbackHandle, message: String) {
        Self::report(handle, self.0.on_purchase_error(handle.value(), message));
    }

    fn on_browser_closed(&self, handle: CallbackHandle, is_manual: bool) {
        Self::report(handle, self.0.on_browser_closed(handle.value(), is_manual));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use flowbridge_core::flow::FlowKind;

    use super::*;
    use crate::error::FlowBridgeError;

    #[derive(Default)]
    struct FlakyHost {
        finished: Mutex<Vec<FlowKey>>,
    }

    impl FlowHostDelegate for FlakyHost {
        fn launch(&self, _key: FlowKey) -> Result<()> {
            Err(FlowBridgeError::Host {
                message: "activity not found".to_string(),
            })
        }

        fn finish(&self, key: FlowKey) -> Result<()> {
            self.finished.lock().unwrap().push(key);
            Err(FlowBridgeError::CallbackError)
        }
    }

    #[test]
    fn host_errors_keep_the_foreign_message() {
        let host = Arc::new(FlakyHost::default());
        let bridge = HostBridge(host.clone());
        let key = FlowKey::new(FlowKind::SocialLogin, CallbackHandle::new(1));

        assert_eq!(
            bridge.launch(key),
            Err(HostError("activity not found".to_string()))
        );

        bridge.finish(key);
        assert_eq!(*host.finished.lock().unwrap(), vec![key]);
    }
}
