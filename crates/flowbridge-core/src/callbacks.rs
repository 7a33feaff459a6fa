use serde::{Deserialize, Serialize};

use crate::{handle::CallbackHandle, outcome::LoginTokens};

/// The native callbacks a terminal outcome is delivered through. Implemented by the host engine,
/// one method per callback signature. Every method receives the handle supplied when the flow was
/// started.
///
/// Implementations must not panic; a failure on the native side is theirs to handle.
pub trait NativeCallbacks: Send + Sync {
    /// A login flow produced tokens.
    fn on_auth_success(
        &self,
        handle: CallbackHandle,
        access_token: String,
        refresh_token: String,
        expires_at: i64,
        remember_me: bool,
    );

    /// A login flow was cancelled.
    fn on_auth_cancel(&self, handle: CallbackHandle);

    /// A login flow failed. `message` is never empty.
    fn on_auth_error(&self, handle: CallbackHandle, message: String);

    /// A three-way purchase flow completed.
    fn on_purchase_success(&self, handle: CallbackHandle);

    /// A three-way purchase flow failed or was cancelled. `message` is never empty.
    fn on_purchase_error(&self, handle: CallbackHandle, message: String);

    /// A browser purchase flow closed its browser.
    fn on_browser_closed(&self, handle: CallbackHandle, is_manual: bool);
}

/// Exactly one native callback invocation, minus the handle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TerminalCallback {
    LoginSuccess(LoginTokens),
    LoginCancel,
    LoginError { message: String },
    PurchaseSuccess,
    PurchaseError { message: String },
    BrowserClosed { is_manual: bool },
}

impl TerminalCallback {
    /// Invoke the matching native callback for `handle`.
    pub fn dispatch(self, handle: CallbackHandle, callbacks: &dyn NativeCallbacks) {
        match self {
            TerminalCallback::LoginSuccess(tokens) => callbacks.on_auth_success(
                handle,
                tokens.access_token,
                tokens.refresh_token,
                tokens.expires_at,
                tokens.remember_me,
            ),
            TerminalCallback::LoginCancel => callbacks.on_auth_cancel(handle),
            TerminalCallback::LoginError { message } => callbacks.on_auth_error(handle, message),
            TerminalCallback::PurchaseSuccess => callbacks.on_purchase_success(handle),
            TerminalCallback::PurchaseError { message } => {
                callbacks.on_purchase_error(handle, message)
            }
            TerminalCallback::BrowserClosed { is_manual } => {
                callbacks.on_browser_closed(handle, is_manual)
            }
        }
    }
}
