use std::sync::Arc;

use tracing_subscriber::{layer::Context, Layer};

pub(crate) const LOG_CALLBACK_TARGET: &str = "flowbridge_uniffi::log_callback";

/// Callback interface for receiving bridge log events, e.g. to forward them into the engine's own
/// log.
#[uniffi::export(with_foreign)]
pub trait LogCallback: Send + Sync {
    /// Called for every event the bridge emits.
    ///
    /// - level: `TRACE`, `DEBUG`, `INFO`, `WARN` or `ERROR`
    /// - target: module that emitted the event, e.g. `flowbridge_core::bridge`
    /// - message: the formatted message
    ///
    /// Implementations should catch their own exceptions and return an error instead.
    fn on_log(&self, level: String, target: String, message: String) -> crate::Result<()>;
}

/// Tracing layer forwarding events to a [`LogCallback`].
pub(crate) struct CallbackLayer {
    callback: Arc<dyn LogCallback>,
}

impl CallbackLayer {
    pub(crate) fn new(callback: Arc<dyn LogCallback>) -> Self {
        Self { callback }
    }
}

impl<S> Layer<S> for CallbackLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // Our own failure reports would loop back into the failing callback.
        if metadata.target() == LOG_CALLBACK_TARGET {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        if let Err(e) = self.callback.on_log(
            metadata.level().to_string(),
            metadata.target().to_string(),
            visitor.finish(),
        ) {
            tracing::error!(target: LOG_CALLBACK_TARGET, "Logging callback failed: {:?}", e);
        }
    }
}

/// Collects the message of an event, followed by its other fields as `name=value` pairs. Every
/// `record_*` method of [`Visit`](tracing::field::Visit) defaults to `record_debug`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            return self.message;
        }
        format!("{} {}", self.message, self.fields.join(" "))
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}
