#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in vsixget
//!
//! Library crates never print or log directly. They push domain events into
//! an unbounded channel and the CLI decides how to render them (tracing
//! records, diagnostics on stderr, or nothing at all).
//!
//! ## Architecture
//!
//! - **Domain-driven events**: grouped by functional domain (Resolver, Download, Batch)
//! - **Unified `EventEmitter` trait**: one API whether you hold a sender or a struct with one
//! - **Tracing integration**: every event knows its log level and target

pub mod meta;
pub use meta::EventSource;

pub mod events;
pub use events::{AppEvent, BatchEvent, DownloadEvent, FailureContext, GeneralEvent, ResolverEvent};

use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;
use vsixget_errors::UserFacingError;

/// Type alias for event sender
pub type EventSender = UnboundedSender<AppEvent>;

/// Type alias for event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<AppEvent>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout vsixget
///
/// Implementors only provide `event_sender`; a `None` sender silently
/// discards everything, which is what tests and embedders usually want.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Receiver may be gone during shutdown
            let _ = sender.send(event);
        }
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    /// Emit an error event
    fn emit_error(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error(message)));
    }

    /// Emit an operation started event
    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    /// Emit an operation completed event
    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    /// Emit a resolver failure with its user-facing rendering
    fn emit_resolve_failed<E: UserFacingError + ?Sized>(
        &self,
        reference: impl Into<String>,
        error: &E,
    ) {
        self.emit(AppEvent::Resolver(ResolverEvent::Failed {
            reference: reference.into(),
            failure: FailureContext::from_error(error),
        }));
    }

    /// Emit a download started event
    fn emit_download_started(
        &self,
        label: impl Into<String>,
        url: impl Into<String>,
        resume_from: u64,
    ) {
        self.emit(AppEvent::Download(DownloadEvent::Started {
            label: label.into(),
            url: url.into(),
            resume_from,
        }));
    }

    /// Emit a download completed event
    fn emit_download_completed(&self, label: impl Into<String>, path: PathBuf, bytes: u64) {
        self.emit(AppEvent::Download(DownloadEvent::Completed {
            label: label.into(),
            path,
            bytes,
        }));
    }

    /// Emit a download failure with its user-facing rendering
    fn emit_download_failed<E: UserFacingError + ?Sized>(
        &self,
        label: impl Into<String>,
        error: &E,
    ) {
        self.emit(AppEvent::Download(DownloadEvent::Failed {
            label: label.into(),
            failure: FailureContext::from_error(error),
        }));
    }
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}
