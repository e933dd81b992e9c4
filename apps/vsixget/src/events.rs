//! Event handling and user feedback during a run

use console::{Style, Term};
use vsixget_events::AppEvent;

use crate::logging::log_event_with_tracing;

/// Turns events into log records and per-failure diagnostics
pub struct EventHandler {
    term: Term,
    colors_enabled: bool,
    /// Number of one-line failure diagnostics printed so far
    failures: usize,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(colors_enabled: bool) -> Self {
        Self {
            term: Term::stderr(),
            colors_enabled,
            failures: 0,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: &AppEvent) {
        log_event_with_tracing(event);

        if let Some((label, failure)) = event.failure() {
            self.failures += 1;
            let prefix = self.style(Style::new().red().bold(), "error");
            let line = match &failure.hint {
                Some(hint) => format!("{prefix}: {label}: {} ({hint})", failure.message),
                None => format!("{prefix}: {label}: {}", failure.message),
            };
            // Best effort; a closed stderr must not abort the batch
            let _ = self.term.write_line(&line);
        }
    }

    /// Print a warning line outside of the event stream
    pub fn show_warning(&self, message: &str) {
        let prefix = self.style(Style::new().yellow().bold(), "warning");
        let _ = self.term.write_line(&format!("{prefix}: {message}"));
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    fn style(&self, style: Style, text: &str) -> String {
        if self.colors_enabled {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsixget_events::{DownloadEvent, FailureContext, ResolverEvent};

    #[test]
    fn test_counts_only_failure_events() {
        let mut handler = EventHandler::new(false);
        handler.handle_event(&AppEvent::Download(DownloadEvent::Completed {
            label: "acme.widget@1.0.0".to_string(),
            path: "acme.widget@1.0.0.vsix".into(),
            bytes: 10,
        }));
        handler.handle_event(&AppEvent::Resolver(ResolverEvent::Failed {
            reference: "acme.gone".to_string(),
            failure: FailureContext::new(None::<String>, "not found", None::<String>, false),
        }));
        assert_eq!(handler.failures(), 1);
    }
}
