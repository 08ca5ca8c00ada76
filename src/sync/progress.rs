//! Scan progress reporting.

use parking_lot::Mutex;

/// One progress update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub message: String,
    /// `None` for informational events such as "series found".
    pub percentage: Option<u8>,
}

impl ProgressEvent {
    /// Percentage with `-1` standing for an informational event.
    pub fn legacy_percentage(&self) -> i32 {
        self.percentage.map_or(-1, i32::from)
    }
}

/// Progress callback for scan operations.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

#[derive(Default)]
struct ReporterState {
    percentage: u8,
    last_message: Option<String>,
}

/// Turns scan steps into a monotonic progress stream.
///
/// Percentages never go down and never exceed 100, whatever order the
/// orchestrator reports them in.
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
    state: Mutex<ReporterState>,
}

impl ProgressReporter {
    pub fn new(callback: Option<ProgressCallback>) -> Self {
        Self {
            callback,
            state: Mutex::new(ReporterState::default()),
        }
    }

    pub fn silent() -> Self {
        Self::new(None)
    }

    /// Report a percentage update.
    pub fn progress(&self, message: impl Into<String>, percentage: f64) {
        let message = message.into();
        let value = {
            let mut state = self.state.lock();
            let clamped = percentage.clamp(0.0, 100.0).round() as u8;
            state.percentage = state.percentage.max(clamped);
            state.last_message = Some(message.clone());
            state.percentage
        };
        self.emit(ProgressEvent {
            message,
            percentage: Some(value),
        });
    }

    /// Report an informational event without moving the percentage.
    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        self.state.lock().last_message = Some(message.clone());
        self.emit(ProgressEvent {
            message,
            percentage: None,
        });
    }

    pub fn percentage(&self) -> u8 {
        self.state.lock().percentage
    }

    pub fn last_message(&self) -> Option<String> {
        self.state.lock().last_message.clone()
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(callback) = &self.callback {
            callback(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn recording() -> (ProgressReporter, Arc<Mutex<Vec<ProgressEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = ProgressReporter::new(Some(Box::new(move |e| sink.lock().push(e))));
        (reporter, events)
    }

    #[test]
    fn percentages_are_monotonic_and_clamped() {
        let (reporter, events) = recording();
        reporter.progress("a", 40.0);
        reporter.progress("b", 20.0);
        reporter.progress("c", 250.0);
        reporter.progress("d", -5.0);

        let seen: Vec<_> = events.lock().iter().map(|e| e.percentage).collect();
        assert_eq!(seen, vec![Some(40), Some(40), Some(100), Some(100)]);
        assert_eq!(reporter.last_message().as_deref(), Some("d"));
    }

    #[test]
    fn info_events_are_indeterminate() {
        let (reporter, events) = recording();
        reporter.progress("walk", 10.0);
        reporter.info("Series found: Lost");

        let events = events.lock();
        assert_eq!(events[1].percentage, None);
        assert_eq!(events[1].legacy_percentage(), -1);
        assert_eq!(events[0].legacy_percentage(), 10);
        assert_eq!(reporter.percentage(), 10);
        assert_eq!(reporter.last_message().as_deref(), Some("Series found: Lost"));
    }

    #[test]
    fn silent_reporter_still_tracks_state() {
        let reporter = ProgressReporter::silent();
        reporter.progress("done", 100.0);
        assert_eq!(reporter.percentage(), 100);
    }
}
