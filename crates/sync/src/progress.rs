//! Progress events for long-running imports and syncs.
//!
//! Events are serialized one per line (NDJSON) by the HTTP layer as they
//! arrive, so the admin panel can render a progress bar and a log.

use serde::Serialize;
use tokio::sync::mpsc;

/// One line of the progress stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncEvent {
    Progress {
        step: String,
        percent: u8,
        message: String,
    },
    Log {
        level: LogLevel,
        message: String,
    },
    Complete {
        status: CompletionStatus,
        summary: serde_json::Value,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Success,
    /// Finished, but some tables or statements failed.
    Partial,
    Error,
}

impl SyncEvent {
    /// Serialize as a single newline-terminated JSON line.
    pub fn to_ndjson_line(&self) -> String {
        let mut line = serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({ "type": "log", "level": "error", "message": e.to_string() })
                .to_string()
        });
        line.push('\n');
        line
    }
}

/// Sends [`SyncEvent`]s to an optional listener and mirrors them to
/// tracing. A dropped receiver (client went away) does not stop the run.
#[derive(Debug, Clone, Default)]
pub struct ProgressReporter {
    tx: Option<mpsc::UnboundedSender<SyncEvent>>,
}

impl ProgressReporter {
    pub fn new(tx: mpsc::UnboundedSender<SyncEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A reporter that only logs.
    pub fn silent() -> Self {
        Self { tx: None }
    }

    pub fn progress(&self, step: &str, percent: u8, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(step, percent, %message, "Sync progress");
        self.send(SyncEvent::Progress {
            step: step.to_string(),
            percent: percent.min(100),
            message,
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(%message);
        self.send(SyncEvent::Log {
            level: LogLevel::Info,
            message,
        });
    }

    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message);
        self.send(SyncEvent::Log {
            level: LogLevel::Warning,
            message,
        });
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(%message);
        self.send(SyncEvent::Log {
            level: LogLevel::Error,
            message,
        });
    }

    pub fn complete(&self, status: CompletionStatus, summary: serde_json::Value) {
        tracing::info!(?status, "Sync finished");
        self.send(SyncEvent::Complete { status, summary });
    }

    fn send(&self, event: SyncEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}

/// Percentage of `done` out of `total`, scaled into `[start, end]`.
pub fn scaled_percent(done: usize, total: usize, start: u8, end: u8) -> u8 {
    if total == 0 || end <= start {
        return end;
    }
    let span = (end - start) as usize;
    let pct = start as usize + (done.min(total) * span) / total;
    pct as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let line = SyncEvent::Progress {
            step: "dump".into(),
            percent: 40,
            message: "Dumping products".into(),
        }
        .to_ndjson_line();
        assert!(line.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["type"], "progress");
        assert_eq!(value["percent"], 40);

        let log = serde_json::to_value(SyncEvent::Log {
            level: LogLevel::Warning,
            message: "x".into(),
        })
        .unwrap();
        assert_eq!(log["type"], "log");
        assert_eq!(log["level"], "warning");
    }

    #[test]
    fn complete_event_carries_summary() {
        let value = serde_json::to_value(SyncEvent::Complete {
            status: CompletionStatus::Partial,
            summary: serde_json::json!({ "errored": 2 }),
        })
        .unwrap();
        assert_eq!(value["type"], "complete");
        assert_eq!(value["status"], "partial");
        assert_eq!(value["summary"]["errored"], 2);
    }

    #[tokio::test]
    async fn reporter_forwards_events_and_survives_dropped_receiver() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let reporter = ProgressReporter::new(tx);
        reporter.progress("backup", 150, "Backing up");
        assert_eq!(
            rx.recv().await,
            Some(SyncEvent::Progress {
                step: "backup".into(),
                percent: 100,
                message: "Backing up".into(),
            })
        );

        drop(rx);
        reporter.info("nobody is listening");
        ProgressReporter::silent().error("also fine");
    }

    #[test]
    fn scaled_percent_maps_into_range() {
        assert_eq!(scaled_percent(0, 10, 20, 80), 20);
        assert_eq!(scaled_percent(5, 10, 20, 80), 50);
        assert_eq!(scaled_percent(10, 10, 20, 80), 80);
        assert_eq!(scaled_percent(0, 0, 20, 80), 80);
    }
}
