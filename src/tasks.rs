//! Delayed operations bound to the wizard step that started them
//!
//! Verification, upload, submission and download all complete after a fixed
//! latency. Each is spawned as a tokio task carrying a [`StepToken`]; the app
//! drains finished tasks every frame and drops any whose token no longer
//! matches the wizard.

use crate::state::{DocumentId, DocumentMeta, StepToken};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// What to apply once a delayed operation finishes
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    VerifyMobile { mobile: String },
    RecordUpload { id: DocumentId, meta: DocumentMeta },
    Submit,
    DownloadSummary { path: PathBuf },
}

impl PendingAction {
    /// Text shown while the operation runs
    pub fn progress_label(&self) -> &'static str {
        match self {
            Self::VerifyMobile { .. } => "Sending verification...",
            Self::RecordUpload { .. } => "Uploading document...",
            Self::Submit => "Submitting application...",
            Self::DownloadSummary { .. } => "Preparing summary...",
        }
    }
}

/// A finished operation
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub token: StepToken,
    pub action: PendingAction,
}

/// Spawns, tracks and cancels delayed operations
pub struct TaskScheduler {
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    handles: Vec<(JoinHandle<()>, &'static str)>,
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskScheduler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            handles: Vec::new(),
        }
    }

    /// Run `action` after `delay`. Must be called inside a tokio runtime.
    pub fn schedule(&mut self, token: StepToken, delay: Duration, action: PendingAction) {
        let label = action.progress_label();
        let tx = self.tx.clone();
        tracing::debug!("Scheduling {label} in {delay:?} for {token:?}");
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver only disappears on shutdown
            let _ = tx.send(Completion { token, action });
        });
        self.handles.push((handle, label));
    }

    /// Abort everything still in flight; returns how many were cancelled
    pub fn cancel_all(&mut self) -> usize {
        let mut cancelled = 0;
        for (handle, label) in self.handles.drain(..) {
            if !handle.is_finished() {
                handle.abort();
                tracing::info!("Cancelled pending operation: {label}");
                cancelled += 1;
            }
        }
        // Anything that finished but was not yet drained is stale as well
        while self.rx.try_recv().is_ok() {}
        cancelled
    }

    /// Completions that have arrived since the last call
    pub fn drain_completed(&mut self) -> Vec<Completion> {
        let mut done = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            done.push(completion);
        }
        self.handles.retain(|(handle, _)| !handle.is_finished());
        done
    }

    pub fn is_busy(&self) -> bool {
        self.handles.iter().any(|(handle, _)| !handle.is_finished())
    }

    /// Label of the oldest operation still running
    pub fn busy_label(&self) -> Option<&'static str> {
        self.handles
            .iter()
            .find(|(handle, _)| !handle.is_finished())
            .map(|(_, label)| *label)
    }
}
