use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Fire-and-forget progress messages, one per processed customer row.
///
/// Sending never blocks; messages are dropped once the observer goes away.
#[derive(Debug, Clone, Default)]
pub struct ProgressReporter {
    sender: Option<UnboundedSender<String>>,
}

impl ProgressReporter {
    /// Reporter plus the single receiving end for the observer.
    pub fn channel() -> (Self, UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn emit(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("progress: {}", message);
        if let Some(sender) = &self.sender {
            let _ = sender.send(message);
        }
    }
}

/// Cooperative stop request, honoured between rows.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
