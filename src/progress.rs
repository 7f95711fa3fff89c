//! Per-file progress reporting for long-running operations.

use std::sync::mpsc::Sender;

/// Progress after one file has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// 1-based index of the file just handled.
    pub index: usize,
    /// Number of files in the batch.
    pub total: usize,
    /// Name of the file just handled.
    pub file_name: String,
}

/// Receives progress notifications from sort and unsort.
///
/// Called on the thread running the operation, once per file. Implementations
/// must return quickly and must not touch the directory being sorted.
pub trait ProgressObserver {
    fn on_progress(&self, progress: &Progress);
}

impl ProgressObserver for () {
    fn on_progress(&self, _progress: &Progress) {}
}

impl<F> ProgressObserver for F
where
    F: Fn(&Progress),
{
    fn on_progress(&self, progress: &Progress) {
        self(progress)
    }
}

/// Forwards progress to another thread. A dropped receiver is ignored.
impl ProgressObserver for Sender<Progress> {
    fn on_progress(&self, progress: &Progress) {
        let _ = self.send(progress.clone());
    }
}
