use std::sync::{Arc, Mutex, MutexGuard};

use my_space_domain::{ImageRecord, UploadProgress, UploadState};

use crate::ProgressSink;

type Listener = Arc<dyn Fn(&UploadState) + Send + Sync>;

#[derive(Clone, Default)]
pub struct UploadTracker {
    state: Arc<Mutex<UploadState>>,
    listener: Option<Listener>,
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listener(listener: impl Fn(&UploadState) + Send + Sync + 'static) -> Self {
        Self {
            state: Arc::default(),
            listener: Some(Arc::new(listener)),
        }
    }

    pub fn state(&self) -> UploadState {
        self.lock().clone()
    }

    pub fn begin(&self, total: u64) {
        self.transition(UploadState::Uploading(UploadProgress { sent: 0, total }));
    }

    pub fn succeed(&self, record: ImageRecord) {
        self.transition(UploadState::Succeeded(record));
    }

    pub fn fail(&self, message: impl Into<String>) {
        self.transition(UploadState::Failed(message.into()));
    }

    /// Sink that updates the state while an upload is in flight and ignores late reports.
    pub fn sink(&self) -> ProgressSink {
        let tracker = self.clone();
        Arc::new(move |progress: UploadProgress| {
            let next = {
                let mut state = tracker.lock();
                if !matches!(*state, UploadState::Uploading(_)) {
                    return;
                }
                *state = UploadState::Uploading(progress);
                state.clone()
            };
            tracker.emit(&next);
        })
    }

    fn transition(&self, next: UploadState) {
        *self.lock() = next.clone();
        self.emit(&next);
    }

    fn emit(&self, state: &UploadState) {
        if let Some(listener) = &self.listener {
            listener(state);
        }
    }

    fn lock(&self) -> MutexGuard<'_, UploadState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for UploadTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadTracker")
            .field("state", &*self.lock())
            .field("listener", &self.listener.is_some())
            .finish()
    }
}
