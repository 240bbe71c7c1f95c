//! Debounced config writer
//!
//! Field edits arrive on every keystroke. Each key gets one pending value and
//! one timer: a new edit cancels the timer, replaces the value and re-arms it.
//! Only when the window passes without further edits is the value written to
//! the [`ConfigStore`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::store::ConfigStore;

/// Outcome of a flush.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistEvent {
    Flushed {
        key: String,
        value: String,
        at: DateTime<Local>,
    },
    Failed {
        key: String,
        value: String,
        error: String,
        at: DateTime<Local>,
    },
}

impl PersistEvent {
    pub fn key(&self) -> &str {
        match self {
            PersistEvent::Flushed { key, .. } | PersistEvent::Failed { key, .. } => key,
        }
    }

    pub fn is_flushed(&self) -> bool {
        matches!(self, PersistEvent::Flushed { .. })
    }
}

struct PendingEdit {
    value: String,
    /// Distinguishes this edit's timer from one it superseded
    generation: u64,
    cancel: CancellationToken,
}

#[derive(Default)]
struct Pending {
    edits: HashMap<String, PendingEdit>,
    next_generation: u64,
}

pub struct DebouncedWriter {

    runtime: Handle,

    store: Arc<dyn ConfigStore>,

    window: Duration,

    pending: Arc<Mutex<Pending>>,

    /// Held from taking an edit out of `pending` until its store write ends,
    /// so an older value can never land after a newer one
    write_lock: Arc<Mutex<()>>,

    events_tx: Option<mpsc::UnboundedSender<PersistEvent>>,
}

impl DebouncedWriter {
    pub fn new(runtime: Handle, store: Arc<dyn ConfigStore>, window: Duration) -> Self {
        Self {
            runtime,
            store,
            window,
            pending: Arc::new(Mutex::new(Pending::default())),
            write_lock: Arc::new(Mutex::new(())),
            events_tx: None,
        }
    }

    /// Report every flush outcome on `tx`.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<PersistEvent>) -> Self {
        self.events_tx = Some(tx);
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record `value` for `key` and (re)arm its flush timer. Returns at once.
    pub fn on_edit(&self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let cancel = CancellationToken::new();

        let generation = {
            let Ok(mut pending) = self.pending.lock() else {
                tracing::error!("Pending edit table poisoned, dropping edit for {}", key);
                return;
            };
            pending.next_generation += 1;
            let generation = pending.next_generation;

            let edit = PendingEdit {
                value,
                generation,
                cancel: cancel.clone(),
            };
            if let Some(superseded) = pending.edits.insert(key.to_string(), edit) {
                superseded.cancel.cancel();
                tracing::trace!("Coalesced pending edit for {}", key);
            }
            generation
        };

        let key = key.to_string();
        let window = self.window;
        let pending = Arc::clone(&self.pending);
        let write_lock = Arc::clone(&self.write_lock);
        let store = Arc::clone(&self.store);
        let events_tx = self.events_tx.clone();

        self.runtime.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(window) => {}
            }

            let Ok(_writing) = write_lock.lock() else { return };
            let edit = {
                let Ok(mut pending) = pending.lock() else { return };
                match pending.edits.get(&key) {
                    Some(edit) if edit.generation == generation => pending.edits.remove(&key),
                    // Lost the race against a newer edit
                    _ => None,
                }
            };

            if let Some(edit) = edit {
                flush(store.as_ref(), &key, edit.value, events_tx.as_ref());
            }
        });
    }

    /// Write every outstanding edit now, sorted by key.
    pub fn flush_pending(&self) -> Vec<PersistEvent> {
        let Ok(_writing) = self.write_lock.lock() else {
            tracing::error!("Config write lock poisoned, nothing flushed");
            return Vec::new();
        };
        let mut edits: Vec<(String, PendingEdit)> = match self.pending.lock() {
            Ok(mut pending) => pending.edits.drain().collect(),
            Err(_) => {
                tracing::error!("Pending edit table poisoned, nothing flushed");
                return Vec::new();
            }
        };
        edits.sort_by(|a, b| a.0.cmp(&b.0));

        edits
            .into_iter()
            .map(|(key, edit)| {
                edit.cancel.cancel();
                flush(self.store.as_ref(), &key, edit.value, self.events_tx.as_ref())
            })
            .collect()
    }

    pub fn pending_value(&self, key: &str) -> Option<String> {
        self.pending
            .lock()
            .ok()?
            .edits
            .get(key)
            .map(|edit| edit.value.clone())
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending_value(key).is_some()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|p| p.edits.len()).unwrap_or(0)
    }
}

impl Drop for DebouncedWriter {
    fn drop(&mut self) {
        if let Ok(pending) = self.pending.lock() {
            for edit in pending.edits.values() {
                edit.cancel.cancel();
            }
        }
    }
}

/// Single blocking write. Failures are reported, never retried.
fn flush(
    store: &dyn ConfigStore,
    key: &str,
    value: String,
    events_tx: Option<&mpsc::UnboundedSender<PersistEvent>>,
) -> PersistEvent {
    let event = match store.set(key, &value) {
        Ok(()) => {
            tracing::debug!("Persisted {} = {:?}", key, value);
            PersistEvent::Flushed {
                key: key.to_string(),
                value,
                at: Local::now(),
            }
        }
        Err(e) => {
            tracing::warn!("Failed to persist {}: {}", key, e);
            PersistEvent::Failed {
                key: key.to_string(),
                value,
                error: e.to_string(),
                at: Local::now(),
            }
        }
    };

    if let Some(tx) = events_tx {
        let _ = tx.send(event.clone());
    }
    event
}
