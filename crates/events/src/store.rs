//! Observable form store backed by a `tokio::sync::broadcast` channel.
//!
//! [`FormStore`] owns the current [`Form`], applies transition requests one
//! at a time and fans every resulting state out to subscribers as a
//! [`FormChange`]. It is designed to be shared via `Arc<FormStore>`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use formstate_core::{Form, FormEvent, FormRules, FormSnapshot};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::StoreError;

// ---------------------------------------------------------------------------
// FormChange
// ---------------------------------------------------------------------------

/// A new form state produced by one dispatched event.
#[derive(Debug, Clone)]
pub struct FormChange {
    /// Id of the store that produced the change.
    pub form_id: Uuid,

    /// Starts at 1 for the first dispatched event and increases by one per
    /// event.
    pub revision: u64,

    /// Name of the event that produced this state, e.g. `"submit"`.
    pub event_type: &'static str,

    /// The state after the event.
    pub form: Form,

    /// When the event was applied (UTC).
    pub timestamp: DateTime<Utc>,
}

impl FormChange {
    pub fn snapshot(&self) -> FormSnapshot {
        self.form.snapshot()
    }
}

// ---------------------------------------------------------------------------
// FormStore
// ---------------------------------------------------------------------------

struct Current {
    revision: u64,
    form: Form,
}

/// Serializing holder of the current form state.
///
/// Dispatch is synchronous: the event is applied under a lock and the new
/// state is published before `dispatch` returns. Publishing never blocks; a
/// subscriber that falls more than the configured capacity behind observes
/// `RecvError::Lagged`.
///
/// # Usage
///
/// ```rust
/// use formstate_core::{FieldRule, FormRules};
/// use formstate_events::FormStore;
///
/// let rules = FormRules::new().with_field("name", FieldRule::string().required());
/// let store = FormStore::new(serde_json::json!({ "name": "" }), rules);
/// let _rx = store.subscribe();
///
/// let form = store.submit();
/// assert!(!form.is_valid());
/// ```
pub struct FormStore {
    id: Uuid,
    current: Mutex<Current>,
    sender: broadcast::Sender<FormChange>,
}

impl FormStore {
    /// Create a store with the default configuration.
    pub fn new(initial: Value, rules: FormRules) -> Self {
        Self::with_config(Form::new(initial, rules), &StoreConfig::default())
    }

    /// Create a store from a typed record with the configuration read from
    /// the environment.
    pub fn from_record<T: Serialize>(initial: &T, rules: FormRules) -> Result<Self, StoreError> {
        let config = StoreConfig::from_env()?;
        let form = Form::from_record(initial, rules)?;
        Ok(Self::with_config(form, &config))
    }

    pub fn with_config(form: Form, config: &StoreConfig) -> Self {
        let (sender, _) = broadcast::channel(config.capacity);
        let id = Uuid::now_v7();
        tracing::debug!(form_id = %id, capacity = config.capacity, "Form store created");
        Self {
            id,
            current: Mutex::new(Current { revision: 0, form }),
            sender,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The current form state.
    pub fn state(&self) -> Form {
        self.lock().form.clone()
    }

    /// Number of events applied so far.
    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    pub fn is_valid(&self) -> bool {
        self.state().is_valid()
    }

    /// Subscribe to every state produced from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<FormChange> {
        self.sender.subscribe()
    }

    /// Apply `event` to the current state, publish and return the new state.
    ///
    /// A panicking skip predicate unwinds out of this call and discards that
    /// one event; the previous state stays current and later events apply
    /// normally.
    pub fn dispatch(&self, event: FormEvent) -> Form {
        let mut current = self.lock();

        let event_type = event.event_type();
        let form = current.form.apply(event);
        current.revision += 1;
        current.form = form.clone();

        tracing::debug!(
            form_id = %self.id,
            revision = current.revision,
            event_type,
            errors = form.errors().len(),
            "Form event applied"
        );

        let change = FormChange {
            form_id: self.id,
            revision: current.revision,
            event_type,
            form: form.clone(),
            timestamp: Utc::now(),
        };
        // A SendError only means there are zero receivers.
        if self.sender.send(change).is_err() {
            tracing::trace!(form_id = %self.id, "No subscribers for form change");
        }

        form
    }

    /// `current` is only assigned after a transition returns, so a lock
    /// poisoned by a panicking predicate still guards a whole state.
    fn lock(&self) -> MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn field_changed(&self, path: impl Into<String>, value: impl Into<Value>) -> Form {
        self.dispatch(FormEvent::changed(path, value))
    }

    pub fn field_blurred(&self, path: impl Into<String>) -> Form {
        self.dispatch(FormEvent::blurred(path))
    }

    pub fn fill(&self, values: Value) -> Form {
        self.dispatch(FormEvent::Fill { values })
    }

    pub fn submit(&self) -> Form {
        self.dispatch(FormEvent::Submit)
    }
}

impl std::fmt::Debug for FormStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormStore")
            .field("id", &self.id)
            .field("subscribers", &self.sender.receiver_count())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
