//! Study goal / subject tracker.
//!
//! [`PlanStore`] owns the single [`StudyPlan`] for a user and mirrors it to an
//! injected [`KeyValueStore`] after every mutation. Storage failures never
//! panic: they are returned to the caller and kept in [`PlanStore::last_error`]
//! so a UI can show them inline.

pub mod models;
pub mod storage;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

pub use models::{storage_key, Goal, StudyPlan, LOCAL_USER_ID};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

const LOAD_FAILED: &str = "Failed to load study plan from local storage.";
const SAVE_FAILED: &str = "Failed to save study plan to local storage.";

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("{0} cannot be empty")]
    EmptyInput(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("stored study plan is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub struct PlanStore<S: KeyValueStore> {
    storage: S,
    key: String,
    plan: StudyPlan,
    last_error: Option<String>,
}

impl<S: KeyValueStore> PlanStore<S> {
    /// Loads the local user's plan.
    pub fn load(storage: S) -> Self {
        Self::load_for(storage, LOCAL_USER_ID)
    }

    /// Loads `user_id`'s plan, creating and persisting an empty one if none is stored.
    /// A read or parse failure leaves an empty in-memory plan and sets `last_error`.
    pub fn load_for(storage: S, user_id: &str) -> Self {
        let mut store = Self {
            storage,
            key: storage_key(user_id),
            plan: StudyPlan::empty(user_id),
            last_error: None,
        };

        match store.read_stored() {
            Ok(Some(plan)) => store.plan = plan,
            Ok(None) => {
                info!("No stored study plan under {}, creating default", store.key);
                // persist() records its own failure
                let _ = store.persist();
            }
            Err(e) => {
                error!("Error loading study plan from storage: {e}");
                store.last_error = Some(LOAD_FAILED.to_string());
            }
        }
        store
    }

    fn read_stored(&self) -> Result<Option<StudyPlan>, PlannerError> {
        match self.storage.get(&self.key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn plan(&self) -> &StudyPlan {
        &self.plan
    }

    /// The most recent non-fatal storage error, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Appends a new incomplete goal and returns its id.
    pub fn add_goal(
        &mut self,
        description: &str,
        target_date: Option<NaiveDate>,
    ) -> Result<String, PlannerError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(PlannerError::EmptyInput("goal description"));
        }

        let id = Uuid::new_v4().to_string();
        self.plan.goals.push(Goal {
            id: id.clone(),
            description: description.to_string(),
            target_date: target_date.map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc()),
            completed: false,
        });
        self.commit()?;
        Ok(id)
    }

    /// Flips `completed` on the goal with `id`. Unknown ids are ignored.
    pub fn toggle_goal(&mut self, id: &str) -> Result<(), PlannerError> {
        let Some(goal) = self.plan.goals.iter_mut().find(|g| g.id == id) else {
            return Ok(());
        };
        goal.completed = !goal.completed;
        self.commit()
    }

    /// Removes the goal with `id`. Unknown ids are ignored.
    pub fn delete_goal(&mut self, id: &str) -> Result<(), PlannerError> {
        let before = self.plan.goals.len();
        self.plan.goals.retain(|g| g.id != id);
        if self.plan.goals.len() == before {
            return Ok(());
        }
        self.commit()
    }

    pub fn add_subject(&mut self, name: &str) -> Result<(), PlannerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlannerError::EmptyInput("subject"));
        }

        self.plan.subjects.push(name.to_string());
        dedup_in_place(&mut self.plan.subjects);
        self.commit()
    }

    /// Removes every subject equal to `name`.
    pub fn delete_subject(&mut self, name: &str) -> Result<(), PlannerError> {
        self.plan.subjects.retain(|s| s != name);
        self.commit()
    }

    fn commit(&mut self) -> Result<(), PlannerError> {
        self.plan.last_updated = Utc::now();
        self.persist()
    }

    fn persist(&mut self) -> Result<(), PlannerError> {
        let result = serde_json::to_string(&self.plan)
            .map_err(PlannerError::from)
            .and_then(|json| Ok(self.storage.set(&self.key, &json)?));

        if let Err(e) = &result {
            error!("Error saving study plan to storage: {e}");
            self.last_error = Some(SAVE_FAILED.to_string());
        }
        result
    }
}

/// Keeps the first occurrence of each entry.
fn dedup_in_place(items: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    items.retain(|s| seen.insert(s.clone()));
}
