//! The in-process policy decision core.
//!
//! A stateless decision function over a mutable relation of
//! (subject, object, action) tuples. Reads take a shared lock so many
//! concurrent permission checks proceed in parallel; writes are serialized,
//! and a reader never observes a half-written tuple.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use authgate_core::result::AppResult;
use authgate_entity::policy::{PolicyTuple, WILDCARD_SUBJECT};

use crate::store::PolicyStore;

/// Authoritative allow/deny decisions over the policy relation.
pub struct PolicyEngine {
    policies: RwLock<HashSet<PolicyTuple>>,
    store: Option<Arc<dyn PolicyStore>>,
}

impl std::fmt::Debug for PolicyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEngine")
            .field("tuples", &self.len())
            .field("durable", &self.store.is_some())
            .finish()
    }
}

impl PolicyEngine {
    /// Creates an engine with no durable store (memory only).
    pub fn new() -> Self {
        Self {
            policies: RwLock::new(HashSet::new()),
            store: None,
        }
    }

    /// Creates an engine mirrored into a durable store.
    pub fn with_store(store: Arc<dyn PolicyStore>) -> Self {
        Self {
            policies: RwLock::new(HashSet::new()),
            store: Some(store),
        }
    }

    /// Loads the relation from the durable store. Call once at startup.
    pub async fn load(&self) -> AppResult<usize> {
        let Some(store) = &self.store else {
            return Ok(0);
        };
        let tuples = store.load_all().await?;
        let count = tuples.len();
        let mut set = self.policies.write().unwrap_or_else(|e| e.into_inner());
        set.clear();
        set.extend(tuples);
        debug!(count, "policy relation loaded");
        Ok(count)
    }

    /// Evaluates (subject, object, action), also matching wildcard-subject
    /// tuples as if they applied to every subject.
    pub fn check_permission(&self, subject: &str, object: &str, action: &str) -> bool {
        let set = self.policies.read().unwrap_or_else(|e| e.into_inner());
        set.contains(&PolicyTuple::new(subject, object, action))
            || set.contains(&PolicyTuple::new(WILDCARD_SUBJECT, object, action))
    }

    /// Inserts a tuple. Returns whether it was newly added.
    pub async fn add_policy(&self, subject: &str, object: &str, action: &str) -> AppResult<bool> {
        let tuple = PolicyTuple::new(subject, object, action);
        let added = {
            let mut set = self.policies.write().unwrap_or_else(|e| e.into_inner());
            set.insert(tuple.clone())
        };
        if added {
            self.persist_insert(&tuple).await?;
        }
        Ok(added)
    }

    /// Inserts a tuple only if absent. The check-then-act runs as a single
    /// critical section under the write lock, so two concurrent identical
    /// calls net exactly-once presence and both report success.
    pub async fn add_policy_if_not_exists(
        &self,
        subject: &str,
        object: &str,
        action: &str,
    ) -> AppResult<bool> {
        let tuple = PolicyTuple::new(subject, object, action);
        let added = {
            let mut set = self.policies.write().unwrap_or_else(|e| e.into_inner());
            if set.contains(&tuple) {
                false
            } else {
                set.insert(tuple.clone())
            }
        };
        if added {
            self.persist_insert(&tuple).await?;
        }
        Ok(true)
    }

    /// Deletes a tuple if present. Removing an absent tuple is a no-op
    /// success.
    pub async fn remove_policy(&self, subject: &str, object: &str, action: &str) -> AppResult<bool> {
        let tuple = PolicyTuple::new(subject, object, action);
        let removed = {
            let mut set = self.policies.write().unwrap_or_else(|e| e.into_inner());
            set.remove(&tuple)
        };
        if removed {
            if let Some(store) = &self.store {
                store.delete(&tuple).await?;
            }
        }
        Ok(removed)
    }

    /// Number of tuples currently in the relation.
    pub fn len(&self) -> usize {
        self.policies
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Whether the relation is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mirrors an insert into the durable store. The in-memory relation is
    /// already updated; a store failure is propagated so the RPC response
    /// can report it, but the decision state stays authoritative.
    async fn persist_insert(&self, tuple: &PolicyTuple) -> AppResult<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        if let Err(e) = store.insert(tuple).await {
            warn!(error = %e, subject = %tuple.subject, object = %tuple.object, "policy store insert failed");
            return Err(e);
        }
        Ok(())
    }
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::new()
    }
}
