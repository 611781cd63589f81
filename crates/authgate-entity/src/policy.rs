//! Policy tuple entity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Subject used in wildcard grants that match any caller.
pub const WILDCARD_SUBJECT: &str = "*";

/// A single (subject, object, action) authorization grant.
///
/// All three parts are opaque strings. Presence in the policy relation is
/// idempotent: the tuple either is or is not a member of the set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct PolicyTuple {
    /// Who the grant applies to; `*` matches any subject.
    pub subject: String,
    /// The resource the grant covers, e.g. `users/42` or `users`.
    pub object: String,
    /// The permitted action, e.g. `read`.
    pub action: String,
}

impl PolicyTuple {
    /// Build a tuple from its three parts.
    pub fn new(
        subject: impl Into<String>,
        object: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            object: object.into(),
            action: action.into(),
        }
    }

    /// Whether this tuple's subject is the wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.subject == WILDCARD_SUBJECT
    }
}
