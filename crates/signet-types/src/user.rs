//! Document owners
//!
//! Identity resolution (sessions, SSO, whatever the host platform uses) is
//! external; the store only keeps the mapping from an opaque identity
//! subject to a user record, plus the plan data the quota guard reads.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Billing plan, read-only input to the quota guard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Free,
    Pro,
}

/// A registered document owner
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Opaque subject from the external identity provider
    pub subject: String,
    pub email: String,
    pub name: String,
    pub plan: Plan,
    /// Start of the current billing cycle; the free-plan document cap
    /// counts creations at or after this instant.
    pub billing_cycle_start: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn register(
        subject: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            subject: subject.into(),
            email: email.into(),
            name: name.into(),
            plan: Plan::Free,
            billing_cycle_start: now,
            created_at: now,
        }
    }

    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = plan;
        self
    }
}
