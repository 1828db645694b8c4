//! Signet lifecycle engine
//!
//! The engine is the only writer of lifecycle state. Every operation:
//!
//! 1. enters through the identity/token guard (owner by authenticated
//!    subject, recipient by bearer token),
//! 2. is checked against the document's current status and, for field
//!    writes, the positional field-assignment rules,
//! 3. mutates exactly one store record, and
//! 4. appends best-effort audit entries and enqueues any follow-up jobs.
//!
//! There is no ambient "current caller": principals are threaded into
//! every operation explicitly, which keeps the engine testable without a
//! simulated request context. Follow-up work (notification dispatch, PDF
//! finalization) goes through the outbound [`JobQueue`] and is never
//! awaited by the transition that enqueued it.

#![deny(unsafe_code)]

mod assignment;
mod audit;
mod certificate;
mod guard;
mod lifecycle;
mod outbound;
mod quota;
mod signing;
mod templates;

pub use assignment::*;
pub use certificate::*;
pub use guard::*;
pub use lifecycle::*;
pub use outbound::*;
pub use quota::*;
pub use signing::*;
pub use templates::*;

use signet_store::{DocumentStore, FileStore};
use std::sync::Arc;

/// The lifecycle engine: all document, signing, and template operations.
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn DocumentStore>,
    files: Arc<dyn FileStore>,
    jobs: Arc<dyn JobQueue>,
}

impl Engine {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStore>,
        jobs: Arc<dyn JobQueue>,
    ) -> Self {
        Self { store, files, jobs }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }
}
