//! Outbound follow-up jobs
//!
//! Mutating transitions enqueue follow-up work synchronously; execution
//! happens asynchronously and independently, retried by the job substrate.
//! Two recipients completing simultaneously may both enqueue finalization,
//! so every job must be idempotent — regenerating the signed PDF twice is
//! safe, re-sending an already-sent completion notice is tolerable.

use async_trait::async_trait;
use parking_lot::RwLock;
use signet_types::{DocumentId, RecipientId, SignetResult};

/// Fire-and-forget work emitted by lifecycle transitions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Job {
    SendSigningRequest(RecipientId),
    SendReminder(RecipientId),
    SendSigningComplete(DocumentId),
    GenerateSignedPdf(DocumentId),
}

/// The queue lifecycle transitions enqueue to.
///
/// Enqueueing must be cheap and must not wait for execution; failures of
/// the job itself never unwind the transition that scheduled it.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, job: Job) -> SignetResult<()>;
}

/// In-memory queue that records enqueued jobs, used by the test suite
#[derive(Default)]
pub struct MemoryJobQueue {
    jobs: RwLock<Vec<Job>>,
}

impl MemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.jobs.read().clone()
    }

    pub fn count_matching(&self, job: &Job) -> usize {
        self.jobs.read().iter().filter(|j| *j == job).count()
    }
}

#[async_trait]
impl JobQueue for MemoryJobQueue {
    async fn enqueue(&self, job: Job) -> SignetResult<()> {
        self.jobs.write().push(job);
        Ok(())
    }
}
