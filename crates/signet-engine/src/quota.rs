//! Rate and quota guard
//!
//! Plan and abuse limits, all computed from stored records rather than a
//! separate counter table:
//!
//! - free-plan accounts: 3 documents per rolling billing cycle;
//! - any account: 10 new documents per trailing hour, standing in for an
//!   upload limit since raw upload attempts are not tracked separately;
//! - reminders: 3 per recipient e-mail per document per trailing hour,
//!   counted from `reminder_sent` audit entries.

use chrono::{Duration, Utc};
use crate::Engine;
use signet_types::{AuditEvent, DocumentId, Plan, SignetError, SignetResult, User};

/// Free-plan cap on documents per billing cycle.
pub const FREE_PLAN_DOCUMENT_LIMIT: usize = 3;

/// Cap on new documents per owner per trailing hour.
pub const HOURLY_DOCUMENT_LIMIT: usize = 10;

/// Cap on reminders per recipient e-mail per document per trailing hour.
pub const HOURLY_REMINDER_LIMIT: usize = 3;

impl Engine {
    /// Enforce the plan cap and the hourly creation cap before a new
    /// document is inserted.
    pub(crate) async fn check_creation_quota(&self, user: &User) -> SignetResult<()> {
        let documents = self.store.documents_by_owner(&user.id).await?;

        if user.plan == Plan::Free {
            let this_cycle = documents
                .iter()
                .filter(|d| d.created_at >= user.billing_cycle_start)
                .count();
            if this_cycle >= FREE_PLAN_DOCUMENT_LIMIT {
                return Err(SignetError::quota(
                    "Free plan limit reached. Upgrade to Pro to create more documents.",
                ));
            }
        }

        let hour_ago = Utc::now() - Duration::hours(1);
        let this_hour = documents.iter().filter(|d| d.created_at >= hour_ago).count();
        if this_hour >= HOURLY_DOCUMENT_LIMIT {
            return Err(SignetError::quota(
                "Upload rate limit exceeded. Try again later.",
            ));
        }

        Ok(())
    }

    /// Enforce only the hourly document cap. Used as the upload-abuse
    /// proxy when a caller requests blob-store access.
    pub(crate) async fn check_upload_rate(&self, user: &User) -> SignetResult<()> {
        let documents = self.store.documents_by_owner(&user.id).await?;
        let hour_ago = Utc::now() - Duration::hours(1);
        let this_hour = documents.iter().filter(|d| d.created_at >= hour_ago).count();
        if this_hour >= HOURLY_DOCUMENT_LIMIT {
            return Err(SignetError::quota(
                "Upload rate limit exceeded. Try again later.",
            ));
        }
        Ok(())
    }

    /// Enforce the reminder throttle for one recipient e-mail on one
    /// document, counted from the audit trail's trailing hour.
    pub(crate) async fn check_reminder_quota(
        &self,
        document_id: &DocumentId,
        recipient_email: &str,
    ) -> SignetResult<()> {
        let entries = self.store.audit_by_document(document_id).await?;
        let hour_ago = Utc::now() - Duration::hours(1);
        let recent = entries
            .iter()
            .filter(|e| {
                e.event == AuditEvent::ReminderSent
                    && e.actor_email == recipient_email
                    && e.timestamp >= hour_ago
            })
            .count();
        if recent >= HOURLY_REMINDER_LIMIT {
            return Err(SignetError::quota(
                "Reminder limit reached for this recipient. Try again later.",
            ));
        }
        Ok(())
    }
}
