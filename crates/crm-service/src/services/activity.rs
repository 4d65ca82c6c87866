//! Best-effort activity logging
//!
//! The audit log never fails the primary flow: append errors are reported
//! through a structured `tracing::warn!` and swallowed.

use tracing::warn;

use crm_core::events::ActivityEntry;

use super::context::ServiceContext;

/// Activity logger wrapping the append-only audit repository
pub struct ActivityLogger<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ActivityLogger<'a> {
    /// Create a new ActivityLogger
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Append an entry, swallowing any failure
    pub async fn record(&self, entry: ActivityEntry) {
        if let Err(e) = self.ctx.activity_repo().append(&entry).await {
            warn!(
                action = %entry.action,
                entity_id = %entry.entity_id,
                user_id = %entry.user_id,
                error = %e,
                "Failed to write activity log entry"
            );
        }
    }
}
