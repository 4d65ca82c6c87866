//! DealAttachment - file metadata attached to a deal
//!
//! Upload and storage of the files themselves are external collaborators;
//! the domain only sees the stored metadata.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Metadata for a file attached to a deal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealAttachment {
    pub id: Uuid,
    pub deal_id: Uuid,
    pub file_name: String,
    pub url: String,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}
