//! Deal attachment model -> entity mapper

use crm_core::entities::DealAttachment;

use crate::models::DealAttachmentModel;

impl From<DealAttachmentModel> for DealAttachment {
    fn from(model: DealAttachmentModel) -> Self {
        DealAttachment {
            id: model.id,
            deal_id: model.deal_id,
            file_name: model.file_name,
            url: model.url,
            uploaded_by: model.uploaded_by,
            created_at: model.created_at,
        }
    }
}
