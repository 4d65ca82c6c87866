//! Entity to DTO mappers

use crm_core::entities::{Client, Contact, Deal, DealAttachment, Task};
use crm_core::traits::DealRecord;

use super::responses::{
    AttachmentResponse, ClientResponse, ContactResponse, DealResponse, TaskResponse,
};

impl From<&Deal> for DealResponse {
    fn from(deal: &Deal) -> Self {
        Self {
            id: deal.id,
            client_id: deal.client_id,
            value: deal.value.amount().to_string(),
            currency: deal.value.currency().to_string(),
            probability: i32::from(deal.probability.value()),
            stage: deal.stage().as_str().to_string(),
            expected_close_date: deal.expected_close_date,
            notes: deal.notes.clone(),
            shared_group_ids: deal.shared_group_ids.clone(),
            client: None,
            attachments: Vec::new(),
            created_at: deal.created_at,
            updated_at: deal.updated_at,
        }
    }
}

impl From<&DealRecord> for DealResponse {
    fn from(record: &DealRecord) -> Self {
        let mut response = Self::from(&record.deal);
        response.client = record.client.as_ref().map(ClientResponse::from);
        response.attachments = record
            .attachments
            .iter()
            .map(AttachmentResponse::from)
            .collect();
        response
    }
}

impl From<&Client> for ClientResponse {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            name: client.name.clone(),
            status: client.status.as_str().to_string(),
            assigned_to: client.assigned_to,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

impl From<&DealAttachment> for AttachmentResponse {
    fn from(attachment: &DealAttachment) -> Self {
        Self {
            id: attachment.id,
            deal_id: attachment.deal_id,
            file_name: attachment.file_name.clone(),
            url: attachment.url.clone(),
            uploaded_by: attachment.uploaded_by,
            created_at: attachment.created_at,
        }
    }
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
            status: task.status.as_str().to_string(),
            assigned_to: task.assigned_to,
            client_id: task.client_id,
            overdue: task.is_overdue(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

impl From<&Contact> for ContactResponse {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id,
            client_id: contact.client_id,
            kind: contact.kind.map(|k| k.as_str().to_string()),
            date: contact.date,
            notes: contact.notes.clone(),
            is_note: contact.is_note,
            user_id: contact.user_id,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}
