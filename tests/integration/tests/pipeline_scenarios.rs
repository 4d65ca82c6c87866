//! End-to-end pipeline scenarios
//!
//! Run the services against the in-memory fakes; no database required.
//!
//! Run with: cargo test -p integration-tests --test pipeline_scenarios

use rust_decimal::Decimal;
use uuid::Uuid;

use crm_core::entities::Client;
use crm_core::events::ActivityAction;
use crm_core::traits::DealInclude;
use crm_core::value_objects::{ClientStatus, DealStage};
use crm_service::dto::{
    CreateDealRequest, ListDealsRequest, LogContactRequest, UpdateDealRequest,
};
use crm_service::{ContactService, DealService};
use integration_tests::{
    admin, context_for, sales_user, seed_client, seed_client_with_status, seed_deal, MemoryDb,
};

// ============================================================================
// Closing deals
// ============================================================================

#[tokio::test]
async fn test_close_won_flips_client_and_records_history() {
    let db = MemoryDb::new();
    let user = sales_user();
    let client = seed_client(&db, Some(user.id));
    let deal = seed_deal(&db, client.id, DealStage::Negotiation);
    let ctx = context_for(&db);

    let response = DealService::new(&ctx)
        .close_deal(&user, deal.id, true)
        .await
        .unwrap();

    assert_eq!(response.stage, "WON");
    assert_eq!(db.client(client.id).unwrap().status, ClientStatus::ActiveClient);

    let history = db.history_for(client.id);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].from, ClientStatus::Lead);
    assert_eq!(history[0].to, ClientStatus::ActiveClient);
    assert_eq!(history[0].deal_id, deal.id);
    assert_eq!(history[0].changed_by, user.id);

    let actions: Vec<_> = db.activity_entries().iter().map(|e| e.action).collect();
    assert!(actions.contains(&ActivityAction::DealWon));
}

#[tokio::test]
async fn test_close_won_on_active_client_skips_transition() {
    let db = MemoryDb::new();
    let user = sales_user();
    let client = seed_client_with_status(&db, Some(user.id), ClientStatus::ActiveClient);
    let deal = seed_deal(&db, client.id, DealStage::Proposal);
    let ctx = context_for(&db);

    DealService::new(&ctx)
        .close_deal(&user, deal.id, true)
        .await
        .unwrap();

    assert!(db.history_for(client.id).is_empty());
    assert_eq!(db.client(client.id).unwrap().status, ClientStatus::ActiveClient);
}

#[tokio::test]
async fn test_close_lost_leaves_client_untouched() {
    let db = MemoryDb::new();
    let user = sales_user();
    let client = seed_client(&db, Some(user.id));
    let deal = seed_deal(&db, client.id, DealStage::Qualified);
    let ctx = context_for(&db);

    let response = DealService::new(&ctx)
        .close_deal(&user, deal.id, false)
        .await
        .unwrap();

    assert_eq!(response.stage, "LOST");
    assert_eq!(db.client(client.id).unwrap().status, ClientStatus::Lead);
    assert!(db.history_for(client.id).is_empty());

    let actions: Vec<_> = db.activity_entries().iter().map(|e| e.action).collect();
    assert!(actions.contains(&ActivityAction::DealLost));
}

#[tokio::test]
async fn test_injected_failure_commits_neither_write() {
    let db = MemoryDb::new();
    let user = sales_user();
    let client = seed_client(&db, Some(user.id));
    let deal = seed_deal(&db, client.id, DealStage::Negotiation);
    let ctx = context_for(&db);

    db.fail_close_after_deal();
    let result = DealService::new(&ctx).close_deal(&user, deal.id, true).await;
    assert!(result.is_err());

    // Both-or-neither: the deal is still open and the client untouched
    let stored = db.deal(deal.id).unwrap();
    assert_eq!(stored.stage(), DealStage::Negotiation);
    assert_eq!(db.client(client.id).unwrap().status, ClientStatus::Lead);
    assert!(db.history_for(client.id).is_empty());

    let actions: Vec<_> = db.activity_entries().iter().map(|e| e.action).collect();
    assert!(!actions.contains(&ActivityAction::DealWon));
}

#[tokio::test]
async fn test_close_already_closed_deal_is_conflict() {
    let db = MemoryDb::new();
    let user = sales_user();
    let client = seed_client(&db, Some(user.id));
    let deal = seed_deal(&db, client.id, DealStage::Won);
    let ctx = context_for(&db);

    let err = DealService::new(&ctx)
        .close_deal(&user, deal.id, false)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 409);
    assert_eq!(err.error_code(), "DEAL_ALREADY_CLOSED");
}

#[tokio::test]
async fn test_activity_failure_does_not_fail_close() {
    let db = MemoryDb::new();
    let user = sales_user();
    let client = seed_client(&db, Some(user.id));
    let deal = seed_deal(&db, client.id, DealStage::Lead);
    let ctx = context_for(&db);

    db.fail_activity();
    let response = DealService::new(&ctx)
        .close_deal(&user, deal.id, true)
        .await
        .unwrap();

    assert_eq!(response.stage, "WON");
    assert_eq!(db.client(client.id).unwrap().status, ClientStatus::ActiveClient);
    assert!(db.activity_entries().is_empty());
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
async fn test_outsider_cannot_close_deal() {
    let db = MemoryDb::new();
    let assignee = sales_user();
    let outsider = sales_user();
    let client = seed_client(&db, Some(assignee.id));
    let deal = seed_deal(&db, client.id, DealStage::Proposal);
    let ctx = context_for(&db);

    let err = DealService::new(&ctx)
        .close_deal(&outsider, deal.id, true)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 403);
    assert_eq!(db.deal(deal.id).unwrap().stage(), DealStage::Proposal);
    assert!(db.history_for(client.id).is_empty());
}

#[tokio::test]
async fn test_shared_group_member_can_update_deal() {
    let db = MemoryDb::new();
    let group = Uuid::new_v4();
    let member = sales_user().with_groups(vec![group]);
    let mut client = Client::new("Globex GmbH".to_string());
    client.shared_group_ids.push(group);
    db.insert_client(client.clone());
    let deal = seed_deal(&db, client.id, DealStage::Lead);
    let ctx = context_for(&db);

    let request = UpdateDealRequest {
        notes: Some("called them back".to_string()),
        ..Default::default()
    };
    let response = DealService::new(&ctx)
        .update_deal(&member, deal.id, request)
        .await
        .unwrap();

    assert_eq!(response.notes.as_deref(), Some("called them back"));
}

#[tokio::test]
async fn test_create_deal_requires_client_access() {
    let db = MemoryDb::new();
    let outsider = sales_user();
    let client = seed_client(&db, Some(Uuid::new_v4()));
    let ctx = context_for(&db);

    let request = CreateDealRequest {
        client_id: client.id,
        value: Decimal::from(5000),
        currency: "EUR".to_string(),
        probability: 30,
        stage: None,
        expected_close_date: None,
        notes: None,
        shared_group_ids: None,
    };
    let err = DealService::new(&ctx)
        .create_deal(&outsider, request)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let request = CreateDealRequest {
        client_id: Uuid::new_v4(),
        value: Decimal::from(5000),
        currency: "EUR".to_string(),
        probability: 30,
        stage: None,
        expected_close_date: None,
        notes: None,
        shared_group_ids: None,
    };
    let err = DealService::new(&ctx)
        .create_deal(&admin(), request)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

// ============================================================================
// Updating deals
// ============================================================================

#[tokio::test]
async fn test_update_stage_to_won_then_further_change_rejected() {
    let db = MemoryDb::new();
    let user = sales_user();
    let client = seed_client(&db, Some(user.id));
    let deal = seed_deal(&db, client.id, DealStage::Negotiation);
    let ctx = context_for(&db);
    let service = DealService::new(&ctx);

    let request = UpdateDealRequest {
        stage: Some("WON".to_string()),
        ..Default::default()
    };
    let response = service.update_deal(&user, deal.id, request).await.unwrap();
    assert_eq!(response.stage, "WON");

    let request = UpdateDealRequest {
        stage: Some("LEAD".to_string()),
        ..Default::default()
    };
    let err = service.update_deal(&user, deal.id, request).await.unwrap_err();
    assert_eq!(err.error_code(), "INVALID_STAGE_TRANSITION");
    assert_eq!(db.deal(deal.id).unwrap().stage(), DealStage::Won);
}

#[tokio::test]
async fn test_update_audit_records_field_names_only() {
    let db = MemoryDb::new();
    let user = sales_user();
    let client = seed_client(&db, Some(user.id));
    let deal = seed_deal(&db, client.id, DealStage::Lead);
    let ctx = context_for(&db);

    let request = UpdateDealRequest {
        value: Some(Decimal::from(99_000)),
        notes: Some("confidential pricing detail".to_string()),
        ..Default::default()
    };
    DealService::new(&ctx)
        .update_deal(&user, deal.id, request)
        .await
        .unwrap();

    let entries = db.activity_entries();
    let entry = entries
        .iter()
        .find(|e| e.action == ActivityAction::DealUpdated)
        .unwrap();
    let detail = entry.detail.as_ref().unwrap().to_string();
    assert!(detail.contains("value"));
    assert!(detail.contains("notes"));
    // Field values never appear in the audit trail
    assert!(!detail.contains("99"));
    assert!(!detail.contains("confidential"));
}

// ============================================================================
// Listing and reading
// ============================================================================

#[tokio::test]
async fn test_list_deals_is_scoped_to_caller() {
    let db = MemoryDb::new();
    let user = sales_user();
    let mine = seed_client(&db, Some(user.id));
    let theirs = seed_client(&db, Some(Uuid::new_v4()));
    seed_deal(&db, mine.id, DealStage::Lead);
    seed_deal(&db, theirs.id, DealStage::Lead);
    let ctx = context_for(&db);
    let service = DealService::new(&ctx);

    let visible = service
        .list_deals(&user, ListDealsRequest::default())
        .await
        .unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].client_id, mine.id);

    let all = service
        .list_deals(&admin(), ListDealsRequest::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_get_deal_includes_client_on_request() {
    let db = MemoryDb::new();
    let user = sales_user();
    let client = seed_client(&db, Some(user.id));
    let deal = seed_deal(&db, client.id, DealStage::Lead);
    let ctx = context_for(&db);
    let service = DealService::new(&ctx);

    let bare = service
        .get_deal(&user, deal.id, DealInclude::empty())
        .await
        .unwrap();
    assert!(bare.client.is_none());

    let with_client = service
        .get_deal(&user, deal.id, DealInclude::CLIENT)
        .await
        .unwrap();
    assert_eq!(with_client.client.unwrap().id, client.id);
}

#[tokio::test]
async fn test_deleted_deal_survives_only_in_audit_log() {
    let db = MemoryDb::new();
    let user = sales_user();
    let client = seed_client(&db, Some(user.id));
    let deal = seed_deal(&db, client.id, DealStage::Lead);
    let ctx = context_for(&db);

    DealService::new(&ctx)
        .delete_deal(&user, deal.id)
        .await
        .unwrap();

    assert!(db.deal(deal.id).is_none());
    let entries = db.activity_entries();
    assert!(entries
        .iter()
        .any(|e| e.action == ActivityAction::DealDeleted && e.entity_id == deal.id));
}

// ============================================================================
// Contacts
// ============================================================================

#[tokio::test]
async fn test_log_contact_note_without_kind() {
    let db = MemoryDb::new();
    let user = sales_user();
    let client = seed_client(&db, Some(user.id));
    let ctx = context_for(&db);

    let request = LogContactRequest {
        client_id: client.id,
        kind: None,
        date: None,
        notes: "prefers email over calls".to_string(),
        is_note: true,
    };
    let response = ContactService::new(&ctx)
        .log_contact(&user, request)
        .await
        .unwrap();

    assert!(response.is_note);
    assert!(response.kind.is_none());
}

#[tokio::test]
async fn test_log_interaction_requires_kind() {
    let db = MemoryDb::new();
    let user = sales_user();
    let client = seed_client(&db, Some(user.id));
    let ctx = context_for(&db);

    let request = LogContactRequest {
        client_id: client.id,
        kind: None,
        date: None,
        notes: "quarterly review".to_string(),
        is_note: false,
    };
    let err = ContactService::new(&ctx)
        .log_contact(&user, request)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}
