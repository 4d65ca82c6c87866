//! Test fixtures and data generators
//!
//! Reusable actors, clients, and deals for the scenario tests, plus a
//! helper wiring a [`ServiceContext`] onto the in-memory fakes.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crm_core::entities::{Client, Deal};
use crm_core::value_objects::{
    ActingUser, ClientStatus, DealStage, DealValue, Probability, UserRole,
};
use crm_service::{ServiceContext, ServiceContextBuilder};

use crate::memory::{
    MemoryActivityLogRepository, MemoryClientRepository, MemoryContactRepository, MemoryDb,
    MemoryDealRepository, MemoryTaskRepository,
};

/// Wire a service context onto the shared in-memory store
pub fn context_for(db: &Arc<MemoryDb>) -> ServiceContext {
    ServiceContextBuilder::new()
        .deal_repo(Arc::new(MemoryDealRepository(Arc::clone(db))))
        .task_repo(Arc::new(MemoryTaskRepository(Arc::clone(db))))
        .contact_repo(Arc::new(MemoryContactRepository(Arc::clone(db))))
        .client_repo(Arc::new(MemoryClientRepository(Arc::clone(db))))
        .activity_repo(Arc::new(MemoryActivityLogRepository(Arc::clone(db))))
        .build()
        .expect("all fakes provided")
}

/// An admin actor
pub fn admin() -> ActingUser {
    ActingUser::new(Uuid::new_v4(), UserRole::Admin, "admin@crm.test")
}

/// A regular sales actor
pub fn sales_user() -> ActingUser {
    ActingUser::new(Uuid::new_v4(), UserRole::User, "sales@crm.test")
}

/// A client assigned to the given user, seeded into the store
pub fn seed_client(db: &MemoryDb, assigned_to: Option<Uuid>) -> Client {
    let mut client = Client::new("Acme Sp. z o.o.".to_string());
    client.assigned_to = assigned_to;
    db.insert_client(client.clone());
    client
}

/// A client in a given status, seeded into the store
pub fn seed_client_with_status(
    db: &MemoryDb,
    assigned_to: Option<Uuid>,
    status: ClientStatus,
) -> Client {
    let mut client = Client::new("Acme Sp. z o.o.".to_string());
    client.assigned_to = assigned_to;
    client.status = status;
    db.insert_client(client.clone());
    client
}

/// A deal in the given stage, seeded into the store
pub fn seed_deal(db: &MemoryDb, client_id: Uuid, stage: DealStage) -> Deal {
    let deal = Deal::new(
        client_id,
        DealValue::new(Decimal::from(25_000), "PLN").expect("valid value"),
        Probability::from_int(60).expect("valid probability"),
        stage,
    );
    db.insert_deal(deal.clone());
    deal
}
