//! Deal service
//!
//! Use cases for the deal pipeline: create, read, list, update, close, and
//! delete. Every method takes the acting user and authorizes against the
//! deal's client before any mutation.

use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crm_core::entities::Deal;
use crm_core::events::{ActivityAction, ActivityEntry};
use crm_core::pipeline::DealPipeline;
use crm_core::traits::{
    AccessScope, ClientTransition, DealFilter, DealInclude, DealOrderField, QueryOptions,
};
use crm_core::value_objects::{
    ActingUser, ClientStatus, DealStage, DealValue, Probability,
};
use crm_core::DomainError;

use crate::dto::{CreateDealRequest, DealResponse, ListDealsRequest, UpdateDealRequest};

use super::access::AccessControl;
use super::activity::ActivityLogger;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Deal service
pub struct DealService<'a> {
    ctx: &'a ServiceContext,
    pipeline: DealPipeline,
}

impl<'a> DealService<'a> {
    /// Create a new DealService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            pipeline: DealPipeline::new(),
        }
    }

    /// Create a new deal
    #[instrument(skip(self, user, request))]
    pub async fn create_deal(
        &self,
        user: &ActingUser,
        request: CreateDealRequest,
    ) -> ServiceResult<DealResponse> {
        request.validate()?;

        // Client must exist and be accessible before anything is written
        AccessControl::new(self.ctx)
            .require_client(user, request.client_id)
            .await?;

        let value = DealValue::new(request.value, &request.currency)?;
        let probability = Probability::from_int(request.probability)?;
        let stage = match request.stage.as_deref() {
            Some(s) => s.parse::<DealStage>()?,
            None => DealStage::Lead,
        };

        let mut deal = Deal::new(request.client_id, value, probability, stage);
        deal.notes = request.notes;
        deal.expected_close_date = request.expected_close_date;
        deal.shared_group_ids = request.shared_group_ids.unwrap_or_default();

        self.ctx.deal_repo().create(&deal).await?;

        info!(deal_id = %deal.id, client_id = %deal.client_id, "Deal created");

        ActivityLogger::new(self.ctx)
            .record(ActivityEntry::new(
                user.id,
                ActivityAction::DealCreated,
                deal.id,
            ))
            .await;

        Ok(DealResponse::from(&deal))
    }

    /// Get deal by ID
    #[instrument(skip(self, user))]
    pub async fn get_deal(
        &self,
        user: &ActingUser,
        deal_id: Uuid,
        include: DealInclude,
    ) -> ServiceResult<DealResponse> {
        // The client is always loaded for the access check, even when the
        // caller did not ask for it in the response
        let mut record = self
            .ctx
            .deal_repo()
            .find_by_id(deal_id, include | DealInclude::CLIENT)
            .await?
            .ok_or_else(|| ServiceError::not_found("Deal", deal_id.to_string()))?;

        let client = record
            .client
            .as_ref()
            .ok_or_else(|| ServiceError::internal("deal references a missing client"))?;
        AccessControl::authorize(user, client)?;

        if !include.contains(DealInclude::CLIENT) {
            record.client = None;
        }

        Ok(DealResponse::from(&record))
    }

    /// List deals visible to the caller
    #[instrument(skip(self, user, request))]
    pub async fn list_deals(
        &self,
        user: &ActingUser,
        request: ListDealsRequest,
    ) -> ServiceResult<Vec<DealResponse>> {
        request.validate()?;

        let mut filter = DealFilter::scoped(AccessScope::from(user));
        filter.client_id = request.client_id;
        filter.stage = request
            .stage
            .as_deref()
            .map(str::parse::<DealStage>)
            .transpose()?;
        filter.search = request.search;

        let mut include = DealInclude::SHARED_GROUPS;
        if request.include_client {
            include |= DealInclude::CLIENT;
        }
        let mut options = QueryOptions::<DealOrderField>::default().with_include(include);
        if let Some(limit) = request.limit {
            options = options.with_page(limit, request.offset.unwrap_or(0));
        }

        let records = self.ctx.deal_repo().find_many(&filter, &options).await?;

        Ok(records.iter().map(DealResponse::from).collect())
    }

    /// Update a deal - only fields present in the request are applied
    #[instrument(skip(self, user, request))]
    pub async fn update_deal(
        &self,
        user: &ActingUser,
        deal_id: Uuid,
        request: UpdateDealRequest,
    ) -> ServiceResult<DealResponse> {
        request.validate()?;

        let record = self
            .ctx
            .deal_repo()
            .find_by_id(deal_id, DealInclude::CLIENT | DealInclude::SHARED_GROUPS)
            .await?
            .ok_or_else(|| ServiceError::not_found("Deal", deal_id.to_string()))?;

        let client = record
            .client
            .as_ref()
            .ok_or_else(|| ServiceError::internal("deal references a missing client"))?;
        AccessControl::authorize(user, client)?;

        let mut deal = record.deal;
        let mut changed: Vec<&str> = Vec::new();

        if request.value.is_some() || request.currency.is_some() {
            let amount = request.value.unwrap_or_else(|| deal.value.amount());
            let currency = request
                .currency
                .clone()
                .unwrap_or_else(|| deal.value.currency().to_string());
            deal.update_value(DealValue::new(amount, &currency)?);
            changed.push("value");
        }

        if let Some(probability) = request.probability {
            deal.update_probability(Probability::from_int(probability)?);
            changed.push("probability");
        }

        if let Some(stage_str) = request.stage.as_deref() {
            let new_stage = stage_str.parse::<DealStage>()?;
            if new_stage != deal.stage() {
                self.pipeline.change_stage(&mut deal, new_stage)?;
                changed.push("stage");
            }
        }

        if let Some(date) = request.expected_close_date {
            deal.set_expected_close_date(Some(date));
            changed.push("expected_close_date");
        }

        if let Some(notes) = request.notes {
            deal.update_notes(Some(notes));
            changed.push("notes");
        }

        if !changed.is_empty() {
            self.ctx.deal_repo().update(&deal).await?;
        }

        if let Some(group_ids) = request.shared_group_ids {
            self.ctx
                .deal_repo()
                .set_shared_groups(deal.id, &group_ids)
                .await?;
            deal.shared_group_ids = group_ids;
            changed.push("shared_groups");
        }

        if !changed.is_empty() {
            ActivityLogger::new(self.ctx)
                .record(ActivityEntry::deal_updated(user.id, deal.id, &changed))
                .await;
        }

        Ok(DealResponse::from(&deal))
    }

    /// Close a deal as won or lost
    ///
    /// Winning a deal whose client is not yet an active client also flips
    /// the client status and records a status-history row; both writes and
    /// the deal's terminal stage commit atomically.
    #[instrument(skip(self, user))]
    pub async fn close_deal(
        &self,
        user: &ActingUser,
        deal_id: Uuid,
        won: bool,
    ) -> ServiceResult<DealResponse> {
        let record = self
            .ctx
            .deal_repo()
            .find_by_id(deal_id, DealInclude::CLIENT | DealInclude::SHARED_GROUPS)
            .await?
            .ok_or_else(|| ServiceError::not_found("Deal", deal_id.to_string()))?;

        let client = record
            .client
            .ok_or_else(|| ServiceError::internal("deal references a missing client"))?;
        AccessControl::authorize(user, &client)?;

        let mut deal = record.deal;

        if !self.pipeline.can_close(&deal) {
            return Err(DomainError::DealAlreadyClosed(deal.id).into());
        }
        if won && !self.pipeline.can_win(&deal) {
            return Err(DomainError::InvalidStageTransition {
                from: deal.stage(),
                to: DealStage::Won,
            }
            .into());
        }

        let target = if won { DealStage::Won } else { DealStage::Lost };
        self.pipeline.change_stage(&mut deal, target)?;

        let transition = if won && client.status != ClientStatus::ActiveClient {
            Some(ClientTransition {
                client_id: client.id,
                from: client.status,
                to: ClientStatus::ActiveClient,
                changed_by: user.id,
                deal_id: deal.id,
            })
        } else {
            None
        };

        self.ctx
            .deal_repo()
            .close(&deal, transition.as_ref())
            .await?;

        info!(deal_id = %deal.id, won, "Deal closed");

        let action = if won {
            ActivityAction::DealWon
        } else {
            ActivityAction::DealLost
        };
        ActivityLogger::new(self.ctx)
            .record(ActivityEntry::new(user.id, action, deal.id))
            .await;

        Ok(DealResponse::from(&deal))
    }

    /// Hard delete a deal
    ///
    /// The activity log entry is the only surviving record of the deal.
    #[instrument(skip(self, user))]
    pub async fn delete_deal(&self, user: &ActingUser, deal_id: Uuid) -> ServiceResult<()> {
        let record = self
            .ctx
            .deal_repo()
            .find_by_id(deal_id, DealInclude::CLIENT)
            .await?
            .ok_or_else(|| ServiceError::not_found("Deal", deal_id.to_string()))?;

        let client = record
            .client
            .as_ref()
            .ok_or_else(|| ServiceError::internal("deal references a missing client"))?;
        AccessControl::authorize(user, client)?;

        self.ctx.deal_repo().delete(deal_id).await?;

        info!(deal_id = %deal_id, "Deal deleted");

        ActivityLogger::new(self.ctx)
            .record(ActivityEntry::new(
                user.id,
                ActivityAction::DealDeleted,
                deal_id,
            ))
            .await;

        Ok(())
    }
}
