//! Deal entity - a sales opportunity attached to a client

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::value_objects::{DealStage, DealValue, Probability};

/// Deal aggregate
///
/// The stage field is private: stage changes are only possible through
/// [`crate::pipeline::DealPipeline`], which enforces the transition rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub id: Uuid,
    pub client_id: Uuid,
    pub value: DealValue,
    pub probability: Probability,
    stage: DealStage,
    pub expected_close_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub shared_group_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    /// Create a new Deal with a generated id
    pub fn new(
        client_id: Uuid,
        value: DealValue,
        probability: Probability,
        stage: DealStage,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_id,
            value,
            probability,
            stage,
            expected_close_date: None,
            notes: None,
            shared_group_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstruct a Deal loaded from the persistence store
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        client_id: Uuid,
        value: DealValue,
        probability: Probability,
        stage: DealStage,
        expected_close_date: Option<NaiveDate>,
        notes: Option<String>,
        shared_group_ids: Vec<Uuid>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            client_id,
            value,
            probability,
            stage,
            expected_close_date,
            notes,
            shared_group_ids,
            created_at,
            updated_at,
        }
    }

    /// Current pipeline stage
    #[inline]
    pub fn stage(&self) -> DealStage {
        self.stage
    }

    /// Update the monetary value
    pub fn update_value(&mut self, value: DealValue) {
        self.value = value;
        self.touch();
    }

    /// Update the win probability
    pub fn update_probability(&mut self, probability: Probability) {
        self.probability = probability;
        self.touch();
    }

    /// Replace the notes
    pub fn update_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
        self.touch();
    }

    /// Set or clear the expected close date
    pub fn set_expected_close_date(&mut self, date: Option<NaiveDate>) {
        self.expected_close_date = date;
        self.touch();
    }

    /// Stage mutation hook reserved for the pipeline module
    pub(crate) fn set_stage_unchecked(&mut self, stage: DealStage) {
        self.stage = stage;
        self.touch();
    }

    // updated_at is monotonically non-decreasing even if the clock steps back
    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}
