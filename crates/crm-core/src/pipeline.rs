//! Deal pipeline - the stage state machine
//!
//! Owns the transition rules for [`DealStage`]. The `Deal` entity exposes no
//! public stage setter, so every stage change in the system goes through
//! this service.

use crate::entities::Deal;
use crate::error::DomainError;
use crate::value_objects::DealStage;

/// Domain service encoding the allowed stage transitions
///
/// Open stages (`LEAD`, `QUALIFIED`, `PROPOSAL`, `NEGOTIATION`) may move
/// freely among themselves and into either terminal stage. `WON` and `LOST`
/// accept no further transitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DealPipeline;

impl DealPipeline {
    /// The working pipeline, in order
    pub const OPEN_STAGES: [DealStage; 4] = [
        DealStage::Lead,
        DealStage::Qualified,
        DealStage::Proposal,
        DealStage::Negotiation,
    ];

    pub fn new() -> Self {
        Self
    }

    /// Whether the deal can still be closed (won or lost)
    #[inline]
    pub fn can_close(&self, deal: &Deal) -> bool {
        deal.stage().is_open()
    }

    /// Whether the deal can be won
    ///
    /// A deal already `LOST` can never become `WON` and vice versa.
    #[inline]
    pub fn can_win(&self, deal: &Deal) -> bool {
        deal.stage().is_open()
    }

    /// Move the deal to a new stage
    ///
    /// On success the deal's stage is updated and `updated_at` bumped; a
    /// same-stage call succeeds without touching the deal. On error the deal
    /// is left unmodified.
    pub fn change_stage(&self, deal: &mut Deal, new_stage: DealStage) -> Result<(), DomainError> {
        let current = deal.stage();
        if current.is_terminal() {
            return Err(DomainError::InvalidStageTransition {
                from: current,
                to: new_stage,
            });
        }
        if new_stage == current {
            return Ok(());
        }

        // Open -> open and open -> terminal are both permitted
        deal.set_stage_unchecked(new_stage);
        Ok(())
    }
}
