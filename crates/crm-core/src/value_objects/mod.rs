//! Value objects - immutable, self-validating domain values

mod acting_user;
mod client_status;
mod contact_kind;
mod deal_stage;
mod deal_value;
mod probability;
mod task_status;

pub use acting_user::{ActingUser, UserRole};
pub use client_status::ClientStatus;
pub use contact_kind::ContactKind;
pub use deal_stage::DealStage;
pub use deal_value::DealValue;
pub use probability::Probability;
pub use task_status::TaskStatus;
