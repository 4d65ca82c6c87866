//! Database models - one struct per table, mapped with SQLx `FromRow`

mod attachment;
mod client;
mod contact;
mod deal;
mod task;

pub use attachment::DealAttachmentModel;
pub use client::ClientModel;
pub use contact::ContactModel;
pub use deal::DealModel;
pub use task::TaskModel;
