//! PostgreSQL repository implementations

mod activity_log;
mod client;
mod contact;
mod deal;
mod error;
mod task;

pub use activity_log::PgActivityLogRepository;
pub use client::PgClientRepository;
pub use contact::PgContactRepository;
pub use deal::PgDealRepository;
pub use task::PgTaskRepository;
