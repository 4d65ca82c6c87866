//! # crm-db
//!
//! Database layer implementing the crm-core repository traits with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity mappers (fallible where the stored data can be corrupt)
//! - Repository implementations with access scoping pushed into SQL
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crm_db::pool::{create_pool, DatabaseConfig};
//! use crm_db::repositories::PgDealRepository;
//! use crm_core::traits::DealRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let deal_repo = PgDealRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{
    PgActivityLogRepository, PgClientRepository, PgContactRepository, PgDealRepository,
    PgTaskRepository,
};
