//! Activity log events

mod activity;

pub use activity::{ActivityAction, ActivityEntry};
