//! Model -> entity mappers
//!
//! Stage, status, and value columns are stored as plain TEXT/NUMERIC, so the
//! conversions go through the domain constructors and are fallible.

mod attachment;
mod client;
mod contact;
mod deal;
mod task;

pub use client::client_from_model;
pub use deal::deal_from_model;
