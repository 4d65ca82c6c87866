//! Domain entities - core business objects

mod attachment;
mod client;
mod contact;
mod deal;
mod task;

pub use attachment::DealAttachment;
pub use client::Client;
pub use contact::Contact;
pub use deal::Deal;
pub use task::Task;
