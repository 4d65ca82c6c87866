//! Data transfer objects for the service layer
//!
//! - Request DTOs with `validator` derives for input validation
//! - Response DTOs serialized for API output
//! - Mappers from domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateDealRequest, CreateTaskRequest, ListContactsRequest, ListDealsRequest, ListTasksRequest,
    LogContactRequest, UpdateDealRequest, UpdateTaskRequest,
};
pub use responses::{
    AttachmentResponse, ClientResponse, ContactResponse, DealResponse, TaskResponse,
};
