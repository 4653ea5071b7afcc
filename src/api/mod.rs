//! API Layer for fieldgate
//!
//! Routes the tutorial's five operations through schema validation. Every
//! parameter group is validated against its own schema and all field errors
//! are reported together, tagged with the request part they came from.
//!
//! # Supported Operations
//!
//! - home
//! - create_person
//! - person_detail
//! - person_by_id
//! - update_person

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiResult, SourcedError};
pub use handler::ApiHandler;
pub use request::{Request, TextParams};
pub use response::{ErrorResponse, Response, SuccessResponse};
