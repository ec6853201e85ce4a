//! # Blog Shared
//!
//! Wire types of the HTTP API: request/response DTOs and the error body.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, MessageResponse};
