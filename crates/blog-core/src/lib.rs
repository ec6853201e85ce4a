//! # Blog Core
//!
//! The domain layer of the Cyberwatch blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, slug derivation, the error taxonomy, ports, and the account and
//! post services that orchestrate them.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
