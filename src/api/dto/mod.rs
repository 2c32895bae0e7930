//! Data Transfer Objects for REST response serialization.

pub mod instance_dto;

pub use instance_dto::*;
