//! Beans Core
//!
//! Core types and request handling for the beans pipeline gateway.
//!
//! This crate contains:
//! - Domain types: the job request, parameter set and pipeline job
//! - DTOs: the response envelope returned to HTTP callers
//! - Validation: turning an untyped request body into domain types

pub mod domain;
pub mod dto;
pub mod validation;
