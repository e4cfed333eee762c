//! Core domain types
//!
//! These types describe a single pipeline submission from the moment the
//! request is validated until the remote job has been observed.

pub mod job;
pub mod parameter;
pub mod request;
