//! Data Transfer Objects
//!
//! Shapes exchanged with HTTP callers.

pub mod run;
