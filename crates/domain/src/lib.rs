//! Timeview Domain - Core types
//!
//! This crate defines the domain model for the Timeview client.
//! All types here are pure Rust with no I/O dependencies.

pub mod payload;
pub mod state;

pub use payload::DateTimePayload;
pub use state::{RequestErrorKind, RequestState};
