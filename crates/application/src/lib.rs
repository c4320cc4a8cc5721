//! Timeview Application - Ports and the request controller
//!
//! This crate holds the behavior of the client: the `TimeService` port that
//! abstracts the remote endpoint, and the `RequestController` that owns the
//! request lifecycle state machine.

pub mod controller;
pub mod ports;

pub use controller::RequestController;
pub use ports::{TimeService, TimeServiceError};
