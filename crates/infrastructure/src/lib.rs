//! Timeview Infrastructure - Adapters
//!
//! This crate provides the concrete implementation of the `TimeService`
//! port defined in the application layer, plus its configuration.

pub mod adapters;
pub mod config;

pub use adapters::ReqwestTimeService;
pub use config::ServiceConfig;
