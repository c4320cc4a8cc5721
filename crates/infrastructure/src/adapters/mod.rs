//! Concrete port implementations.

mod reqwest_time_service;

pub use reqwest_time_service::ReqwestTimeService;
