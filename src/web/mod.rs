//! Web API module for the pulse service.

pub mod analytics;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod status;
pub mod views;

pub use routes::*;
