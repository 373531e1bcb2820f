//! Aggregation and caching core over a slower upstream social platform API.
//!
//! One background-refreshed snapshot of the social graph (users, posts,
//! comments) feeds precomputed views and on-demand analytics, served over a
//! small HTTP API.

pub mod analytics;
pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod logging;
pub mod services;
pub mod social;
pub mod state;
pub mod utils;
pub mod web;
