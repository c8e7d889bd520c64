//! Overtime tracker service
//!
//! Stores monthly overtime entries per user behind a small HTTP API and
//! serves the browser front-end.

pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod validation;
