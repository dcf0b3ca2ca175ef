//! Model server - HTTP front end for the regression models
//!
//! The binary wires configuration, logging and the model registry
//! together; the router lives here so it can be exercised in tests.

pub mod api;
pub mod config;
