//! Stub authorization server: checks a demo password and issues signed access
//! tokens carrying `role`, `scp` and `tenant` claims for the orders API.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
