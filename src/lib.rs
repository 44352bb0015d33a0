//! Zero Trust orders API.
//!
//! Every protected route passes through a stateless policy decision point
//! (`services::policy::PolicyDecisionPoint`): bearer credential verification,
//! then scope, role, device trust and risk checks, in that order.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
