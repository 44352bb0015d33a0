pub mod decision;
pub mod error;
pub mod pdp;
pub mod requirement;
pub mod table;
pub mod types;

pub use decision::{Decision, DenyReason};
pub use error::ConfigurationError;
pub use pdp::PolicyDecisionPoint;
pub use requirement::{PolicyRequirement, PolicyRequirementBuilder, RequirementSpec};
pub use table::{Operation, PolicyTable};
pub use types::{DeviceTrust, RequestContext, RiskLevel, Role, Scope};
