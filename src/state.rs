/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - pdp: PolicyDecisionPoint, policies: PolicyTable, orders: OrderRepo, audit sink, request metrics
 * - Cheap to clone (everything behind Arc)
 */
use std::sync::Arc;

use crate::middleware::metrics::HttpMetrics;
use crate::repos::order_repo::OrderRepo;
use crate::services::audit::AuditTrail;
use crate::services::policy::{PolicyDecisionPoint, PolicyTable};

#[derive(Clone, Debug)]
pub struct AppState {
    pub pdp: Arc<PolicyDecisionPoint>,
    pub policies: Arc<PolicyTable>,
    pub orders: OrderRepo,
    pub audit: Arc<AuditTrail>,
    pub metrics: Arc<HttpMetrics>,
}

impl AppState {
    pub fn new(
        pdp: Arc<PolicyDecisionPoint>,
        policies: PolicyTable,
        orders: OrderRepo,
        audit: Arc<AuditTrail>,
        metrics: HttpMetrics,
    ) -> Self {
        Self {
            pdp,
            policies: Arc::new(policies),
            orders,
            audit,
            metrics: Arc::new(metrics),
        }
    }
}
