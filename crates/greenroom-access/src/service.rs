//! Audited access service — evaluation plus audit-trail orchestration.

use greenroom_core::models::audit::CreateAccessAuditEntry;
use greenroom_core::models::context::{AccessContext, AccessRequest};
use greenroom_core::repository::{
    AccessAuditRepository, RoleGrantRepository, UserGrantRepository,
};
use tracing::warn;

use crate::decision::AccessDecision;
use crate::evaluator::AccessEvaluator;

/// Wraps the evaluator and writes one audit record per evaluated
/// request. Intended for request-handling middleware.
pub struct AccessService<U, R, A>
where
    U: UserGrantRepository,
    R: RoleGrantRepository,
    A: AccessAuditRepository,
{
    evaluator: AccessEvaluator<U, R>,
    audit: A,
}

impl<U, R, A> AccessService<U, R, A>
where
    U: UserGrantRepository,
    R: RoleGrantRepository,
    A: AccessAuditRepository,
{
    pub fn new(user_grants: U, role_grants: R, audit: A) -> Self {
        Self {
            evaluator: AccessEvaluator::new(user_grants, role_grants),
            audit,
        }
    }

    /// The underlying evaluator, for callers that need unaudited checks.
    pub fn evaluator(&self) -> &AccessEvaluator<U, R> {
        &self.evaluator
    }

    /// Evaluate one request and record the decision.
    pub async fn authorize(&self, ctx: &AccessContext, req: &AccessRequest) -> bool {
        let decision = self.evaluator.decide(ctx, req).await;
        self.record(ctx, req, &decision).await;
        decision.allowed
    }

    /// `true` if at least one request is allowed. Each evaluated request
    /// gets its own audit record.
    pub async fn authorize_any(&self, ctx: &AccessContext, reqs: &[AccessRequest]) -> bool {
        for req in reqs {
            if self.authorize(ctx, req).await {
                return true;
            }
        }
        false
    }

    /// `true` only if every request is allowed.
    pub async fn authorize_all(&self, ctx: &AccessContext, reqs: &[AccessRequest]) -> bool {
        for req in reqs {
            if !self.authorize(ctx, req).await {
                return false;
            }
        }
        true
    }

    async fn record(&self, ctx: &AccessContext, req: &AccessRequest, decision: &AccessDecision) {
        let entry = CreateAccessAuditEntry {
            user_id: ctx.user_id,
            role: ctx.role,
            category: req.category.clone(),
            action: req.action.clone(),
            resource: req.resource.clone(),
            granted: decision.allowed,
            reason: decision.reason.to_string(),
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
            timestamp: ctx.timestamp,
        };

        // A failed append never blocks or reverses the decision already
        // made.
        if let Err(e) = self.audit.append(entry).await {
            warn!(
                user_id = %ctx.user_id,
                category = %req.category,
                action = %req.action,
                error = %e,
                "Failed to append access audit entry"
            );
        }
    }
}
