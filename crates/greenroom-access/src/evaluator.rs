//! Access Decision Evaluator.
//!
//! Stateless decision function over the two grant layers. User overrides
//! are checked before role defaults; an explicit user deny wins outright.
//! The evaluator is total — every failure mode, including a store error,
//! resolves to a denial rather than an `Err`.

use chrono::Timelike;
use greenroom_core::error::GreenroomResult;
use greenroom_core::models::context::{AccessContext, AccessRequest};
use greenroom_core::models::grant::UserGrant;
use greenroom_core::repository::{RoleGrantRepository, UserGrantRepository};
use tracing::warn;

use crate::decision::{AccessDecision, DecisionReason};

/// Combines per-user overrides with role-level defaults.
///
/// Generic over repository implementations so that the decision logic
/// has no dependency on the database crate.
pub struct AccessEvaluator<U: UserGrantRepository, R: RoleGrantRepository> {
    user_grants: U,
    role_grants: R,
}

impl<U: UserGrantRepository, R: RoleGrantRepository> AccessEvaluator<U, R> {
    pub fn new(user_grants: U, role_grants: R) -> Self {
        Self {
            user_grants,
            role_grants,
        }
    }

    /// Evaluate one request and explain the outcome.
    ///
    /// Infallible: malformed requests and lookup errors both resolve to
    /// a denial with the corresponding reason.
    pub async fn decide(&self, ctx: &AccessContext, req: &AccessRequest) -> AccessDecision {
        if req.category.is_empty() || req.action.is_empty() {
            return AccessDecision::deny(DecisionReason::MalformedRequest);
        }

        match self.decide_inner(ctx, req).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(
                    user_id = %ctx.user_id,
                    category = %req.category,
                    action = %req.action,
                    error = %e,
                    "Grant lookup failed; denying"
                );
                AccessDecision::deny(DecisionReason::LookupFailed)
            }
        }
    }

    /// Evaluate one request to a bare allow/deny.
    pub async fn evaluate(&self, ctx: &AccessContext, req: &AccessRequest) -> bool {
        self.decide(ctx, req).await.allowed
    }

    /// `true` if at least one request is allowed. Short-circuits on the
    /// first allow.
    pub async fn evaluate_any(&self, ctx: &AccessContext, reqs: &[AccessRequest]) -> bool {
        for req in reqs {
            if self.evaluate(ctx, req).await {
                return true;
            }
        }
        false
    }

    /// `true` only if every request is allowed. Short-circuits on the
    /// first deny.
    pub async fn evaluate_all(&self, ctx: &AccessContext, reqs: &[AccessRequest]) -> bool {
        for req in reqs {
            if !self.evaluate(ctx, req).await {
                return false;
            }
        }
        true
    }

    async fn decide_inner(
        &self,
        ctx: &AccessContext,
        req: &AccessRequest,
    ) -> GreenroomResult<AccessDecision> {
        // 1. User overrides, newest first: the most recent row for a
        //    triple is the effective one.
        let overrides = self.user_grants.get_user_grants(ctx.user_id).await?;
        let matched = overrides
            .iter()
            .find(|g| g.matches(&req.category, &req.action, req.resource.as_deref()));

        if let Some(grant) = matched {
            if !grant.granted {
                return Ok(AccessDecision::deny(DecisionReason::UserOverrideDenied));
            }

            let expired = grant.expires_at.is_some_and(|at| at <= ctx.timestamp);
            if !expired {
                return Ok(check_conditions(grant, ctx));
            }
            // An expired override is inert: fall through to the role
            // default as if it did not exist.
        }

        // 2. Role defaults.
        let defaults = self.role_grants.get_role_grants(ctx.role).await?;
        let decision = match defaults
            .iter()
            .find(|g| g.matches(&req.category, &req.action, req.resource.as_deref()))
        {
            Some(g) if g.granted => AccessDecision::allow(DecisionReason::RoleDefaultAllowed),
            Some(_) => AccessDecision::deny(DecisionReason::RoleDefaultDenied),
            None => AccessDecision::deny(DecisionReason::NoMatchingGrant),
        };
        Ok(decision)
    }
}

/// Apply the contextual conditions of a matched, non-expired override
/// with `granted = true`.
fn check_conditions(grant: &UserGrant, ctx: &AccessContext) -> AccessDecision {
    if let Some(conditions) = &grant.conditions {
        // The IP check only applies when the context carries an address.
        if let (Some(allowlist), Some(ip)) = (&conditions.ip_allowlist, &ctx.ip_address) {
            if !allowlist.iter().any(|allowed| allowed == ip) {
                return AccessDecision::deny(DecisionReason::IpNotAllowed);
            }
        }

        if let Some(window) = &conditions.time_window {
            let hour = ctx.timestamp.hour() as u8;
            if !window.contains(hour) {
                return AccessDecision::deny(DecisionReason::OutsideTimeWindow);
            }
        }
    }

    AccessDecision::allow(DecisionReason::UserOverrideAllowed)
}
