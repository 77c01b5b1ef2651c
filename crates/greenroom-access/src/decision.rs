//! Decision outcome types.

/// Why an evaluation resolved the way it did. Carried into the audit
/// trail as the `reason` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    /// A user override with `granted = true` applied cleanly.
    UserOverrideAllowed,
    /// A user override with `granted = false` matched; explicit deny wins.
    UserOverrideDenied,
    /// The matching override requires an allowlisted IP; the context IP
    /// was not on the list.
    IpNotAllowed,
    /// The matching override requires an hour-of-day window; the
    /// evaluation timestamp fell outside it.
    OutsideTimeWindow,
    /// No effective override; the role default allowed.
    RoleDefaultAllowed,
    /// No effective override; the role default denied.
    RoleDefaultDenied,
    /// Neither layer had a matching grant (default-deny).
    NoMatchingGrant,
    /// The request was missing its category or action.
    MalformedRequest,
    /// A grant lookup failed; denial is the safe default.
    LookupFailed,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::UserOverrideAllowed => "user_override_allowed",
            DecisionReason::UserOverrideDenied => "user_override_denied",
            DecisionReason::IpNotAllowed => "ip_not_allowed",
            DecisionReason::OutsideTimeWindow => "outside_time_window",
            DecisionReason::RoleDefaultAllowed => "role_default_allowed",
            DecisionReason::RoleDefaultDenied => "role_default_denied",
            DecisionReason::NoMatchingGrant => "no_matching_grant",
            DecisionReason::MalformedRequest => "malformed_request",
            DecisionReason::LookupFailed => "lookup_failed",
        }
    }
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: DecisionReason,
}

impl AccessDecision {
    pub fn allow(reason: DecisionReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    pub fn deny(reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}
