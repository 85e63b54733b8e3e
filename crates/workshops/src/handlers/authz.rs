//! Role policies for API handlers.
//!
//! Checks run before a handler touches the repository, so a rejected write
//! never reaches storage and never triggers cache invalidation. Returns 401
//! Unauthorized for anonymous callers and 403 Forbidden for missing roles.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use workshops_core::context::{Actor, RequestContext, Role};

/// A named set of roles allowed to perform an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Create or replace workshops.
    CanWriteWorkshops,
    /// Remove workshops.
    CanDeleteWorkshops,
    /// Read cache statistics.
    CanViewAnalytics,
}

impl Policy {
    pub fn name(&self) -> &'static str {
        match self {
            Policy::CanWriteWorkshops => "CanWriteWorkshops",
            Policy::CanDeleteWorkshops => "CanDeleteWorkshops",
            Policy::CanViewAnalytics => "CanViewAnalytics",
        }
    }

    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Policy::CanWriteWorkshops => &[Role::Instructor, Role::Admin],
            Policy::CanDeleteWorkshops | Policy::CanViewAnalytics => &[Role::Admin],
        }
    }
}

/// Authorization error that maps to HTTP 401 or 403.
#[derive(Debug)]
pub enum AuthzError {
    /// No caller identity on the request.
    Unauthenticated { policy: Policy },
    /// The caller holds none of the policy's roles.
    Forbidden { policy: Policy, subject: String },
}

impl IntoResponse for AuthzError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated { policy } => {
                tracing::warn!(policy = policy.name(), "Authorization denied: anonymous caller");
                (StatusCode::UNAUTHORIZED, "Authentication required").into_response()
            }
            Self::Forbidden { policy, subject } => {
                tracing::warn!(
                    policy = policy.name(),
                    subject = %subject,
                    "Authorization denied: missing role"
                );
                (
                    StatusCode::FORBIDDEN,
                    format!("Requires {} permission", policy.name()),
                )
                    .into_response()
            }
        }
    }
}

/// Requires the caller in `ctx` to satisfy `policy`.
pub fn require(ctx: &RequestContext, policy: Policy) -> Result<&Actor, AuthzError> {
    let actor = ctx
        .actor
        .as_ref()
        .ok_or(AuthzError::Unauthenticated { policy })?;

    if actor.has_any_role(policy.allowed_roles()) {
        Ok(actor)
    } else {
        Err(AuthzError::Forbidden {
            policy,
            subject: actor.subject.clone(),
        })
    }
}
