//! Axum extractor for RequestContext.
//!
//! Identity comes from headers set by the authenticating proxy in front of
//! the service: `x-user-id` names the caller and `x-user-roles` carries a
//! comma-separated role list. Tokens are never inspected here.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use chrono::Utc;
use uuid::Uuid;

use workshops_core::context::{Actor, RequestContext, RequestId, Role};

const REQUEST_ID_HEADER: &str = "x-request-id";
const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLES_HEADER: &str = "x-user-roles";

/// Per-request context, extracted once and passed to repository calls.
#[derive(Debug, Clone)]
pub struct RequestScope(pub RequestContext);

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn extract_request_id(headers: &HeaderMap) -> RequestId {
    header_str(headers, REQUEST_ID_HEADER)
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(RequestId::from_uuid)
        .unwrap_or_else(RequestId::new)
}

fn extract_actor(headers: &HeaderMap) -> Option<Actor> {
    let subject = header_str(headers, USER_ID_HEADER)?;
    let roles = header_str(headers, USER_ROLES_HEADER)
        .map(Role::parse_list)
        .unwrap_or_default();

    Some(Actor::new(subject, roles))
}

fn context_from_headers(headers: &HeaderMap) -> RequestContext {
    let ctx = RequestContext::new(Utc::now()).with_request_id(extract_request_id(headers));

    match extract_actor(headers) {
        Some(actor) => ctx.with_actor(actor),
        None => ctx,
    }
}

impl<S> FromRequestParts<S> for RequestScope
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = context_from_headers(&parts.headers);

        tracing::trace!(
            request_id = %ctx.request_id,
            actor = ctx.actor.as_ref().map(|a| a.subject.as_str()),
            "Request context established"
        );

        Ok(RequestScope(ctx))
    }
}
