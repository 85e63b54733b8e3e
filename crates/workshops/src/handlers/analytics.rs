//! Cache statistics for operators.

use axum::{extract::State, Json};

use workshops_core::cache::CacheStatsReport;

use super::authz::{require, AuthzError, Policy};
use crate::{context::RequestScope, state::AppState};

/// Get cache statistics (GET /api/analytics/cache).
///
/// The report carries this request's clock and id, never those of an
/// earlier caller.
pub async fn cache_stats(
    RequestScope(ctx): RequestScope,
    State(state): State<AppState>,
) -> Result<Json<CacheStatsReport>, AuthzError> {
    require(&ctx, Policy::CanViewAnalytics)?;

    let report = state.cache_report(&ctx);
    tracing::debug!(
        request_id = %ctx.request_id,
        hits = report.counters.hits,
        misses = report.counters.misses,
        "Cache statistics requested"
    );

    Ok(Json(report))
}
