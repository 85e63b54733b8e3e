use async_trait::async_trait;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::search::SearchQuery;
use crate::workshop::{Workshop, WorkshopCommand, WriteResult};

use super::Result;

/// Repository for workshop operations.
///
/// Request-scoped values (request id, clock, actor) arrive through `ctx` on
/// every call. Implementations must not hold on to them.
#[async_trait]
pub trait WorkshopRepository: Send + Sync {
    /// Searches workshops, ordered by `start_at` then `id`.
    ///
    /// Returns an empty vector when nothing matches; store failures are
    /// errors, never an empty result.
    async fn search_workshops(
        &self,
        ctx: &RequestContext,
        query: &SearchQuery,
    ) -> Result<Vec<Workshop>>;

    /// Gets a workshop by its ID.
    async fn get_workshop(&self, ctx: &RequestContext, id: Uuid) -> Result<Option<Workshop>>;

    /// Applies a create, update or delete.
    async fn write_workshop(
        &self,
        ctx: &RequestContext,
        command: &WorkshopCommand,
    ) -> Result<WriteResult>;
}
