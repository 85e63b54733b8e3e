//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use workshops_core::context::RequestContext;
use workshops_core::search::SearchQuery;
use workshops_core::storage::{RepositoryError, Result, WorkshopRepository};
use workshops_core::workshop::{validate_workshop, Workshop, WorkshopCommand, WriteResult};

/// In-memory storage backend.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    workshops: Arc<RwLock<HashMap<Uuid, Workshop>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            workshops: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a repository pre-populated with `workshops`.
    pub fn with_workshops(workshops: impl IntoIterator<Item = Workshop>) -> Self {
        let map = workshops.into_iter().map(|w| (w.id, w)).collect();
        Self {
            workshops: Arc::new(RwLock::new(map)),
        }
    }
}

fn not_found(id: Uuid) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type: "Workshop",
        id: id.to_string(),
    }
}

#[async_trait]
impl WorkshopRepository for InMemoryRepository {
    async fn search_workshops(
        &self,
        _ctx: &RequestContext,
        query: &SearchQuery,
    ) -> Result<Vec<Workshop>> {
        query.validate()?;

        let workshops = self.workshops.read().await;
        let mut results: Vec<Workshop> = workshops
            .values()
            .filter(|w| query.matches(w))
            .cloned()
            .collect();
        results.sort_by(|a, b| a.start_at.cmp(&b.start_at).then(a.id.cmp(&b.id)));

        Ok(results)
    }

    async fn get_workshop(&self, _ctx: &RequestContext, id: Uuid) -> Result<Option<Workshop>> {
        let workshops = self.workshops.read().await;
        Ok(workshops.get(&id).cloned())
    }

    async fn write_workshop(
        &self,
        ctx: &RequestContext,
        command: &WorkshopCommand,
    ) -> Result<WriteResult> {
        let mut workshops = self.workshops.write().await;

        match command {
            WorkshopCommand::Create(workshop) => {
                validate_workshop(workshop)?;
                if workshops.contains_key(&workshop.id) {
                    return Err(RepositoryError::AlreadyExists {
                        entity_type: "Workshop",
                        id: workshop.id.to_string(),
                    });
                }
                workshops.insert(workshop.id, workshop.clone());
            }
            WorkshopCommand::Update {
                workshop,
                expected_updated_at,
            } => {
                validate_workshop(workshop)?;
                let existing = workshops
                    .get(&workshop.id)
                    .ok_or_else(|| not_found(workshop.id))?;

                if expected_updated_at.is_some_and(|expected| expected != existing.updated_at) {
                    return Err(RepositoryError::WriteConflict {
                        entity_type: "Workshop",
                        id: workshop.id.to_string(),
                    });
                }

                let updated = Workshop {
                    created_at: existing.created_at,
                    updated_at: ctx.now,
                    ..workshop.clone()
                };
                workshops.insert(workshop.id, updated);
            }
            WorkshopCommand::Delete { id } => {
                workshops.remove(id).ok_or_else(|| not_found(*id))?;
            }
        }

        Ok(WriteResult::for_command(command, ctx.now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use workshops_core::search::{Attendance, SearchFilter};
    use workshops_core::workshop::WriteOperation;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
    }

    fn ctx() -> RequestContext {
        RequestContext::new(at(1, 8))
    }

    fn workshop(title: &str, day: u32) -> Workshop {
        Workshop::new(title, at(day, 9), at(day, 12), at(1, 8))
    }

    // ==================== Write Tests ====================

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryRepository::new();
        let w = workshop("Intro to React", 15);

        let result = repo
            .write_workshop(&ctx(), &WorkshopCommand::Create(w.clone()))
            .await
            .unwrap();

        assert_eq!(result.id, w.id);
        assert_eq!(result.operation, WriteOperation::Created);
        assert_eq!(result.applied_at, ctx().now);
        assert_eq!(repo.get_workshop(&ctx(), w.id).await.unwrap(), Some(w));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let repo = InMemoryRepository::new();
        let result = repo.get_workshop(&ctx(), Uuid::new_v4()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate() {
        let repo = InMemoryRepository::new();
        let w = workshop("Intro to React", 15);
        let command = WorkshopCommand::Create(w);

        repo.write_workshop(&ctx(), &command).await.unwrap();
        let result = repo.write_workshop(&ctx(), &command).await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_create_invalid_workshop() {
        let repo = InMemoryRepository::new();
        let mut w = workshop("Intro to React", 15);
        w.end_at = w.start_at;

        let result = repo.write_workshop(&ctx(), &WorkshopCommand::Create(w)).await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_update_preserves_created_at() {
        let repo = InMemoryRepository::new();
        let original = workshop("Intro to React", 15);
        repo.write_workshop(&ctx(), &WorkshopCommand::Create(original.clone()))
            .await
            .unwrap();

        let later = RequestContext::new(at(2, 8));
        let mut changed = original.clone();
        changed.title = "Advanced React".to_string();
        changed.created_at = at(2, 8);

        repo.write_workshop(
            &later,
            &WorkshopCommand::Update {
                workshop: changed,
                expected_updated_at: Some(original.updated_at),
            },
        )
        .await
        .unwrap();

        let stored = repo.get_workshop(&later, original.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Advanced React");
        assert_eq!(stored.created_at, original.created_at);
        assert_eq!(stored.updated_at, later.now);
    }

    #[tokio::test]
    async fn test_update_with_stale_timestamp_conflicts() {
        let repo = InMemoryRepository::new();
        let w = workshop("Intro to React", 15);
        repo.write_workshop(&ctx(), &WorkshopCommand::Create(w.clone()))
            .await
            .unwrap();

        let result = repo
            .write_workshop(
                &ctx(),
                &WorkshopCommand::Update {
                    workshop: w.clone(),
                    expected_updated_at: Some(w.updated_at - Duration::hours(1)),
                },
            )
            .await;

        assert!(matches!(result, Err(RepositoryError::WriteConflict { .. })));
    }

    #[tokio::test]
    async fn test_update_nonexistent() {
        let repo = InMemoryRepository::new();
        let result = repo
            .write_workshop(
                &ctx(),
                &WorkshopCommand::Update {
                    workshop: workshop("Ghost", 15),
                    expected_updated_at: None,
                },
            )
            .await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryRepository::new();
        let w = workshop("Intro to React", 15);
        repo.write_workshop(&ctx(), &WorkshopCommand::Create(w.clone()))
            .await
            .unwrap();

        let result = repo
            .write_workshop(&ctx(), &WorkshopCommand::Delete { id: w.id })
            .await
            .unwrap();

        assert_eq!(result.operation, WriteOperation::Deleted);
        assert!(repo.get_workshop(&ctx(), w.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_nonexistent() {
        let repo = InMemoryRepository::new();
        let result = repo
            .write_workshop(&ctx(), &WorkshopCommand::Delete { id: Uuid::new_v4() })
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    // ==================== Search Tests ====================

    #[tokio::test]
    async fn test_search_orders_by_start() {
        let late = workshop("React Native", 20);
        let early = workshop("Intro to React", 10);
        let other = workshop("Rust for beginners", 12);
        let repo = InMemoryRepository::with_workshops([late.clone(), early.clone(), other]);

        let results = repo
            .search_workshops(&ctx(), &SearchQuery::new("react"))
            .await
            .unwrap();

        assert_eq!(results, vec![early, late]);
    }

    #[tokio::test]
    async fn test_search_empty_result_is_ok() {
        let repo = InMemoryRepository::with_workshops([workshop("Intro to React", 10)]);
        let results = repo
            .search_workshops(&ctx(), &SearchQuery::new("cobol"))
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_with_filters() {
        let online = workshop("React online", 10).online();
        let in_person = workshop("React in person", 11).with_location("Lisbon");
        let repo = InMemoryRepository::with_workshops([online.clone(), in_person.clone()]);

        let query =
            SearchQuery::new("react").with_filter(SearchFilter::Mode(Attendance::Online));
        let results = repo.search_workshops(&ctx(), &query).await.unwrap();
        assert_eq!(results, vec![online]);

        let query = SearchQuery::all().with_filter(SearchFilter::Location("lisbon".into()));
        let results = repo.search_workshops(&ctx(), &query).await.unwrap();
        assert_eq!(results, vec![in_person]);
    }

    #[tokio::test]
    async fn test_search_inverted_range_is_query_invalid() {
        let repo = InMemoryRepository::new();
        let query = SearchQuery::all()
            .with_filter(SearchFilter::StartsFrom(at(20, 0)))
            .with_filter(SearchFilter::StartsBefore(at(10, 0)));

        let result = repo.search_workshops(&ctx(), &query).await;

        assert!(matches!(result, Err(RepositoryError::QueryInvalid(_))));
    }
}
