//! SQLite repository implementation.

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use workshops_core::context::RequestContext;
use workshops_core::search::SearchQuery;
use workshops_core::storage::{RepositoryError, Result, WorkshopRepository};
use workshops_core::workshop::{validate_workshop, Workshop, WorkshopCommand, WriteResult};

use super::conversions::{format_datetime, row_to_workshop};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Result of a conditional update, decided inside the connection closure.
enum UpdateOutcome {
    Applied,
    Missing,
    Conflict,
}

/// SQLite-based repository implementation.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::StoreUnavailable(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::StoreUnavailable(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, "Workshop", ""))
    }

    async fn insert(&self, workshop: &Workshop) -> Result<()> {
        let id = workshop.id.to_string();
        let title = workshop.title.clone();
        let description = workshop.description.clone();
        let start_at = format_datetime(&workshop.start_at);
        let end_at = format_datetime(&workshop.end_at);
        let is_online = workshop.is_online;
        let location = workshop.location.clone();
        let capacity = workshop.capacity;
        let created_at = format_datetime(&workshop.created_at);
        let updated_at = format_datetime(&workshop.updated_at);
        let workshop_id = workshop.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_WORKSHOP,
                    rusqlite::params![
                        id,
                        title,
                        description,
                        start_at,
                        end_at,
                        is_online,
                        location,
                        capacity,
                        created_at,
                        updated_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Workshop", workshop_id))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        workshop: &Workshop,
        expected_updated_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<()> {
        let id = workshop.id.to_string();
        let title = workshop.title.clone();
        let description = workshop.description.clone();
        let start_at = format_datetime(&workshop.start_at);
        let end_at = format_datetime(&workshop.end_at);
        let is_online = workshop.is_online;
        let location = workshop.location.clone();
        let capacity = workshop.capacity;
        let expected = expected_updated_at.as_ref().map(format_datetime);
        let updated_at = format_datetime(&ctx.now);
        let workshop_id = workshop.id.to_string();

        let outcome = self
            .conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_WORKSHOP,
                        rusqlite::params![
                            id,
                            title,
                            description,
                            start_at,
                            end_at,
                            is_online,
                            location,
                            capacity,
                            expected,
                            updated_at
                        ],
                    )
                    .map_err(wrap_err)?;
                if rows > 0 {
                    return Ok(UpdateOutcome::Applied);
                }

                let mut stmt = conn.prepare(schema::WORKSHOP_EXISTS).map_err(wrap_err)?;
                let exists = stmt.exists([&id]).map_err(wrap_err)?;
                Ok(if exists {
                    UpdateOutcome::Conflict
                } else {
                    UpdateOutcome::Missing
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Workshop", workshop_id.clone()))?;

        match outcome {
            UpdateOutcome::Applied => Ok(()),
            UpdateOutcome::Missing => Err(RepositoryError::NotFound {
                entity_type: "Workshop",
                id: workshop_id,
            }),
            UpdateOutcome::Conflict => Err(RepositoryError::WriteConflict {
                entity_type: "Workshop",
                id: workshop_id,
            }),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_WORKSHOP, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Workshop", id.to_string()))
    }
}

#[async_trait]
impl WorkshopRepository for SqliteRepository {
    async fn search_workshops(
        &self,
        ctx: &RequestContext,
        query: &SearchQuery,
    ) -> Result<Vec<Workshop>> {
        query.validate()?;

        let (sql, params) = schema::search_workshops_sql(query);
        tracing::trace!(request_id = %ctx.request_id, %sql, "Executing workshop search");

        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(params.iter()), row_to_workshop)
                    .map_err(wrap_err)?;

                let mut workshops = Vec::new();
                for row_result in rows {
                    workshops.push(row_result.map_err(wrap_err)?);
                }
                Ok(workshops)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Workshop", ""))?;

        Ok(rows.into_iter().filter(|w| query.matches(w)).collect())
    }

    async fn get_workshop(&self, _ctx: &RequestContext, id: Uuid) -> Result<Option<Workshop>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_WORKSHOP_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_workshop) {
                    Ok(workshop) => Ok(Some(workshop)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Workshop", id.to_string()))
    }

    async fn write_workshop(
        &self,
        ctx: &RequestContext,
        command: &WorkshopCommand,
    ) -> Result<WriteResult> {
        match command {
            WorkshopCommand::Create(workshop) => {
                validate_workshop(workshop)?;
                self.insert(workshop).await?;
            }
            WorkshopCommand::Update {
                workshop,
                expected_updated_at,
            } => {
                validate_workshop(workshop)?;
                self.update(ctx, workshop, *expected_updated_at).await?;
            }
            WorkshopCommand::Delete { id } => {
                self.delete(*id).await?;
            }
        }

        Ok(WriteResult::for_command(command, ctx.now))
    }
}
