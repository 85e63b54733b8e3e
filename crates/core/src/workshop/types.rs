use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Capacity assigned to workshops that don't specify one.
pub const DEFAULT_CAPACITY: u32 = 1;

/// A scheduled workshop.
///
/// Owned by the persistence layer. Cached copies are read-only snapshots and
/// are replaced wholesale, never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workshop {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub is_online: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub capacity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workshop {
    /// Creates an in-person workshop stamped with `now`.
    pub fn new(
        title: impl Into<String>,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            start_at,
            end_at,
            is_online: false,
            location: None,
            capacity: DEFAULT_CAPACITY,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the workshop as online.
    pub fn online(mut self) -> Self {
        self.is_online = true;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets a specific ID (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// A write against the workshop store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkshopCommand {
    /// Insert a new workshop.
    Create(Workshop),
    /// Replace an existing workshop.
    ///
    /// When `expected_updated_at` is set, the write only applies if the stored
    /// record still carries that timestamp (optimistic concurrency).
    Update {
        workshop: Workshop,
        expected_updated_at: Option<DateTime<Utc>>,
    },
    /// Remove a workshop.
    Delete { id: Uuid },
}

impl WorkshopCommand {
    /// Returns the ID of the workshop this command touches.
    pub fn workshop_id(&self) -> Uuid {
        match self {
            WorkshopCommand::Create(workshop) => workshop.id,
            WorkshopCommand::Update { workshop, .. } => workshop.id,
            WorkshopCommand::Delete { id } => *id,
        }
    }

    /// Returns the operation this command performs.
    pub fn operation(&self) -> WriteOperation {
        match self {
            WorkshopCommand::Create(_) => WriteOperation::Created,
            WorkshopCommand::Update { .. } => WriteOperation::Updated,
            WorkshopCommand::Delete { .. } => WriteOperation::Deleted,
        }
    }
}

/// The kind of change a successful write applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOperation {
    Created,
    Updated,
    Deleted,
}

/// Outcome of a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResult {
    pub id: Uuid,
    pub operation: WriteOperation,
    pub applied_at: DateTime<Utc>,
}

impl WriteResult {
    /// Builds the result for `command` applied at `applied_at`.
    pub fn for_command(command: &WorkshopCommand, applied_at: DateTime<Utc>) -> Self {
        Self {
            id: command.workshop_id(),
            operation: command.operation(),
            applied_at,
        }
    }
}
