//! API request types for workshop writes.
//!
//! Timestamps are never taken from the wall clock here: callers pass the
//! per-request `now` so that every record written by one request carries the
//! same, request-scoped time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{Workshop, WorkshopCommand, DEFAULT_CAPACITY};

/// Request payload for creating a workshop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkshopRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

impl CreateWorkshopRequest {
    /// Converts into a new workshop with a fresh ID, stamped with `now`.
    pub fn into_workshop(self, now: DateTime<Utc>) -> Workshop {
        Workshop {
            id: Uuid::new_v4(),
            title: self.title,
            description: blank_to_none(self.description),
            start_at: self.start_at,
            end_at: self.end_at,
            is_online: self.is_online,
            location: blank_to_none(self.location),
            capacity: self.capacity.unwrap_or(DEFAULT_CAPACITY),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request payload for replacing a workshop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWorkshopRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// The `updated_at` the client last saw; enables conflict detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_updated_at: Option<DateTime<Utc>>,
}

impl UpdateWorkshopRequest {
    /// Converts into an update command for workshop `id`, stamped with `now`.
    ///
    /// `created_at` is set to `now` as well; storage backends keep the
    /// originally stored creation time.
    pub fn into_command(self, id: Uuid, now: DateTime<Utc>) -> WorkshopCommand {
        WorkshopCommand::Update {
            workshop: Workshop {
                id,
                title: self.title,
                description: blank_to_none(self.description),
                start_at: self.start_at,
                end_at: self.end_at,
                is_online: self.is_online,
                location: blank_to_none(self.location),
                capacity: self.capacity.unwrap_or(DEFAULT_CAPACITY),
                created_at: now,
                updated_at: now,
            },
            expected_updated_at: self.expected_updated_at,
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
