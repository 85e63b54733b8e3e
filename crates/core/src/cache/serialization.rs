//! Pure functions for converting cached values to and from bytes.
//!
//! Values are stored as JSON so cache contents stay human-readable.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Encodes a value for storage in the cache.
pub fn to_cache_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, SerializationError> {
    serde_json::to_vec(value).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Decodes a value read from the cache.
pub fn from_cache_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workshop::Workshop;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_workshop_list_survives_cache() {
        let start = Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let workshops = vec![
            Workshop::new("React", start, end, start).with_location("Room 1"),
            Workshop::new("Rust", start, end, start).online(),
        ];

        let bytes = to_cache_bytes(&workshops).unwrap();
        let decoded: Vec<Workshop> = from_cache_bytes(&bytes).unwrap();

        assert_eq!(decoded, workshops);
    }

    #[test]
    fn test_corrupt_bytes_fail_to_decode() {
        let result: Result<Vec<Workshop>, _> = from_cache_bytes(b"{not json");
        assert!(matches!(result, Err(SerializationError::DeserializeFailed(_))));
    }

    #[test]
    fn test_wrong_shape_fails_to_decode() {
        let result: Result<Vec<Workshop>, _> = from_cache_bytes(br#"{"id": 1}"#);
        assert!(result.is_err());
    }
}
