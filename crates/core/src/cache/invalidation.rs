//! Invalidation targets for workshop writes.
//!
//! Search results are keyed by arbitrary term/filter combinations, so working
//! out exactly which searches a write affects is not feasible. Every write
//! therefore drops all cached searches, plus the written workshop's own key.

use crate::workshop::WorkshopCommand;

use super::keys::{search_pattern, workshop_key, CacheKey};

/// Cache entries a write may have made stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationTargets {
    /// Exact keys to remove.
    pub keys: Vec<CacheKey>,
    /// Glob patterns to remove.
    pub patterns: Vec<String>,
}

/// Computes the invalidation targets for a write command.
pub fn invalidation_targets(command: &WorkshopCommand) -> InvalidationTargets {
    InvalidationTargets {
        keys: vec![workshop_key(command.workshop_id())],
        patterns: vec![search_pattern()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::pattern_matches;
    use crate::search::{normalize, Attendance, SearchFilter, SearchQuery};
    use crate::workshop::Workshop;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn workshop() -> Workshop {
        let start = Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        Workshop::new("React", start, end, start)
    }

    #[test]
    fn test_every_command_targets_all_searches() {
        let w = workshop();
        let commands = [
            WorkshopCommand::Create(w.clone()),
            WorkshopCommand::Update {
                workshop: w.clone(),
                expected_updated_at: None,
            },
            WorkshopCommand::Delete { id: w.id },
        ];

        let unrelated = normalize(
            &SearchQuery::new("cooking").with_filter(SearchFilter::Mode(Attendance::Online)),
        );

        for command in &commands {
            let targets = invalidation_targets(command);
            assert_eq!(targets.keys, vec![workshop_key(w.id)]);
            assert!(targets
                .patterns
                .iter()
                .any(|p| pattern_matches(p, unrelated.as_str())));
        }
    }

    #[test]
    fn test_targets_do_not_cover_other_workshops() {
        let targets = invalidation_targets(&WorkshopCommand::Delete { id: Uuid::new_v4() });
        let other = workshop_key(Uuid::new_v4());

        assert!(!targets.keys.contains(&other));
        assert!(!targets
            .patterns
            .iter()
            .any(|p| pattern_matches(p, other.as_str())));
    }
}
