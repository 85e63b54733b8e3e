//! Demo workshops for development runs.

use chrono::{DateTime, Duration, DurationRound, Utc};

use workshops_core::workshop::Workshop;

/// Generates a handful of workshops starting from the day after `now`.
pub fn seed_workshops(now: DateTime<Utc>) -> Vec<Workshop> {
    let day = now
        .duration_trunc(Duration::days(1))
        .unwrap_or(now)
        + Duration::days(1);
    let slot = |offset_days: i64, hour: i64, hours: i64| {
        let start = day + Duration::days(offset_days) + Duration::hours(hour);
        (start, start + Duration::hours(hours))
    };

    let (s, e) = slot(0, 9, 3);
    let react_intro = Workshop::new("Intro to React", s, e, now)
        .with_description("Components, props and state from scratch")
        .with_location("Building A, Room 101")
        .with_capacity(25);

    let (s, e) = slot(2, 14, 2);
    let react_hooks = Workshop::new("React Hooks in Depth", s, e, now)
        .with_description("useEffect, custom hooks and common pitfalls")
        .online()
        .with_capacity(100);

    let (s, e) = slot(5, 10, 4);
    let react_testing = Workshop::new("Testing React Applications", s, e, now)
        .with_location("Building B, Lab 3")
        .with_capacity(15);

    let (s, e) = slot(1, 13, 3);
    let rust = Workshop::new("Rust for Backend Developers", s, e, now)
        .with_description("Ownership, async and building a small service")
        .with_location("Building A, Room 204")
        .with_capacity(20);

    let (s, e) = slot(3, 18, 1);
    let sql = Workshop::new("SQL Indexing Basics", s, e, now)
        .online()
        .with_capacity(60);

    vec![react_intro, react_hooks, react_testing, rust, sql]
}
