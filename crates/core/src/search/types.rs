use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::workshop::Workshop;

use super::normalize::normalize_text;

/// Whether a workshop is attended online or in person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Attendance {
    Online,
    InPerson,
}

impl Attendance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attendance::Online => "online",
            Attendance::InPerson => "in-person",
        }
    }
}

impl std::str::FromStr for Attendance {
    type Err = SearchQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" => Ok(Attendance::Online),
            "in-person" | "in_person" | "inperson" => Ok(Attendance::InPerson),
            other => Err(SearchQueryError::UnknownMode(other.to_string())),
        }
    }
}

/// A single search restriction. Filters on a query are AND-ed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFilter {
    /// Workshop starts at or after this instant.
    StartsFrom(DateTime<Utc>),
    /// Workshop starts strictly before this instant.
    StartsBefore(DateTime<Utc>),
    Mode(Attendance),
    /// Location contains this text (case and whitespace insensitive).
    Location(String),
}

impl SearchFilter {
    /// Returns true if the workshop satisfies this filter.
    pub fn matches(&self, workshop: &Workshop) -> bool {
        match self {
            SearchFilter::StartsFrom(from) => workshop.start_at >= *from,
            SearchFilter::StartsBefore(before) => workshop.start_at < *before,
            SearchFilter::Mode(Attendance::Online) => workshop.is_online,
            SearchFilter::Mode(Attendance::InPerson) => !workshop.is_online,
            SearchFilter::Location(location) => {
                let needle = normalize_text(location);
                needle.is_empty()
                    || workshop
                        .location
                        .as_deref()
                        .is_some_and(|l| normalize_text(l).contains(&needle))
            }
        }
    }
}

/// Errors for search queries the store cannot execute.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchQueryError {
    #[error("Invalid date range: 'from' ({from}) must be before 'to' ({before})")]
    InvalidDateRange {
        from: DateTime<Utc>,
        before: DateTime<Utc>,
    },
    #[error("Unknown attendance mode: {0}")]
    UnknownMode(String),
}

/// An immutable search request: free-text term plus filters.
///
/// Equality is structural on the raw fields. Two queries that differ only in
/// term casing, whitespace or filter order are different values but produce
/// the same cache key (see [`super::normalize`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchQuery {
    pub term: String,
    #[serde(default)]
    pub filters: Vec<SearchFilter>,
}

impl SearchQuery {
    /// Creates a query with the given term and no filters.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            filters: Vec::new(),
        }
    }

    /// A query matching every workshop.
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds a filter.
    pub fn with_filter(mut self, filter: SearchFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Checks that the filter combination can be executed.
    ///
    /// The latest `StartsFrom` must precede the earliest `StartsBefore`.
    pub fn validate(&self) -> Result<(), SearchQueryError> {
        let from = self
            .filters
            .iter()
            .filter_map(|f| match f {
                SearchFilter::StartsFrom(t) => Some(*t),
                _ => None,
            })
            .max();
        let before = self
            .filters
            .iter()
            .filter_map(|f| match f {
                SearchFilter::StartsBefore(t) => Some(*t),
                _ => None,
            })
            .min();

        match (from, before) {
            (Some(from), Some(before)) if from >= before => {
                Err(SearchQueryError::InvalidDateRange { from, before })
            }
            _ => Ok(()),
        }
    }

    /// Returns true if the workshop matches the term and every filter.
    ///
    /// An empty term matches everything. Otherwise the term must appear in
    /// the title, description or location.
    pub fn matches(&self, workshop: &Workshop) -> bool {
        let term = normalize_text(&self.term);
        let term_matches = term.is_empty()
            || [
                Some(workshop.title.as_str()),
                workshop.description.as_deref(),
                workshop.location.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| normalize_text(field).contains(&term));

        term_matches && self.filters.iter().all(|f| f.matches(workshop))
    }
}
