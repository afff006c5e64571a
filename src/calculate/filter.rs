//! Filter engine.
//!
//! A [`FilterConfig`] expands into a list of independent [`Predicate`]s. A
//! player stays in the pool only if every predicate holds.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{numeric_stat, PlayerRecord, StatId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid filter: {0}")]
    Invalid(String),
}

/// Parse a `YYYY-MM-DD` filter date.
pub fn parse_date(s: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| FilterError::InvalidDate(s.to_string()))
}

/// Caller-supplied pool restrictions. Every field is optional; the default
/// value matches every player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub min_events: Option<u32>,
    pub max_events: Option<u32>,
    pub min_day2s: Option<u32>,
    pub min_top8s: Option<u32>,

    /// At least one top 8 finish
    pub has_top8: bool,

    /// Only players qualified for the current special event
    pub qualified_only: bool,

    /// Player has an event in any of these formats. Empty means any format.
    pub formats: BTreeSet<String>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterConfig {
    /// Pool of qualified players only.
    pub fn qualified() -> Self {
        Self {
            qualified_only: true,
            ..Default::default()
        }
    }

    /// Builder method to add a format to the format set.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.formats.insert(format.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    /// Reject an event-count range that can never match anyone.
    ///
    /// Date bounds are checked independently of each other, so a start
    /// after the end is still a satisfiable filter.
    pub fn validate(&self) -> Result<(), FilterError> {
        if let (Some(min), Some(max)) = (self.min_events, self.max_events) {
            if min > max {
                return Err(FilterError::Invalid(format!(
                    "min_events ({}) is greater than max_events ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }

    /// Expand into the active predicates, one per constrained category.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(min) = self.min_events {
            predicates.push(Predicate::StatAtLeast(StatId::Events, min as f64));
        }
        if let Some(min) = self.min_day2s {
            predicates.push(Predicate::StatAtLeast(StatId::Day2s, min as f64));
        }
        if let Some(max) = self.max_events {
            predicates.push(Predicate::StatAtMost(StatId::Events, max as f64));
        }
        if let Some(min) = self.min_top8s {
            predicates.push(Predicate::StatAtLeast(StatId::Top8s, min as f64));
        }
        if self.has_top8 {
            predicates.push(Predicate::StatPositive(StatId::Top8s));
        }
        if self.qualified_only {
            predicates.push(Predicate::Qualified);
        }
        if !self.formats.is_empty() {
            predicates.push(Predicate::AnyFormat(self.formats.clone()));
        }
        if let Some(start) = self.start_date {
            predicates.push(Predicate::EventOnOrAfter(start));
        }
        if let Some(end) = self.end_date {
            predicates.push(Predicate::EventOnOrBefore(end));
        }

        predicates
    }
}

/// A single pool restriction.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Numeric stat value >= bound
    StatAtLeast(StatId, f64),
    /// Numeric stat value <= bound
    StatAtMost(StatId, f64),
    /// Numeric stat value > 0
    StatPositive(StatId),
    Qualified,
    /// At least one event in one of the formats
    AnyFormat(BTreeSet<String>),
    /// At least one event dated on or after the date
    EventOnOrAfter(NaiveDate),
    /// At least one event dated on or before the date
    EventOnOrBefore(NaiveDate),
}

impl Predicate {
    /// Stat predicates never hold for a player without a numeric value.
    pub fn matches(&self, player: &PlayerRecord) -> bool {
        match self {
            Predicate::StatAtLeast(stat, min) => {
                numeric_stat(player, *stat).is_some_and(|v| v >= *min)
            }
            Predicate::StatAtMost(stat, max) => {
                numeric_stat(player, *stat).is_some_and(|v| v <= *max)
            }
            Predicate::StatPositive(stat) => numeric_stat(player, *stat).is_some_and(|v| v > 0.0),
            Predicate::Qualified => player.is_qualified(),
            Predicate::AnyFormat(formats) => player
                .events
                .values()
                .any(|e| formats.contains(&e.format)),
            Predicate::EventOnOrAfter(start) => player.event_dates().any(|d| d >= *start),
            Predicate::EventOnOrBefore(end) => player.event_dates().any(|d| d <= *end),
        }
    }
}

/// Keep the players that satisfy every predicate, in input order.
pub fn apply_predicates<'a, I>(players: I, predicates: &[Predicate]) -> Vec<&'a PlayerRecord>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    players
        .into_iter()
        .filter(|player| predicates.iter().all(|p| p.matches(player)))
        .collect()
}

/// Narrow `players` to the pool described by `config`.
pub fn apply_filters<'a, I>(players: I, config: &FilterConfig) -> Vec<&'a PlayerRecord>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    apply_predicates(players, &config.predicates())
}
