//! Player record model.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EventRecord, PlayerId, StatValue};

/// Identity and eligibility markers for a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: String,

    /// Qualified for the current special event
    #[serde(default)]
    pub ecl_qualification: bool,
}

/// One stat slot as stored in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    #[serde(default)]
    pub value: Option<StatValue>,
}

impl StatEntry {
    pub fn new(value: StatValue) -> Self {
        Self { value: Some(value) }
    }
}

/// Player payload keyed by id in the dataset document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    pub player_info: PlayerInfo,

    #[serde(default)]
    pub stats: BTreeMap<String, StatEntry>,

    #[serde(default)]
    pub events: BTreeMap<String, EventRecord>,
}

/// A tournament-series participant.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub info: PlayerInfo,
    pub stats: BTreeMap<String, StatEntry>,
    pub events: BTreeMap<String, EventRecord>,
}

impl PlayerRecord {
    pub fn new(id: PlayerId, data: PlayerData) -> Self {
        Self {
            id,
            info: data.player_info,
            stats: data.stats,
            events: data.events,
        }
    }

    pub fn full_name(&self) -> &str {
        &self.info.full_name
    }

    pub fn is_qualified(&self) -> bool {
        self.info.ecl_qualification
    }

    /// Events, most recent first, then events with an unparsed date.
    /// Same-day events keep key order.
    pub fn events_by_date(&self) -> Vec<&EventRecord> {
        let mut events: Vec<&EventRecord> = self.events.values().collect();
        events.sort_by(|a, b| b.date.date().cmp(&a.date.date()));
        events
    }

    /// Distinct formats the player has an event in.
    pub fn formats(&self) -> BTreeSet<&str> {
        self.events.values().map(|e| e.format.as_str()).collect()
    }

    /// Parsed event dates; unparsed ones are skipped.
    pub fn event_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.events.values().filter_map(|e| e.date.date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{event, player};

    #[test]
    fn test_player_data_parses() {
        let json = r#"{
            "player_info": {"first_name": "Ana", "last_name": "Ruiz", "full_name": "Ana Ruiz", "ecl_qualification": true},
            "stats": {
                "events": {"value": 7, "rank": 3},
                "overall_record": {"value": "40-20-2"},
                "day3_win_pct": {"value": null}
            },
            "events": {}
        }"#;
        let data: PlayerData = serde_json::from_str(json).unwrap();
        let p = PlayerRecord::new("42".into(), data);

        assert_eq!(p.full_name(), "Ana Ruiz");
        assert!(p.is_qualified());
        assert_eq!(p.stats["events"].value, Some(StatValue::Number(7.0)));
        assert_eq!(
            p.stats["overall_record"].value,
            Some(StatValue::Text("40-20-2".into()))
        );
        assert_eq!(p.stats["day3_win_pct"].value, None);
    }

    #[test]
    fn test_qualification_defaults_to_false() {
        let json = r#"{"player_info": {"full_name": "No Flag"}}"#;
        let data: PlayerData = serde_json::from_str(json).unwrap();
        assert!(!data.player_info.ecl_qualification);
        assert!(data.stats.is_empty());
        assert!(data.events.is_empty());
    }

    #[test]
    fn test_events_by_date_most_recent_first() {
        let mut p = player("p1", "Alice", &[]);
        p.events.insert("a".into(), event("E1", "2024-01-10", "Modern"));
        p.events.insert("b".into(), event("E2", "2025-03-01", "Standard"));
        p.events.insert("c".into(), event("E3", "2024-07-20", "Modern"));

        let codes: Vec<&str> = p
            .events_by_date()
            .iter()
            .map(|e| e.event_code.as_str())
            .collect();
        assert_eq!(codes, vec!["E2", "E3", "E1"]);
        assert_eq!(
            p.formats().into_iter().collect::<Vec<_>>(),
            vec!["Modern", "Standard"]
        );
    }
}
