//! Read-only view over the loaded player collection.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::models::{DatasetVersion, EventDate, EventRecord, PlayerId, PlayerRecord};
use crate::storage::StorageError;

/// The immutable player collection.
#[derive(Debug, Clone)]
pub struct Dataset {
    players: Vec<PlayerRecord>,
    index: HashMap<PlayerId, usize>,
    version: DatasetVersion,
}

/// One player's result at an event.
#[derive(Debug, Clone, Serialize)]
pub struct EventResult<'a> {
    pub player_id: &'a PlayerId,
    pub player_name: &'a str,
    pub finish: u32,
    pub event: &'a EventRecord,
}

/// All recorded results for one event code.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetails<'a> {
    pub event_code: &'a str,
    pub format: &'a str,
    pub date: &'a EventDate,
    pub total_players: usize,
    pub results: Vec<EventResult<'a>>,
}

impl Dataset {
    /// Build the collection, keeping `players` order.
    pub fn new(players: Vec<PlayerRecord>, version: DatasetVersion) -> Result<Self, StorageError> {
        let mut index = HashMap::with_capacity(players.len());
        for (i, player) in players.iter().enumerate() {
            if index.insert(player.id.clone(), i).is_some() {
                return Err(StorageError::DuplicatePlayer(player.id.to_string()));
            }
        }

        Ok(Self {
            players,
            index,
            version,
        })
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn get(&self, id: &str) -> Option<&PlayerRecord> {
        self.index
            .get(&PlayerId::from(id))
            .map(|&i| &self.players[i])
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn version(&self) -> &DatasetVersion {
        &self.version
    }

    /// Case-insensitive substring match on full name. An empty term matches
    /// nobody.
    pub fn search(&self, term: &str) -> Vec<&PlayerRecord> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }

        self.players
            .iter()
            .filter(|p| p.full_name().to_lowercase().contains(&term))
            .collect()
    }

    /// Every event format present in the dataset, sorted.
    pub fn formats(&self) -> BTreeSet<&str> {
        self.players.iter().flat_map(|p| p.formats()).collect()
    }

    /// Every distinct event code, sorted.
    pub fn event_codes(&self) -> BTreeSet<&str> {
        self.players
            .iter()
            .flat_map(|p| p.events.values().map(|e| e.event_code.as_str()))
            .collect()
    }

    /// Results for an event code, matched case-insensitively, best finish
    /// first. Entries without a finish (missing or 0) are skipped; `None`
    /// when nothing remains.
    pub fn event_results(&self, code: &str) -> Option<EventDetails<'_>> {
        let mut header: Option<&EventRecord> = None;
        let mut results = Vec::new();

        for player in &self.players {
            for entry in player.events.values() {
                if !entry.event_code.eq_ignore_ascii_case(code) {
                    continue;
                }
                header.get_or_insert(entry);

                if let Some(finish) = entry.finish.filter(|&f| f > 0) {
                    results.push(EventResult {
                        player_id: &player.id,
                        player_name: player.full_name(),
                        finish,
                        event: entry,
                    });
                }
            }
        }

        if results.is_empty() {
            return None;
        }
        let header = header?;
        results.sort_by_key(|r| r.finish);

        Some(EventDetails {
            event_code: &header.event_code,
            format: &header.format,
            date: &header.date,
            total_players: results.len(),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{event, player, with_event};
    use pretty_assertions::assert_eq;

    fn sample() -> Dataset {
        let players = vec![
            with_event(
                player("1", "Reid Duke", &[("events", 30.0)]),
                "a",
                event("PTMKM", "2024-02-23", "Standard").with_finish(9),
            ),
            with_event(
                with_event(
                    player("2", "Karina Dukes", &[("events", 4.0)]),
                    "a",
                    event("ptmkm", "2024-02-23", "Standard").with_finish(2),
                ),
                "b",
                event("PTOTJ", "2024-04-26", "Pioneer"),
            ),
            with_event(
                player("3", "Sam Black", &[]),
                "a",
                event("PTMKM", "2024-02-23", "Standard"),
            ),
        ];
        Dataset::new(players, DatasetVersion::from_bytes(b"sample")).unwrap()
    }

    #[test]
    fn test_get_by_id() {
        let ds = sample();
        assert_eq!(ds.get("2").unwrap().full_name(), "Karina Dukes");
        assert!(ds.get("99").is_none());
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let players = vec![player("1", "A", &[]), player("1", "B", &[])];
        assert!(matches!(
            Dataset::new(players, DatasetVersion::from_bytes(b"x")),
            Err(StorageError::DuplicatePlayer(_))
        ));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let ds = sample();
        let names: Vec<&str> = ds.search("DUKE").iter().map(|p| p.full_name()).collect();
        assert_eq!(names, vec!["Reid Duke", "Karina Dukes"]);
        assert!(ds.search("").is_empty());
        assert!(ds.search("   ").is_empty());
        assert!(ds.search("nobody").is_empty());
    }

    #[test]
    fn test_formats_and_codes() {
        let ds = sample();
        assert_eq!(
            ds.formats().into_iter().collect::<Vec<_>>(),
            vec!["Pioneer", "Standard"]
        );
        assert_eq!(
            ds.event_codes().into_iter().collect::<Vec<_>>(),
            vec!["PTMKM", "PTOTJ", "ptmkm"]
        );
    }

    #[test]
    fn test_event_results_sorted_by_finish() {
        let ds = sample();
        let details = ds.event_results("PtMkM").unwrap();

        assert_eq!(details.event_code, "PTMKM");
        assert_eq!(details.format, "Standard");
        assert_eq!(details.total_players, 2);
        let finishes: Vec<(&str, u32)> = details
            .results
            .iter()
            .map(|r| (r.player_name, r.finish))
            .collect();
        assert_eq!(finishes, vec![("Karina Dukes", 2), ("Reid Duke", 9)]);
    }

    #[test]
    fn test_event_results_skip_zero_finish() {
        let players = vec![with_event(
            player("1", "Reid Duke", &[]),
            "a",
            event("RCQ7", "2024-06-01", "Modern").with_finish(0),
        )];
        let ds = Dataset::new(players, DatasetVersion::from_bytes(b"zero")).unwrap();
        assert!(ds.event_results("RCQ7").is_none());
    }

    #[test]
    fn test_event_results_without_finishes() {
        let ds = sample();
        assert!(ds.event_results("PTOTJ").is_none());
        assert!(ds.event_results("NOPE").is_none());
    }
}
