//! JSON dataset reader.
//!
//! Expected shape: `{ "players": { "<id>": { "player_info": .., "stats": ..,
//! "events": .. } } }`. Players keep the order they have in the document.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::StorageError;
use crate::dataset::Dataset;
use crate::models::{DatasetVersion, PlayerData, PlayerRecord};

/// Player entries in document order.
struct PlayerEntries(Vec<(String, PlayerData)>);

impl<'de> Deserialize<'de> for PlayerEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = PlayerEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of player id to player data")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, data)) = map.next_entry::<String, PlayerData>()? {
                    entries.push((id, data));
                }
                Ok(PlayerEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[derive(Deserialize)]
struct RawDataset {
    players: PlayerEntries,
}

/// Parse a dataset document.
pub fn parse_dataset(bytes: &[u8]) -> Result<Dataset, StorageError> {
    let version = DatasetVersion::from_bytes(bytes);
    let raw: RawDataset = serde_json::from_slice(bytes)?;

    let players: Vec<PlayerRecord> = raw
        .players
        .0
        .into_iter()
        .map(|(id, data)| {
            if data.player_info.full_name.trim().is_empty() {
                warn!("Player {} has an empty full_name", id);
            }
            for (key, event) in &data.events {
                if !event.date.is_valid() {
                    warn!(
                        "Player {} event {} has an unparseable date {:?}",
                        id,
                        key,
                        event.date.as_str()
                    );
                }
            }
            PlayerRecord::new(id.into(), data)
        })
        .collect();

    debug!("Parsed {} player records", players.len());
    Dataset::new(players, version)
}

/// Reader for the dataset file.
pub struct DatasetReader {
    path: PathBuf,
}

impl DatasetReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read and parse the whole dataset.
    pub fn read(&self) -> Result<Dataset, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }

        let bytes = fs::read(&self.path)?;
        let dataset = parse_dataset(&bytes)?;

        info!(
            "Loaded {} players from {:?} (version {})",
            dataset.len(),
            self.path,
            dataset.version()
        );
        Ok(dataset)
    }
}
