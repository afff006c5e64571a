//! Leaderboard projection: filter, then rank, then slice.
//!
//! Every consumer goes through these functions so the "your rank" display,
//! the leaderboard and the rank grid always see the same pool.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{numeric_stat, PlayerRecord, RankableStat, StatError, StatId};

use super::filter::{apply_filters, FilterConfig};
use super::rank::{PlayerRank, RankedEntry, Ranking};

/// `top_n(apply_filters(players, config), stat, n)`.
pub fn leaderboard<'a, I>(
    players: I,
    config: &FilterConfig,
    stat: RankableStat,
    n: usize,
) -> Vec<RankedEntry<'a>>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    FilteredPool::new(players, config).top_n(stat, n)
}

/// `rank_of(apply_filters(players, config), player, stat)`.
pub fn rank_within_filtered_pool<'a, I>(
    players: I,
    config: &FilterConfig,
    player: &PlayerRecord,
    stat: RankableStat,
) -> Option<PlayerRank>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    FilteredPool::new(players, config).rank_of(player, stat)
}

/// A pool computed once from a filter configuration.
#[derive(Debug, Clone)]
pub struct FilteredPool<'a> {
    players: Vec<&'a PlayerRecord>,
}

impl<'a> FilteredPool<'a> {
    pub fn new<I>(players: I, config: &FilterConfig) -> Self
    where
        I: IntoIterator<Item = &'a PlayerRecord>,
    {
        Self {
            players: apply_filters(players, config),
        }
    }

    pub fn players(&self) -> &[&'a PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, player: &PlayerRecord) -> bool {
        self.players.iter().any(|p| p.id == player.id)
    }

    pub fn ranking(&self, stat: RankableStat) -> Ranking<'a> {
        Ranking::new(&self.players, stat)
    }

    pub fn rank_of(&self, player: &PlayerRecord, stat: RankableStat) -> Option<PlayerRank> {
        self.ranking(stat).rank_of(player)
    }

    pub fn top_n(&self, stat: RankableStat, n: usize) -> Vec<RankedEntry<'a>> {
        self.ranking(stat).top(n).to_vec()
    }

    /// Ranks of every pool member for each of `stats`.
    pub fn rank_grid(&self, stats: &[RankableStat]) -> RankGrid<'a> {
        let rankings: Vec<Ranking<'a>> = stats.iter().map(|&stat| self.ranking(stat)).collect();

        let rows = self
            .players
            .iter()
            .map(|&player| GridRow {
                player,
                ranks: rankings
                    .iter()
                    .map(|ranking| ranking.rank_of(player).map(|r| r.rank))
                    .collect(),
            })
            .collect();

        RankGrid {
            stats: stats.to_vec(),
            rows,
        }
    }
}

/// One player's ranks, aligned with [`RankGrid::stats`].
#[derive(Debug, Clone)]
pub struct GridRow<'a> {
    pub player: &'a PlayerRecord,
    pub ranks: Vec<Option<u32>>,
}

/// Column the rank grid is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSortKey {
    Name,
    Value(StatId),
    Rank(StatId),
}

impl GridSortKey {
    /// Names A-Z, ranks best first, values highest first.
    pub fn default_direction(&self) -> SortDirection {
        match self {
            GridSortKey::Name | GridSortKey::Rank(_) => SortDirection::Asc,
            GridSortKey::Value(_) => SortDirection::Desc,
        }
    }
}

/// Accepts `name`, `rank:<stat>` or a bare stat id for its value.
impl FromStr for GridSortKey {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "name" {
            return Ok(GridSortKey::Name);
        }
        match s.strip_prefix("rank:") {
            Some(stat) => Ok(GridSortKey::Rank(stat.parse()?)),
            None => Ok(GridSortKey::Value(s.parse()?)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Per-stat ranks for every player of a pool.
#[derive(Debug, Clone)]
pub struct RankGrid<'a> {
    stats: Vec<RankableStat>,
    rows: Vec<GridRow<'a>>,
}

impl<'a> RankGrid<'a> {
    pub fn stats(&self) -> &[RankableStat] {
        &self.stats
    }

    pub fn rows(&self) -> &[GridRow<'a>] {
        &self.rows
    }

    pub fn has_column(&self, stat: StatId) -> bool {
        self.column(stat).is_some()
    }

    fn column(&self, stat: StatId) -> Option<usize> {
        self.stats.iter().position(|s| s.id() == stat)
    }

    /// Reorder rows. Players missing the sorted value go last in either
    /// direction; a rank column for a stat not in the grid leaves the order
    /// unchanged.
    pub fn sort_by(&mut self, key: GridSortKey, direction: SortDirection) {
        let apply = |ord: Ordering| match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };

        match key {
            GridSortKey::Name => self.rows.sort_by(|a, b| {
                apply(compare_names(a.player.full_name(), b.player.full_name()))
            }),
            GridSortKey::Value(stat) => self.rows.sort_by(|a, b| {
                missing_last(
                    numeric_stat(a.player, stat),
                    numeric_stat(b.player, stat),
                    |x, y| apply(x.total_cmp(&y)),
                )
            }),
            GridSortKey::Rank(stat) => {
                if let Some(col) = self.column(stat) {
                    self.rows.sort_by(|a, b| {
                        missing_last(a.ranks[col], b.ranks[col], |x, y| apply(x.cmp(&y)))
                    });
                }
            }
        }
    }
}

/// Case-insensitive, with the raw names breaking ties.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn missing_last<T: Copy>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
