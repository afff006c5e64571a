//! Ranking engine.
//!
//! Orders a pool by one rankable stat, highest first, and assigns
//! competition ranks: tied values share a rank and the next distinct value
//! skips ahead by the size of the tie (`[10, 10, 8]` ranks as `[1, 1, 3]`).
//!
//! Players without a numeric value for the stat are left out of the
//! ordering entirely and do not count towards the pool size. Within a tie
//! the input order is kept.

use serde::Serialize;

use crate::models::{numeric_stat, PlayerRecord, RankableStat};

/// One row of an ordered pool.
#[derive(Debug, Clone, Copy)]
pub struct RankedEntry<'a> {
    pub player: &'a PlayerRecord,
    pub value: f64,
    pub rank: u32,
}

/// A player's position within a ranked pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerRank {
    pub rank: u32,
    /// Players with a value for the stat
    pub pool_size: usize,
}

impl PlayerRank {
    /// Rank as a percentage of the ranked pool (the "top X%" figure).
    pub fn percentile(&self) -> f64 {
        if self.pool_size == 0 {
            0.0
        } else {
            self.rank as f64 / self.pool_size as f64 * 100.0
        }
    }
}

/// The full ordering of a pool for one stat.
///
/// Rank lookups and top-N slices are both answered from the same ordering.
#[derive(Debug, Clone)]
pub struct Ranking<'a> {
    stat: RankableStat,
    entries: Vec<RankedEntry<'a>>,
}

impl<'a> Ranking<'a> {
    pub fn new(pool: &[&'a PlayerRecord], stat: RankableStat) -> Self {
        let mut scored: Vec<(&'a PlayerRecord, f64)> = pool
            .iter()
            .filter_map(|&player| numeric_stat(player, stat.id()).map(|value| (player, value)))
            .collect();

        // sort_by is stable, so tied players keep pool order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut entries: Vec<RankedEntry<'a>> = Vec::with_capacity(scored.len());
        for (position, (player, value)) in scored.into_iter().enumerate() {
            let rank = match entries.last() {
                Some(prev) if prev.value == value => prev.rank,
                _ => position as u32 + 1,
            };
            entries.push(RankedEntry {
                player,
                value,
                rank,
            });
        }

        Self { stat, entries }
    }

    pub fn stat(&self) -> RankableStat {
        self.stat
    }

    pub fn entries(&self) -> &[RankedEntry<'a>] {
        &self.entries
    }

    pub fn pool_size(&self) -> usize {
        self.entries.len()
    }

    pub fn rank_of(&self, player: &PlayerRecord) -> Option<PlayerRank> {
        self.entries
            .iter()
            .find(|entry| entry.player.id == player.id)
            .map(|entry| PlayerRank {
                rank: entry.rank,
                pool_size: self.entries.len(),
            })
    }

    /// The first `n` entries; fewer when fewer players have a value.
    pub fn top(&self, n: usize) -> &[RankedEntry<'a>] {
        &self.entries[..n.min(self.entries.len())]
    }
}

/// Rank of `player` within `pool` for `stat`, or `None` if the player is not
/// in the pool or has no value.
pub fn rank_of(
    pool: &[&PlayerRecord],
    player: &PlayerRecord,
    stat: RankableStat,
) -> Option<PlayerRank> {
    Ranking::new(pool, stat).rank_of(player)
}

/// The first `n` entries of the ordering of `pool` by `stat`.
pub fn top_n<'a>(pool: &[&'a PlayerRecord], stat: RankableStat, n: usize) -> Vec<RankedEntry<'a>> {
    Ranking::new(pool, stat).top(n).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::player;
    use crate::models::{PlayerRecord, StatEntry, StatId, StatValue};
    use pretty_assertions::assert_eq;

    fn stat(id: StatId) -> RankableStat {
        RankableStat::try_from(id).unwrap()
    }

    fn pool_of(values: &[f64]) -> Vec<PlayerRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| player(&format!("p{}", i + 1), &format!("Player {}", i + 1), &[("events", *v)]))
            .collect()
    }

    #[test]
    fn test_competition_ranking_gaps() {
        let players = pool_of(&[10.0, 10.0, 8.0, 8.0, 8.0, 5.0]);
        let pool: Vec<&PlayerRecord> = players.iter().collect();

        let ranking = Ranking::new(&pool, stat(StatId::Events));
        let ranks: Vec<u32> = ranking.entries().iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3, 3, 3, 6]);
    }

    #[test]
    fn test_ranking_is_descending_regardless_of_input_order() {
        let players = pool_of(&[8.0, 5.0, 10.0, 8.0, 10.0, 8.0]);
        let pool: Vec<&PlayerRecord> = players.iter().collect();

        let entries = top_n(&pool, stat(StatId::Events), pool.len());
        let ranked: Vec<(&str, u32)> = entries
            .iter()
            .map(|e| (e.player.id.as_str(), e.rank))
            .collect();
        // Ties keep input order
        assert_eq!(
            ranked,
            vec![
                ("p3", 1),
                ("p5", 1),
                ("p1", 3),
                ("p4", 3),
                ("p6", 3),
                ("p2", 6),
            ]
        );
    }

    #[test]
    fn test_leaderboard_scenario() {
        let players = vec![
            player("P1", "One", &[("overall_win_pct", 75.0)]),
            player("P2", "Two", &[("overall_win_pct", 60.0)]),
            player("P3", "Three", &[("overall_win_pct", 60.0)]),
            player("P4", "Four", &[("overall_win_pct", 40.0)]),
            player("P5", "Five", &[]),
        ];
        let pool: Vec<&PlayerRecord> = players.iter().collect();
        let win_pct = stat(StatId::OverallWinPct);

        let top: Vec<(&str, f64, u32)> = top_n(&pool, win_pct, 3)
            .iter()
            .map(|e| (e.player.id.as_str(), e.value, e.rank))
            .collect();
        assert_eq!(top, vec![("P1", 75.0, 1), ("P2", 60.0, 2), ("P3", 60.0, 2)]);

        assert_eq!(
            rank_of(&pool, &players[3], win_pct),
            Some(PlayerRank {
                rank: 4,
                pool_size: 4
            })
        );
        assert_eq!(rank_of(&pool, &players[4], win_pct), None);
    }

    #[test]
    fn test_top_n_returns_all_when_pool_is_small() {
        let players = pool_of(&[3.0, 1.0]);
        let pool: Vec<&PlayerRecord> = players.iter().collect();
        assert_eq!(top_n(&pool, stat(StatId::Events), 10).len(), 2);
        assert!(top_n(&pool, stat(StatId::Events), 0).is_empty());
    }

    #[test]
    fn test_top_n_boundary_keeps_computed_ranks() {
        let players = pool_of(&[9.0, 7.0, 7.0, 7.0]);
        let pool: Vec<&PlayerRecord> = players.iter().collect();
        let ranks: Vec<u32> = top_n(&pool, stat(StatId::Events), 3)
            .iter()
            .map(|e| e.rank)
            .collect();
        assert_eq!(ranks, vec![1, 2, 2]);
    }

    #[test]
    fn test_absent_values_excluded_from_pool_size() {
        let mut players = pool_of(&[4.0, 2.0]);
        players.push(player("none", "No Value", &[("drafts", 3.0)]));
        let pool: Vec<&PlayerRecord> = players.iter().collect();

        let ranking = Ranking::new(&pool, stat(StatId::Events));
        assert_eq!(ranking.pool_size(), 2);
        assert!(ranking.entries().iter().all(|e| e.player.id != "none"));
        assert_eq!(ranking.rank_of(&players[2]), None);
    }

    #[test]
    fn test_textual_values_are_not_ranked() {
        let mut odd = player("odd", "Odd", &[]);
        odd.stats.insert(
            "events".to_string(),
            StatEntry::new(StatValue::Text("n/a".to_string())),
        );
        let players = vec![player("a", "A", &[("events", 1.0)]), odd];
        let pool: Vec<&PlayerRecord> = players.iter().collect();

        assert_eq!(Ranking::new(&pool, stat(StatId::Events)).pool_size(), 1);
    }

    #[test]
    fn test_rank_of_player_outside_pool() {
        let players = pool_of(&[4.0, 2.0]);
        let outsider = player("zz", "Outsider", &[("events", 100.0)]);
        let pool: Vec<&PlayerRecord> = players.iter().collect();
        assert_eq!(rank_of(&pool, &outsider, stat(StatId::Events)), None);
    }

    #[test]
    fn test_rank_monotonicity() {
        let players = pool_of(&[3.0, 9.0, 3.0, 1.0, 7.5, 9.0, 0.0]);
        let pool: Vec<&PlayerRecord> = players.iter().collect();
        let events = stat(StatId::Events);

        for a in &players {
            for b in &players {
                let ra = rank_of(&pool, a, events).unwrap().rank;
                let rb = rank_of(&pool, b, events).unwrap().rank;
                let va = numeric_stat(a, StatId::Events).unwrap();
                let vb = numeric_stat(b, StatId::Events).unwrap();
                if va > vb {
                    assert!(ra < rb);
                } else if va == vb {
                    assert_eq!(ra, rb);
                }
            }
        }
    }

    #[test]
    fn test_rank_one_matches_head_of_top_n() {
        let players = pool_of(&[6.0, 2.0, 6.0, 4.0]);
        let pool: Vec<&PlayerRecord> = players.iter().collect();
        let events = stat(StatId::Events);

        let ranking = Ranking::new(&pool, events);
        let top = top_n(&pool, events, ranking.pool_size());

        let rank_one: Vec<&str> = players
            .iter()
            .filter(|p| rank_of(&pool, p, events).map(|r| r.rank) == Some(1))
            .map(|p| p.id.as_str())
            .collect();
        let head: Vec<&str> = top
            .iter()
            .take_while(|e| e.rank == 1)
            .map(|e| e.player.id.as_str())
            .collect();
        assert_eq!(rank_one, head);
        assert_eq!(head, vec!["p1", "p3"]);
    }

    #[test]
    fn test_empty_pool() {
        let pool: Vec<&PlayerRecord> = Vec::new();
        let ranking = Ranking::new(&pool, stat(StatId::Events));
        assert_eq!(ranking.pool_size(), 0);
        assert!(ranking.top(10).is_empty());
    }

    #[test]
    fn test_entries_are_copied_out_of_the_ranking() {
        let players = pool_of(&[3.0, 7.0]);
        let pool: Vec<&PlayerRecord> = players.iter().collect();
        let ranking = Ranking::new(&pool, stat(StatId::Events));

        let head = ranking.entries()[0];
        let top = top_n(&pool, stat(StatId::Events), 1);
        assert_eq!(top.len(), 1);
        assert_eq!(
            (top[0].player.id.as_str(), top[0].value, top[0].rank),
            (head.player.id.as_str(), head.value, head.rank)
        );
        assert_eq!((head.player.id.as_str(), head.value, head.rank), ("p2", 7.0, 1));
    }

    #[test]
    fn test_percentile_uses_shared_rank() {
        // [10, 10, 8, 5]: both leaders are "top 25%"
        let players = pool_of(&[10.0, 10.0, 8.0, 5.0]);
        let pool: Vec<&PlayerRecord> = players.iter().collect();
        let ranking = Ranking::new(&pool, stat(StatId::Events));

        let second = ranking.rank_of(&players[1]).unwrap();
        assert_eq!(second.rank, 1);
        assert!((second.percentile() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentile() {
        let r = PlayerRank {
            rank: 5,
            pool_size: 20,
        };
        assert!((r.percentile() - 25.0).abs() < 1e-9);
        assert_eq!(
            PlayerRank {
                rank: 1,
                pool_size: 0
            }
            .percentile(),
            0.0
        );
    }
}
