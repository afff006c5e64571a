//! Stat catalogue, typed stat values and the rankable allow-list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::PlayerRecord;

/// Errors raised when resolving stat identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatError {
    #[error("Unknown stat: {0}")]
    Unknown(String),

    #[error("Stat is not rankable: {0}")]
    NotRankable(StatId),
}

/// Every statistic a player record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatId {
    Events,
    Day2s,
    InContentions,
    Top8s,
    OverallWins,
    OverallLosses,
    OverallDraws,
    OverallWinPct,
    LimitedWins,
    LimitedLosses,
    LimitedDraws,
    LimitedWinPct,
    ConstructedWins,
    ConstructedLosses,
    ConstructedDraws,
    ConstructedWinPct,
    Day1Wins,
    Day1Losses,
    Day1Draws,
    Day1WinPct,
    Day2Wins,
    Day2Losses,
    Day2Draws,
    Day2WinPct,
    Day3Wins,
    Day3Losses,
    Day3Draws,
    Day3WinPct,
    Drafts,
    WinningDrafts,
    LosingDrafts,
    WinningDraftsPct,
    TrophyDrafts,
    #[serde(rename = "5streaks")]
    FiveStreaks,
    OverallRecord,
    LimitedRecord,
    ConstructedRecord,
    Top8Record,
}

/// How a stat's values are shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Count,
    Percentage,
    /// Formatted win-loss-draw string.
    Record,
}

/// Stats eligible for ranking, in display order.
pub const RANKABLE_STATS: [StatId; 17] = [
    StatId::Events,
    StatId::Day2s,
    StatId::InContentions,
    StatId::Top8s,
    StatId::OverallWins,
    StatId::OverallWinPct,
    StatId::LimitedWins,
    StatId::LimitedWinPct,
    StatId::ConstructedWins,
    StatId::ConstructedWinPct,
    StatId::Day1WinPct,
    StatId::Day2WinPct,
    StatId::Day3WinPct,
    StatId::Drafts,
    StatId::WinningDraftsPct,
    StatId::TrophyDrafts,
    StatId::FiveStreaks,
];

/// Columns of the qualified-players rank grid.
pub const GRID_STATS: [StatId; 14] = [
    StatId::Events,
    StatId::InContentions,
    StatId::OverallWinPct,
    StatId::ConstructedWinPct,
    StatId::Day2WinPct,
    StatId::Day2s,
    StatId::Top8s,
    StatId::LimitedWinPct,
    StatId::Day1WinPct,
    StatId::Day3WinPct,
    StatId::Drafts,
    StatId::WinningDraftsPct,
    StatId::TrophyDrafts,
    StatId::FiveStreaks,
];

impl StatId {
    pub const ALL: [StatId; 38] = [
        StatId::Events,
        StatId::Day2s,
        StatId::InContentions,
        StatId::Top8s,
        StatId::OverallWins,
        StatId::OverallLosses,
        StatId::OverallDraws,
        StatId::OverallWinPct,
        StatId::LimitedWins,
        StatId::LimitedLosses,
        StatId::LimitedDraws,
        StatId::LimitedWinPct,
        StatId::ConstructedWins,
        StatId::ConstructedLosses,
        StatId::ConstructedDraws,
        StatId::ConstructedWinPct,
        StatId::Day1Wins,
        StatId::Day1Losses,
        StatId::Day1Draws,
        StatId::Day1WinPct,
        StatId::Day2Wins,
        StatId::Day2Losses,
        StatId::Day2Draws,
        StatId::Day2WinPct,
        StatId::Day3Wins,
        StatId::Day3Losses,
        StatId::Day3Draws,
        StatId::Day3WinPct,
        StatId::Drafts,
        StatId::WinningDrafts,
        StatId::LosingDrafts,
        StatId::WinningDraftsPct,
        StatId::TrophyDrafts,
        StatId::FiveStreaks,
        StatId::OverallRecord,
        StatId::LimitedRecord,
        StatId::ConstructedRecord,
        StatId::Top8Record,
    ];

    /// Key used for this stat in the dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatId::Events => "events",
            StatId::Day2s => "day2s",
            StatId::InContentions => "in_contentions",
            StatId::Top8s => "top8s",
            StatId::OverallWins => "overall_wins",
            StatId::OverallLosses => "overall_losses",
            StatId::OverallDraws => "overall_draws",
            StatId::OverallWinPct => "overall_win_pct",
            StatId::LimitedWins => "limited_wins",
            StatId::LimitedLosses => "limited_losses",
            StatId::LimitedDraws => "limited_draws",
            StatId::LimitedWinPct => "limited_win_pct",
            StatId::ConstructedWins => "constructed_wins",
            StatId::ConstructedLosses => "constructed_losses",
            StatId::ConstructedDraws => "constructed_draws",
            StatId::ConstructedWinPct => "constructed_win_pct",
            StatId::Day1Wins => "day1_wins",
            StatId::Day1Losses => "day1_losses",
            StatId::Day1Draws => "day1_draws",
            StatId::Day1WinPct => "day1_win_pct",
            StatId::Day2Wins => "day2_wins",
            StatId::Day2Losses => "day2_losses",
            StatId::Day2Draws => "day2_draws",
            StatId::Day2WinPct => "day2_win_pct",
            StatId::Day3Wins => "day3_wins",
            StatId::Day3Losses => "day3_losses",
            StatId::Day3Draws => "day3_draws",
            StatId::Day3WinPct => "day3_win_pct",
            StatId::Drafts => "drafts",
            StatId::WinningDrafts => "winning_drafts",
            StatId::LosingDrafts => "losing_drafts",
            StatId::WinningDraftsPct => "winning_drafts_pct",
            StatId::TrophyDrafts => "trophy_drafts",
            StatId::FiveStreaks => "5streaks",
            StatId::OverallRecord => "overall_record",
            StatId::LimitedRecord => "limited_record",
            StatId::ConstructedRecord => "constructed_record",
            StatId::Top8Record => "top8_record",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            StatId::Events => "Total Events",
            StatId::Day2s => "Day 2s",
            StatId::InContentions => "In Contentions",
            StatId::Top8s => "Top 8s",
            StatId::OverallWins => "Overall Wins",
            StatId::OverallLosses => "Overall Losses",
            StatId::OverallDraws => "Overall Draws",
            StatId::OverallWinPct => "Overall Win %",
            StatId::LimitedWins => "Limited Wins",
            StatId::LimitedLosses => "Limited Losses",
            StatId::LimitedDraws => "Limited Draws",
            StatId::LimitedWinPct => "Limited Win %",
            StatId::ConstructedWins => "Constructed Wins",
            StatId::ConstructedLosses => "Constructed Losses",
            StatId::ConstructedDraws => "Constructed Draws",
            StatId::ConstructedWinPct => "Constructed Win %",
            StatId::Day1Wins => "Day 1 Wins",
            StatId::Day1Losses => "Day 1 Losses",
            StatId::Day1Draws => "Day 1 Draws",
            StatId::Day1WinPct => "Day 1 Win %",
            StatId::Day2Wins => "Day 2 Wins",
            StatId::Day2Losses => "Day 2 Losses",
            StatId::Day2Draws => "Day 2 Draws",
            StatId::Day2WinPct => "Day 2 Win %",
            StatId::Day3Wins => "Day 3 Wins",
            StatId::Day3Losses => "Day 3 Losses",
            StatId::Day3Draws => "Day 3 Draws",
            StatId::Day3WinPct => "Day 3 Win %",
            StatId::Drafts => "Total Drafts",
            StatId::WinningDrafts => "Winning Drafts",
            StatId::LosingDrafts => "Losing Drafts",
            StatId::WinningDraftsPct => "Winning Drafts %",
            StatId::TrophyDrafts => "Trophy Drafts",
            StatId::FiveStreaks => "5+ Win Streaks",
            StatId::OverallRecord => "Overall Record",
            StatId::LimitedRecord => "Limited Record",
            StatId::ConstructedRecord => "Constructed Record",
            StatId::Top8Record => "Top 8 Record",
        }
    }

    pub fn kind(&self) -> StatKind {
        match self {
            StatId::OverallRecord
            | StatId::LimitedRecord
            | StatId::ConstructedRecord
            | StatId::Top8Record => StatKind::Record,
            StatId::OverallWinPct
            | StatId::LimitedWinPct
            | StatId::ConstructedWinPct
            | StatId::Day1WinPct
            | StatId::Day2WinPct
            | StatId::Day3WinPct
            | StatId::WinningDraftsPct => StatKind::Percentage,
            _ => StatKind::Count,
        }
    }

    pub fn is_rankable(&self) -> bool {
        RANKABLE_STATS.contains(self)
    }
}

impl fmt::Display for StatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatId {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatId::ALL
            .iter()
            .copied()
            .find(|stat| stat.as_str() == s)
            .ok_or_else(|| StatError::Unknown(s.to_string()))
    }
}

/// Whether a raw stat identifier is on the rankable allow-list.
pub fn is_rankable(stat_id: &str) -> bool {
    stat_id
        .parse::<StatId>()
        .map(|stat| stat.is_rankable())
        .unwrap_or(false)
}

/// A stat that has been checked against the rankable allow-list.
///
/// The ranking engine only accepts this type, so a record stat can never
/// reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RankableStat(StatId);

impl RankableStat {
    pub fn id(&self) -> StatId {
        self.0
    }

    /// All rankable stats, in allow-list order.
    pub fn all() -> impl Iterator<Item = RankableStat> {
        RANKABLE_STATS.iter().map(|&stat| RankableStat(stat))
    }
}

impl TryFrom<StatId> for RankableStat {
    type Error = StatError;

    fn try_from(stat: StatId) -> Result<Self, Self::Error> {
        if stat.is_rankable() {
            Ok(RankableStat(stat))
        } else {
            Err(StatError::NotRankable(stat))
        }
    }
}

impl FromStr for RankableStat {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RankableStat::try_from(s.parse::<StatId>()?)
    }
}

impl fmt::Display for RankableStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single stat value: numeric, or a formatted record string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

impl StatValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StatValue::Number(n) => Some(*n),
            StatValue::Text(_) => None,
        }
    }

    /// Render for display, with a `%` suffix for percentage stats.
    pub fn display_for(&self, stat: StatId) -> String {
        match (self, stat.kind()) {
            (StatValue::Number(n), StatKind::Percentage) => format!("{}%", format_number(*n)),
            (StatValue::Number(n), _) => format_number(*n),
            (StatValue::Text(s), _) => s.clone(),
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Number(n) => f.write_str(&format_number(*n)),
            StatValue::Text(s) => f.write_str(s),
        }
    }
}

/// Integers print without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Look up a stat on a player. `None` when the stat is missing or null.
pub fn get_stat_value(player: &PlayerRecord, stat: StatId) -> Option<&StatValue> {
    player
        .stats
        .get(stat.as_str())
        .and_then(|entry| entry.value.as_ref())
}

/// Numeric value of a stat, if present and numeric.
pub fn numeric_stat(player: &PlayerRecord, stat: StatId) -> Option<f64> {
    get_stat_value(player, stat).and_then(StatValue::as_number)
}
