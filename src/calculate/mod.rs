//! Ranking and filtering engine.
//!
//! Pure functions over the immutable dataset:
//! - Filter predicates that narrow the player collection to a pool
//! - Competition ranking of a pool by one stat
//! - Leaderboards and rank grids composed from the two

pub mod filter;
pub mod leaderboard;
pub mod rank;

pub use filter::{apply_filters, apply_predicates, parse_date, FilterConfig, FilterError, Predicate};
pub use leaderboard::{
    leaderboard, rank_within_filtered_pool, FilteredPool, GridRow, GridSortKey, RankGrid,
    SortDirection,
};
pub use rank::{rank_of, top_n, PlayerRank, RankedEntry, Ranking};
