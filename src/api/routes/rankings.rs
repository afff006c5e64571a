use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::{parse_rankable, ApiError, FilterParams};
use crate::calculate::{FilteredPool, GridSortKey, RankGrid, RankedEntry, SortDirection};
use crate::models::{numeric_stat, PlayerRecord, RankableStat, StatId, StatValue, GRID_STATS};

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub player_id: String,
    pub full_name: String,
    pub stat: StatId,
    pub value: Option<f64>,
    pub rank: Option<u32>,
    /// Players in the filtered pool with a value for the stat
    pub ranked_players: usize,
    pub filtered_players: usize,
    pub percentile: Option<f64>,
}

pub async fn player_rank(
    State(state): State<AppState>,
    Path((id, stat)): Path<(String, String)>,
    Query(filters): Query<FilterParams>,
) -> Result<Json<RankResponse>, ApiError> {
    let stat = parse_rankable(&stat)?;
    let config = filters.to_filter_config()?;
    debug!("Rank of {} by {} with filters {:?}", id, stat, config);

    let player = lookup_player(&state, &id)?;
    let pool = FilteredPool::new(state.dataset.players(), &config);
    let ranking = pool.ranking(stat);
    let position = ranking.rank_of(player);

    Ok(Json(RankResponse {
        player_id: player.id.to_string(),
        full_name: player.full_name().to_string(),
        stat: stat.id(),
        value: numeric_stat(player, stat.id()),
        rank: position.map(|p| p.rank),
        ranked_players: ranking.pool_size(),
        filtered_players: pool.len(),
        percentile: position.map(|p| p.percentile()),
    }))
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<usize>,
    /// Also report this player's rank in the same pool
    pub player: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub player_id: String,
    pub full_name: String,
    pub qualified: bool,
    pub value: f64,
    pub display: String,
}

impl LeaderboardEntry {
    fn from_ranked(entry: &RankedEntry<'_>, stat: RankableStat) -> Self {
        Self {
            rank: entry.rank,
            player_id: entry.player.id.to_string(),
            full_name: entry.player.full_name().to_string(),
            qualified: entry.player.is_qualified(),
            value: entry.value,
            display: StatValue::Number(entry.value).display_for(stat.id()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlayerPosition {
    pub player_id: String,
    pub full_name: String,
    pub in_pool: bool,
    pub rank: Option<u32>,
    pub value: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub stat: StatId,
    pub label: &'static str,
    pub limit: usize,
    pub ranked_players: usize,
    pub filtered_players: usize,
    pub entries: Vec<LeaderboardEntry>,
    pub player: Option<PlayerPosition>,
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Path(stat): Path<String>,
    Query(filters): Query<FilterParams>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let stat = parse_rankable(&stat)?;
    let config = filters.to_filter_config()?;
    let limit = state.leaderboard.limit(params.limit);
    debug!("Leaderboard {} (limit {}) with filters {:?}", stat, limit, config);

    let pool = FilteredPool::new(state.dataset.players(), &config);
    let ranking = pool.ranking(stat);

    let player = match params.player.as_deref() {
        Some(id) => {
            let player = lookup_player(&state, id)?;
            Some(PlayerPosition {
                player_id: player.id.to_string(),
                full_name: player.full_name().to_string(),
                in_pool: pool.contains(player),
                rank: ranking.rank_of(player).map(|p| p.rank),
                value: numeric_stat(player, stat.id()),
            })
        }
        None => None,
    };

    let entries = ranking
        .top(limit)
        .iter()
        .map(|entry| LeaderboardEntry::from_ranked(entry, stat))
        .collect();

    Ok(Json(LeaderboardResponse {
        stat: stat.id(),
        label: stat.id().label(),
        limit,
        ranked_players: ranking.pool_size(),
        filtered_players: pool.len(),
        entries,
        player,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GridParams {
    /// `name`, a stat id (sort by value) or `rank:<stat id>`
    pub sort: Option<String>,
    pub order: Option<SortDirection>,
}

#[derive(Debug, Serialize)]
pub struct GridRowResponse {
    pub id: String,
    pub full_name: String,
    pub values: Vec<Option<f64>>,
    pub ranks: Vec<Option<u32>>,
}

#[derive(Debug, Serialize)]
pub struct GridResponse {
    pub stats: Vec<StatId>,
    pub total: usize,
    pub players: Vec<GridRowResponse>,
}

/// Rank grid over qualified players. Other filters narrow the pool further.
pub async fn qualified_grid(
    State(state): State<AppState>,
    Query(filters): Query<FilterParams>,
    Query(params): Query<GridParams>,
) -> Result<Json<GridResponse>, ApiError> {
    let mut config = filters.to_filter_config()?;
    config.qualified_only = true;
    debug!("Qualified grid sorted by {:?} {:?}", params.sort, params.order);

    let stats: Vec<RankableStat> = GRID_STATS
        .iter()
        .filter_map(|&stat| RankableStat::try_from(stat).ok())
        .collect();
    let pool = FilteredPool::new(state.dataset.players(), &config);
    let mut grid = pool.rank_grid(&stats);

    if let Some(sort) = params.sort.as_deref() {
        let key = parse_sort_key(sort, &grid)?;
        let direction = params.order.unwrap_or(key.default_direction());
        grid.sort_by(key, direction);
    }

    let players: Vec<GridRowResponse> = grid
        .rows()
        .iter()
        .map(|row| GridRowResponse {
            id: row.player.id.to_string(),
            full_name: row.player.full_name().to_string(),
            values: stats
                .iter()
                .map(|stat| numeric_stat(row.player, stat.id()))
                .collect(),
            ranks: row.ranks.clone(),
        })
        .collect();

    Ok(Json(GridResponse {
        stats: stats.iter().map(|s| s.id()).collect(),
        total: players.len(),
        players,
    }))
}

fn parse_sort_key(raw: &str, grid: &RankGrid<'_>) -> Result<GridSortKey, ApiError> {
    let key: GridSortKey = raw.parse()?;
    if let GridSortKey::Rank(stat) = key {
        if !grid.has_column(stat) {
            return Err(ApiError::BadRequest(format!(
                "No rank column for stat: {}",
                stat
            )));
        }
    }
    Ok(key)
}

fn lookup_player<'a>(state: &'a AppState, id: &str) -> Result<&'a PlayerRecord, ApiError> {
    state
        .dataset
        .get(id)
        .ok_or_else(|| ApiError::NotFound(format!("Player {}", id)))
}
