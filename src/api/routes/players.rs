use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::{ApiError, FilterParams};
use crate::calculate::FilteredPool;
use crate::models::{
    finish_ordinal, get_stat_value, numeric_stat, EventRecord, PlayerRecord, RankableStat, StatId,
    StatValue,
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlayerSummary {
    pub id: String,
    pub full_name: String,
    pub qualified: bool,
    pub events: Option<f64>,
}

impl PlayerSummary {
    fn from_record(player: &PlayerRecord) -> Self {
        Self {
            id: player.id.to_string(),
            full_name: player.full_name().to_string(),
            qualified: player.is_qualified(),
            events: numeric_stat(player, StatId::Events),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub players: Vec<PlayerSummary>,
}

pub async fn search_players(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let query = params.q.unwrap_or_default();
    debug!("Player search: {:?}", query);

    let players: Vec<PlayerSummary> = state
        .dataset
        .search(&query)
        .into_iter()
        .map(PlayerSummary::from_record)
        .collect();

    Json(SearchResponse {
        query,
        total: players.len(),
        players,
    })
}

#[derive(Debug, Serialize)]
pub struct PlayerStatDetail {
    pub id: StatId,
    pub label: &'static str,
    pub value: StatValue,
    pub display: String,
    /// Rank in the filtered pool, for rankable stats only
    pub rank: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PlayerEventDetail {
    #[serde(flatten)]
    pub event: EventRecord,
    pub finish_label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlayerDetail {
    pub id: String,
    pub full_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub qualified: bool,
    /// Whether the player passes the requested filters
    pub in_pool: bool,
    pub pool_size: usize,
    pub stats: Vec<PlayerStatDetail>,
    pub events: Vec<PlayerEventDetail>,
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(filters): Query<FilterParams>,
) -> Result<Json<PlayerDetail>, ApiError> {
    let config = filters.to_filter_config()?;
    debug!("Player detail: {} with filters {:?}", id, config);

    let player = state
        .dataset
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Player {}", id)))?;
    let pool = FilteredPool::new(state.dataset.players(), &config);

    let stats = StatId::ALL
        .iter()
        .filter_map(|&stat| {
            let value = get_stat_value(player, stat)?;
            let rank = RankableStat::try_from(stat)
                .ok()
                .and_then(|rankable| pool.rank_of(player, rankable))
                .map(|r| r.rank);

            Some(PlayerStatDetail {
                id: stat,
                label: stat.label(),
                value: value.clone(),
                display: value.display_for(stat),
                rank,
            })
        })
        .collect();

    let events = player
        .events_by_date()
        .into_iter()
        .map(|event| PlayerEventDetail {
            finish_label: event.finish.map(finish_ordinal),
            event: event.clone(),
        })
        .collect();

    Ok(Json(PlayerDetail {
        id: player.id.to_string(),
        full_name: player.full_name().to_string(),
        first_name: player.info.first_name.clone(),
        last_name: player.info.last_name.clone(),
        qualified: player.is_qualified(),
        in_pool: pool.contains(player),
        pool_size: pool.len(),
        stats,
        events,
    }))
}
