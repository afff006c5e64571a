use std::sync::Arc;

use crate::config::LeaderboardConfig;
use crate::dataset::Dataset;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub leaderboard: Arc<LeaderboardConfig>,
}

impl AppState {
    pub fn new(dataset: Dataset, leaderboard: LeaderboardConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            leaderboard: Arc::new(leaderboard),
        }
    }
}
