use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::models::{StatId, StatKind};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub players: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: state.dataset.version().to_string(),
        players: state.dataset.len(),
    })
}

#[derive(Debug, Serialize)]
pub struct StatInfo {
    pub id: StatId,
    pub label: &'static str,
    pub kind: StatKind,
    pub rankable: bool,
}

#[derive(Debug, Serialize)]
pub struct StatListResponse {
    pub stats: Vec<StatInfo>,
}

pub async fn list_stats() -> Json<StatListResponse> {
    let stats = StatId::ALL
        .iter()
        .map(|&id| StatInfo {
            id,
            label: id.label(),
            kind: id.kind(),
            rankable: id.is_rankable(),
        })
        .collect();

    Json(StatListResponse { stats })
}

#[derive(Debug, Serialize)]
pub struct FormatListResponse {
    pub formats: Vec<String>,
}

pub async fn list_formats(State(state): State<AppState>) -> Json<FormatListResponse> {
    let formats = state
        .dataset
        .formats()
        .into_iter()
        .map(str::to_string)
        .collect();

    Json(FormatListResponse { formats })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::get_json;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_reports_dataset() {
        let (status, json) = get_json("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["players"], 4);
        assert_eq!(json["version"].as_str().unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_stats_catalogue() {
        let (status, json) = get_json("/api/stats").await;
        assert_eq!(status, StatusCode::OK);

        let stats = json["stats"].as_array().unwrap();
        assert_eq!(stats.len(), 38);

        let rankable = stats.iter().filter(|s| s["rankable"] == true).count();
        assert_eq!(rankable, 17);

        let record = stats
            .iter()
            .find(|s| s["id"] == "overall_record")
            .unwrap();
        assert_eq!(record["kind"], "record");
        assert_eq!(record["rankable"], false);

        assert!(stats.iter().any(|s| s["id"] == "5streaks"));
    }

    #[tokio::test]
    async fn test_formats_sorted() {
        let (_, json) = get_json("/api/formats").await;
        assert_eq!(json["formats"], serde_json::json!(["Pioneer", "Standard"]));
    }
}
