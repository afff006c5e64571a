use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::ApiError;

#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<String>,
    pub total: usize,
}

pub async fn list_events(State(state): State<AppState>) -> Json<EventListResponse> {
    let events: Vec<String> = state
        .dataset
        .event_codes()
        .into_iter()
        .map(str::to_string)
        .collect();

    Json(EventListResponse {
        total: events.len(),
        events,
    })
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    debug!("Event lookup: {}", code);

    // EventDetails borrows the dataset, so serialize it here.
    let details = state
        .dataset
        .event_results(&code)
        .ok_or_else(|| ApiError::NotFound(format!("Event {}", code)))?;
    let value = serde_json::to_value(&details).map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(value))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::get_json;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_events() {
        let (status, json) = get_json("/api/events").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["events"], serde_json::json!(["PTMKM", "PTOTJ"]));
        assert_eq!(json["total"], 2);
    }

    #[tokio::test]
    async fn test_get_event_sorted_by_finish() {
        let (status, json) = get_json("/api/events/ptmkm").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["event_code"], "PTMKM");
        assert_eq!(json["format"], "Standard");
        assert_eq!(json["date"], "2024-02-23");
        assert_eq!(json["total_players"], 2);

        let results = json["results"].as_array().unwrap();
        assert_eq!(results[0]["player_name"], "Alice Ace");
        assert_eq!(results[0]["finish"], 3);
        assert_eq!(results[0]["event"]["deck"], "Domain Ramp");
        assert_eq!(results[1]["player_name"], "Bob Bell");
    }

    #[tokio::test]
    async fn test_get_event_not_found() {
        let (status, json) = get_json("/api/events/NOPE").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}
