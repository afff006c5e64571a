//! Per-event results attached to a player.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Win/loss/draw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WinLossRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl WinLossRecord {
    /// Create a new record.
    pub fn new(wins: u32, losses: u32, draws: u32) -> Self {
        Self {
            wins,
            losses,
            draws,
        }
    }

    /// Total games played.
    pub fn total_games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Win rate as a fraction (0.0 to 1.0).
    pub fn win_rate(&self) -> f64 {
        let total = self.total_games();
        if total == 0 {
            0.0
        } else {
            self.wins as f64 / total as f64
        }
    }
}

impl fmt::Display for WinLossRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.wins, self.losses, self.draws)
    }
}

/// Portion of an event a win/loss/draw counter covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Overall,
    Limited,
    Constructed,
    Day1,
    Day2,
    Day3,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Overall,
        Phase::Limited,
        Phase::Constructed,
        Phase::Day1,
        Phase::Day2,
        Phase::Day3,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Overall => "Overall",
            Phase::Limited => "Limited",
            Phase::Constructed => "Constructed",
            Phase::Day1 => "Day 1",
            Phase::Day2 => "Day 2",
            Phase::Day3 => "Day 3",
        }
    }
}

/// An event date as written in the dataset.
///
/// Dates that are not `YYYY-MM-DD` keep their raw text and have no parsed
/// value; date filters and date ordering skip them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct EventDate {
    raw: String,
    parsed: Option<NaiveDate>,
}

impl EventDate {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The calendar date, if the raw text parsed.
    pub fn date(&self) -> Option<NaiveDate> {
        self.parsed
    }

    pub fn is_valid(&self) -> bool {
        self.parsed.is_some()
    }
}

impl From<String> for EventDate {
    fn from(raw: String) -> Self {
        let parsed = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok();
        Self { raw, parsed }
    }
}

impl From<EventDate> for String {
    fn from(date: EventDate) -> Self {
        date.raw
    }
}

impl From<NaiveDate> for EventDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            raw: date.format("%Y-%m-%d").to_string(),
            parsed: Some(date),
        }
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.raw)
    }
}

/// One tournament a player attended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_code: String,
    pub event_id: Option<u64>,
    pub date: EventDate,
    pub format: String,
    pub deck: Option<String>,
    pub notes: Option<String>,
    pub record: Option<String>,
    pub finish: Option<u32>,
    pub summary: Option<String>,
    pub day2: Option<bool>,
    pub top8: Option<bool>,
    pub in_contention: Option<bool>,

    pub overall_wins: Option<u32>,
    pub overall_losses: Option<u32>,
    pub overall_draws: Option<u32>,
    pub limited_wins: Option<u32>,
    pub limited_losses: Option<u32>,
    pub limited_draws: Option<u32>,
    pub constructed_wins: Option<u32>,
    pub constructed_losses: Option<u32>,
    pub constructed_draws: Option<u32>,
    pub day1_wins: Option<u32>,
    pub day1_losses: Option<u32>,
    pub day1_draws: Option<u32>,
    pub day2_wins: Option<u32>,
    pub day2_losses: Option<u32>,
    pub day2_draws: Option<u32>,
    pub day3_wins: Option<u32>,
    pub day3_losses: Option<u32>,
    pub day3_draws: Option<u32>,

    pub num_drafts: Option<u32>,
    pub positive_drafts: Option<u32>,
    pub negative_drafts: Option<u32>,
    pub trophy_drafts: Option<u32>,
    pub no_win_drafts: Option<u32>,

    pub win_streak: Option<u32>,
    pub loss_streak: Option<u32>,
    pub streak5: Option<u32>,
}

impl EventRecord {
    /// Minimal event with every counter unset.
    pub fn new(event_code: impl Into<String>, date: NaiveDate, format: impl Into<String>) -> Self {
        Self {
            event_code: event_code.into(),
            event_id: None,
            date: date.into(),
            format: format.into(),
            deck: None,
            notes: None,
            record: None,
            finish: None,
            summary: None,
            day2: None,
            top8: None,
            in_contention: None,
            overall_wins: None,
            overall_losses: None,
            overall_draws: None,
            limited_wins: None,
            limited_losses: None,
            limited_draws: None,
            constructed_wins: None,
            constructed_losses: None,
            constructed_draws: None,
            day1_wins: None,
            day1_losses: None,
            day1_draws: None,
            day2_wins: None,
            day2_losses: None,
            day2_draws: None,
            day3_wins: None,
            day3_losses: None,
            day3_draws: None,
            num_drafts: None,
            positive_drafts: None,
            negative_drafts: None,
            trophy_drafts: None,
            no_win_drafts: None,
            win_streak: None,
            loss_streak: None,
            streak5: None,
        }
    }

    /// Builder method to set deck.
    pub fn with_deck(mut self, deck: impl Into<String>) -> Self {
        self.deck = Some(deck.into());
        self
    }

    /// Builder method to set finish.
    pub fn with_finish(mut self, finish: u32) -> Self {
        self.finish = Some(finish);
        self
    }

    /// Counters for one phase. `None` when the event carries none of them;
    /// individually missing counters count as zero.
    pub fn phase_record(&self, phase: Phase) -> Option<WinLossRecord> {
        let (w, l, d) = match phase {
            Phase::Overall => (self.overall_wins, self.overall_losses, self.overall_draws),
            Phase::Limited => (self.limited_wins, self.limited_losses, self.limited_draws),
            Phase::Constructed => (
                self.constructed_wins,
                self.constructed_losses,
                self.constructed_draws,
            ),
            Phase::Day1 => (self.day1_wins, self.day1_losses, self.day1_draws),
            Phase::Day2 => (self.day2_wins, self.day2_losses, self.day2_draws),
            Phase::Day3 => (self.day3_wins, self.day3_losses, self.day3_draws),
        };

        if w.is_none() && l.is_none() && d.is_none() {
            return None;
        }
        Some(WinLossRecord::new(
            w.unwrap_or(0),
            l.unwrap_or(0),
            d.unwrap_or(0),
        ))
    }
}

/// Format a finishing position with its ordinal suffix, e.g. `22nd place`.
pub fn finish_ordinal(finish: u32) -> String {
    let suffix = match (finish % 10, finish % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{} place", finish, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_win_loss_record() {
        let r = WinLossRecord::new(10, 5, 1);
        assert_eq!(r.total_games(), 16);
        assert!((r.win_rate() - 0.625).abs() < 1e-9);
        assert_eq!(r.to_string(), "10-5-1");
        assert_eq!(WinLossRecord::default().win_rate(), 0.0);
    }

    #[test]
    fn test_event_deserializes_sparse_payload() {
        let json = r#"{
            "event_code": "PTMKM",
            "date": "2025-02-14",
            "format": "Standard",
            "deck": "Azorius Control",
            "finish": 12,
            "overall_wins": 11,
            "overall_losses": 4,
            "day2": true
        }"#;
        let event: EventRecord = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_code, "PTMKM");
        assert_eq!(event.date.date(), Some(date("2025-02-14")));
        assert_eq!(event.finish, Some(12));
        assert_eq!(event.day2, Some(true));
        assert_eq!(event.top8, None);
        assert_eq!(
            event.phase_record(Phase::Overall),
            Some(WinLossRecord::new(11, 4, 0))
        );
        assert_eq!(event.phase_record(Phase::Limited), None);
    }

    #[test]
    fn test_event_keeps_unparsed_date() {
        let json = r#"{"event_code": "X", "date": "14/02/2025", "format": "Modern"}"#;
        let event: EventRecord = serde_json::from_str(json).unwrap();
        assert_eq!(event.date.as_str(), "14/02/2025");
        assert_eq!(event.date.date(), None);
        assert!(!event.date.is_valid());

        // Raw text is written back unchanged
        let out = serde_json::to_value(&event).unwrap();
        assert_eq!(out["date"], "14/02/2025");
    }

    #[test]
    fn test_event_date_from_naive_date() {
        let d = EventDate::from(date("2024-05-01"));
        assert_eq!(d.as_str(), "2024-05-01");
        assert_eq!(d.to_string(), "2024-05-01");
        assert!(d.is_valid());
    }

    #[test]
    fn test_finish_ordinal() {
        assert_eq!(finish_ordinal(1), "1st place");
        assert_eq!(finish_ordinal(2), "2nd place");
        assert_eq!(finish_ordinal(3), "3rd place");
        assert_eq!(finish_ordinal(4), "4th place");
        assert_eq!(finish_ordinal(11), "11th place");
        assert_eq!(finish_ordinal(12), "12th place");
        assert_eq!(finish_ordinal(13), "13th place");
        assert_eq!(finish_ordinal(21), "21st place");
        assert_eq!(finish_ordinal(112), "112th place");
        assert_eq!(finish_ordinal(122), "122nd place");
    }

    #[test]
    fn test_builders() {
        let e = EventRecord::new("RCQ1", date("2024-05-01"), "Pioneer")
            .with_deck("Rakdos Midrange")
            .with_finish(3);
        assert_eq!(e.deck.as_deref(), Some("Rakdos Midrange"));
        assert_eq!(e.finish, Some(3));
    }
}
