//! # Player Stats
//!
//! A statistics browser for players of a tournament series, built around a
//! filter and ranking engine.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, events, the stat catalogue)
//! - **storage**: Loading the static JSON dataset
//! - **dataset**: Read-only lookup, search and event views over the players
//! - **calculate**: Filters, competition ranking and leaderboards
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod dataset;
pub mod models;
pub mod storage;

pub use models::*;
