//! Core data models: players, their events and the stat catalogue.

mod event;
mod ids;
mod player;
mod stat;

pub use event::*;
pub use ids::*;
pub use player::*;
pub use stat::*;
