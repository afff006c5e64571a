pub mod catalog;
pub mod events;
pub mod players;
pub mod rankings;
