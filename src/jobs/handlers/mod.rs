pub mod roster;
pub mod statistics;

pub use roster::RosterHandler;
pub use statistics::StatisticsHandler;
