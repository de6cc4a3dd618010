//! Statistics over absentee-ballot rows.
//!
//! - [`compute_grouped_statistics`]: requested/sent/returned counts per group,
//!   with a per-party breakdown over the closed [`PartyCode`] set
//! - [`Dimension`]: the grouping dimensions a report can be cut by, each with
//!   its own key function and explicit sort order
//! - [`daily_return_curve`]: returns per calendar day with running totals
//! - [`StatisticsReport`]: everything a statistics workbook needs, built in one call
//!
//! [`PartyCode`]: rollbook_types::PartyCode

use thiserror::Error;

pub mod aggregate;
pub mod daily;
pub mod dimension;
pub mod math;
pub mod quality;
pub mod report;
pub mod wards;

pub use aggregate::{
    GroupOrder, GroupStatistics, GroupedStatistics, PartyStatistics, TallyRow,
    compute_grouped_statistics,
};
pub use daily::{DailyReturnEntry, daily_return_curve, normalize_date};
pub use dimension::Dimension;
pub use math::percentage;
pub use quality::check_required_columns;
pub use report::{DimensionReport, StatisticsReport};
pub use wards::ward_label;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("No ballot rows to summarize.")]
    EmptyInput,
    #[error("Required column '{0}' is empty on every row.")]
    MissingColumn(String),
    #[error("Unknown column '{0}' in required columns.")]
    UnknownColumn(String),
}
