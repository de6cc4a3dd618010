pub mod page;
pub mod party;
pub mod records;

pub use page::{Group, Page, Section};
pub use party::PartyCode;
pub use records::{BallotRecord, MemberRecord, blank_to_none};

/// Sentinel key for rows whose grouping column carries no usable value.
pub const UNKNOWN_KEY: &str = "Unknown";
