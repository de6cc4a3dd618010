//! The closed set of party enrollment codes reported in party breakdowns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A party enrollment code.
///
/// The set is closed: any other enrollment text parses to `None` and is left
/// out of per-party breakdowns, while still counting toward group totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartyCode {
    Dem,
    Rep,
    Con,
    Wor,
    Ind,
    Oth,
    Blk,
}

impl PartyCode {
    /// All codes, in report column order.
    pub const ALL: [PartyCode; 7] = [
        PartyCode::Dem,
        PartyCode::Rep,
        PartyCode::Con,
        PartyCode::Wor,
        PartyCode::Ind,
        PartyCode::Oth,
        PartyCode::Blk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartyCode::Dem => "DEM",
            PartyCode::Rep => "REP",
            PartyCode::Con => "CON",
            PartyCode::Wor => "WOR",
            PartyCode::Ind => "IND",
            PartyCode::Oth => "OTH",
            PartyCode::Blk => "BLK",
        }
    }

    /// Parses raw enrollment text after trimming and upper-casing it.
    pub fn parse(raw: &str) -> Option<PartyCode> {
        let normalized = raw.trim().to_ascii_uppercase();
        PartyCode::ALL
            .into_iter()
            .find(|code| code.as_str() == normalized)
    }
}

impl fmt::Display for PartyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
