//! Input rows as they arrive in job payloads.

use crate::PartyCode;
use serde::{Deserialize, Serialize};

/// One committee member on a roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub legislative_district: Option<String>,
    #[serde(default)]
    pub election_district: Option<String>,
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

/// One absentee ballot application, as exported by the board of elections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotRecord {
    #[serde(default)]
    pub voter_id: Option<String>,
    #[serde(default)]
    pub ward: Option<String>,
    #[serde(default)]
    pub legislative_district: Option<String>,
    #[serde(default)]
    pub congressional_district: Option<String>,
    #[serde(default)]
    pub senate_district: Option<String>,
    #[serde(default)]
    pub assembly_district: Option<String>,
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub date_requested: Option<String>,
    #[serde(default)]
    pub date_sent: Option<String>,
    #[serde(default)]
    pub date_returned: Option<String>,
}

impl BallotRecord {
    pub fn is_sent(&self) -> bool {
        blank_to_none(self.date_sent.as_deref()).is_some()
    }

    pub fn is_returned(&self) -> bool {
        blank_to_none(self.date_returned.as_deref()).is_some()
    }

    pub fn party_code(&self) -> Option<PartyCode> {
        self.party.as_deref().and_then(PartyCode::parse)
    }

    /// Looks up a column by its wire name; `None` for unknown names.
    pub fn column(&self, name: &str) -> Option<Option<&str>> {
        let value = match name {
            "voterId" | "voter_id" => &self.voter_id,
            "ward" => &self.ward,
            "legislativeDistrict" | "legislative_district" => &self.legislative_district,
            "congressionalDistrict" | "congressional_district" => &self.congressional_district,
            "senateDistrict" | "senate_district" => &self.senate_district,
            "assemblyDistrict" | "assembly_district" => &self.assembly_district,
            "party" => &self.party,
            "dateRequested" | "date_requested" => &self.date_requested,
            "dateSent" | "date_sent" => &self.date_sent,
            "dateReturned" | "date_returned" => &self.date_returned,
            _ => return None,
        };
        Some(blank_to_none(value.as_deref()))
    }
}

/// Trims a value and treats whitespace-only text as missing.
pub fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
