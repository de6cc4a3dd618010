use crate::aggregate::GroupOrder;
use crate::wards::ward_label;
use rollbook_types::{BallotRecord, blank_to_none};
use serde::{Deserialize, Serialize};

/// A grouping dimension of a statistics report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Town,
    LegislativeDistrict,
    CongressionalDistrict,
    SenateDistrict,
    AssemblyDistrict,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Town,
        Dimension::LegislativeDistrict,
        Dimension::CongressionalDistrict,
        Dimension::SenateDistrict,
        Dimension::AssemblyDistrict,
    ];

    /// Sheet title used in workbooks.
    pub fn title(&self) -> &'static str {
        match self {
            Dimension::Town => "Town",
            Dimension::LegislativeDistrict => "Legislative District",
            Dimension::CongressionalDistrict => "Congressional District",
            Dimension::SenateDistrict => "Senate District",
            Dimension::AssemblyDistrict => "Assembly District",
        }
    }

    /// Wire name of the column this dimension groups on.
    pub fn source_column(&self) -> &'static str {
        match self {
            Dimension::Town => "ward",
            Dimension::LegislativeDistrict => "legislativeDistrict",
            Dimension::CongressionalDistrict => "congressionalDistrict",
            Dimension::SenateDistrict => "senateDistrict",
            Dimension::AssemblyDistrict => "assemblyDistrict",
        }
    }

    pub fn order(&self) -> GroupOrder {
        match self {
            Dimension::Town => GroupOrder::NumericId,
            _ => GroupOrder::Lexicographic,
        }
    }

    /// Whether the `sent` column is reported for this dimension.
    pub fn reports_sent(&self) -> bool {
        matches!(self, Dimension::Town | Dimension::LegislativeDistrict)
    }

    /// Group identifier for a row, `None` when the row has no usable value.
    pub fn key_for(&self, row: &BallotRecord) -> Option<String> {
        match self {
            Dimension::Town => blank_to_none(row.ward.as_deref()).and_then(ward_label),
            Dimension::LegislativeDistrict => district("LD", row.legislative_district.as_deref(), 2),
            Dimension::CongressionalDistrict => {
                district("CD", row.congressional_district.as_deref(), 2)
            }
            Dimension::SenateDistrict => district("SD", row.senate_district.as_deref(), 2),
            Dimension::AssemblyDistrict => district("AD", row.assembly_district.as_deref(), 3),
        }
    }
}

/// Zero-padded so that plain string order is also numeric order.
fn district(prefix: &str, raw: Option<&str>, width: usize) -> Option<String> {
    let value = blank_to_none(raw)?;
    Some(match value.parse::<u32>() {
        Ok(n) => format!("{prefix} {n:0width$}"),
        Err(_) => value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_per_dimension() {
        let row = BallotRecord {
            ward: Some("45".into()),
            legislative_district: Some("7".into()),
            congressional_district: Some("25".into()),
            senate_district: Some(" 55".into()),
            assembly_district: Some("136".into()),
            ..Default::default()
        };
        assert_eq!(Dimension::Town.key_for(&row).as_deref(), Some("Brighton (45)"));
        assert_eq!(
            Dimension::LegislativeDistrict.key_for(&row).as_deref(),
            Some("LD 07")
        );
        assert_eq!(
            Dimension::CongressionalDistrict.key_for(&row).as_deref(),
            Some("CD 25")
        );
        assert_eq!(Dimension::SenateDistrict.key_for(&row).as_deref(), Some("SD 55"));
        assert_eq!(
            Dimension::AssemblyDistrict.key_for(&row).as_deref(),
            Some("AD 136")
        );
    }

    #[test]
    fn test_missing_values_have_no_key() {
        let row = BallotRecord::default();
        for dimension in Dimension::ALL {
            assert_eq!(dimension.key_for(&row), None, "{dimension:?}");
        }
    }

    #[test]
    fn test_named_districts_pass_through() {
        let row = BallotRecord {
            legislative_district: Some("At Large".into()),
            ..Default::default()
        };
        assert_eq!(
            Dimension::LegislativeDistrict.key_for(&row).as_deref(),
            Some("At Large")
        );
    }

    #[test]
    fn test_dimension_wire_names() {
        let parsed: Vec<Dimension> =
            serde_json::from_str(r#"["town","senateDistrict"]"#).unwrap();
        assert_eq!(parsed, vec![Dimension::Town, Dimension::SenateDistrict]);
    }
}
