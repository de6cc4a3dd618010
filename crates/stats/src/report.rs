use crate::aggregate::{GroupStatistics, compute_grouped_statistics, tally};
use crate::daily::{DailyReturnEntry, daily_return_curve};
use crate::dimension::Dimension;
use crate::quality::check_required_columns;
use crate::StatsError;
use log::debug;
use rollbook_types::BallotRecord;
use serde::Serialize;

/// Identifier of the all-rows totals line.
pub const TOTALS_KEY: &str = "All";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionReport {
    pub dimension: Dimension,
    pub statistics: Vec<GroupStatistics>,
    pub group_count: usize,
}

/// Everything a statistics workbook shows, computed from one set of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub totals: GroupStatistics,
    pub dimensions: Vec<DimensionReport>,
    pub daily_returns: Vec<DailyReturnEntry>,
}

impl StatisticsReport {
    /// Runs the data-quality gate, then tallies every requested dimension and
    /// the daily return curve. An empty `dimensions` slice means all of them.
    pub fn build<S: AsRef<str>>(
        rows: &[BallotRecord],
        dimensions: &[Dimension],
        required_columns: &[S],
    ) -> Result<Self, StatsError> {
        check_required_columns(rows, required_columns)?;

        let dimensions = if dimensions.is_empty() {
            &Dimension::ALL[..]
        } else {
            dimensions
        };

        let mut reports = Vec::with_capacity(dimensions.len());
        for dimension in dimensions {
            let grouped = compute_grouped_statistics(
                rows,
                |row| dimension.key_for(row),
                dimension.order(),
                dimension.reports_sent(),
            )?;
            debug!("{}: {} groups", dimension.title(), grouped.group_count);
            reports.push(DimensionReport {
                dimension: *dimension,
                statistics: grouped.statistics,
                group_count: grouped.group_count,
            });
        }

        Ok(Self {
            totals: tally(TOTALS_KEY.to_string(), rows, true),
            dimensions: reports,
            daily_returns: daily_return_curve(rows, |row| row.date_returned.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook_types::PartyCode;

    fn ballot(ward: &str, ld: &str, party: &str, sent: bool, returned: Option<&str>) -> BallotRecord {
        BallotRecord {
            ward: Some(ward.into()),
            legislative_district: Some(ld.into()),
            party: Some(party.into()),
            date_sent: sent.then(|| "2024-10-01".to_string()),
            date_returned: returned.map(String::from),
            ..Default::default()
        }
    }

    fn sample() -> Vec<BallotRecord> {
        vec![
            ballot("45", "7", "DEM", true, Some("2024-10-03")),
            ballot("45", "7", "REP", true, None),
            ballot("3", "12", "CON", true, Some("2024-10-02")),
            ballot("", "12", "OTH", false, None),
        ]
    }

    #[test]
    fn test_build_covers_every_dimension_by_default() {
        let report = StatisticsReport::build(&sample(), &[], &["ward"]).unwrap();
        assert_eq!(report.dimensions.len(), Dimension::ALL.len());
        assert_eq!(report.totals.identifier, TOTALS_KEY);
        assert_eq!(report.totals.requested, 4);
        assert_eq!(report.totals.sent, Some(3));
        assert_eq!(report.totals.returned, 2);
        assert_eq!(report.totals.return_percentage, 66.67);
        assert_eq!(report.totals.party(PartyCode::Con).returned, 1);
    }

    #[test]
    fn test_every_dimension_accounts_for_every_row() {
        let rows = sample();
        let report = StatisticsReport::build(&rows, &[], &["ward"]).unwrap();
        for dimension in &report.dimensions {
            let requested: u64 = dimension.statistics.iter().map(|s| s.requested).sum();
            assert_eq!(requested, rows.len() as u64, "{:?}", dimension.dimension);
        }
    }

    #[test]
    fn test_town_dimension_order_and_sent_column() {
        let report = StatisticsReport::build(&sample(), &[Dimension::Town], &["ward"]).unwrap();
        let town = &report.dimensions[0];
        let ids: Vec<&str> = town.statistics.iter().map(|s| s.identifier.as_str()).collect();
        assert_eq!(ids, vec!["Rochester (3)", "Brighton (45)", "Unknown"]);
        assert!(town.statistics.iter().all(|s| s.sent.is_some()));
    }

    #[test]
    fn test_state_districts_omit_sent() {
        let report =
            StatisticsReport::build(&sample(), &[Dimension::SenateDistrict], &["ward"]).unwrap();
        let senate = &report.dimensions[0];
        assert_eq!(senate.group_count, 1);
        assert_eq!(senate.statistics[0].identifier, "Unknown");
        assert_eq!(senate.statistics[0].sent, None);
        assert_eq!(senate.statistics[0].return_percentage, 66.67);
    }

    #[test]
    fn test_daily_curve_is_included() {
        let report = StatisticsReport::build(&sample(), &[Dimension::Town], &["ward"]).unwrap();
        let dates: Vec<&str> = report.daily_returns.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-10-02", "2024-10-03"]);
        assert_eq!(report.daily_returns[1].cumulative_returned, 2);
    }

    #[test]
    fn test_quality_gate_runs_first() {
        let rows: Vec<BallotRecord> = sample()
            .into_iter()
            .map(|mut r| {
                r.ward = None;
                r
            })
            .collect();
        let err = StatisticsReport::build(&rows, &[], &["ward", "party"]).unwrap_err();
        assert_eq!(err, StatsError::MissingColumn("ward".into()));
    }
}
