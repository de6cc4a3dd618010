use crate::{StatsError, math::percentage};
use log::debug;
use rollbook_types::{BallotRecord, PartyCode, UNKNOWN_KEY};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// What the aggregator needs to know about a row besides its group key.
pub trait TallyRow {
    fn is_sent(&self) -> bool;
    fn is_returned(&self) -> bool;
    /// Normalized party code, `None` when outside the closed set.
    fn party(&self) -> Option<PartyCode>;
}

impl TallyRow for BallotRecord {
    fn is_sent(&self) -> bool {
        BallotRecord::is_sent(self)
    }

    fn is_returned(&self) -> bool {
        BallotRecord::is_returned(self)
    }

    fn party(&self) -> Option<PartyCode> {
        self.party_code()
    }
}

/// Order of the statistics rows of one grouping dimension.
///
/// Both orders put the [`UNKNOWN_KEY`] group last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// Plain string order of the identifiers.
    Lexicographic,
    /// Ascending by the number formed from the identifier's digits
    /// (`"Brighton (45)"` -> 45); identifiers without digits follow, by name.
    NumericId,
}

impl GroupOrder {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (a == UNKNOWN_KEY, b == UNKNOWN_KEY) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }
        match self {
            GroupOrder::Lexicographic => a.cmp(b),
            GroupOrder::NumericId => match (numeric_id(a), numeric_id(b)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| a.cmp(b)),
        }
    }
}

fn numeric_id(key: &str) -> Option<u64> {
    let digits: String = key.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let id = digits.parse().ok();
    if id.is_none() {
        debug!("Group '{}' has an out-of-range numeric id; ordering it by name", key);
    }
    id
}

/// Counts for one party inside a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyStatistics {
    pub requested: u64,
    pub sent: u64,
    pub returned: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStatistics {
    pub identifier: String,
    pub requested: u64,
    /// Left out by dimensions that do not report mailings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent: Option<u64>,
    pub returned: u64,
    /// `returned / sent` in percent; always computed over the sent count.
    pub return_percentage: f64,
    /// One entry for every code in [`PartyCode::ALL`].
    pub party_breakdown: BTreeMap<PartyCode, PartyStatistics>,
}

impl GroupStatistics {
    pub fn party(&self, code: PartyCode) -> PartyStatistics {
        self.party_breakdown.get(&code).copied().unwrap_or_default()
    }
}

/// Result of grouping rows by one key.
#[derive(Debug)]
pub struct GroupedStatistics<'a, R> {
    pub groups: BTreeMap<String, Vec<&'a R>>,
    /// Sorted by the [`GroupOrder`] the computation was given.
    pub statistics: Vec<GroupStatistics>,
    pub group_count: usize,
}

/// Tallies one set of rows under a single identifier.
pub(crate) fn tally<'r, R, I>(identifier: String, rows: I, report_sent: bool) -> GroupStatistics
where
    R: TallyRow + 'r,
    I: IntoIterator<Item = &'r R>,
{
    let mut requested = 0u64;
    let mut sent = 0u64;
    let mut returned = 0u64;
    let mut parties: BTreeMap<PartyCode, PartyStatistics> = PartyCode::ALL
        .into_iter()
        .map(|code| (code, PartyStatistics::default()))
        .collect();

    for row in rows {
        let is_sent = row.is_sent();
        let is_returned = row.is_returned();
        requested += 1;
        sent += u64::from(is_sent);
        returned += u64::from(is_returned);

        if let Some(code) = row.party() {
            let entry = parties.entry(code).or_default();
            entry.requested += 1;
            entry.sent += u64::from(is_sent);
            entry.returned += u64::from(is_returned);
        }
    }

    for entry in parties.values_mut() {
        entry.percentage = percentage(entry.returned, entry.sent);
    }

    GroupStatistics {
        identifier,
        requested,
        sent: report_sent.then_some(sent),
        returned,
        return_percentage: percentage(returned, sent),
        party_breakdown: parties,
    }
}

/// Groups `rows` by `key_of` and tallies every group.
///
/// Rows whose key is missing or blank land in the [`UNKNOWN_KEY`] group, so
/// every row is counted exactly once. Fails on empty input.
pub fn compute_grouped_statistics<'a, R, K>(
    rows: &'a [R],
    key_of: K,
    order: GroupOrder,
    report_sent: bool,
) -> Result<GroupedStatistics<'a, R>, StatsError>
where
    R: TallyRow,
    K: Fn(&R) -> Option<String>,
{
    if rows.is_empty() {
        return Err(StatsError::EmptyInput);
    }

    let mut groups: BTreeMap<String, Vec<&'a R>> = BTreeMap::new();
    for row in rows {
        let key = key_of(row)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| UNKNOWN_KEY.to_string());
        groups.entry(key).or_default().push(row);
    }

    let mut statistics: Vec<GroupStatistics> = groups
        .iter()
        .map(|(key, members)| tally(key.clone(), members.iter().copied(), report_sent))
        .collect();
    statistics.sort_by(|a, b| order.compare(&a.identifier, &b.identifier));

    debug!("grouped {} rows into {} groups", rows.len(), statistics.len());

    Ok(GroupedStatistics {
        group_count: statistics.len(),
        groups,
        statistics,
    })
}
