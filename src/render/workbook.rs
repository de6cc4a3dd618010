//! Spreadsheet model built by the handlers and serialized by a
//! [`WorkbookWriter`](super::WorkbookWriter).

use crate::error::RenderError;
use rollbook_stats::{DailyReturnEntry, GroupStatistics, StatisticsReport};
use rollbook_types::{MemberRecord, Page, PartyCode};
use serde::Serialize;

/// Longest sheet name spreadsheet applications accept.
pub const MAX_SHEET_NAME: usize = 31;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(u64),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Creates an empty sheet. The name is cleaned of characters spreadsheets
    /// reject and cut to [`MAX_SHEET_NAME`] characters.
    pub fn new(name: &str, columns: Vec<String>) -> Self {
        Self {
            name: clean_sheet_name(name),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), RenderError> {
        if row.len() != self.columns.len() {
            return Err(RenderError::Workbook(format!(
                "sheet '{}' has {} columns, row has {}",
                self.name,
                self.columns.len(),
                row.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }
}

fn clean_sheet_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Workbook {
    pub title: String,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sheets: Vec::new(),
        }
    }

    fn has_sheet_named(&self, name: &str) -> bool {
        self.sheets.iter().any(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// A cleaned sheet name not yet used in this workbook. Collisions get a
    /// `" (2)"`, `" (3)"`, ... suffix, shortening the base to stay within
    /// [`MAX_SHEET_NAME`].
    pub fn unique_sheet_name(&self, name: &str) -> String {
        let mut base = clean_sheet_name(name);
        if base.is_empty() {
            base = "Sheet".to_string();
        }
        if !self.has_sheet_named(&base) {
            return base;
        }
        let mut n = 2usize;
        loop {
            let suffix = format!(" ({n})");
            let room = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
            let candidate: String = base.chars().take(room).chain(suffix.chars()).collect();
            if !self.has_sheet_named(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    pub fn push_sheet(&mut self, sheet: Sheet) -> Result<(), RenderError> {
        if sheet.name.is_empty() {
            return Err(RenderError::Workbook("empty sheet name".into()));
        }
        if self.has_sheet_named(&sheet.name) {
            return Err(RenderError::Workbook(format!(
                "duplicate sheet name '{}'",
                sheet.name
            )));
        }
        self.sheets.push(sheet);
        Ok(())
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

fn statistics_columns(first: &str, with_sent: bool) -> Vec<String> {
    let mut columns = vec![first.to_string(), "Requested".to_string()];
    if with_sent {
        columns.push("Sent".into());
    }
    columns.push("Returned".into());
    columns.push("Return %".into());
    for code in PartyCode::ALL {
        columns.push(format!("{code} Requested"));
        if with_sent {
            columns.push(format!("{code} Sent"));
        }
        columns.push(format!("{code} Returned"));
        columns.push(format!("{code} %"));
    }
    columns
}

fn statistics_row(stats: &GroupStatistics, with_sent: bool) -> Vec<Cell> {
    let mut row = vec![Cell::from(stats.identifier.as_str()), stats.requested.into()];
    if with_sent {
        row.push(stats.sent.unwrap_or_default().into());
    }
    row.push(stats.returned.into());
    row.push(stats.return_percentage.into());
    for code in PartyCode::ALL {
        let party = stats.party(code);
        row.push(party.requested.into());
        if with_sent {
            row.push(party.sent.into());
        }
        row.push(party.returned.into());
        row.push(party.percentage.into());
    }
    row
}

fn daily_sheet(entries: &[DailyReturnEntry]) -> Result<Sheet, RenderError> {
    let mut columns = vec![
        "Date".to_string(),
        "Returned".to_string(),
        "Cumulative Returned".to_string(),
    ];
    for code in PartyCode::ALL {
        columns.push(format!("{code} Returned"));
        columns.push(format!("{code} Cumulative"));
    }

    let mut sheet = Sheet::new("Daily Returns", columns);
    for entry in entries {
        let mut row = vec![
            Cell::from(entry.date.as_str()),
            entry.returned_that_day.into(),
            entry.cumulative_returned.into(),
        ];
        for code in PartyCode::ALL {
            let day = entry.per_party_returned_that_day.get(&code).copied();
            let total = entry.per_party_cumulative.get(&code).copied();
            row.push(day.unwrap_or_default().into());
            row.push(total.unwrap_or_default().into());
        }
        sheet.push_row(row)?;
    }
    Ok(sheet)
}

/// Summary sheet with the overall totals, one sheet per dimension, then the
/// daily return curve.
pub fn statistics_workbook(title: &str, report: &StatisticsReport) -> Result<Workbook, RenderError> {
    let mut workbook = Workbook::new(title);

    let mut summary = Sheet::new("Summary", statistics_columns("Scope", true));
    summary.push_row(statistics_row(&report.totals, true))?;
    workbook.push_sheet(summary)?;

    for dimension in &report.dimensions {
        let with_sent = dimension.dimension.reports_sent();
        let name = dimension.dimension.title();
        let mut sheet = Sheet::new(name, statistics_columns(name, with_sent));
        for stats in &dimension.statistics {
            sheet.push_row(statistics_row(stats, with_sent))?;
        }
        workbook.push_sheet(sheet)?;
    }

    workbook.push_sheet(daily_sheet(&report.daily_returns)?)?;
    Ok(workbook)
}

/// One sheet per roster section, rows in page order, closed by a total row.
pub fn roster_workbook(title: &str, pages: &[Page<MemberRecord>]) -> Result<Workbook, RenderError> {
    let columns: Vec<String> = [
        "Election District",
        "Name",
        "Address",
        "City",
        "Party",
        "Position",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    let mut workbook = Workbook::new(title);
    let mut current: Option<Sheet> = None;

    for page in pages {
        let sheet = current.get_or_insert_with(|| {
            Sheet::new(&workbook.unique_sheet_name(&page.section_key), columns.clone())
        });
        for group in &page.groups {
            for member in &group.members {
                sheet.push_row(vec![
                    Cell::from(group.key.as_str()),
                    Cell::from(member.name.as_str()),
                    Cell::from(member.address.as_deref().unwrap_or("")),
                    Cell::from(member.city.as_deref().unwrap_or("")),
                    Cell::from(member.party.as_deref().unwrap_or("")),
                    Cell::from(member.position.as_deref().unwrap_or("")),
                ])?;
            }
        }
        if page.is_final_page_of_section {
            if let Some(mut sheet) = current.take() {
                let total = page.section_total_members.unwrap_or_default() as u64;
                let mut row = vec![Cell::from("Total"), Cell::Int(total)];
                row.resize(columns.len(), Cell::from(""));
                sheet.push_row(row)?;
                workbook.push_sheet(sheet)?;
            }
        }
    }

    if let Some(sheet) = current {
        return Err(RenderError::Workbook(format!(
            "section '{}' has no final page",
            sheet.name
        )));
    }
    Ok(workbook)
}
