//! Page layout for grouped records.
//!
//! Groups are packed onto fixed-capacity pages, kept whole where they fit and
//! split into page-sized chunks only when a single group is larger than a page.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Page capacity must be at least {min} rows, got {got}.")]
    CapacityTooSmall { min: usize, got: usize },
    #[error("Section '{section}' lays out {laid_out} members but holds {expected}.")]
    MemberCountMismatch {
        section: String,
        expected: usize,
        laid_out: usize,
    },
    #[error("Section '{section}' has {count} final pages; exactly one is required.")]
    FinalPageCount { section: String, count: usize },
    #[error("Section '{0}' does not end on its final page.")]
    FinalPageNotLast(String),
    #[error("Section '{section}' final page carries total {carried:?}, expected {expected}.")]
    SectionTotalMismatch {
        section: String,
        expected: usize,
        carried: Option<usize>,
    },
    #[error("Section '{0}' is split across non-adjacent pages.")]
    SectionNotContiguous(String),
    #[error("A page of section '{section}' uses {used} rows, over the capacity of {capacity}.")]
    PageOverCapacity {
        section: String,
        used: usize,
        capacity: usize,
    },
}

pub mod algorithms;
pub mod config;
pub mod roster;

pub use algorithms::pagination::{paginate, section_totals, verify_section_totals};
pub use config::LayoutConfig;
pub use roster::{district_label, sections_from_members};
