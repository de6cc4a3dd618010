use crate::{LayoutConfig, LayoutError};
use log::{debug, trace};
use rollbook_types::{Group, Page, Section};
use std::collections::HashMap;

/// Running contents of the page being filled.
struct PageBuffer<T> {
    groups: Vec<Group<T>>,
    cost: usize,
}

impl<T> PageBuffer<T> {
    fn new() -> Self {
        Self {
            groups: Vec::new(),
            cost: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn push(&mut self, group: Group<T>) {
        self.cost += group.cost();
        self.groups.push(group);
    }

    fn take(&mut self) -> Vec<Group<T>> {
        self.cost = 0;
        std::mem::take(&mut self.groups)
    }
}

/// Whether a group of `cost` rows still fits next to what is already buffered.
///
/// A group whose cost equals the capacity only fits on an empty page.
fn check_group_fit(buffered_cost: usize, cost: usize, capacity: usize) -> bool {
    buffered_cost + cost <= capacity
}

/// Packs the groups of each section onto pages of `config.page_capacity()` rows.
///
/// Sections are laid out independently, in input order. Every section with at
/// least one member ends with exactly one page flagged final, carrying the
/// section's member total. Sections without members produce no pages.
pub fn paginate<T>(sections: Vec<Section<T>>, config: &LayoutConfig) -> Vec<Page<T>> {
    let capacity = config.page_capacity();
    let mut pages = Vec::new();

    for section in sections {
        let section_key = section.section_key;
        let section_start = pages.len();
        let mut total = 0usize;
        let mut buffer = PageBuffer::new();

        for group in section.groups {
            if group.members.is_empty() {
                trace!("skipping empty group '{}' in '{}'", group.key, section_key);
                continue;
            }
            total += group.members.len();
            let cost = group.cost();

            if !buffer.is_empty() && !check_group_fit(buffer.cost, cost, capacity) {
                pages.push(open_page(&section_key, buffer.take()));
            }

            if cost > capacity {
                split_oversized(&section_key, group, config.chunk_size(), &mut pages);
            } else {
                buffer.push(group);
            }
        }

        if !buffer.is_empty() {
            pages.push(Page {
                section_key: section_key.clone(),
                groups: buffer.take(),
                is_final_page_of_section: true,
                section_total_members: Some(total),
            });
        } else if pages.len() > section_start {
            // The section ended on an oversized-group chunk.
            if let Some(last) = pages.last_mut() {
                last.is_final_page_of_section = true;
                last.section_total_members = Some(total);
            }
        }

        debug!(
            "section '{}': {} members on {} pages",
            section_key,
            total,
            pages.len() - section_start
        );
    }

    pages
}

fn open_page<T>(section_key: &str, groups: Vec<Group<T>>) -> Page<T> {
    Page {
        section_key: section_key.to_string(),
        groups,
        is_final_page_of_section: false,
        section_total_members: None,
    }
}

/// Emits one page per `chunk_size` members, each holding the chunk as its only group.
fn split_oversized<T>(
    section_key: &str,
    group: Group<T>,
    chunk_size: usize,
    pages: &mut Vec<Page<T>>,
) {
    debug!(
        "group '{}' in '{}' has {} members; splitting into chunks of {}",
        group.key,
        section_key,
        group.members.len(),
        chunk_size
    );
    let key = group.key;
    let mut rest = group.members;
    while !rest.is_empty() {
        let tail = rest.split_off(rest.len().min(chunk_size));
        let chunk = std::mem::replace(&mut rest, tail);
        pages.push(open_page(section_key, vec![Group::new(key.clone(), chunk)]));
    }
}

/// Member totals per section, in input order, for [`verify_section_totals`].
pub fn section_totals<T>(sections: &[Section<T>]) -> Vec<(String, usize)> {
    sections
        .iter()
        .map(|s| (s.section_key.clone(), s.total_members()))
        .collect()
}

/// Checks the output of [`paginate`] against the member totals of its input.
///
/// For every section: its pages are adjacent, hold exactly its members, fit
/// the capacity, and the last of them (and only that one) is flagged final
/// with the section total.
pub fn verify_section_totals<T>(
    expected: &[(String, usize)],
    pages: &[Page<T>],
    config: &LayoutConfig,
) -> Result<(), LayoutError> {
    let mut spans: HashMap<&str, (usize, usize)> = HashMap::new();
    for (index, page) in pages.iter().enumerate() {
        let used: usize = page.groups.iter().map(Group::cost).sum();
        if used > config.page_capacity() {
            return Err(LayoutError::PageOverCapacity {
                section: page.section_key.clone(),
                used,
                capacity: config.page_capacity(),
            });
        }
        let span = spans
            .entry(page.section_key.as_str())
            .or_insert((index, index));
        if span.1 + 1 < index {
            return Err(LayoutError::SectionNotContiguous(page.section_key.clone()));
        }
        span.1 = index;
    }

    for (section, total) in expected {
        let Some(&(first, last)) = spans.get(section.as_str()) else {
            if *total == 0 {
                continue;
            }
            return Err(LayoutError::MemberCountMismatch {
                section: section.clone(),
                expected: *total,
                laid_out: 0,
            });
        };
        let section_pages = &pages[first..=last];

        let laid_out: usize = section_pages.iter().map(Page::member_count).sum();
        if laid_out != *total {
            return Err(LayoutError::MemberCountMismatch {
                section: section.clone(),
                expected: *total,
                laid_out,
            });
        }

        let finals = section_pages
            .iter()
            .filter(|p| p.is_final_page_of_section)
            .count();
        if finals != 1 {
            return Err(LayoutError::FinalPageCount {
                section: section.clone(),
                count: finals,
            });
        }

        let closing = &section_pages[section_pages.len() - 1];
        if !closing.is_final_page_of_section {
            return Err(LayoutError::FinalPageNotLast(section.clone()));
        }
        if closing.section_total_members != Some(*total)
            || section_pages[..section_pages.len() - 1]
                .iter()
                .any(|p| p.section_total_members.is_some())
        {
            return Err(LayoutError::SectionTotalMismatch {
                section: section.clone(),
                expected: *total,
                carried: closing.section_total_members,
            });
        }
    }

    Ok(())
}
