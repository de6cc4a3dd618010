use serde::{Deserialize, Serialize};

/// Records that should stay together on one page when they fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group<T> {
    pub key: String,
    pub members: Vec<T>,
}

impl<T> Group<T> {
    pub fn new(key: impl Into<String>, members: Vec<T>) -> Self {
        Self {
            key: key.into(),
            members,
        }
    }

    /// Page rows consumed: one per member plus the group's header row.
    pub fn cost(&self) -> usize {
        self.members.len() + 1
    }
}

/// Input to pagination: the groups of one section, in print order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section<T> {
    pub section_key: String,
    pub groups: Vec<Group<T>>,
}

impl<T> Section<T> {
    pub fn new(section_key: impl Into<String>, groups: Vec<Group<T>>) -> Self {
        Self {
            section_key: section_key.into(),
            groups,
        }
    }

    pub fn total_members(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }
}

/// One output page.
///
/// `section_total_members` is `Some` exactly when `is_final_page_of_section`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub section_key: String,
    pub groups: Vec<Group<T>>,
    pub is_final_page_of_section: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_total_members: Option<usize>,
}

impl<T> Page<T> {
    pub fn member_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }
}
