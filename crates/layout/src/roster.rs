//! Sectioning of committee rosters: one section per legislative district,
//! one group per election district.

use rollbook_types::{Group, MemberRecord, Section, UNKNOWN_KEY, blank_to_none};
use std::collections::BTreeMap;

/// Sort key for district identifiers: numbers first (numerically), then
/// named districts, then the unknown sentinel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum DistrictKey {
    Numeric(u32),
    Named(String),
    Unknown,
}

impl DistrictKey {
    /// Reads a raw column value. An already-labelled value (`"LD 07"`,
    /// `"Unknown"`) parses to the same key as its bare form.
    fn parse(prefix: &str, raw: Option<&str>) -> Self {
        let Some(v) = blank_to_none(raw) else {
            return DistrictKey::Unknown;
        };
        if v.eq_ignore_ascii_case(UNKNOWN_KEY) {
            return DistrictKey::Unknown;
        }
        let digits = v
            .get(..prefix.len())
            .filter(|head| head.eq_ignore_ascii_case(prefix))
            .map_or(v, |_| v[prefix.len()..].trim_start());
        match digits.parse::<u32>() {
            Ok(n) => DistrictKey::Numeric(n),
            Err(_) => DistrictKey::Named(v.to_string()),
        }
    }

    fn label(&self, prefix: &str, width: usize) -> String {
        match self {
            DistrictKey::Numeric(n) => format!("{prefix} {n:0width$}"),
            DistrictKey::Named(name) => name.clone(),
            DistrictKey::Unknown => UNKNOWN_KEY.to_string(),
        }
    }
}

/// Display label for a district value, e.g. `("LD", "7", 2)` -> `"LD 07"`.
pub fn district_label(prefix: &str, raw: Option<&str>, width: usize) -> String {
    DistrictKey::parse(prefix, raw).label(prefix, width)
}

/// Entries bucketed by display label. Values that print the same share a
/// bucket; the smallest parsed key decides where the bucket sorts.
struct Buckets<T> {
    prefix: &'static str,
    width: usize,
    entries: BTreeMap<String, (DistrictKey, T)>,
}

impl<T: Default> Buckets<T> {
    fn new(prefix: &'static str, width: usize) -> Self {
        Self {
            prefix,
            width,
            entries: BTreeMap::new(),
        }
    }

    fn entry(&mut self, raw: Option<&str>) -> &mut T {
        let key = DistrictKey::parse(self.prefix, raw);
        let label = key.label(self.prefix, self.width);
        let (order, value) = self
            .entries
            .entry(label)
            .or_insert_with(|| (key.clone(), T::default()));
        if key < *order {
            *order = key;
        }
        value
    }

    fn into_sorted(self) -> Vec<(String, T)> {
        let mut entries: Vec<_> = self.entries.into_iter().collect();
        entries.sort_by(|(a_label, (a, _)), (b_label, (b, _))| {
            a.cmp(b).then_with(|| a_label.cmp(b_label))
        });
        entries
            .into_iter()
            .map(|(label, (_, value))| (label, value))
            .collect()
    }
}

// Inner buckets hold election-district groups.
impl<T: Default> Default for Buckets<T> {
    fn default() -> Self {
        Self::new("ED", 3)
    }
}

/// Buckets members into LD sections and ED groups, both in ascending district
/// order. Members keep their input order within a group.
pub fn sections_from_members(members: Vec<MemberRecord>) -> Vec<Section<MemberRecord>> {
    let mut sections: Buckets<Buckets<Vec<MemberRecord>>> = Buckets::new("LD", 2);
    for member in members {
        let ld = member.legislative_district.clone();
        let ed = member.election_district.clone();
        sections
            .entry(ld.as_deref())
            .entry(ed.as_deref())
            .push(member);
    }

    sections
        .into_sorted()
        .into_iter()
        .map(|(ld, eds)| {
            let groups = eds
                .into_sorted()
                .into_iter()
                .map(|(ed, members)| Group::new(ed, members))
                .collect();
            Section::new(ld, groups)
        })
        .collect()
}
