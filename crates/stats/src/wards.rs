//! Ward number to municipality lookup.
//!
//! Wards 1-44 are city wards. Wards 45-64 are the suburban towns, numbered
//! alphabetically.

use log::debug;

const CITY: &str = "Rochester";
const LAST_CITY_WARD: u32 = 44;

const TOWNS: [(u32, &str); 20] = [
    (45, "Brighton"),
    (46, "Chili"),
    (47, "Clarkson"),
    (48, "East Rochester"),
    (49, "Gates"),
    (50, "Greece"),
    (51, "Hamlin"),
    (52, "Henrietta"),
    (53, "Irondequoit"),
    (54, "Mendon"),
    (55, "Ogden"),
    (56, "Parma"),
    (57, "Penfield"),
    (58, "Perinton"),
    (59, "Pittsford"),
    (60, "Riga"),
    (61, "Rush"),
    (62, "Sweden"),
    (63, "Webster"),
    (64, "Wheatland"),
];

/// Municipality name for a ward number, if the table knows it.
pub fn municipality(ward: u32) -> Option<&'static str> {
    if (1..=LAST_CITY_WARD).contains(&ward) {
        return Some(CITY);
    }
    TOWNS
        .iter()
        .find(|(number, _)| *number == ward)
        .map(|(_, name)| *name)
}

/// Report label for a raw ward value: `"Brighton (45)"`, `"Rochester (3)"`,
/// or `"Ward 70"` for numbers outside the table.
///
/// Non-digit characters are stripped first (`"W-045"` is ward 45). Returns
/// `None` when nothing numeric is left.
pub fn ward_label(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let Ok(ward) = digits.parse::<u32>() else {
        debug!("Ward value '{}' is out of range; counting it as unknown", raw);
        return None;
    };
    Some(match municipality(ward) {
        Some(name) => format!("{name} ({ward})"),
        None => format!("Ward {ward}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_town_wards() {
        assert_eq!(ward_label("45").as_deref(), Some("Brighton (45)"));
        assert_eq!(ward_label(" 064 ").as_deref(), Some("Wheatland (64)"));
        assert_eq!(ward_label("W-53").as_deref(), Some("Irondequoit (53)"));
    }

    #[test]
    fn test_city_wards() {
        assert_eq!(ward_label("1").as_deref(), Some("Rochester (1)"));
        assert_eq!(ward_label("44").as_deref(), Some("Rochester (44)"));
    }

    #[test]
    fn test_unmapped_and_missing_wards() {
        assert_eq!(ward_label("0").as_deref(), Some("Ward 0"));
        assert_eq!(ward_label("70").as_deref(), Some("Ward 70"));
        assert_eq!(ward_label(""), None);
        assert_eq!(ward_label("n/a"), None);
        assert_eq!(ward_label("900123456789"), None);
    }

    #[test]
    fn test_table_is_contiguous() {
        for (offset, (number, _)) in TOWNS.iter().enumerate() {
            assert_eq!(*number, LAST_CITY_WARD + 1 + offset as u32);
        }
    }
}
