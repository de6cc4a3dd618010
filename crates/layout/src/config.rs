use crate::LayoutError;

/// Smallest capacity that still leaves room for a header row plus one member.
pub const MIN_PAGE_CAPACITY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Rows available on one page. Every group placed on a page spends one
    /// row on its header, so a page holds at most `page_capacity - 1` members
    /// of a single group.
    ///
    /// Defaults to `30`.
    page_capacity: usize,
}

impl LayoutConfig {
    pub fn new(page_capacity: usize) -> Result<Self, LayoutError> {
        if page_capacity < MIN_PAGE_CAPACITY {
            return Err(LayoutError::CapacityTooSmall {
                min: MIN_PAGE_CAPACITY,
                got: page_capacity,
            });
        }
        Ok(Self { page_capacity })
    }

    pub fn page_capacity(&self) -> usize {
        self.page_capacity
    }

    /// Members per page when an oversized group is split.
    pub fn chunk_size(&self) -> usize {
        self.page_capacity - 1
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { page_capacity: 30 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_capacity_without_room_for_members() {
        assert_eq!(
            LayoutConfig::new(1),
            Err(LayoutError::CapacityTooSmall { min: 2, got: 1 })
        );
        assert!(LayoutConfig::new(0).is_err());
    }

    #[test]
    fn test_chunk_size_reserves_header_row() {
        let cfg = LayoutConfig::new(2).unwrap();
        assert_eq!(cfg.chunk_size(), 1);
        assert_eq!(LayoutConfig::default().chunk_size(), 29);
    }
}
