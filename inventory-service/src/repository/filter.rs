//! Typed filter payloads for list queries
//!
//! `page` is 1-based; `per_page == 0` means unbounded. Empty vectors and
//! `None` fields mean "no constraint".

use crate::entity::ReservationStatus;

/// Filter for product listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub ids: Vec<i64>,
    pub codes: Vec<String>,
    pub names: Vec<String>,
    /// Case-insensitive substring match over name and code
    pub search: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl ProductFilter {
    pub(crate) fn offset(&self) -> i64 {
        offset(self.page, self.per_page)
    }
}

/// Filter for reservation listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationFilter {
    pub ids: Vec<i64>,
    pub product_ids: Vec<i64>,
    pub order_ids: Vec<i64>,
    pub statuses: Vec<ReservationStatus>,
    pub page: u32,
    pub per_page: u32,
}

impl ReservationFilter {
    pub(crate) fn offset(&self) -> i64 {
        offset(self.page, self.per_page)
    }
}

fn offset(page: u32, per_page: u32) -> i64 {
    i64::from(page.saturating_sub(1)) * i64::from(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_for_first_page() {
        assert_eq!(offset(0, 20), 0);
        assert_eq!(offset(1, 20), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(offset(2, 20), 20);
        assert_eq!(offset(5, 10), 40);
    }

    #[test]
    fn offset_is_zero_when_unbounded() {
        assert_eq!(offset(3, 0), 0);
    }

    #[test]
    fn default_filter_has_no_constraints() {
        let filter = ProductFilter::default();
        assert!(filter.ids.is_empty());
        assert!(filter.search.is_none());
        assert_eq!(filter.per_page, 0);
    }
}
