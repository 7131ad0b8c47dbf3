//! Success envelopes for REST responses
//!
//! Every successful response is wrapped in `{message, data}`; list responses
//! add a `pagination` block so callers can compute page counts from the
//! unpaginated total.

use serde::Serialize;

/// `{message, data}` envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// `{message, data, pagination}` envelope
#[derive(Debug, Serialize)]
pub struct PageEnvelope<T> {
    pub message: String,
    pub data: T,
    pub pagination: Pagination,
}

impl<T> PageEnvelope<T> {
    pub fn new(message: impl Into<String>, data: T, pagination: Pagination) -> Self {
        Self {
            message: message.into(),
            data,
            pagination,
        }
    }
}

/// Pagination block echoed back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total_count: i64,
    pub total_page: i64,
}

impl Pagination {
    /// Compute the page count from the unpaginated total
    ///
    /// `per_page == 0` means the listing was unbounded, so everything fits on
    /// a single page (or zero pages when there were no matches).
    pub fn new(page: u32, per_page: u32, total_count: i64) -> Self {
        let total_page = if per_page == 0 {
            i64::from(total_count > 0)
        } else {
            (total_count + i64::from(per_page) - 1) / i64::from(per_page)
        };

        Self {
            page,
            per_page,
            total_count,
            total_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_page_rounds_up() {
        assert_eq!(Pagination::new(1, 10, 25).total_page, 3);
        assert_eq!(Pagination::new(1, 10, 30).total_page, 3);
        assert_eq!(Pagination::new(1, 10, 31).total_page, 4);
    }

    #[test]
    fn zero_matches_means_zero_pages() {
        assert_eq!(Pagination::new(1, 10, 0).total_page, 0);
        assert_eq!(Pagination::new(1, 0, 0).total_page, 0);
    }

    #[test]
    fn unbounded_listing_is_one_page() {
        assert_eq!(Pagination::new(1, 0, 42).total_page, 1);
    }

    #[test]
    fn envelope_serializes_with_message_and_data() {
        let envelope = Envelope::new("ok", vec![1, 2, 3]);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["message"], "ok");
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn page_envelope_includes_pagination() {
        let envelope = PageEnvelope::new("ok", Vec::<i32>::new(), Pagination::new(2, 5, 12));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["pagination"]["page"], 2);
        assert_eq!(json["pagination"]["total_page"], 3);
    }
}
