//! Remote range requests and `Content-Range` parsing.
//!
//! The hosted backend pages rows with inclusive, zero-based `Range` windows and
//! reports row counts in the `Content-Range` response header
//! (`first-last/total`, `*/total`, or `*/*` when no count was requested).

use std::str::FromStr;

use thiserror::Error;

use crate::{PageSize, Pager};

/// A remote page window derived from a 1-based page number.
///
/// # Examples
/// ```
/// use pagination::{PageRequest, PageSize};
///
/// let request = PageRequest::new(3, PageSize::default());
/// assert_eq!(request.offset(), 20);
/// assert_eq!(request.range_header(), "20-29");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: PageSize,
}

impl PageRequest {
    /// Build a request for `page`; page 0 is treated as page 1.
    #[must_use]
    pub const fn new(page: usize, page_size: PageSize) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            page_size,
        }
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Zero-based index of the first row.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size.get())
    }

    /// Maximum number of rows returned.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.page_size.get()
    }

    /// Inclusive `Range` header value, e.g. `0-9`.
    #[must_use]
    pub fn range_header(&self) -> String {
        let first = self.offset();
        let last = first.saturating_add(self.limit()).saturating_sub(1);
        format!("{first}-{last}")
    }
}

impl From<&Pager> for PageRequest {
    fn from(pager: &Pager) -> Self {
        Self::new(pager.current_page(), pager.page_size())
    }
}

/// Errors raised while parsing a `Content-Range` header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentRangeError {
    /// The header lacks the `/` separating range and total.
    #[error("content range '{value}' is missing a total")]
    MissingTotal {
        /// Raw header value.
        value: String,
    },
    /// A numeric component failed to parse.
    #[error("content range '{value}' contains an invalid number")]
    InvalidNumber {
        /// Raw header value.
        value: String,
    },
}

/// Parsed `Content-Range` header.
///
/// # Examples
/// ```
/// use pagination::ContentRange;
///
/// let range: ContentRange = "0-9/42".parse().expect("valid header");
/// assert_eq!(range.total, Some(42));
/// assert_eq!(range.window, Some((0, 9)));
///
/// let empty: ContentRange = "*/0".parse().expect("valid header");
/// assert_eq!(empty.total, Some(0));
/// assert_eq!(empty.window, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    /// Inclusive `(first, last)` row window, absent for `*`.
    pub window: Option<(u64, u64)>,
    /// Total row count, absent when the server did not count.
    pub total: Option<u64>,
}

impl FromStr for ContentRange {
    type Err = ContentRangeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix("items ").unwrap_or(trimmed);
        let invalid = || ContentRangeError::InvalidNumber {
            value: raw.to_owned(),
        };

        let (window, total) =
            trimmed
                .split_once('/')
                .ok_or_else(|| ContentRangeError::MissingTotal {
                    value: raw.to_owned(),
                })?;

        let window = match window.trim() {
            "*" => None,
            span => {
                let (first, last) = span.split_once('-').ok_or_else(invalid)?;
                let first = first.trim().parse::<u64>().map_err(|_| invalid())?;
                let last = last.trim().parse::<u64>().map_err(|_| invalid())?;
                Some((first, last))
            }
        };

        let total = match total.trim() {
            "*" => None,
            count => Some(count.parse::<u64>().map_err(|_| invalid())?),
        };

        Ok(Self { window, total })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for remote range helpers.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0-9/42", Some((0, 9)), Some(42))]
    #[case("*/42", None, Some(42))]
    #[case("*/0", None, Some(0))]
    #[case("*/*", None, None)]
    #[case("10-19/*", Some((10, 19)), None)]
    #[case("items 0-0/7", Some((0, 0)), Some(7))]
    fn parses_valid_headers(
        #[case] raw: &str,
        #[case] window: Option<(u64, u64)>,
        #[case] total: Option<u64>,
    ) {
        let parsed = raw.parse::<ContentRange>();
        assert_eq!(parsed, Ok(ContentRange { window, total }));
    }

    #[rstest]
    #[case("42")]
    #[case("0-9/many")]
    #[case("a-b/4")]
    #[case("7/4")]
    fn rejects_malformed_headers(#[case] raw: &str) {
        assert!(raw.parse::<ContentRange>().is_err(), "{raw} should be rejected");
    }

    #[test]
    fn page_zero_is_first_page() {
        let request = PageRequest::new(0, PageSize::default());
        assert_eq!(request.page(), 1);
        assert_eq!(request.range_header(), "0-9");
    }

    #[test]
    fn request_follows_pager_position() {
        let mut pager = Pager::new(100);
        pager.go_to_page(4);
        let request = PageRequest::from(&pager);
        assert_eq!(request.offset(), 30);
        assert_eq!(request.limit(), 10);
    }
}
