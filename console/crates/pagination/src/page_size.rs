//! Validated page size.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size applied when callers do not choose one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Errors raised while constructing a [`PageSize`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageSizeError {
    /// A page must hold at least one item.
    #[error("page size must be greater than zero")]
    Zero,
    /// The raw value is not an unsigned integer.
    #[error("page size must be a positive integer, got '{value}'")]
    NotANumber {
        /// Raw input that failed to parse.
        value: String,
    },
}

/// Number of items shown on one page.
///
/// ## Invariants
/// - Always greater than zero, so page counts never divide by zero.
///
/// # Examples
/// ```
/// use pagination::{PageSize, PageSizeError};
///
/// assert_eq!(PageSize::default().get(), 10);
/// assert_eq!(PageSize::new(0), Err(PageSizeError::Zero));
/// assert_eq!("25".parse::<PageSize>().map(PageSize::get), Ok(25));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    /// Validate and construct a page size.
    ///
    /// # Errors
    ///
    /// Returns [`PageSizeError::Zero`] when `value` is zero.
    pub const fn new(value: usize) -> Result<Self, PageSizeError> {
        match NonZeroUsize::new(value) {
            Some(size) => Ok(Self(size)),
            None => Err(PageSizeError::Zero),
        }
    }

    /// Number of items per page.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(NonZeroUsize::MIN.saturating_add(DEFAULT_PAGE_SIZE - 1))
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = PageSizeError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.get()
    }
}

impl FromStr for PageSize {
    type Err = PageSizeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw
            .trim()
            .parse::<usize>()
            .map_err(|_| PageSizeError::NotANumber {
                value: raw.to_owned(),
            })?;
        Self::new(value)
    }
}
