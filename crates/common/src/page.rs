//! Pagination and date-range filters for pickup-point listings.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised when constructing a [`Page`] from out-of-range values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page number must be at least 1, got {0}")]
    InvalidNumber(i64),

    #[error("page size must be between 1 and {max}, got {0}", max = Page::MAX_SIZE)]
    InvalidSize(i64),
}

/// A 1-based page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u32,
    size: u32,
}

impl Page {
    pub const DEFAULT_NUMBER: u32 = 1;
    pub const DEFAULT_SIZE: u32 = 10;
    pub const MAX_SIZE: u32 = 30;

    /// Creates a page, rejecting numbers below 1 and sizes outside `1..=30`.
    pub fn new(number: i64, size: i64) -> Result<Self, PageError> {
        let number = u32::try_from(number)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or(PageError::InvalidNumber(number))?;
        let size = u32::try_from(size)
            .ok()
            .filter(|s| (1..=Self::MAX_SIZE).contains(s))
            .ok_or(PageError::InvalidSize(size))?;
        Ok(Self { number, size })
    }

    /// Builds a page from loosely-typed input, falling back to the defaults
    /// (page 1, size 10) for any missing or invalid component.
    pub fn or_default(number: Option<i64>, size: Option<i64>) -> Self {
        let default = Self::default();
        let number = number
            .and_then(|n| Self::new(n, i64::from(default.size)).ok())
            .map_or(default.number, |p| p.number);
        let size = size
            .and_then(|s| Self::new(i64::from(default.number), s).ok())
            .map_or(default.size, |p| p.size);
        Self { number, size }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: Self::DEFAULT_NUMBER,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// Inclusive time window. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// A range with no bounds; matches every timestamp.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }
}
