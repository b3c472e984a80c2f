use serde::{Deserialize, Serialize};

use super::filter::{Filter, Filters};
use super::operators::SortDirection;

/// One `ORDER BY` item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
}

pub type Sorts = Vec<Sort>;

impl Sort {
    pub fn new(field: impl Into<String>, direction: Option<SortDirection>) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, Some(SortDirection::Asc))
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, Some(SortDirection::Desc))
    }

    pub fn direction_or_default(&self) -> SortDirection {
        self.direction.unwrap_or_default()
    }
}

/// Page request. Zero means "not supplied" for both fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page_size: u64,
    /// 1-based
    pub page_number: u64,
}

impl Pagination {
    pub fn new(page_size: u64, page_number: u64) -> Self {
        Self {
            page_size,
            page_number,
        }
    }

    pub fn has_page_size(&self) -> bool {
        self.page_size > 0
    }

    pub fn has_page_number(&self) -> bool {
        self.page_number > 0
    }

    /// Rows to skip for the requested page; page 0 counts as page 1.
    pub fn offset(&self) -> u64 {
        self.page_size.saturating_mul(self.page_number.max(1) - 1)
    }

    /// Pagination actually used once `default_page_size` fills a missing size.
    ///
    /// Returns `None` when neither side supplies a page size.
    pub fn effective(&self, default_page_size: u64) -> Option<Pagination> {
        let page_size = if self.has_page_size() {
            self.page_size
        } else {
            default_page_size
        };
        if page_size == 0 {
            return None;
        }
        let page_number = if self.has_page_number() {
            self.page_number
        } else {
            1
        };
        Some(Pagination {
            page_size,
            page_number,
        })
    }
}

/// Filters, sorts and pagination of one query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    pub filters: Filters,
    pub sorts: Sorts,
    pub pagination: Pagination,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    pub fn paginate(mut self, page_size: u64, page_number: u64) -> Self {
        self.pagination = Pagination::new(page_size, page_number);
        self
    }
}
