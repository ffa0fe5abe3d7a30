//! Table query builder for the backend's REST interface.
//!
//! Filters use the `column=operator.value` convention, ordering uses
//! `order=column.direction` and paging uses `limit`/`offset`.

use pagination::PageRequest;

/// Sort direction for [`TableQuery::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// A filtered read against one table.
///
/// # Examples
/// ```
/// use edtech_console::outbound::remote::{Direction, TableQuery};
///
/// let query = TableQuery::new("notices")
///     .eq("is_public", true)
///     .order("created_at", Direction::Descending)
///     .limit(5);
/// assert_eq!(
///     query.to_pairs(),
///     vec![
///         ("select".to_owned(), "*".to_owned()),
///         ("is_public".to_owned(), "eq.true".to_owned()),
///         ("order".to_owned(), "created_at.desc".to_owned()),
///         ("limit".to_owned(), "5".to_owned()),
///     ],
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    table: String,
    columns: String,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl TableQuery {
    /// Select every column of `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_owned(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Restrict the selected columns, e.g. `id,full_name`.
    #[must_use]
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    fn filter(mut self, column: &str, operator: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_owned(), format!("{operator}.{}", value.to_string())));
        self
    }

    /// `column = value`.
    #[must_use]
    pub fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "eq", value)
    }

    /// `column >= value`.
    #[must_use]
    pub fn gte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "gte", value)
    }

    /// `column < value`.
    #[must_use]
    pub fn lt(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "lt", value)
    }

    /// `column <= value`.
    #[must_use]
    pub fn lte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "lte", value)
    }

    /// Append a sort key; earlier keys take precedence.
    #[must_use]
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order.push(format!("{column}.{}", direction.as_str()));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restrict the read to one page window.
    #[must_use]
    pub fn page(mut self, request: PageRequest) -> Self {
        self.limit = Some(request.limit());
        self.offset = (request.offset() > 0).then_some(request.offset());
        self
    }

    /// Query-string pairs in a stable order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_owned(), self.columns.clone())];
        pairs.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            pairs.push(("order".to_owned(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_owned(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_owned(), offset.to_string()));
        }
        pairs
    }
}
