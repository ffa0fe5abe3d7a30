//! Client-side page navigation over an in-memory sequence.
//!
//! [`Pager`] holds only navigation state (page size, current page and the
//! number of items), so it is `Copy` and can be stored independently of the
//! data it pages. [`Paginated`] pairs it with a borrowed slice.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::PageSize;

/// Navigation state for a paged view.
///
/// ## Invariants
/// - `current_page` is 1-based and never below 1.
/// - Navigation requests outside `1..=total_pages()` are ignored.
///
/// # Examples
/// ```
/// use pagination::Pager;
///
/// let mut pager = Pager::new(25);
/// assert_eq!(pager.total_pages(), 3);
///
/// pager.go_to_page(7);
/// assert_eq!(pager.current_page(), 1);
///
/// pager.next_page();
/// assert_eq!(pager.item_range(), 10..20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: PageSize,
    current_page: usize,
    total_items: usize,
}

impl Pager {
    /// Create a pager over `total_items` using the default page size.
    #[must_use]
    pub fn new(total_items: usize) -> Self {
        Self::with_page_size(total_items, PageSize::default())
    }

    /// Create a pager over `total_items` with an explicit page size.
    #[must_use]
    pub const fn with_page_size(total_items: usize, page_size: PageSize) -> Self {
        Self {
            page_size,
            current_page: 1,
            total_items,
        }
    }

    /// Items per page.
    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Current 1-based page number.
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of items being paged.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    /// Page count, `ceil(total_items / page_size)`.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size.get())
    }

    /// Whether a page follows the current one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Whether a page precedes the current one.
    #[must_use]
    pub const fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    /// Jump to `page`; ignored when `page` is outside `1..=total_pages()`.
    pub fn go_to_page(&mut self, page: usize) {
        if (1..=self.total_pages()).contains(&page) {
            self.current_page = page;
        }
    }

    /// Advance one page when possible.
    pub const fn next_page(&mut self) {
        if self.has_next_page() {
            self.current_page = self.current_page.saturating_add(1);
        }
    }

    /// Step back one page when possible.
    pub const fn previous_page(&mut self) {
        if self.has_previous_page() {
            self.current_page = self.current_page.saturating_sub(1);
        }
    }

    /// Return to the first page.
    pub const fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Re-derive state after the underlying sequence changed length.
    ///
    /// The current page is kept when it still exists, otherwise it moves to
    /// the last page (or page 1 when the sequence is empty).
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        let last_page = self.total_pages().max(1);
        if self.current_page > last_page {
            self.current_page = last_page;
        }
    }

    /// Index window of the current page, clamped to the item count.
    #[must_use]
    pub fn item_range(&self) -> Range<usize> {
        let size = self.page_size.get();
        let start = self
            .current_page
            .saturating_sub(1)
            .saturating_mul(size)
            .min(self.total_items);
        let end = start.saturating_add(size).min(self.total_items);
        start..end
    }

    /// Borrow the current page out of `items` without copying.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let Range { start, end } = self.item_range();
        let end = end.min(items.len());
        items.get(start.min(end)..end).unwrap_or_default()
    }

    /// Serialisable summary of the navigation state.
    #[must_use]
    pub const fn page_info(&self) -> PageInfo {
        PageInfo {
            page: self.current_page,
            page_size: self.page_size.get(),
            total_pages: self.total_pages(),
            total_items: self.total_items,
            has_next_page: self.has_next_page(),
            has_previous_page: self.has_previous_page(),
        }
    }
}

/// Snapshot of a pager suitable for rendering or JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Current 1-based page.
    pub page: usize,
    /// Items per page.
    pub page_size: usize,
    /// Page count.
    pub total_pages: usize,
    /// Number of items being paged.
    pub total_items: usize,
    /// Whether a following page exists.
    pub has_next_page: bool,
    /// Whether a preceding page exists.
    pub has_previous_page: bool,
}

/// A borrowed sequence together with its navigation state.
///
/// # Examples
/// ```
/// use pagination::Paginated;
///
/// let names = ["ada", "grace", "linus"];
/// let page = Paginated::new(&names);
/// assert_eq!(page.current_items(), &names);
/// assert_eq!(page.total_pages(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Paginated<'a, T> {
    items: &'a [T],
    pager: Pager,
}

impl<'a, T> Paginated<'a, T> {
    /// Page `items` with the default page size.
    #[must_use]
    pub fn new(items: &'a [T]) -> Self {
        Self::with_page_size(items, PageSize::default())
    }

    /// Page `items` with an explicit page size.
    #[must_use]
    pub const fn with_page_size(items: &'a [T], page_size: PageSize) -> Self {
        Self {
            items,
            pager: Pager::with_page_size(items.len(), page_size),
        }
    }

    /// Swap in a new sequence, keeping the current page when it still exists.
    pub fn replace_items(&mut self, items: &'a [T]) {
        self.items = items;
        self.pager.set_total_items(items.len());
    }

    /// Items on the current page.
    #[must_use]
    pub fn current_items(&self) -> &'a [T] {
        self.pager.slice(self.items)
    }

    /// Navigation state.
    #[must_use]
    pub const fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Current 1-based page number.
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.pager.current_page()
    }

    /// Page count.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.pager.total_pages()
    }

    /// Whether a following page exists.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.pager.has_next_page()
    }

    /// Whether a preceding page exists.
    #[must_use]
    pub const fn has_previous_page(&self) -> bool {
        self.pager.has_previous_page()
    }

    /// See [`Pager::go_to_page`].
    pub fn go_to_page(&mut self, page: usize) {
        self.pager.go_to_page(page);
    }

    /// See [`Pager::next_page`].
    pub const fn next_page(&mut self) {
        self.pager.next_page();
    }

    /// See [`Pager::previous_page`].
    pub const fn previous_page(&mut self) {
        self.pager.previous_page();
    }

    /// See [`Pager::reset`].
    pub const fn reset(&mut self) {
        self.pager.reset();
    }

    /// See [`Pager::page_info`].
    #[must_use]
    pub const fn page_info(&self) -> PageInfo {
        self.pager.page_info()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for page navigation.
    use super::*;
    use rstest::rstest;

    fn size(value: usize) -> PageSize {
        PageSize::new(value).unwrap_or_default()
    }

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(25, 10, 3)]
    #[case(7, 1, 7)]
    fn total_pages_is_ceiling(#[case] items: usize, #[case] page: usize, #[case] expected: usize) {
        assert_eq!(Pager::with_page_size(items, size(page)).total_pages(), expected);
    }

    #[test]
    fn slices_every_page_of_twenty_five_items() {
        let items: Vec<u32> = (1..=25).collect();
        let mut page = Paginated::new(&items);

        assert_eq!(page.current_items(), (1..=10).collect::<Vec<_>>().as_slice());
        page.next_page();
        assert_eq!(page.current_items(), (11..=20).collect::<Vec<_>>().as_slice());
        page.next_page();
        assert_eq!(page.current_items(), &[21, 22, 23, 24, 25]);
        assert!(!page.has_next_page());
        assert!(page.has_previous_page());
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    #[case(usize::MAX)]
    fn out_of_range_pages_are_ignored(#[case] target: usize) {
        let mut pager = Pager::new(25);
        pager.go_to_page(2);
        pager.go_to_page(target);
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn next_and_previous_stop_at_edges() {
        let mut pager = Pager::new(15);
        pager.previous_page();
        assert_eq!(pager.current_page(), 1);
        pager.next_page();
        pager.next_page();
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn reset_returns_to_first_page() {
        let mut pager = Pager::new(40);
        pager.go_to_page(4);
        pager.reset();
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn empty_sequence_has_no_pages_and_empty_slice() {
        let items: Vec<u8> = Vec::new();
        let mut page = Paginated::new(&items);
        page.go_to_page(1);
        page.next_page();
        assert_eq!(page.total_pages(), 0);
        assert_eq!(page.current_page(), 1);
        assert!(page.current_items().is_empty());
        assert!(!page.has_next_page());
    }

    #[test]
    fn shrinking_input_clamps_current_page() {
        let long: Vec<u32> = (0..50).collect();
        let short: Vec<u32> = (0..12).collect();
        let mut page = Paginated::new(&long);
        page.go_to_page(5);

        page.replace_items(&short);
        assert_eq!(page.current_page(), 2);
        assert_eq!(page.current_items(), &[10, 11]);
    }

    #[test]
    fn slice_tolerates_stale_item_count() {
        let items = [1, 2, 3];
        let mut pager = Pager::with_page_size(30, size(10));
        pager.go_to_page(2);
        assert!(pager.slice(&items).is_empty());
    }

    #[test]
    fn page_info_serialises_in_camel_case() {
        let mut pager = Pager::with_page_size(25, size(10));
        pager.go_to_page(3);
        let json = serde_json::to_value(pager.page_info()).unwrap_or_default();
        assert_eq!(json["page"], 3);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["hasNextPage"], false);
        assert_eq!(json["hasPreviousPage"], true);
    }
}
