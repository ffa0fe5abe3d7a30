//! Pagination primitives shared by the EdTech console.
//!
//! The crate covers two concerns:
//!
//! - client-side paging over an in-memory sequence ([`Pager`],
//!   [`Paginated`]), which never mutates the input and silently ignores
//!   out-of-range navigation;
//! - remote range requests ([`PageRequest`]) and `Content-Range` parsing
//!   ([`ContentRange`]) for counting rows held by the hosted backend.
//!
//! # Example
//!
//! ```
//! use pagination::{PageSize, Paginated};
//!
//! let items: Vec<u32> = (1..=25).collect();
//! let mut page = Paginated::with_page_size(&items, PageSize::default());
//!
//! assert_eq!(page.total_pages(), 3);
//! assert_eq!(page.current_items().first(), Some(&1));
//!
//! page.go_to_page(3);
//! assert_eq!(page.current_items(), &[21, 22, 23, 24, 25]);
//! assert!(!page.has_next_page());
//! ```

mod page_size;
mod pager;
mod range;

pub use page_size::{DEFAULT_PAGE_SIZE, PageSize, PageSizeError};
pub use pager::{PageInfo, Paginated, Pager};
pub use range::{ContentRange, ContentRangeError, PageRequest};
