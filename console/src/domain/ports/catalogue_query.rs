//! Driven port for the public catalogue pages.

use async_trait::async_trait;
use uuid::Uuid;

use super::define_port_error;
use crate::domain::{GalleryItem, MediaKind, Notice, Program, Vacancy};

define_port_error! {
    /// Errors surfaced while reading catalogue rows.
    pub enum CatalogueQueryError {
        /// Backend connection could not be established.
        Connection { message } as ServiceUnavailable => "catalogue unavailable: {message}",
        /// Query failed during execution.
        Query { message } as InternalError => "catalogue query failed: {message}",
    }
}

/// Port for reading catalogue rows visible to anonymous visitors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Active programs ordered by start date.
    async fn active_programs(&self) -> Result<Vec<Program>, CatalogueQueryError>;

    /// Active public notices, newest first, at most `limit`.
    async fn public_notices(&self, limit: usize) -> Result<Vec<Notice>, CatalogueQueryError>;

    /// Active vacancies, newest first.
    async fn active_vacancies(&self) -> Result<Vec<Vacancy>, CatalogueQueryError>;

    /// One vacancy by id; an absent row is `Ok(None)`.
    async fn find_vacancy(&self, id: Uuid) -> Result<Option<Vacancy>, CatalogueQueryError>;

    /// Public gallery items, optionally restricted to one media kind.
    async fn public_gallery(
        &self,
        kind: Option<MediaKind>,
    ) -> Result<Vec<GalleryItem>, CatalogueQueryError>;
}
