//! Catalogue reads backed by the REST interface.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::client::RemoteClient;
use super::dto::{GalleryRow, NoticeRow, ProgramRow, VacancyRow};
use super::error::RemoteError;
use super::query::{Direction, TableQuery};
use crate::domain::ports::{CatalogueQuery, CatalogueQueryError};
use crate::domain::{GalleryItem, MediaKind, Notice, Program, Vacancy};

/// [`CatalogueQuery`] adapter over [`RemoteClient`].
pub struct RemoteCatalogue {
    client: Arc<RemoteClient>,
}

impl RemoteCatalogue {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }
}

fn map_remote_error(error: RemoteError) -> CatalogueQueryError {
    error.into_port_error(CatalogueQueryError::connection, CatalogueQueryError::query)
}

pub(super) fn programs_query() -> TableQuery {
    TableQuery::new("programs")
        .eq("is_active", true)
        .order("start_date", Direction::Ascending)
}

pub(super) fn notices_query(limit: usize) -> TableQuery {
    TableQuery::new("notices")
        .eq("is_active", true)
        .eq("is_public", true)
        .order("created_at", Direction::Descending)
        .limit(limit)
}

pub(super) fn vacancies_query() -> TableQuery {
    TableQuery::new("vacancies")
        .eq("is_active", true)
        .order("created_at", Direction::Descending)
}

pub(super) fn gallery_query(kind: Option<MediaKind>) -> TableQuery {
    let query = TableQuery::new("gallery").eq("is_public", true);
    match kind {
        Some(kind) => query.eq("type", kind),
        None => query,
    }
    .order("created_at", Direction::Descending)
}

#[async_trait]
impl CatalogueQuery for RemoteCatalogue {
    async fn active_programs(&self) -> Result<Vec<Program>, CatalogueQueryError> {
        let rows: Vec<ProgramRow> = self
            .client
            .select(&programs_query())
            .await
            .map_err(map_remote_error)?;
        Ok(rows.into_iter().map(Program::from).collect())
    }

    async fn public_notices(&self, limit: usize) -> Result<Vec<Notice>, CatalogueQueryError> {
        let rows: Vec<NoticeRow> = self
            .client
            .select(&notices_query(limit))
            .await
            .map_err(map_remote_error)?;
        Ok(rows.into_iter().map(Notice::from).collect())
    }

    async fn active_vacancies(&self) -> Result<Vec<Vacancy>, CatalogueQueryError> {
        let rows: Vec<VacancyRow> = self
            .client
            .select(&vacancies_query())
            .await
            .map_err(map_remote_error)?;
        Ok(rows.into_iter().map(Vacancy::from).collect())
    }

    async fn find_vacancy(&self, id: Uuid) -> Result<Option<Vacancy>, CatalogueQueryError> {
        let query = TableQuery::new("vacancies").eq("id", id);
        let row: Option<VacancyRow> = self
            .client
            .select_single(&query)
            .await
            .map_err(map_remote_error)?;
        Ok(row.map(Vacancy::from))
    }

    async fn public_gallery(
        &self,
        kind: Option<MediaKind>,
    ) -> Result<Vec<GalleryItem>, CatalogueQueryError> {
        let rows: Vec<GalleryRow> = self
            .client
            .select(&gallery_query(kind))
            .await
            .map_err(map_remote_error)?;
        Ok(rows.into_iter().map(GalleryItem::from).collect())
    }
}
