//! Row inserts for applications, registrations and gallery items.
//!
//! Inserts never read the stored row back. Anonymous registrants cannot
//! select from `students` and the gallery read policy hides private items,
//! so row-level security would refuse `return=representation`. Ids are
//! generated here and sent with the row instead.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use super::client::RemoteClient;
use super::dto::{GalleryInsert, JobApplicationInsert, StudentInsert};
use super::error::RemoteError;
use crate::domain::ports::{
    GalleryCommand, GalleryCommandError, JobApplicationCommand, JobApplicationCommandError,
    StudentRegistrationCommand, StudentRegistrationCommandError,
};
use crate::domain::{GalleryItem, JobApplication, NewGalleryItem, StudentRegistration};

/// Insert adapter over [`RemoteClient`] implementing every command port.
pub struct RemoteCommands {
    client: Arc<RemoteClient>,
}

impl RemoteCommands {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }
}

fn map_application_error(error: RemoteError) -> JobApplicationCommandError {
    error.into_port_error(
        JobApplicationCommandError::connection,
        JobApplicationCommandError::rejected,
    )
}

fn map_registration_error(error: RemoteError) -> StudentRegistrationCommandError {
    error.into_port_error(
        StudentRegistrationCommandError::connection,
        StudentRegistrationCommandError::rejected,
    )
}

fn map_gallery_error(error: RemoteError) -> GalleryCommandError {
    error.into_port_error(GalleryCommandError::connection, GalleryCommandError::rejected)
}

fn stored_gallery_item(id: Uuid, item: &NewGalleryItem) -> GalleryItem {
    GalleryItem {
        id,
        title: item.title.clone(),
        description: item.description.clone(),
        file_url: item.file_url.clone(),
        kind: item.kind,
        tags: item.tags.clone(),
        is_public: item.is_public,
    }
}

#[async_trait]
impl JobApplicationCommand for RemoteCommands {
    async fn submit(&self, application: &JobApplication) -> Result<(), JobApplicationCommandError> {
        self.client
            .insert("job_applications", &JobApplicationInsert::from(application))
            .await
            .map_err(map_application_error)?;
        info!(vacancy_id = %application.vacancy_id, "job application stored");
        Ok(())
    }
}

#[async_trait]
impl StudentRegistrationCommand for RemoteCommands {
    async fn register(
        &self,
        registration: &StudentRegistration,
    ) -> Result<Uuid, StudentRegistrationCommandError> {
        let id = Uuid::new_v4();
        self.client
            .insert("students", &StudentInsert::new(id, registration))
            .await
            .map_err(map_registration_error)?;
        debug!(student_id = %id, "student row inserted");
        Ok(id)
    }
}

#[async_trait]
impl GalleryCommand for RemoteCommands {
    async fn record(&self, item: &NewGalleryItem) -> Result<GalleryItem, GalleryCommandError> {
        let id = Uuid::new_v4();
        self.client
            .insert("gallery", &GalleryInsert::new(id, item))
            .await
            .map_err(map_gallery_error)?;
        debug!(item_id = %id, is_public = item.is_public, "gallery row inserted");
        Ok(stored_gallery_item(id, item))
    }
}
