//! In-memory catalogue, command and storage double.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;
use uuid::Uuid;

use super::lock;
use crate::domain::ports::{
    CatalogueQuery, CatalogueQueryError, GalleryCommand, GalleryCommandError,
    JobApplicationCommand, JobApplicationCommandError, ObjectStorage, ObjectStorageError,
    ObjectUpload, StoredObject, StudentRegistrationCommand, StudentRegistrationCommandError,
};
use crate::domain::{
    GalleryItem, JobApplication, MediaKind, NewGalleryItem, Notice, Program, StudentRegistration,
    Vacancy,
};

const PUBLIC_BASE: &str = "https://storage.test/public/";

#[derive(Default)]
struct State {
    programs: Vec<Program>,
    notices: Vec<Notice>,
    vacancies: Vec<Vacancy>,
    gallery: Vec<GalleryItem>,
    applications: Vec<JobApplication>,
    registrations: Vec<StudentRegistration>,
    objects: HashMap<String, Vec<u8>>,
}

/// Catalogue tables plus the rows and objects written through commands.
#[derive(Default)]
pub struct InMemoryCatalogue {
    state: Mutex<State>,
}

impl InMemoryCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_program(&self, program: Program) {
        lock(&self.state).programs.push(program);
    }

    pub fn add_notice(&self, notice: Notice) {
        lock(&self.state).notices.push(notice);
    }

    pub fn add_vacancy(&self, vacancy: Vacancy) {
        lock(&self.state).vacancies.push(vacancy);
    }

    pub fn applications(&self) -> Vec<JobApplication> {
        lock(&self.state).applications.clone()
    }

    pub fn registrations(&self) -> Vec<StudentRegistration> {
        lock(&self.state).registrations.clone()
    }

    pub fn gallery(&self) -> Vec<GalleryItem> {
        lock(&self.state).gallery.clone()
    }

    /// Stored object keys as `bucket/path`.
    pub fn object_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = lock(&self.state).objects.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl CatalogueQuery for InMemoryCatalogue {
    async fn active_programs(&self) -> Result<Vec<Program>, CatalogueQueryError> {
        let mut programs: Vec<Program> = lock(&self.state)
            .programs
            .iter()
            .filter(|program| program.is_active)
            .cloned()
            .collect();
        programs.sort_by_key(|program| program.start_date);
        Ok(programs)
    }

    async fn public_notices(&self, limit: usize) -> Result<Vec<Notice>, CatalogueQueryError> {
        let mut notices: Vec<Notice> = lock(&self.state)
            .notices
            .iter()
            .filter(|notice| notice.is_active && notice.is_public)
            .cloned()
            .collect();
        notices.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        notices.truncate(limit);
        Ok(notices)
    }

    async fn active_vacancies(&self) -> Result<Vec<Vacancy>, CatalogueQueryError> {
        Ok(lock(&self.state)
            .vacancies
            .iter()
            .filter(|vacancy| vacancy.is_active)
            .cloned()
            .collect())
    }

    async fn find_vacancy(&self, id: Uuid) -> Result<Option<Vacancy>, CatalogueQueryError> {
        Ok(lock(&self.state)
            .vacancies
            .iter()
            .find(|vacancy| vacancy.id == id)
            .cloned())
    }

    async fn public_gallery(
        &self,
        kind: Option<MediaKind>,
    ) -> Result<Vec<GalleryItem>, CatalogueQueryError> {
        Ok(lock(&self.state)
            .gallery
            .iter()
            .filter(|item| item.is_public && kind.is_none_or(|kind| item.kind == kind))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl JobApplicationCommand for InMemoryCatalogue {
    async fn submit(&self, application: &JobApplication) -> Result<(), JobApplicationCommandError> {
        lock(&self.state).applications.push(application.clone());
        Ok(())
    }
}

#[async_trait]
impl StudentRegistrationCommand for InMemoryCatalogue {
    async fn register(
        &self,
        registration: &StudentRegistration,
    ) -> Result<Uuid, StudentRegistrationCommandError> {
        lock(&self.state).registrations.push(registration.clone());
        Ok(Uuid::new_v4())
    }
}

#[async_trait]
impl GalleryCommand for InMemoryCatalogue {
    async fn record(&self, item: &NewGalleryItem) -> Result<GalleryItem, GalleryCommandError> {
        let stored = GalleryItem {
            id: Uuid::new_v4(),
            title: item.title.clone(),
            description: item.description.clone(),
            file_url: item.file_url.clone(),
            kind: item.kind,
            tags: item.tags.clone(),
            is_public: item.is_public,
        };
        lock(&self.state).gallery.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl ObjectStorage for InMemoryCatalogue {
    async fn upload(&self, object: &ObjectUpload) -> Result<StoredObject, ObjectStorageError> {
        let key = format!("{}/{}", object.bucket, object.path);
        let public_url = Url::parse(PUBLIC_BASE)
            .and_then(|base| base.join(&key))
            .map_err(|error| ObjectStorageError::rejected(error.to_string()))?;
        let mut state = lock(&self.state);
        if state.objects.contains_key(&key) {
            return Err(ObjectStorageError::already_exists(object.path.clone()));
        }
        state.objects.insert(key, object.bytes.clone());
        Ok(StoredObject {
            path: object.path.clone(),
            public_url,
        })
    }
}
