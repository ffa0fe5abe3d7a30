//! Job applications against advertised vacancies.

use std::fmt;
use std::sync::Arc;

use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{Email, UserValidationError};
use crate::domain::Error;
use crate::domain::ports::{CatalogueQuery, JobApplicationCommand};

/// Validation errors for an application form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationValidationError {
    EmptyName,
    Email(UserValidationError),
    EmptyPhone,
    EmptyResume,
}

impl fmt::Display for ApplicationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "full name must not be empty"),
            Self::Email(err) => err.fmt(f),
            Self::EmptyPhone => write!(f, "phone must not be empty"),
            Self::EmptyResume => write!(f, "resume must not be empty"),
        }
    }
}

impl std::error::Error for ApplicationValidationError {}

/// Raw application form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub resume: String,
    pub cover_letter: Option<String>,
}

/// A validated application linked to a vacancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub vacancy_id: Uuid,
    pub full_name: String,
    pub email: Email,
    pub phone: String,
    pub resume: String,
    pub cover_letter: Option<String>,
}

fn required(
    value: &str,
    error: ApplicationValidationError,
) -> Result<String, ApplicationValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(error)
    } else {
        Ok(trimmed.to_owned())
    }
}

impl JobApplication {
    /// Validate `draft` for `vacancy_id`.
    ///
    /// Text fields are trimmed; a blank cover letter is dropped.
    pub fn try_new(
        vacancy_id: Uuid,
        draft: JobApplicationDraft,
    ) -> Result<Self, ApplicationValidationError> {
        let full_name = required(&draft.full_name, ApplicationValidationError::EmptyName)?;
        let email = Email::new(&draft.email).map_err(ApplicationValidationError::Email)?;
        let phone = required(&draft.phone, ApplicationValidationError::EmptyPhone)?;
        let resume = required(&draft.resume, ApplicationValidationError::EmptyResume)?;
        let cover_letter = draft
            .cover_letter
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        Ok(Self {
            vacancy_id,
            full_name,
            email,
            phone,
            resume,
            cover_letter,
        })
    }
}



/// Submits applications for open vacancies.
pub struct CareersService<C: ?Sized, J: ?Sized> {
    catalogue: Arc<C>,
    applications: Arc<J>,
    clock: Arc<dyn Clock>,
}

impl<C: ?Sized, J: ?Sized> CareersService<C, J> {
    pub fn new(catalogue: Arc<C>, applications: Arc<J>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalogue,
            applications,
            clock,
        }
    }
}

impl<C, J> CareersService<C, J>
where
    C: CatalogueQuery + ?Sized,
    J: JobApplicationCommand + ?Sized,
{
    /// Validate `draft` and submit it against `vacancy_id`.
    ///
    /// Fails with `not_found` for unknown vacancies and `conflict` for
    /// vacancies that are inactive or past their deadline.
    pub async fn apply(
        &self,
        vacancy_id: Uuid,
        draft: JobApplicationDraft,
    ) -> Result<JobApplication, Error> {
        let application = JobApplication::try_new(vacancy_id, draft)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let vacancy = self
            .catalogue
            .find_vacancy(vacancy_id)
            .await
            .map_err(Error::from)?
            .ok_or_else(|| Error::not_found(format!("vacancy {vacancy_id} not found")))?;

        let today = self.clock.utc().date_naive();
        if !vacancy.is_open_on(today) {
            return Err(Error::conflict(format!(
                "vacancy '{}' is no longer accepting applications",
                vacancy.title
            )));
        }

        self.applications
            .submit(&application)
            .await
            .map_err(Error::from)?;
        info!(%vacancy_id, vacancy = %vacancy.title, "job application submitted");
        Ok(application)
    }
}
