//! Driven port for storing student registrations.

use async_trait::async_trait;
use uuid::Uuid;

use super::define_port_error;
use crate::domain::StudentRegistration;

define_port_error! {
    /// Errors surfaced while storing a registration.
    pub enum StudentRegistrationCommandError {
        /// Backend connection could not be established.
        Connection { message } as ServiceUnavailable => "registration store unavailable: {message}",
        /// The backend refused the row (policy or constraint).
        Rejected { message } as InvalidRequest => "registration rejected: {message}",
    }
}

/// Port for inserting student registrations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRegistrationCommand: Send + Sync {
    /// Insert one registration and return the new student id.
    async fn register(
        &self,
        registration: &StudentRegistration,
    ) -> Result<Uuid, StudentRegistrationCommandError>;
}
