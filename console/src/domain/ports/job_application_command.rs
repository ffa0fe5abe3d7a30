//! Driven port for storing job applications.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::JobApplication;

define_port_error! {
    /// Errors surfaced while storing an application.
    pub enum JobApplicationCommandError {
        /// Backend connection could not be established.
        Connection { message } as ServiceUnavailable => "application store unavailable: {message}",
        /// The backend refused the row (policy or constraint).
        Rejected { message } as InvalidRequest => "application rejected: {message}",
    }
}

/// Port for inserting job applications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobApplicationCommand: Send + Sync {
    /// Insert one application.
    async fn submit(&self, application: &JobApplication) -> Result<(), JobApplicationCommandError>;
}
