//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_gateway;
mod catalogue_query;
mod dashboard_stats_source;
mod gallery_command;
mod job_application_command;
mod object_storage;
mod profile_query;
mod student_registration_command;

#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::{AuthGateway, AuthGatewayError};
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::{CatalogueQuery, CatalogueQueryError};
#[cfg(test)]
pub use dashboard_stats_source::MockDashboardStatsSource;
pub use dashboard_stats_source::{DashboardStatsSource, DashboardStatsSourceError};
#[cfg(test)]
pub use gallery_command::MockGalleryCommand;
pub use gallery_command::{GalleryCommand, GalleryCommandError};
#[cfg(test)]
pub use job_application_command::MockJobApplicationCommand;
pub use job_application_command::{JobApplicationCommand, JobApplicationCommandError};
#[cfg(test)]
pub use object_storage::MockObjectStorage;
pub use object_storage::{ObjectStorage, ObjectStorageError, ObjectUpload, StoredObject};
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::{ProfileQuery, ProfileQueryError};
#[cfg(test)]
pub use student_registration_command::MockStudentRegistrationCommand;
pub use student_registration_command::{
    StudentRegistrationCommand, StudentRegistrationCommandError,
};
