//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed entities the console works with and the
//! use cases built on them. Nothing in here performs I/O directly; remote
//! access goes through the traits in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): operator-facing failure with a stable code.
//! - Catalogue rows: `Program`, `Notice`, `Vacancy`, `GalleryItem`.
//! - Session types: `SessionContext`, `SessionStatus`, `SessionSnapshot`.
//! - Use cases: `DashboardStatsService`, `CareersService`, `GalleryService`,
//!   `RegistrationWizard`, `NoticeFeed`.
//! - Routing: `ConsoleRoute`, `RouteAccess`, `GateDecision`, `evaluate`.

pub mod auth;
pub mod careers;
pub mod catalogue;
pub mod dashboard;
pub mod error;
pub mod gallery;
pub mod money;
pub mod notice_feed;
pub mod ports;
pub mod registration;
pub mod role;
pub mod route_gate;
pub mod session;
pub mod user;

pub use self::auth::{AuthSession, LoginCredentials, LoginValidationError, SessionChange};
pub use self::careers::{
    ApplicationValidationError, CareersService, JobApplication, JobApplicationDraft,
};
pub use self::catalogue::{
    GalleryItem, MediaKind, Notice, ParseMediaKindError, PositionType, Program, SalaryRange,
    Vacancy,
};
pub use self::dashboard::{
    AttendanceRecord, AttendanceStatus, DashboardStats, DashboardStatsService, PaymentRecord,
    PaymentStatus, attendance_rate, month_bounds, total_revenue,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::gallery::{
    GALLERY_BUCKET, GalleryService, GalleryUpload, GalleryValidationError, NewGalleryItem,
};
pub use self::money::{Amount, ParseAmountError};
pub use self::notice_feed::{DEFAULT_REFRESH_INTERVAL, NoticeFeed, NoticeFeedState};
pub use self::registration::{
    ContactDetails, Gender, PersonalDetails, ProgramChoice, RegistrationError,
    RegistrationWizard, StudentRegistration, WizardStep,
};
pub use self::role::{ParseRoleError, Role, RoleSet};
pub use self::route_gate::{
    ConsoleRoute, GateDecision, LANDING_PATH, LOGIN_PATH, RouteAccess, evaluate,
};
pub use self::session::{SessionContext, SessionSnapshot, SessionStatus};
pub use self::user::{Email, Profile, UserId, UserValidationError};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use edtech_console::domain::{DomainResult, Error};
///
/// fn load() -> DomainResult<u64> {
///     Err(Error::service_unavailable("backend offline"))
/// }
/// assert!(load().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
