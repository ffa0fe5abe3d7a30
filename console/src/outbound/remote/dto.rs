//! DTOs for backend table rows and auth responses.
//!
//! Rows are decoded into these transport shapes first, then mapped into
//! domain records in one pass. Column names follow the backend schema.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::domain::{
    Amount, AttendanceRecord, AttendanceStatus, AuthSession, Email, GalleryItem, Gender,
    JobApplication, MediaKind, NewGalleryItem, Notice, PaymentRecord, PaymentStatus,
    PositionType, Profile, Program, Role, SalaryRange, StudentRegistration, UserId, Vacancy,
};

#[derive(Debug, Deserialize)]
pub(super) struct ProgramRow {
    id: Uuid,
    name: String,
    #[serde(default)]
    description: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    #[serde(default)]
    eligibility: Option<Vec<String>>,
    #[serde(default)]
    is_active: bool,
}

impl From<ProgramRow> for Program {
    fn from(row: ProgramRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description.unwrap_or_default(),
            start_date: row.start_date,
            end_date: row.end_date,
            eligibility: row.eligibility.unwrap_or_default(),
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct NoticeRow {
    id: Uuid,
    title: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    is_holiday: bool,
    holiday_date: Option<NaiveDate>,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    is_public: bool,
    created_at: DateTime<Utc>,
}

impl From<NoticeRow> for Notice {
    fn from(row: NoticeRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content.unwrap_or_default(),
            category: row.category.unwrap_or_else(|| "general".to_owned()),
            is_holiday: row.is_holiday,
            holiday_date: row.holiday_date,
            is_active: row.is_active,
            is_public: row.is_public,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct VacancyRow {
    id: Uuid,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    department: Option<String>,
    position_type: PositionType,
    salary_min: Option<Amount>,
    salary_max: Option<Amount>,
    #[serde(default)]
    location: Option<String>,
    deadline: Option<NaiveDate>,
    #[serde(default)]
    is_active: bool,
}

impl From<VacancyRow> for Vacancy {
    fn from(row: VacancyRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            department: row.department.unwrap_or_default(),
            position_type: row.position_type,
            salary: SalaryRange {
                min: row.salary_min,
                max: row.salary_max,
            },
            location: row.location.unwrap_or_default(),
            deadline: row.deadline,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GalleryRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    file_url: Url,
    #[serde(rename = "type")]
    kind: MediaKind,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    is_public: bool,
}

impl From<GalleryRow> for GalleryItem {
    fn from(row: GalleryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            file_url: row.file_url,
            kind: row.kind,
            tags: row.tags.unwrap_or_default(),
            is_public: row.is_public,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct GalleryInsert<'a> {
    id: Uuid,
    title: &'a str,
    description: Option<&'a str>,
    file_url: &'a str,
    #[serde(rename = "type")]
    kind: MediaKind,
    tags: &'a [String],
    is_public: bool,
}

impl<'a> GalleryInsert<'a> {
    /// Row for `item` under a caller-chosen id.
    pub(super) fn new(id: Uuid, item: &'a NewGalleryItem) -> Self {
        Self {
            id,
            title: &item.title,
            description: item.description.as_deref(),
            file_url: item.file_url.as_str(),
            kind: item.kind,
            tags: &item.tags,
            is_public: item.is_public,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct JobApplicationInsert<'a> {
    vacancy_id: Uuid,
    full_name: &'a str,
    email: &'a str,
    phone: &'a str,
    resume: &'a str,
    cover_letter: Option<&'a str>,
}

impl<'a> From<&'a JobApplication> for JobApplicationInsert<'a> {
    fn from(application: &'a JobApplication) -> Self {
        Self {
            vacancy_id: application.vacancy_id,
            full_name: &application.full_name,
            email: application.email.as_ref(),
            phone: &application.phone,
            resume: &application.resume,
            cover_letter: application.cover_letter.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct StudentInsert<'a> {
    id: Uuid,
    full_name: &'a str,
    date_of_birth: NaiveDate,
    gender: Gender,
    email: &'a str,
    phone: &'a str,
    address: &'a str,
    guardian_name: Option<&'a str>,
    program_id: Uuid,
    education_level: &'a str,
    status: &'static str,
}

impl<'a> StudentInsert<'a> {
    /// Row for `registration` under a caller-chosen id.
    pub(super) fn new(id: Uuid, registration: &'a StudentRegistration) -> Self {
        Self {
            id,
            full_name: &registration.full_name,
            date_of_birth: registration.date_of_birth,
            gender: registration.gender,
            email: registration.email.as_ref(),
            phone: &registration.phone,
            address: &registration.address,
            guardian_name: registration.guardian_name.as_deref(),
            program_id: registration.program_id,
            education_level: &registration.education_level,
            status: "active",
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProfileRow {
    id: String,
    #[serde(default)]
    full_name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    avatar_url: Option<String>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = String;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let user_id = UserId::new(&row.id).map_err(|err| format!("profile {}: {err}", row.id))?;
        Ok(Self {
            user_id,
            full_name: row.full_name.unwrap_or_default(),
            phone: row.phone,
            address: row.address,
            avatar_url: row.avatar_url,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RoleRow {
    pub(super) role: String,
}

impl RoleRow {
    /// Parse the label; unknown labels are skipped by the caller.
    pub(super) fn parse(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AttendanceRow {
    student_id: Uuid,
    date: NaiveDate,
    status: String,
}

/// Anything other than `present` (`absent`, `late`, `excused`, ...) counts
/// as a missed session.
impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        let status = if row.status.trim().eq_ignore_ascii_case("present") {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Absent
        };
        Self {
            student_id: row.student_id,
            date: row.date,
            status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PaymentRow {
    student_id: Uuid,
    amount: Amount,
    status: PaymentStatus,
    payment_date: NaiveDate,
}

impl From<PaymentRow> for PaymentRecord {
    fn from(row: PaymentRow) -> Self {
        Self {
            student_id: row.student_id,
            amount: row.amount,
            status: row.status,
            payment_date: row.payment_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrant<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub(super) access_token: String,
    expires_at: Option<i64>,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    email: Option<String>,
}

impl TokenResponse {
    /// Domain view of the session; the token itself stays with the caller.
    pub(super) fn session(&self) -> Result<AuthSession, String> {
        let user_id = UserId::new(&self.user.id).map_err(|err| format!("auth user id: {err}"))?;
        let email = self
            .user
            .email
            .as_deref()
            .filter(|email| !email.is_empty())
            .map(Email::new)
            .transpose()
            .map_err(|err| format!("auth user email: {err}"))?;
        let expires_at = self
            .expires_at
            .and_then(|seconds| Utc.timestamp_opt(seconds, 0).single());
        Ok(AuthSession {
            user_id,
            email,
            expires_at,
        })
    }
}
