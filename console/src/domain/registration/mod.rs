//! Multi-step student registration.
//!
//! The wizard walks `Personal → Contact → Program → Review`. Moving forward
//! validates the step being left; moving back never validates. Only a wizard
//! sitting on the review step can be submitted, and submission re-validates
//! every step before anything is sent.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{Email, Program, UserValidationError};
use crate::domain::Error;
use crate::domain::ports::StudentRegistrationCommand;

/// Wizard steps in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Personal,
    Contact,
    Program,
    Review,
}

impl WizardStep {
    /// The following step; `Review` is last.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Personal => Some(Self::Contact),
            Self::Contact => Some(Self::Program),
            Self::Program => Some(Self::Review),
            Self::Review => None,
        }
    }

    /// The preceding step; `Personal` is first.
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Personal => None,
            Self::Contact => Some(Self::Personal),
            Self::Program => Some(Self::Contact),
            Self::Review => Some(Self::Program),
        }
    }

    /// One-based position shown as "step n of 4".
    pub const fn number(self) -> u8 {
        match self {
            Self::Personal => 1,
            Self::Contact => 2,
            Self::Program => 3,
            Self::Review => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = RegistrationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(RegistrationError::MissingGender),
        }
    }
}

/// Why a wizard step or submission was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    EmptyName,
    MissingDateOfBirth,
    DateOfBirthInFuture,
    MissingGender,
    Email(UserValidationError),
    EmptyPhone,
    EmptyAddress,
    NoProgramSelected,
    EmptyEducationLevel,
    ProgramInactive { program: String },
    NotEligible { program: String, level: String },
    NotOnReviewStep,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "full name must not be empty"),
            Self::MissingDateOfBirth => write!(f, "date of birth is required"),
            Self::DateOfBirthInFuture => write!(f, "date of birth must not be in the future"),
            Self::MissingGender => write!(f, "gender must be male, female or other"),
            Self::Email(err) => err.fmt(f),
            Self::EmptyPhone => write!(f, "phone must not be empty"),
            Self::EmptyAddress => write!(f, "address must not be empty"),
            Self::NoProgramSelected => write!(f, "select a program"),
            Self::EmptyEducationLevel => write!(f, "education level is required"),
            Self::ProgramInactive { program } => {
                write!(f, "program '{program}' is not accepting registrations")
            }
            Self::NotEligible { program, level } => {
                write!(f, "education level '{level}' is not eligible for '{program}'")
            }
            Self::NotOnReviewStep => {
                write!(f, "registration can only be submitted from the review step")
            }
        }
    }
}

impl std::error::Error for RegistrationError {}

/// Step one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalDetails {
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

/// Step two input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Optional parent or guardian.
    pub guardian_name: String,
}

/// The program chosen on step three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramChoice {
    pub program_id: Uuid,
    pub program_name: String,
    pub education_level: String,
}

/// A complete registration ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRegistration {
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub guardian_name: Option<String>,
    pub program_id: Uuid,
    pub education_level: String,
}

fn non_blank(value: &str, error: RegistrationError) -> Result<String, RegistrationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(error)
    } else {
        Ok(trimmed.to_owned())
    }
}

/// State of one registration in progress.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use edtech_console::domain::{PersonalDetails, RegistrationError, RegistrationWizard, WizardStep};
///
/// let today = NaiveDate::from_ymd_opt(2026, 6, 1).expect("valid date");
/// let mut wizard = RegistrationWizard::new(today);
/// assert_eq!(wizard.advance(), Err(RegistrationError::EmptyName));
///
/// wizard.set_personal(PersonalDetails {
///     full_name: "Asha Rai".into(),
///     date_of_birth: NaiveDate::from_ymd_opt(2004, 2, 14),
///     gender: "female".parse().ok(),
/// });
/// assert_eq!(wizard.advance(), Ok(WizardStep::Contact));
/// assert_eq!(wizard.back(), WizardStep::Personal);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationWizard {
    today: NaiveDate,
    step: WizardStep,
    personal: PersonalDetails,
    contact: ContactDetails,
    program: Option<ProgramChoice>,
}

impl RegistrationWizard {
    /// Start a wizard; `today` bounds the date of birth.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            step: WizardStep::Personal,
            personal: PersonalDetails::default(),
            contact: ContactDetails::default(),
            program: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn personal(&self) -> &PersonalDetails {
        &self.personal
    }

    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    pub fn program(&self) -> Option<&ProgramChoice> {
        self.program.as_ref()
    }

    pub fn set_personal(&mut self, personal: PersonalDetails) {
        self.personal = personal;
    }

    pub fn set_contact(&mut self, contact: ContactDetails) {
        self.contact = contact;
    }

    /// Choose `program` for an applicant with `education_level`.
    ///
    /// The program must be active and accept the level. A refused choice
    /// keeps any previous selection.
    pub fn select_program(
        &mut self,
        program: &Program,
        education_level: &str,
    ) -> Result<(), RegistrationError> {
        let level = non_blank(education_level, RegistrationError::EmptyEducationLevel)?;
        if !program.is_active {
            return Err(RegistrationError::ProgramInactive {
                program: program.name.clone(),
            });
        }
        if !program.is_eligible(&level) {
            return Err(RegistrationError::NotEligible {
                program: program.name.clone(),
                level,
            });
        }
        self.program = Some(ProgramChoice {
            program_id: program.id,
            program_name: program.name.clone(),
            education_level: level,
        });
        Ok(())
    }

    /// Validate the current step and move to the next one.
    ///
    /// On `Review` this validates everything and stays put.
    pub fn advance(&mut self) -> Result<WizardStep, RegistrationError> {
        self.validate_step(self.step)?;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Move to the previous step without validating.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    fn validate_step(&self, step: WizardStep) -> Result<(), RegistrationError> {
        match step {
            WizardStep::Personal => self.validate_personal(),
            WizardStep::Contact => self.validate_contact().map(|_| ()),
            WizardStep::Program => self.validate_program().map(|_| ()),
            WizardStep::Review => self.build().map(|_| ()),
        }
    }

    fn validate_personal(&self) -> Result<(), RegistrationError> {
        non_blank(&self.personal.full_name, RegistrationError::EmptyName)?;
        let born = self
            .personal
            .date_of_birth
            .ok_or(RegistrationError::MissingDateOfBirth)?;
        if born > self.today {
            return Err(RegistrationError::DateOfBirthInFuture);
        }
        self.personal
            .gender
            .ok_or(RegistrationError::MissingGender)
            .map(|_| ())
    }

    fn validate_contact(&self) -> Result<Email, RegistrationError> {
        let email = Email::new(&self.contact.email).map_err(RegistrationError::Email)?;
        non_blank(&self.contact.phone, RegistrationError::EmptyPhone)?;
        non_blank(&self.contact.address, RegistrationError::EmptyAddress)?;
        Ok(email)
    }

    fn validate_program(&self) -> Result<&ProgramChoice, RegistrationError> {
        self.program
            .as_ref()
            .ok_or(RegistrationError::NoProgramSelected)
    }

    /// Assemble the registration, validating every step.
    pub fn build(&self) -> Result<StudentRegistration, RegistrationError> {
        self.validate_personal()?;
        let email = self.validate_contact()?;
        let choice = self.validate_program()?;
        let (Some(date_of_birth), Some(gender)) =
            (self.personal.date_of_birth, self.personal.gender)
        else {
            return Err(RegistrationError::MissingDateOfBirth);
        };
        let guardian = self.contact.guardian_name.trim();
        Ok(StudentRegistration {
            full_name: self.personal.full_name.trim().to_owned(),
            date_of_birth,
            gender,
            email,
            phone: self.contact.phone.trim().to_owned(),
            address: self.contact.address.trim().to_owned(),
            guardian_name: (!guardian.is_empty()).then(|| guardian.to_owned()),
            program_id: choice.program_id,
            education_level: choice.education_level.clone(),
        })
    }

    /// Send the registration; only allowed from the review step.
    ///
    /// Returns the new student id.
    pub async fn submit<R>(&self, command: &R) -> Result<Uuid, Error>
    where
        R: StudentRegistrationCommand + ?Sized,
    {
        if self.step != WizardStep::Review {
            return Err(Error::invalid_request(
                RegistrationError::NotOnReviewStep.to_string(),
            ));
        }
        let registration = self
            .build()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let student_id = command
            .register(&registration)
            .await
            .map_err(Error::from)?;
        info!(%student_id, program_id = %registration.program_id, "student registered");
        Ok(student_id)
    }
}
