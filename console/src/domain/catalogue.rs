//! Public catalogue entities: programs, notices, vacancies and gallery items.
//!
//! These rows back the marketing pages. They are fetched fresh for every view
//! and never cached or mutated locally.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::Amount;

/// A training program offered by the centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Education levels accepted for enrolment (e.g. `SEE`, `+2`).
    pub eligibility: Vec<String>,
    pub is_active: bool,
}

impl Program {
    /// Whether applicants with `level` may enrol.
    ///
    /// Programs without declared levels accept everyone. Matching ignores case
    /// and surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use edtech_console::domain::Program;
    /// use uuid::Uuid;
    ///
    /// let program = Program {
    ///     id: Uuid::nil(),
    ///     name: "Web Development".into(),
    ///     description: String::new(),
    ///     start_date: None,
    ///     end_date: None,
    ///     eligibility: vec!["+2".into(), "Bachelor".into()],
    ///     is_active: true,
    /// };
    /// assert!(program.is_eligible(" bachelor "));
    /// assert!(!program.is_eligible("SEE"));
    /// ```
    pub fn is_eligible(&self, level: &str) -> bool {
        let wanted = level.trim();
        self.eligibility.is_empty()
            || self
                .eligibility
                .iter()
                .any(|accepted| accepted.trim().eq_ignore_ascii_case(wanted))
    }

    /// Whether the program runs on `date`; open-ended bounds always match.
    pub fn is_running_on(&self, date: NaiveDate) -> bool {
        let started = self.start_date.is_none_or(|start| start <= date);
        let not_ended = self.end_date.is_none_or(|end| date <= end);
        started && not_ended
    }
}

/// A notice published on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub is_holiday: bool,
    pub holiday_date: Option<NaiveDate>,
    pub is_active: bool,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl Notice {
    /// Whether this notice announces a holiday on or after `today`.
    pub fn is_upcoming_holiday(&self, today: NaiveDate) -> bool {
        self.is_holiday && self.holiday_date.is_some_and(|date| date >= today)
    }
}

/// Employment type advertised on a vacancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FullTime => "full time",
            Self::PartTime => "part time",
            Self::Contract => "contract",
            Self::Internship => "internship",
        })
    }
}

/// Advertised salary band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRange {
    pub min: Option<Amount>,
    pub max: Option<Amount>,
}

impl fmt::Display for SalaryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{min} - {max}"),
            (Some(min), None) => write!(f, "from {min}"),
            (None, Some(max)) => write!(f, "up to {max}"),
            (None, None) => f.write_str("negotiable"),
        }
    }
}

/// A job opening listed on the careers page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vacancy {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub department: String,
    pub position_type: PositionType,
    pub salary: SalaryRange,
    pub location: String,
    pub deadline: Option<NaiveDate>,
    pub is_active: bool,
}

impl Vacancy {
    /// Whether applications are accepted on `today`.
    ///
    /// The deadline day itself is still open.
    pub fn is_open_on(&self, today: NaiveDate) -> bool {
        self.is_active && self.deadline.is_none_or(|deadline| today <= deadline)
    }
}

/// Media kind of a gallery item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Backend label for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Infer the kind from a MIME content type.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        let (top, _) = essence.split_once('/')?;
        match top.to_ascii_lowercase().as_str() {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// Error returned when parsing an unknown media kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseMediaKindError;

impl fmt::Display for ParseMediaKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("media kind must be 'image' or 'video'")
    }
}

impl std::error::Error for ParseMediaKindError {}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = ParseMediaKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            _ => Err(ParseMediaKindError),
        }
    }
}

/// A published photo or video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_url: Url,
    pub kind: MediaKind,
    pub tags: Vec<String>,
    pub is_public: bool,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for catalogue predicates.
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
    }

    fn vacancy(is_active: bool, deadline: Option<NaiveDate>) -> Vacancy {
        Vacancy {
            id: Uuid::nil(),
            title: "Trainer".to_owned(),
            description: String::new(),
            department: "Networking".to_owned(),
            position_type: PositionType::FullTime,
            salary: SalaryRange {
                min: None,
                max: None,
            },
            location: "Kathmandu".to_owned(),
            deadline,
            is_active,
        }
    }

    #[rstest]
    #[case(true, None, true)]
    #[case(true, Some(date(2026, 3, 10)), true)]
    #[case(true, Some(date(2026, 3, 9)), false)]
    #[case(false, Some(date(2026, 4, 1)), false)]
    fn vacancy_open_until_deadline_day(
        #[case] is_active: bool,
        #[case] deadline: Option<NaiveDate>,
        #[case] expected: bool,
    ) {
        assert_eq!(vacancy(is_active, deadline).is_open_on(date(2026, 3, 10)), expected);
    }

    #[rstest]
    #[case("image/png", Some(MediaKind::Image))]
    #[case("Video/MP4; codecs=avc1", Some(MediaKind::Video))]
    #[case("application/pdf", None)]
    #[case("garbage", None)]
    fn media_kind_from_content_type(#[case] raw: &str, #[case] expected: Option<MediaKind>) {
        assert_eq!(MediaKind::from_content_type(raw), expected);
    }

    #[test]
    fn program_window_is_inclusive() {
        let program = Program {
            id: Uuid::nil(),
            name: "Networking".to_owned(),
            description: String::new(),
            start_date: Some(date(2026, 1, 1)),
            end_date: Some(date(2026, 3, 31)),
            eligibility: Vec::new(),
            is_active: true,
        };
        assert!(program.is_running_on(date(2026, 1, 1)));
        assert!(program.is_running_on(date(2026, 3, 31)));
        assert!(!program.is_running_on(date(2026, 4, 1)));
        assert!(program.is_eligible("anything"));
    }

    #[test]
    fn salary_range_renders_open_bounds() {
        let band = SalaryRange {
            min: Some(Amount::from_minor(2_500_000)),
            max: None,
        };
        assert_eq!(band.to_string(), "from 25000.00");
    }
}
