//! Dashboard summary figures.
//!
//! The dashboard landing page shows four numbers: active students, running
//! classes, the trailing-week attendance rate and the current month's paid
//! revenue. [`DashboardStatsService`] issues the four reads concurrently and
//! folds them into [`DashboardStats`]; any failing read fails the whole load.

use std::sync::Arc;

use chrono::{Datelike, Days, Months, NaiveDate};
use futures_util::future::try_join4;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::Amount;
use crate::domain::Error;
use crate::domain::ports::DashboardStatsSource;

/// Days of attendance included in the rate, counting back from today.
pub const ATTENDANCE_WINDOW_DAYS: u64 = 7;

/// Attendance outcome for one student on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    /// Any other mark, including late or excused.
    Absent,
}

/// One attendance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Whether the student attended.
    pub fn is_present(&self) -> bool {
        self.status == AttendanceStatus::Present
    }
}

/// Settlement state of a fee payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
}

/// One fee payment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub student_id: Uuid,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub payment_date: NaiveDate,
}

/// Flat summary rendered on the dashboard landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: u64,
    pub active_classes: u64,
    /// Whole percent in `0..=100`.
    pub attendance_rate: u8,
    pub monthly_revenue: Amount,
}

/// Percentage of `records` marked present, rounded half up.
///
/// Returns exactly `0` for an empty slice.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use edtech_console::domain::{AttendanceRecord, AttendanceStatus, attendance_rate};
/// use uuid::Uuid;
///
/// let day = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
/// let mark = |status| AttendanceRecord { student_id: Uuid::nil(), date: day, status };
/// let records = [
///     mark(AttendanceStatus::Present),
///     mark(AttendanceStatus::Present),
///     mark(AttendanceStatus::Absent),
/// ];
/// assert_eq!(attendance_rate(&records), 67);
/// assert_eq!(attendance_rate(&[]), 0);
/// ```
pub fn attendance_rate(records: &[AttendanceRecord]) -> u8 {
    let total = records.len() as u64;
    let present = records.iter().filter(|record| record.is_present()).count() as u64;

    // round(100 * present / total) == floor((200 * present + total) / (2 * total))
    let numerator = present.saturating_mul(200).saturating_add(total);
    let percent = numerator
        .checked_div(total.saturating_mul(2))
        .unwrap_or_default();
    u8::try_from(percent).unwrap_or(100)
}

/// Sum of the amounts of `payments`.
pub fn total_revenue(payments: &[PaymentRecord]) -> Amount {
    payments.iter().map(|payment| payment.amount).sum()
}

/// Inclusive start of the attendance window ending on `today`.
pub fn attendance_window_start(today: NaiveDate) -> Option<NaiveDate> {
    today.checked_sub_days(Days::new(ATTENDANCE_WINDOW_DAYS))
}

/// Half-open `[first of month, first of next month)` range containing `today`.
pub fn month_bounds(today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let first = today.with_day(1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some((first, next))
}


/// Loads [`DashboardStats`] from a [`DashboardStatsSource`].
pub struct DashboardStatsService<S: ?Sized> {
    source: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: ?Sized> DashboardStatsService<S> {
    /// Create a service reading from `source`, with windows anchored on `clock`.
    pub fn new(source: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { source, clock }
    }
}

impl<S> DashboardStatsService<S>
where
    S: DashboardStatsSource + ?Sized,
{
    /// Issue the four reads concurrently and fold them into a summary.
    pub async fn load(&self) -> Result<DashboardStats, Error> {
        let today = self.clock.utc().date_naive();
        let since = attendance_window_start(today)
            .ok_or_else(|| Error::internal("attendance window underflows the calendar"))?;
        let (month_start, next_month) = month_bounds(today)
            .ok_or_else(|| Error::internal("payment window overflows the calendar"))?;

        let (total_students, active_classes, attendance, payments) = try_join4(
            self.source.count_active_students(),
            self.source.count_active_classes(),
            self.source.attendance_since(since),
            self.source.paid_payments_between(month_start, next_month),
        )
        .await?;

        let stats = DashboardStats {
            total_students,
            active_classes,
            attendance_rate: attendance_rate(&attendance),
            monthly_revenue: total_revenue(&payments),
        };
        debug!(
            %today,
            attendance_rows = attendance.len(),
            payment_rows = payments.len(),
            attendance_rate = stats.attendance_rate,
            "dashboard stats loaded"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{DashboardStatsSourceError, MockDashboardStatsSource};
    use crate::test_support::FixedClock;
    use rstest::{fixture, rstest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
    }

    fn marks(present: usize, absent: usize) -> Vec<AttendanceRecord> {
        let mark = |status| AttendanceRecord {
            student_id: Uuid::nil(),
            date: date(2026, 3, 10),
            status,
        };
        std::iter::repeat_n(mark(AttendanceStatus::Present), present)
            .chain(std::iter::repeat_n(mark(AttendanceStatus::Absent), absent))
            .collect()
    }

    fn payment(minor: i64) -> PaymentRecord {
        PaymentRecord {
            student_id: Uuid::nil(),
            amount: Amount::from_minor(minor),
            status: PaymentStatus::Paid,
            payment_date: date(2026, 3, 5),
        }
    }

    #[fixture]
    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::at_date(date(2026, 3, 12)))
    }

    #[rstest]
    #[case(7, 3, 70)]
    #[case(0, 0, 0)]
    #[case(0, 4, 0)]
    #[case(4, 0, 100)]
    #[case(2, 1, 67)]
    #[case(1, 2, 33)]
    #[case(1, 1, 50)]
    #[case(1, 7, 13)]
    fn attendance_rate_rounds_half_up(
        #[case] present: usize,
        #[case] absent: usize,
        #[case] expected: u8,
    ) {
        assert_eq!(attendance_rate(&marks(present, absent)), expected);
    }

    #[rstest]
    #[case(date(2026, 3, 12), date(2026, 3, 1), date(2026, 4, 1))]
    #[case(date(2026, 12, 31), date(2026, 12, 1), date(2027, 1, 1))]
    #[case(date(2024, 2, 29), date(2024, 2, 1), date(2024, 3, 1))]
    fn month_bounds_are_half_open(
        #[case] today: NaiveDate,
        #[case] first: NaiveDate,
        #[case] next: NaiveDate,
    ) {
        assert_eq!(month_bounds(today), Some((first, next)));
    }

    #[test]
    fn attendance_window_spans_a_week() {
        assert_eq!(attendance_window_start(date(2026, 3, 3)), Some(date(2026, 2, 24)));
    }

    #[rstest]
    #[tokio::test]
    async fn load_folds_all_four_reads(clock: Arc<dyn Clock>) {
        let mut source = MockDashboardStatsSource::new();
        source
            .expect_count_active_students()
            .times(1)
            .return_once(|| Ok(42));
        source
            .expect_count_active_classes()
            .times(1)
            .return_once(|| Ok(5));
        source
            .expect_attendance_since()
            .withf(|since| *since == date(2026, 3, 5))
            .times(1)
            .return_once(|_| Ok(marks(7, 3)));
        source
            .expect_paid_payments_between()
            .withf(|from, until| *from == date(2026, 3, 1) && *until == date(2026, 4, 1))
            .times(1)
            .return_once(|_, _| Ok(vec![payment(150_000), payment(75_050)]));

        let service = DashboardStatsService::new(Arc::new(source), clock);
        let stats = service.load().await.expect("stats load");

        assert_eq!(
            stats,
            DashboardStats {
                total_students: 42,
                active_classes: 5,
                attendance_rate: 70,
                monthly_revenue: Amount::from_minor(225_050),
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn load_reports_zero_rate_without_attendance(clock: Arc<dyn Clock>) {
        let mut source = MockDashboardStatsSource::new();
        source.expect_count_active_students().return_once(|| Ok(0));
        source.expect_count_active_classes().return_once(|| Ok(0));
        source
            .expect_attendance_since()
            .return_once(|_| Ok(Vec::new()));
        source
            .expect_paid_payments_between()
            .return_once(|_, _| Ok(Vec::new()));

        let stats = DashboardStatsService::new(Arc::new(source), clock)
            .load()
            .await
            .expect("stats load");

        assert_eq!(stats.attendance_rate, 0);
        assert_eq!(stats.monthly_revenue, Amount::ZERO);
    }

    #[rstest]
    #[case(
        DashboardStatsSourceError::connection("offline"),
        ErrorCode::ServiceUnavailable
    )]
    #[case(DashboardStatsSourceError::query("bad column"), ErrorCode::InternalError)]
    #[case(DashboardStatsSourceError::forbidden("rls"), ErrorCode::Forbidden)]
    #[tokio::test]
    async fn any_failing_read_fails_the_load(
        clock: Arc<dyn Clock>,
        #[case] failure: DashboardStatsSourceError,
        #[case] expected: ErrorCode,
    ) {
        let mut source = MockDashboardStatsSource::new();
        source
            .expect_count_active_students()
            .returning(|| Ok(10));
        source
            .expect_count_active_classes()
            .return_once(move || Err(failure));
        source
            .expect_attendance_since()
            .returning(|_| Ok(Vec::new()));
        source
            .expect_paid_payments_between()
            .returning(|_, _| Ok(Vec::new()));

        let error = DashboardStatsService::new(Arc::new(source), clock)
            .load()
            .await
            .expect_err("join fails");

        assert_eq!(error.code(), expected);
    }
}
