//! Driven port for the four dashboard summary reads.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::define_port_error;
use crate::domain::{AttendanceRecord, PaymentRecord};

define_port_error! {
    /// Errors surfaced while reading dashboard figures.
    pub enum DashboardStatsSourceError {
        /// Backend connection could not be established.
        Connection { message } as ServiceUnavailable => "dashboard source unavailable: {message}",
        /// Query failed during execution.
        Query { message } as InternalError => "dashboard query failed: {message}",
        /// The caller lacks permission to read the figures.
        Forbidden { message } as Forbidden => "dashboard query forbidden: {message}",
    }
}

/// Port for the reads folded into [`crate::domain::DashboardStats`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardStatsSource: Send + Sync {
    /// Number of students whose status is active.
    async fn count_active_students(&self) -> Result<u64, DashboardStatsSourceError>;

    /// Number of classes currently running.
    async fn count_active_classes(&self) -> Result<u64, DashboardStatsSourceError>;

    /// Attendance rows dated on or after `since`.
    async fn attendance_since(
        &self,
        since: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, DashboardStatsSourceError>;

    /// Paid payments dated within `[from, until)`.
    async fn paid_payments_between(
        &self,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<PaymentRecord>, DashboardStatsSourceError>;
}
