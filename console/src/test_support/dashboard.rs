//! In-memory dashboard source.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::lock;
use crate::domain::ports::{DashboardStatsSource, DashboardStatsSourceError};
use crate::domain::{AttendanceRecord, PaymentRecord, PaymentStatus};

#[derive(Default)]
struct Tables {
    active_students: u64,
    active_classes: u64,
    attendance: Vec<AttendanceRecord>,
    payments: Vec<PaymentRecord>,
    failure: Option<DashboardStatsSourceError>,
}

/// Dashboard double that filters its rows the way the backend would.
#[derive(Default)]
pub struct InMemoryDashboard {
    tables: Mutex<Tables>,
}

impl InMemoryDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_counts(&self, active_students: u64, active_classes: u64) {
        let mut tables = lock(&self.tables);
        tables.active_students = active_students;
        tables.active_classes = active_classes;
    }

    pub fn add_attendance(&self, record: AttendanceRecord) {
        lock(&self.tables).attendance.push(record);
    }

    pub fn add_payment(&self, record: PaymentRecord) {
        lock(&self.tables).payments.push(record);
    }

    /// Fail every query with `error` until cleared with `None`.
    pub fn fail_with(&self, error: Option<DashboardStatsSourceError>) {
        lock(&self.tables).failure = error;
    }

    fn check(&self) -> Result<(), DashboardStatsSourceError> {
        lock(&self.tables).failure.clone().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl DashboardStatsSource for InMemoryDashboard {
    async fn count_active_students(&self) -> Result<u64, DashboardStatsSourceError> {
        self.check()?;
        Ok(lock(&self.tables).active_students)
    }

    async fn count_active_classes(&self) -> Result<u64, DashboardStatsSourceError> {
        self.check()?;
        Ok(lock(&self.tables).active_classes)
    }

    async fn attendance_since(
        &self,
        since: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, DashboardStatsSourceError> {
        self.check()?;
        Ok(lock(&self.tables)
            .attendance
            .iter()
            .filter(|record| record.date >= since)
            .cloned()
            .collect())
    }

    async fn paid_payments_between(
        &self,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<PaymentRecord>, DashboardStatsSourceError> {
        self.check()?;
        Ok(lock(&self.tables)
            .payments
            .iter()
            .filter(|payment| payment.status == PaymentStatus::Paid)
            .filter(|payment| from <= payment.payment_date && payment.payment_date < until)
            .cloned()
            .collect())
    }
}
