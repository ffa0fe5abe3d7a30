//! Dashboard aggregates backed by the REST interface.
//!
//! Counts use exact `HEAD` counts so no rows cross the wire; attendance and
//! payments are fetched with only the columns the aggregates need.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::client::RemoteClient;
use super::dto::{AttendanceRow, PaymentRow};
use super::error::RemoteError;
use super::query::TableQuery;
use crate::domain::ports::{DashboardStatsSource, DashboardStatsSourceError};
use crate::domain::{AttendanceRecord, PaymentRecord};

/// [`DashboardStatsSource`] adapter over [`RemoteClient`].
pub struct RemoteDashboardStats {
    client: Arc<RemoteClient>,
}

impl RemoteDashboardStats {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }
}

fn map_remote_error(error: RemoteError) -> DashboardStatsSourceError {
    if error.is_denied() {
        DashboardStatsSourceError::forbidden(error.to_string())
    } else {
        error.into_port_error(
            DashboardStatsSourceError::connection,
            DashboardStatsSourceError::query,
        )
    }
}

pub(super) fn active_students_query() -> TableQuery {
    TableQuery::new("students").select("id").eq("status", "active")
}

pub(super) fn active_classes_query() -> TableQuery {
    TableQuery::new("classes").select("id").eq("is_active", true)
}

pub(super) fn attendance_query(since: NaiveDate) -> TableQuery {
    TableQuery::new("attendance")
        .select("student_id,date,status")
        .gte("date", since)
}

pub(super) fn payments_query(from: NaiveDate, until: NaiveDate) -> TableQuery {
    TableQuery::new("payments")
        .select("student_id,amount,status,payment_date")
        .eq("status", "paid")
        .gte("payment_date", from)
        .lt("payment_date", until)
}

#[async_trait]
impl DashboardStatsSource for RemoteDashboardStats {
    async fn count_active_students(&self) -> Result<u64, DashboardStatsSourceError> {
        self.client
            .count(&active_students_query())
            .await
            .map_err(map_remote_error)
    }

    async fn count_active_classes(&self) -> Result<u64, DashboardStatsSourceError> {
        self.client
            .count(&active_classes_query())
            .await
            .map_err(map_remote_error)
    }

    async fn attendance_since(
        &self,
        since: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, DashboardStatsSourceError> {
        let rows: Vec<AttendanceRow> = self
            .client
            .select(&attendance_query(since))
            .await
            .map_err(map_remote_error)?;
        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }

    async fn paid_payments_between(
        &self,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<PaymentRecord>, DashboardStatsSourceError> {
        let rows: Vec<PaymentRow> = self
            .client
            .select(&payments_query(from, until))
            .await
            .map_err(map_remote_error)?;
        Ok(rows.into_iter().map(PaymentRecord::from).collect())
    }
}
