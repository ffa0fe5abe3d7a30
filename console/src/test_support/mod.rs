//! Test utilities for the console crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`,
//! through the `test-support` feature). Every port has an in-memory double
//! here so behaviour can be exercised without a backend.

mod catalogue;
mod dashboard;
mod directory;

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use mockable::Clock;

pub use catalogue::InMemoryCatalogue;
pub use dashboard::InMemoryDashboard;
pub use directory::{InMemoryAuth, InMemoryProfiles};

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Midnight UTC on `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::at(date.and_time(NaiveTime::MIN).and_utc())
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("test double mutex poisoned"),
    }
}
