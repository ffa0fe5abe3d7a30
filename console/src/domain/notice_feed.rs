//! Auto-refreshing notice board.
//!
//! A [`NoticeFeed`] polls the catalogue for public notices on a fixed
//! interval and publishes each result on a watch channel. A failed refresh
//! keeps the previous notices and records the error. The polling task stops
//! when the feed is dropped, so nothing is published after its owner is gone.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::Notice;
use crate::domain::Error;
use crate::domain::ports::CatalogueQuery;

/// Default polling period.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// What the notice board currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoticeFeedState {
    pub notices: Vec<Notice>,
    /// Error from the most recent refresh, cleared by the next success.
    pub last_error: Option<Error>,
    /// Completed refresh attempts, successful or not.
    pub refreshes: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl NoticeFeedState {
    /// Holiday notices dated on or after `today`.
    pub fn upcoming_holidays(&self, today: NaiveDate) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(move |notice| notice.is_upcoming_holiday(today))
    }
}


async fn poll<C>(
    catalogue: Arc<C>,
    clock: Arc<dyn Clock>,
    limit: usize,
    period: Duration,
    state: watch::Sender<NoticeFeedState>,
) where
    C: CatalogueQuery + ?Sized,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let result = catalogue.public_notices(limit).await;
        state.send_modify(|current| {
            current.refreshes = current.refreshes.saturating_add(1);
            current.refreshed_at = Some(clock.utc());
            match result {
                Ok(notices) => {
                    debug!(count = notices.len(), "notice board refreshed");
                    current.notices = notices;
                    current.last_error = None;
                }
                Err(error) => {
                    warn!(%error, "notice board refresh failed; keeping previous notices");
                    current.last_error = Some(Error::from(error));
                }
            }
        });
    }
}

/// Handle to a running notice poller.
pub struct NoticeFeed {
    state: watch::Receiver<NoticeFeedState>,
    task: JoinHandle<()>,
}

impl NoticeFeed {
    /// Start polling `catalogue` every `period` for at most `limit` notices.
    ///
    /// The first refresh happens immediately. Must be called from within a
    /// Tokio runtime.
    pub fn spawn<C>(
        catalogue: Arc<C>,
        clock: Arc<dyn Clock>,
        limit: usize,
        period: Duration,
    ) -> Self
    where
        C: CatalogueQuery + ?Sized + 'static,
    {
        let (sender, state) = watch::channel(NoticeFeedState::default());
        let task = tokio::spawn(poll(catalogue, clock, limit, period, sender));
        Self { state, task }
    }

    /// Latest published state.
    pub fn current(&self) -> NoticeFeedState {
        self.state.borrow().clone()
    }

    /// Receiver notified after every refresh.
    pub fn subscribe(&self) -> watch::Receiver<NoticeFeedState> {
        self.state.clone()
    }

    /// Stop polling.
    pub fn stop(&self) {
        self.task.abort();
    }

    /// Whether the poller is still running.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for NoticeFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{CatalogueQueryError, MockCatalogueQuery};
    use mockable::DefaultClock;
    use uuid::Uuid;

    fn notice(title: &str, holiday: Option<NaiveDate>) -> Notice {
        Notice {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            content: String::new(),
            category: "general".to_owned(),
            is_holiday: holiday.is_some(),
            holiday_date: holiday,
            is_active: true,
            is_public: true,
            created_at: Utc::now(),
        }
    }

    fn flaky_catalogue(calls: Arc<AtomicUsize>) -> MockCatalogueQuery {
        let mut catalogue = MockCatalogueQuery::new();
        catalogue
            .expect_public_notices()
            .withf(|limit| *limit == 5)
            .returning(move |_| match calls.fetch_add(1, Ordering::SeqCst) {
                0 => Ok(vec![notice("Exam schedule", None)]),
                _ => Err(CatalogueQueryError::connection("offline")),
            });
        catalogue
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_keeps_previous_notices() {
        let calls = Arc::new(AtomicUsize::new(0));
        let feed = NoticeFeed::spawn(
            Arc::new(flaky_catalogue(Arc::clone(&calls))),
            Arc::new(DefaultClock),
            5,
            Duration::from_secs(30),
        );
        let mut state = feed.subscribe();

        let first = state
            .wait_for(|state| state.refreshes == 1)
            .await
            .expect("feed running")
            .clone();
        assert_eq!(first.notices.len(), 1);
        assert!(first.last_error.is_none());

        let second = state
            .wait_for(|state| state.refreshes == 2)
            .await
            .expect("feed running")
            .clone();
        assert_eq!(second.notices, first.notices);
        assert_eq!(
            second.last_error.map(|error| error.code()),
            Some(ErrorCode::ServiceUnavailable)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_feed_stops_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let feed = NoticeFeed::spawn(
            Arc::new(flaky_catalogue(Arc::clone(&calls))),
            Arc::new(DefaultClock),
            5,
            Duration::from_secs(30),
        );
        let mut state = feed.subscribe();
        state
            .wait_for(|state| state.refreshes == 1)
            .await
            .expect("feed running");

        drop(feed);
        tokio::time::sleep(Duration::from_secs(300)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn upcoming_holidays_ignore_past_dates() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 1).expect("valid date");
        let state = NoticeFeedState {
            notices: vec![
                notice("Dashain", NaiveDate::from_ymd_opt(2026, 10, 20)),
                notice("Teej", NaiveDate::from_ymd_opt(2026, 9, 14)),
                notice("Results", None),
            ],
            ..NoticeFeedState::default()
        };
        let titles: Vec<&str> = state
            .upcoming_holidays(today)
            .map(|notice| notice.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Dashain"]);
    }
}
