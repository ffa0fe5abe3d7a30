//! Application context shared by every console view.
//!
//! [`ConsoleContext`] owns the session and the port bundle and hands out the
//! use-case services built on them, so views never reach for global state.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use mockable::Clock;

use crate::domain::ports::{
    AuthGateway, CatalogueQuery, DashboardStatsSource, GalleryCommand, JobApplicationCommand,
    ObjectStorage, ProfileQuery, StudentRegistrationCommand,
};
use crate::domain::{
    CareersService, ConsoleRoute, DashboardStatsService, GalleryService, GateDecision,
    NoticeFeed, RegistrationWizard, SessionContext,
};
use crate::outbound::remote::{
    RemoteAuth, RemoteCatalogue, RemoteClient, RemoteCommands, RemoteDashboardStats,
    RemoteProfiles, RemoteStorage,
};

/// Port bundle the context is built from.
#[derive(Clone)]
pub struct ConsolePorts {
    pub auth: Arc<dyn AuthGateway>,
    pub profiles: Arc<dyn ProfileQuery>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub dashboard: Arc<dyn DashboardStatsSource>,
    pub applications: Arc<dyn JobApplicationCommand>,
    pub registrations: Arc<dyn StudentRegistrationCommand>,
    pub gallery: Arc<dyn GalleryCommand>,
    pub storage: Arc<dyn ObjectStorage>,
}

impl ConsolePorts {
    /// Wire every port to the hosted backend through one shared client.
    pub fn remote(client: Arc<RemoteClient>) -> Self {
        let commands = Arc::new(RemoteCommands::new(Arc::clone(&client)));
        Self {
            auth: Arc::new(RemoteAuth::new(Arc::clone(&client))),
            profiles: Arc::new(RemoteProfiles::new(Arc::clone(&client))),
            catalogue: Arc::new(RemoteCatalogue::new(Arc::clone(&client))),
            dashboard: Arc::new(RemoteDashboardStats::new(Arc::clone(&client))),
            applications: commands.clone(),
            registrations: commands.clone(),
            gallery: commands,
            storage: Arc::new(RemoteStorage::new(client)),
        }
    }
}

/// Session plus services for one running console.
pub struct ConsoleContext {
    ports: ConsolePorts,
    session: SessionContext,
    clock: Arc<dyn Clock>,
    gallery_bucket: String,
}

impl ConsoleContext {
    /// Start the session listener and build the context.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        ports: ConsolePorts,
        clock: Arc<dyn Clock>,
        gallery_bucket: impl Into<String>,
    ) -> Self {
        let session = SessionContext::start(Arc::clone(&ports.auth), Arc::clone(&ports.profiles));
        Self {
            ports,
            session,
            clock,
            gallery_bucket: gallery_bucket.into(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn catalogue(&self) -> Arc<dyn CatalogueQuery> {
        Arc::clone(&self.ports.catalogue)
    }

    /// Today's date according to the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    pub fn dashboard(&self) -> DashboardStatsService<dyn DashboardStatsSource> {
        DashboardStatsService::new(Arc::clone(&self.ports.dashboard), Arc::clone(&self.clock))
    }

    pub fn careers(&self) -> CareersService<dyn CatalogueQuery, dyn JobApplicationCommand> {
        CareersService::new(
            Arc::clone(&self.ports.catalogue),
            Arc::clone(&self.ports.applications),
            Arc::clone(&self.clock),
        )
    }

    pub fn gallery(&self) -> GalleryService<dyn ObjectStorage, dyn GalleryCommand> {
        GalleryService::new(
            Arc::clone(&self.ports.storage),
            Arc::clone(&self.ports.gallery),
            self.gallery_bucket.clone(),
        )
    }

    /// A fresh registration wizard dated today.
    pub fn registration(&self) -> RegistrationWizard {
        RegistrationWizard::new(self.today())
    }

    /// Command port that registration wizards submit through.
    pub fn registrations(&self) -> Arc<dyn StudentRegistrationCommand> {
        Arc::clone(&self.ports.registrations)
    }

    /// Start polling public notices; polling stops when the feed is dropped.
    pub fn notice_feed(&self, limit: usize, period: Duration) -> NoticeFeed {
        NoticeFeed::spawn(
            Arc::clone(&self.ports.catalogue),
            Arc::clone(&self.clock),
            limit,
            period,
        )
    }

    /// Gate decision for `route` under the current session.
    pub fn gate(&self, route: ConsoleRoute) -> GateDecision {
        route.gate(&self.session.status())
    }

    /// Stop background tasks owned by the context.
    pub fn shutdown(&self) {
        self.session.shutdown();
    }
}
