use std::sync::Arc;

use practice_core::DayBoundary;
use storage::Storage;

use crate::Clock;
use crate::catalog::{CatalogLoader, CatalogSource};
use crate::error::CatalogError;
use crate::sessions::SessionStore;
use crate::timer_settings_service::TimerSettingsService;

/// Assembles the session store, catalog loader and settings for the app.
pub struct AppServices {
    session: SessionStore,
    catalog: CatalogLoader,
    timer_settings: TimerSettingsService,
}

impl AppServices {
    /// Restore the persisted session from `storage` and roll the daily
    /// counter over if the last session was on an earlier day.
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock, source: Arc<dyn CatalogSource>) -> Self {
        Self::with_loader(storage, clock, CatalogLoader::new(source), DayBoundary::default())
    }

    /// Like [`AppServices::new`] with an explicit loader and day boundary.
    #[must_use]
    pub fn with_loader(
        storage: &Storage,
        clock: Clock,
        catalog: CatalogLoader,
        days: DayBoundary,
    ) -> Self {
        let mut session =
            SessionStore::restore(clock, Arc::clone(&storage.kv)).with_day_boundary(days);
        session.check_daily_rollover();
        let timer_settings = TimerSettingsService::new(Arc::clone(&storage.kv));

        Self {
            session,
            catalog,
            timer_settings,
        }
    }

    /// Fetch the catalog and hand it to the session.
    ///
    /// On failure the session keeps an empty catalog and the error is returned
    /// for display.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if every fetch attempt failed.
    pub async fn load_catalog(&mut self) -> Result<usize, CatalogError> {
        match self.catalog.load().await {
            Ok(questions) => {
                self.session.ingest_catalog(questions);
                Ok(self.session.view_len())
            }
            Err(err) => {
                tracing::error!(error = %err, "question catalog unavailable");
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    #[must_use]
    pub fn timer_settings(&self) -> &TimerSettingsService {
        &self.timer_settings
    }
}
