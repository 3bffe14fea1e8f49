//! Shared application state.

use crate::activity::ActivityTracker;
use crate::config::Config;
use portico_core::{ProjectArchive, ProviderClient, ProviderKeyStore};
use portico_types::RecentProject;
use std::sync::{Arc, RwLock};

/// Shared application state.
pub struct AppState {
    pub archive: Arc<ProjectArchive>,
    pub keys: Arc<ProviderKeyStore>,
    pub generator: ProviderClient,
    /// HTTP-layer cache of the recent-projects view, refreshed after every
    /// successful registration. The archive itself stays stateless.
    pub recent_cache: RwLock<Vec<RecentProject>>,
    pub activity: ActivityTracker,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> portico_core::Result<Self> {
        let archive = Arc::new(ProjectArchive::open(&config.archive_dir)?);
        let keys = Arc::new(ProviderKeyStore::open(&config.archive_dir)?);
        let generator = ProviderClient::new(keys.clone())?;
        let recent_cache = RwLock::new(archive.recent_projects(config.recent_limit));

        Ok(Self {
            archive,
            keys,
            generator,
            recent_cache,
            activity: ActivityTracker::new(),
            config,
        })
    }

    /// Re-derive the recent-projects cache from the archive.
    pub fn refresh_recent_cache(&self) {
        let fresh = self.archive.recent_projects(self.config.recent_limit);
        *self.recent_cache.write().unwrap() = fresh;
    }
}
