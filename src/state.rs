use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::AppConfig;
use crate::services::cache::ActivityCache;
use crate::services::clock::Clock;
use crate::services::remote::BookingApi;

pub struct AppState {
    pub config: AppConfig,
    pub api: Box<dyn BookingApi>,
    pub clock: Box<dyn Clock>,
    /// Activity caches keyed by session token.
    pub caches: Mutex<HashMap<String, ActivityCache>>,
}

impl AppState {
    pub fn new(config: AppConfig, api: Box<dyn BookingApi>, clock: Box<dyn Clock>) -> Self {
        Self {
            config,
            api,
            clock,
            caches: Mutex::new(HashMap::new()),
        }
    }

    pub fn caches(&self) -> MutexGuard<'_, HashMap<String, ActivityCache>> {
        self.caches.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
