use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::models::{Booking, Role};
use crate::services::remote::RemoteError;
use crate::state::AppState;

/// The two activity lists of one session. Lists are filled from fetches and
/// individual bookings are swapped for the server's copy after a transition.
///
/// `generation` counts recorded transitions. A list fetch only stores its
/// result if no transition was recorded while it was in flight.
#[derive(Debug, Clone)]
pub struct ActivityCache {
    taken: Option<Vec<Booking>>,
    provided: Option<Vec<Booking>>,
    generation: u64,
    loaded_at: DateTime<Utc>,
}

impl ActivityCache {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            taken: None,
            provided: None,
            generation: 0,
            loaded_at: now,
        }
    }

    pub fn list(&self, role: Role) -> Option<&[Booking]> {
        match role {
            Role::Customer => self.taken.as_deref(),
            Role::Provider => self.provided.as_deref(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn store(&mut self, role: Role, bookings: Vec<Booking>, now: DateTime<Utc>) {
        match role {
            Role::Customer => self.taken = Some(bookings),
            Role::Provider => self.provided = Some(bookings),
        }
        self.loaded_at = now;
    }

    /// Returns whether any cached list held the booking.
    pub fn replace_booking(&mut self, updated: &Booking) -> bool {
        let mut found = false;
        for list in [self.taken.as_mut(), self.provided.as_mut()].into_iter().flatten() {
            if let Some(slot) = list.iter_mut().find(|b| b.id == updated.id) {
                *slot = updated.clone();
                found = true;
            }
        }
        found
    }

    /// Applies a transition result and bumps the generation.
    pub fn record(&mut self, updated: &Booking) {
        self.generation += 1;
        if !self.replace_booking(updated) {
            // not loaded yet or not in either list; next read refetches
            self.invalidate();
        }
    }

    pub fn invalidate(&mut self) {
        self.taken = None;
        self.provided = None;
    }

    /// Age is measured from the last list load, not the last read, so a
    /// session's token is rechecked against the remote at least once per `ttl`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.loaded_at)
            .to_std()
            .map_or(false, |age| age > ttl)
    }
}

fn evict_expired(caches: &mut HashMap<String, ActivityCache>, now: DateTime<Utc>, ttl: Duration) {
    let before = caches.len();
    caches.retain(|_, cache| !cache.is_expired(now, ttl));
    let evicted = before - caches.len();
    if evicted > 0 {
        tracing::debug!(evicted, remaining = caches.len(), "evicted expired activity caches");
    }
}

/// Bookings for the session's `role` list, from cache unless `refresh` is set,
/// the list was never loaded, or the session's cache expired.
pub async fn bookings_for(
    state: &Arc<AppState>,
    token: &str,
    role: Role,
    refresh: bool,
) -> Result<Vec<Booking>, RemoteError> {
    let ttl = state.config.cache_ttl;

    let seen = {
        let mut caches = state.caches();
        evict_expired(&mut caches, state.clock.now(), ttl);
        let cache = caches.get(token);
        if !refresh {
            if let Some(list) = cache.and_then(|c| c.list(role)) {
                return Ok(list.to_vec());
            }
        }
        cache.map_or(0, ActivityCache::generation)
    };

    let fresh = state.api.list_bookings(token, role).await?;
    tracing::info!(%role, count = fresh.len(), "loaded activity list");

    let now = state.clock.now();
    let mut caches = state.caches();
    let cache = caches
        .entry(token.to_string())
        .or_insert_with(|| ActivityCache::new(now));
    if cache.generation() == seen {
        cache.store(role, fresh.clone(), now);
    } else {
        tracing::debug!(%role, "transition recorded during list fetch, not caching list");
    }
    Ok(fresh)
}

/// Swaps in the server's copy of a booking after a transition.
pub fn record_update(state: &Arc<AppState>, token: &str, updated: &Booking) {
    let now = state.clock.now();
    let mut caches = state.caches();
    evict_expired(&mut caches, now, state.config.cache_ttl);
    caches
        .entry(token.to_string())
        .or_insert_with(|| ActivityCache::new(now))
        .record(updated);
}
