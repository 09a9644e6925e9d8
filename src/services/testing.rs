//! Fixtures shared by unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::AppConfig;
use crate::models::{Booking, BookingStatus, BookingUpdate, Review, Role};
use crate::services::clock::Clock;
use crate::services::remote::{BookingApi, RemoteError};
use crate::state::AppState;

pub fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

/// Five-minute cache TTL.
pub fn config() -> AppConfig {
    AppConfig {
        port: 3000,
        api_base_url: "http://127.0.0.1:8000/api/user/".to_string(),
        request_timeout: Duration::from_secs(5),
        cache_ttl: Duration::from_secs(300),
        cors_allow_origin: None,
    }
}

pub fn state_with(api: MockApi, clock: impl Clock + 'static) -> Arc<AppState> {
    Arc::new(AppState::new(config(), Box::new(api), Box::new(clock)))
}

/// Booking between customer 3 and provider 7.
pub fn booking(id: i64, status: BookingStatus) -> Booking {
    Booking {
        id,
        status,
        customer_id: 3,
        customer_name: Some("asha".to_string()),
        provider_id: 7,
        provider_name: Some("ramesh".to_string()),
        description: "Fix kitchen sink".to_string(),
        address: "Jhamsikhel, Lalitpur".to_string(),
        scheduled_date: None,
        quoted_price: None,
        final_price: None,
        provider_notes: None,
        customer_notes: None,
        price_distribution_note: None,
        created_at: at("2025-06-10T08:30:00Z"),
        updated_at: at("2025-06-10T08:30:00Z"),
        quoted_at: None,
        accepted_at: None,
        started_at: None,
        completed_at: None,
    }
}

/// In-memory booking service that applies updates the way the server does.
#[derive(Default)]
pub struct MockApi {
    pub bookings: Mutex<HashMap<i64, Booking>>,
    pub reviews: Vec<Review>,
    pub updates: Mutex<Vec<(i64, serde_json::Value)>>,
    pub fail_with: Option<RemoteError>,
    /// Accept the update but leave the status untouched, as after a lost race.
    pub ignore_status: bool,
}

impl MockApi {
    pub fn with(bookings: Vec<Booking>) -> Self {
        Self {
            bookings: Mutex::new(bookings.into_iter().map(|b| (b.id, b)).collect()),
            ..Default::default()
        }
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl BookingApi for MockApi {
    async fn list_bookings(&self, _token: &str, role: Role) -> Result<Vec<Booking>, RemoteError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        let mut list: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| match role {
                Role::Customer => b.customer_id == 3,
                Role::Provider => b.provider_id == 7,
            })
            .cloned()
            .collect();
        list.sort_by_key(|b| b.id);
        Ok(list)
    }

    async fn fetch_booking(&self, _token: &str, id: i64) -> Result<Booking, RemoteError> {
        self.bookings
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(RemoteError::Rejected {
                status: 404,
                message: "Not found.".to_string(),
            })
    }

    async fn update_booking(
        &self,
        _token: &str,
        id: i64,
        update: &BookingUpdate,
    ) -> Result<Booking, RemoteError> {
        self.updates
            .lock()
            .unwrap()
            .push((id, serde_json::to_value(update).unwrap()));
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }

        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings.get_mut(&id).ok_or(RemoteError::Rejected {
            status: 404,
            message: "Not found.".to_string(),
        })?;
        if !self.ignore_status {
            booking.status = update.status;
        }
        if update.quoted_price.is_some() {
            booking.quoted_price = update.quoted_price;
        }
        if update.final_price.is_some() {
            booking.final_price = update.final_price;
        }
        Ok(booking.clone())
    }

    async fn provider_reviews(
        &self,
        _token: &str,
        _provider_id: i64,
    ) -> Result<Vec<Review>, RemoteError> {
        Ok(self.reviews.clone())
    }
}
