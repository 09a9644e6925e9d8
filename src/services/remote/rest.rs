use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::{BookingApi, RemoteError};
use crate::models::{Booking, BookingUpdate, Review, Role};

pub struct RestBookingApi {
    base_url: String,
    client: reqwest::Client,
}

impl RestBookingApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        let resp = request.send().await.map_err(classify)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        resp.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::TimedOut
            } else {
                RemoteError::InvalidResponse {
                    status: status.as_u16(),
                    message: e.to_string(),
                }
            }
        })
    }
}

fn classify(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::TimedOut
    } else {
        RemoteError::Unavailable(err.to_string())
    }
}

/// Best human-readable message from an error body: `detail`, `message` or
/// `error` when present, otherwise the body itself.
fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
        return value.to_string();
    }
    if body.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        body.to_string()
    }
}

/// Decodes list rows one at a time. A row that fails ingress is logged and
/// skipped so one bad booking does not hide the rest.
fn decode_rows(rows: Vec<serde_json::Value>) -> Vec<Booking> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.get("id").and_then(serde_json::Value::as_i64);
            match serde_json::from_value::<Booking>(row) {
                Ok(booking) => Some(booking),
                Err(e) => {
                    tracing::warn!(?id, error = %e, "skipping unreadable booking row");
                    None
                }
            }
        })
        .collect()
}

fn list_scope(role: Role) -> &'static str {
    match role {
        Role::Customer => "user",
        Role::Provider => "provider",
    }
}

#[async_trait]
impl BookingApi for RestBookingApi {
    async fn list_bookings(&self, token: &str, role: Role) -> Result<Vec<Booking>, RemoteError> {
        let request = self
            .client
            .get(self.url("bookings/"))
            .query(&[("type", list_scope(role))])
            .bearer_auth(token);
        let rows: Vec<serde_json::Value> = self.send(request).await?;
        let bookings = decode_rows(rows);
        tracing::debug!(count = bookings.len(), %role, "fetched bookings");
        Ok(bookings)
    }

    async fn fetch_booking(&self, token: &str, id: i64) -> Result<Booking, RemoteError> {
        let request = self
            .client
            .get(self.url(&format!("bookings/{id}/")))
            .bearer_auth(token);
        self.send(request).await
    }

    async fn update_booking(
        &self,
        token: &str,
        id: i64,
        update: &BookingUpdate,
    ) -> Result<Booking, RemoteError> {
        let request = self
            .client
            .put(self.url(&format!("bookings/{id}/")))
            .bearer_auth(token)
            .json(update);
        self.send(request).await
    }

    async fn provider_reviews(
        &self,
        token: &str,
        provider_id: i64,
    ) -> Result<Vec<Review>, RemoteError> {
        let request = self
            .client
            .get(self.url(&format!("providers/{provider_id}/reviews/")))
            .bearer_auth(token);
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let api = RestBookingApi::new("http://127.0.0.1:8000/api/user", Duration::from_secs(5))
            .unwrap();
        assert_eq!(api.url("bookings/4/"), "http://127.0.0.1:8000/api/user/bookings/4/");
    }

    #[test]
    fn test_error_message_prefers_detail() {
        let msg = error_message(
            StatusCode::FORBIDDEN,
            r#"{"detail":"You do not have permission to perform this action."}"#,
        );
        assert_eq!(msg, "You do not have permission to perform this action.");

        let msg = error_message(StatusCode::FORBIDDEN, r#"{"error":"You can only update status if you are the provider"}"#);
        assert_eq!(msg, "You can only update status if you are the provider");
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"quote_price":["A valid number is required."]}"#);
        assert_eq!(msg, r#"{"quote_price":["A valid number is required."]}"#);

        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "  "), "HTTP 502");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "upstream down"), "upstream down");
    }

    #[test]
    fn test_decode_rows_skips_bad_rows() {
        let row = |id: i64, status: &str, provider: Option<i64>| {
            serde_json::json!({
                "id": id,
                "status": status,
                "user": 3,
                "provider_id": provider,
                "created_at": "2025-06-10T08:30:00Z",
                "updated_at": "2025-06-10T08:30:00Z"
            })
        };

        let bookings = decode_rows(vec![
            row(1, "PENDING", Some(7)),
            row(2, "PAID", Some(7)),
            row(3, "ACCEPTED", None),
            serde_json::json!("not a booking"),
            row(4, "completed", Some(7)),
        ]);

        let ids: Vec<i64> = bookings.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_list_scope() {
        assert_eq!(list_scope(Role::Customer), "user");
        assert_eq!(list_scope(Role::Provider), "provider");
    }
}
