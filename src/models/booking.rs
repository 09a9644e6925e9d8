use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Serializes with these field names. Deserializes from the remote API's
/// names and also accepts its own serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BookingWire")]
pub struct Booking {
    pub id: i64,
    pub status: BookingStatus,
    pub customer_id: i64,
    pub customer_name: Option<String>,
    pub provider_id: i64,
    pub provider_name: Option<String>,
    pub description: String,
    pub address: String,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub quoted_price: Option<Decimal>,
    pub final_price: Option<Decimal>,
    pub provider_notes: Option<String>,
    pub customer_notes: Option<String>,
    pub price_distribution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub quoted_at: Option<DateTime<Utc>>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Date used for activity windows: the scheduled date, else creation time.
    pub fn activity_date(&self) -> DateTime<Utc> {
        self.scheduled_date.unwrap_or(self.created_at)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    QuoteGiven,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
    Rejected,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 7] = [
        BookingStatus::Pending,
        BookingStatus::QuoteGiven,
        BookingStatus::Accepted,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::QuoteGiven => "QUOTE_GIVEN",
            BookingStatus::Accepted => "ACCEPTED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::Rejected
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown booking status: {0}")]
pub struct UnknownStatus(pub String);

/// Accepts any casing and `-` in place of `_`, so `"in-progress"`,
/// `"in_progress"` and `"IN_PROGRESS"` all parse the same.
impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "quote_given" => Ok(BookingStatus::QuoteGiven),
            "accepted" => Ok(BookingStatus::Accepted),
            "in_progress" => Ok(BookingStatus::InProgress),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "rejected" => Ok(BookingStatus::Rejected),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidBooking {
    #[error(transparent)]
    Status(#[from] UnknownStatus),

    #[error("booking {0} has no provider")]
    MissingProvider(i64),
}

/// Provider reference as the API has shipped it: a bare id or a nested object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ProviderRef {
    Id(i64),
    Nested { id: i64 },
}

impl ProviderRef {
    fn id(&self) -> i64 {
        match self {
            ProviderRef::Id(id) => *id,
            ProviderRef::Nested { id } => *id,
        }
    }
}

/// Booking as the remote API serializes it. Aliases cover the names `Booking`
/// itself serializes with.
#[derive(Debug, Deserialize)]
struct BookingWire {
    id: i64,
    status: String,
    #[serde(alias = "customer_id")]
    user: i64,
    #[serde(default, alias = "customer_name")]
    user_name: Option<String>,
    #[serde(default)]
    provider_id: Option<i64>,
    #[serde(default)]
    service_provider: Option<ProviderRef>,
    #[serde(default)]
    provider_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    scheduled_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "quoted_price")]
    quote_price: Option<Decimal>,
    #[serde(default)]
    final_price: Option<Decimal>,
    #[serde(default)]
    provider_notes: Option<String>,
    #[serde(default, alias = "customer_notes")]
    user_notes: Option<String>,
    #[serde(default)]
    price_distribution_note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    quoted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    accepted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<BookingWire> for Booking {
    type Error = InvalidBooking;

    fn try_from(wire: BookingWire) -> Result<Self, Self::Error> {
        let status = wire.status.parse()?;
        let provider_id = wire
            .provider_id
            .or_else(|| wire.service_provider.as_ref().map(ProviderRef::id))
            .ok_or(InvalidBooking::MissingProvider(wire.id))?;

        Ok(Booking {
            id: wire.id,
            status,
            customer_id: wire.user,
            customer_name: non_empty(wire.user_name),
            provider_id,
            provider_name: non_empty(wire.provider_name),
            description: wire.description.unwrap_or_default(),
            address: wire.address.unwrap_or_default(),
            scheduled_date: wire.scheduled_date,
            quoted_price: wire.quote_price,
            final_price: wire.final_price,
            provider_notes: non_empty(wire.provider_notes),
            customer_notes: non_empty(wire.user_notes),
            price_distribution_note: non_empty(wire.price_distribution_note),
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            quoted_at: wire.quoted_at,
            accepted_at: wire.accepted_at,
            started_at: wire.started_at,
            completed_at: wire.completed_at,
        })
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
