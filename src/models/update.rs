use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::BookingStatus;
use crate::services::transitions::Field;

/// Side-data supplied by the actor alongside a requested transition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransitionPayload {
    #[serde(default)]
    pub quoted_price: Option<Decimal>,
    #[serde(default)]
    pub final_price: Option<Decimal>,
    #[serde(default)]
    pub provider_notes: Option<String>,
    #[serde(default)]
    pub customer_notes: Option<String>,
    #[serde(default)]
    pub price_distribution_note: Option<String>,
}

/// Partial booking sent to the remote API. Field names follow the API; prices
/// go out as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingUpdate {
    pub status: BookingStatus,
    #[serde(
        rename = "quote_price",
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub quoted_price: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub final_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_notes: Option<String>,
    #[serde(rename = "user_notes", skip_serializing_if = "Option::is_none")]
    pub customer_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_distribution_note: Option<String>,
}

impl BookingUpdate {
    pub fn new(status: BookingStatus) -> Self {
        Self {
            status,
            quoted_price: None,
            final_price: None,
            provider_notes: None,
            customer_notes: None,
            price_distribution_note: None,
        }
    }

    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::QuotedPrice => self.quoted_price.is_some(),
            Field::FinalPrice => self.final_price.is_some(),
            Field::ProviderNotes => self.provider_notes.is_some(),
            Field::CustomerNotes => self.customer_notes.is_some(),
            Field::PriceDistributionNote => self.price_distribution_note.is_some(),
        }
    }
}
