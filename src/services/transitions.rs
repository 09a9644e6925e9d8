use serde::Serialize;

use crate::models::{Booking, BookingStatus, Role};

/// Side-data a transition may carry.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    QuotedPrice,
    FinalPrice,
    ProviderNotes,
    CustomerNotes,
    PriceDistributionNote,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::QuotedPrice => "quoted_price",
            Field::FinalPrice => "final_price",
            Field::ProviderNotes => "provider_notes",
            Field::CustomerNotes => "customer_notes",
            Field::PriceDistributionNote => "price_distribution_note",
        }
    }
}

#[derive(Debug)]
pub struct Transition {
    pub from: BookingStatus,
    pub to: BookingStatus,
    pub role: Role,
    pub label: &'static str,
    pub required: &'static [Field],
    pub optional: &'static [Field],
}

impl Transition {
    pub fn allows(&self, field: Field) -> bool {
        self.required.contains(&field) || self.optional.contains(&field)
    }
}

use BookingStatus::*;

// Providers quote or reject a request and drive the work; customers answer a
// quote or withdraw a pending request.
pub static TRANSITIONS: &[Transition] = &[
    Transition {
        from: Pending,
        to: QuoteGiven,
        role: Role::Provider,
        label: "Give Quote",
        required: &[Field::QuotedPrice],
        optional: &[Field::ProviderNotes],
    },
    Transition {
        from: Pending,
        to: Rejected,
        role: Role::Provider,
        label: "Reject",
        required: &[],
        optional: &[Field::ProviderNotes],
    },
    Transition {
        from: Pending,
        to: Cancelled,
        role: Role::Customer,
        label: "Cancel",
        required: &[],
        optional: &[Field::CustomerNotes],
    },
    Transition {
        from: QuoteGiven,
        to: Accepted,
        role: Role::Customer,
        label: "Accept Quote",
        required: &[],
        optional: &[],
    },
    Transition {
        from: QuoteGiven,
        to: Rejected,
        role: Role::Customer,
        label: "Reject Quote",
        required: &[],
        optional: &[Field::CustomerNotes],
    },
    Transition {
        from: Accepted,
        to: InProgress,
        role: Role::Provider,
        label: "Start Service",
        required: &[],
        optional: &[],
    },
    Transition {
        from: InProgress,
        to: Completed,
        role: Role::Provider,
        label: "Complete",
        required: &[],
        optional: &[Field::FinalPrice, Field::PriceDistributionNote],
    },
];

pub fn find(from: BookingStatus, to: BookingStatus, role: Role) -> Option<&'static Transition> {
    TRANSITIONS
        .iter()
        .find(|t| t.from == from && t.to == to && t.role == role)
}

pub fn edges_from(from: BookingStatus, role: Role) -> impl Iterator<Item = &'static Transition> {
    TRANSITIONS
        .iter()
        .filter(move |t| t.from == from && t.role == role)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AvailableAction {
    pub target_status: BookingStatus,
    pub label: &'static str,
    pub required_fields: &'static [Field],
    pub optional_fields: &'static [Field],
}

impl From<&'static Transition> for AvailableAction {
    fn from(t: &'static Transition) -> Self {
        Self {
            target_status: t.to,
            label: t.label,
            required_fields: t.required,
            optional_fields: t.optional,
        }
    }
}

/// Actions the given role may take on the booking, in table order.
pub fn available_actions(booking: &Booking, role: Role) -> Vec<AvailableAction> {
    edges_from(booking.status, role)
        .map(AvailableAction::from)
        .collect()
}
