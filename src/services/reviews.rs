use std::collections::HashSet;

use crate::models::{Booking, BookingStatus, Review};

/// Completed bookings with `provider_id` that have not been reviewed yet.
pub fn reviewable_bookings(bookings: &[Booking], provider_id: i64, reviews: &[Review]) -> Vec<Booking> {
    let reviewed: HashSet<i64> = reviews.iter().map(|r| r.booking).collect();
    bookings
        .iter()
        .filter(|b| {
            b.provider_id == provider_id
                && b.status == BookingStatus::Completed
                && !reviewed.contains(&b.id)
        })
        .cloned()
        .collect()
}

pub fn has_completed_booking(bookings: &[Booking], provider_id: i64) -> bool {
    bookings
        .iter()
        .any(|b| b.provider_id == provider_id && b.status == BookingStatus::Completed)
}
