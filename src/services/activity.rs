use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::models::{Booking, BookingStatus, UnknownStatus};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFilter {
    #[error(transparent)]
    Status(#[from] UnknownStatus),

    #[error("unknown date window: {0}")]
    DateWindow(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Any,
    Only(BookingStatus),
}

impl FromStr for StatusFilter {
    type Err = InvalidFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::Any);
        }
        Ok(StatusFilter::Only(s.parse()?))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateWindow {
    #[default]
    All,
    LastWeek,
    LastMonth,
    LastThreeMonths,
    ThisYear,
}

impl DateWindow {
    fn span(&self) -> Option<Duration> {
        match self {
            DateWindow::LastWeek => Some(Duration::days(7)),
            DateWindow::LastMonth => Some(Duration::days(30)),
            DateWindow::LastThreeMonths => Some(Duration::days(90)),
            DateWindow::All | DateWindow::ThisYear => None,
        }
    }

    /// Trailing windows include both `now - span` and `now`.
    pub fn contains(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            DateWindow::All => true,
            DateWindow::ThisYear => date.year() == now.year(),
            _ => match self.span() {
                Some(span) => date >= now - span && date <= now,
                None => true,
            },
        }
    }
}

impl FromStr for DateWindow {
    type Err = InvalidFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(DateWindow::All),
            "last-week" => Ok(DateWindow::LastWeek),
            "last-month" => Ok(DateWindow::LastMonth),
            "last-3-months" => Ok(DateWindow::LastThreeMonths),
            "this-year" => Ok(DateWindow::ThisYear),
            _ => Err(InvalidFilter::DateWindow(s.to_string())),
        }
    }
}

/// Search and filter criteria for an activity list. Every criterion must hold.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub text: Option<String>,
    pub status: StatusFilter,
    pub window: DateWindow,
}

impl ActivityFilter {
    pub fn matches(&self, booking: &Booking, now: DateTime<Utc>) -> bool {
        if let StatusFilter::Only(status) = self.status {
            if booking.status != status {
                return false;
            }
        }

        if !self.window.contains(booking.activity_date(), now) {
            return false;
        }

        match self.text.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => matches_text(booking, &term.to_lowercase()),
            _ => true,
        }
    }

    /// Keeps matching bookings in input order.
    pub fn apply(&self, items: &[Booking], now: DateTime<Utc>) -> Vec<Booking> {
        items
            .iter()
            .filter(|b| self.matches(b, now))
            .cloned()
            .collect()
    }
}

fn matches_text(booking: &Booking, term: &str) -> bool {
    let fields = [
        Some(booking.description.as_str()),
        Some(booking.address.as_str()),
        booking.provider_notes.as_deref(),
        booking.customer_notes.as_deref(),
        booking.price_distribution_note.as_deref(),
        booking.customer_name.as_deref(),
        booking.provider_name.as_deref(),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(term))
}
