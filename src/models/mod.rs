pub mod actor;
pub mod booking;
pub mod review;
pub mod update;

pub use actor::{Actor, Role};
pub use booking::{Booking, BookingStatus, InvalidBooking, UnknownStatus};
pub use review::Review;
pub use update::{BookingUpdate, TransitionPayload};
