use crate::errors::TransitionError;
use crate::models::{Actor, Booking, BookingStatus, TransitionPayload};
use crate::services::remote::BookingApi;
use crate::services::validator;

/// Runs validated transitions against the booking service.
///
/// Nothing is mutated locally: the caller gets the server's copy of the
/// booking back and must replace any cached copy with it.
pub struct TransitionExecutor<'a> {
    api: &'a dyn BookingApi,
    token: &'a str,
}

impl<'a> TransitionExecutor<'a> {
    pub fn new(api: &'a dyn BookingApi, token: &'a str) -> Self {
        Self { api, token }
    }

    pub async fn execute(
        &self,
        booking: &Booking,
        requested: BookingStatus,
        actor: &Actor,
        payload: &TransitionPayload,
    ) -> Result<Booking, TransitionError> {
        let update = match validator::validate(booking, requested, actor, payload) {
            Ok(update) => update,
            Err(e) => {
                tracing::info!(
                    booking_id = booking.id,
                    from = %booking.status,
                    to = %requested,
                    role = %actor.role,
                    error = %e,
                    "transition refused locally"
                );
                return Err(e);
            }
        };

        tracing::info!(
            booking_id = booking.id,
            from = %booking.status,
            to = %requested,
            role = %actor.role,
            "submitting booking transition"
        );

        let updated = self
            .api
            .update_booking(self.token, booking.id, &update)
            .await
            .map_err(|e| {
                tracing::warn!(booking_id = booking.id, error = %e, "booking update failed");
                TransitionError::from(e)
            })?;

        if updated.status != requested {
            tracing::warn!(
                booking_id = booking.id,
                expected = %requested,
                actual = %updated.status,
                "server did not apply transition"
            );
            return Err(TransitionError::RemoteRejected {
                status: 200,
                message: format!(
                    "booking {} is {} on the server, refetch before retrying",
                    updated.id, updated.status
                ),
            });
        }

        Ok(updated)
    }
}
