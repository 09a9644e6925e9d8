use rust_decimal::Decimal;

use crate::errors::TransitionError;
use crate::models::booking::non_empty;
use crate::models::{Actor, Booking, BookingStatus, BookingUpdate, Role, TransitionPayload};
use crate::services::transitions::{self, Field};

/// Checks a requested transition and builds the update to send.
///
/// Only fields the transition accepts are carried over. Text is trimmed and
/// blank text dropped; prices must be positive to count as present. Completing
/// without a final price bills the quoted price.
pub fn validate(
    booking: &Booking,
    requested: BookingStatus,
    actor: &Actor,
    payload: &TransitionPayload,
) -> Result<BookingUpdate, TransitionError> {
    if booking.status.is_terminal() {
        return Err(TransitionError::TerminalState(booking.status));
    }

    let transition = transitions::find(booking.status, requested, actor.role).ok_or(
        TransitionError::InvalidTransition {
            from: booking.status,
            to: requested,
            role: actor.role,
        },
    )?;

    let party = match actor.role {
        Role::Provider => booking.provider_id,
        Role::Customer => booking.customer_id,
    };
    if actor.id != party {
        return Err(TransitionError::NotParticipant {
            actor_id: actor.id,
            role: actor.role,
        });
    }

    let mut update = BookingUpdate::new(requested);
    if transition.allows(Field::QuotedPrice) {
        update.quoted_price = positive(payload.quoted_price);
    }
    if transition.allows(Field::FinalPrice) {
        update.final_price = positive(payload.final_price);
    }
    if transition.allows(Field::ProviderNotes) {
        update.provider_notes = non_empty(payload.provider_notes.clone());
    }
    if transition.allows(Field::CustomerNotes) {
        update.customer_notes = non_empty(payload.customer_notes.clone());
    }
    if transition.allows(Field::PriceDistributionNote) {
        update.price_distribution_note = non_empty(payload.price_distribution_note.clone());
    }

    if let Some(field) = transition.required.iter().find(|f| !update.has(**f)) {
        return Err(TransitionError::MissingRequiredField(*field));
    }

    if requested == BookingStatus::Completed && update.final_price.is_none() {
        update.final_price = booking.quoted_price;
    }

    Ok(update)
}

fn positive(price: Option<Decimal>) -> Option<Decimal> {
    price.filter(|p| *p > Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::booking;
    use BookingStatus::*;

    const CUSTOMER: i64 = 3;
    const PROVIDER: i64 = 7;

    fn actor(role: Role) -> Actor {
        match role {
            Role::Provider => Actor::provider(PROVIDER),
            Role::Customer => Actor::customer(CUSTOMER),
        }
    }

    fn quote(price: Option<i64>) -> TransitionPayload {
        TransitionPayload {
            quoted_price: price.map(Decimal::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_every_pair_outside_the_table_is_invalid() {
        for from in BookingStatus::ALL.into_iter().filter(|s| !s.is_terminal()) {
            for to in BookingStatus::ALL {
                for role in [Role::Provider, Role::Customer] {
                    if transitions::find(from, to, role).is_some() {
                        continue;
                    }
                    let result = validate(&booking(1, from), to, &actor(role), &quote(Some(100)));
                    assert!(
                        matches!(result, Err(TransitionError::InvalidTransition { .. })),
                        "{from} -> {to} as {role}: {result:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_every_table_edge_validates() {
        for t in transitions::TRANSITIONS {
            let result = validate(&booking(1, t.from), t.to, &actor(t.role), &quote(Some(100)));
            assert!(result.is_ok(), "{:?} -> {:?}: {result:?}", t.from, t.to);
        }
    }

    #[test]
    fn test_terminal_state_rejects_everything() {
        for from in [Completed, Cancelled, Rejected] {
            for to in BookingStatus::ALL {
                for role in [Role::Provider, Role::Customer] {
                    let result = validate(&booking(1, from), to, &actor(role), &quote(Some(100)));
                    assert_eq!(result, Err(TransitionError::TerminalState(from)));
                }
            }
        }
    }

    #[test]
    fn test_quote_requires_positive_price() {
        let pending = booking(1, Pending);
        let provider = actor(Role::Provider);

        for payload in [quote(None), quote(Some(0)), quote(Some(-20))] {
            assert_eq!(
                validate(&pending, QuoteGiven, &provider, &payload),
                Err(TransitionError::MissingRequiredField(Field::QuotedPrice))
            );
        }

        let update = validate(&pending, QuoteGiven, &provider, &quote(Some(150))).unwrap();
        assert_eq!(update.status, QuoteGiven);
        assert_eq!(update.quoted_price, Some(Decimal::from(150)));
    }

    #[test]
    fn test_complete_defaults_final_price_to_quote() {
        let mut in_progress = booking(1, InProgress);
        in_progress.quoted_price = Some(Decimal::from(500));

        let update = validate(
            &in_progress,
            Completed,
            &actor(Role::Provider),
            &TransitionPayload::default(),
        )
        .unwrap();
        assert_eq!(update.final_price, Some(Decimal::from(500)));
    }

    #[test]
    fn test_complete_keeps_explicit_final_price_and_note() {
        let mut in_progress = booking(1, InProgress);
        in_progress.quoted_price = Some(Decimal::from(500));

        let payload = TransitionPayload {
            final_price: Some(Decimal::from(650)),
            price_distribution_note: Some("  extra pipe fittings  ".to_string()),
            ..Default::default()
        };
        let update = validate(&in_progress, Completed, &actor(Role::Provider), &payload).unwrap();
        assert_eq!(update.final_price, Some(Decimal::from(650)));
        assert_eq!(update.price_distribution_note.as_deref(), Some("extra pipe fittings"));
    }

    #[test]
    fn test_non_positive_final_price_falls_back_to_quote() {
        let mut in_progress = booking(1, InProgress);
        in_progress.quoted_price = Some(Decimal::from(500));

        let payload = TransitionPayload {
            final_price: Some(Decimal::ZERO),
            ..Default::default()
        };
        let update = validate(&in_progress, Completed, &actor(Role::Provider), &payload).unwrap();
        assert_eq!(update.final_price, Some(Decimal::from(500)));
    }

    #[test]
    fn test_fields_not_accepted_by_the_edge_are_dropped() {
        let payload = TransitionPayload {
            quoted_price: Some(Decimal::from(999)),
            final_price: Some(Decimal::from(999)),
            provider_notes: Some("sneaky".into()),
            customer_notes: Some("ok".into()),
            price_distribution_note: Some("n/a".into()),
        };
        let update = validate(&booking(1, QuoteGiven), Accepted, &actor(Role::Customer), &payload)
            .unwrap();
        assert_eq!(update, BookingUpdate::new(Accepted));
    }

    #[test]
    fn test_blank_notes_are_dropped() {
        let payload = TransitionPayload {
            provider_notes: Some("   ".into()),
            ..Default::default()
        };
        let update =
            validate(&booking(1, Pending), Rejected, &actor(Role::Provider), &payload).unwrap();
        assert!(update.provider_notes.is_none());
    }

    #[test]
    fn test_only_the_booking_parties_may_act() {
        let result = validate(
            &booking(1, Pending),
            QuoteGiven,
            &Actor::provider(99),
            &quote(Some(150)),
        );
        assert_eq!(
            result,
            Err(TransitionError::NotParticipant { actor_id: 99, role: Role::Provider })
        );

        let result = validate(
            &booking(1, QuoteGiven),
            Accepted,
            &Actor::customer(PROVIDER),
            &TransitionPayload::default(),
        );
        assert!(matches!(result, Err(TransitionError::NotParticipant { .. })));
    }

    #[test]
    fn test_customer_cannot_start_work() {
        let result = validate(
            &booking(1, QuoteGiven),
            InProgress,
            &actor(Role::Customer),
            &TransitionPayload::default(),
        );
        assert_eq!(
            result,
            Err(TransitionError::InvalidTransition {
                from: QuoteGiven,
                to: InProgress,
                role: Role::Customer,
            })
        );
    }
}
