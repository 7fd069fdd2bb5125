//! Day-worker booking pipeline.
//!
//! A booking moves forward through confirmation, approval and payment. It
//! can be cancelled or rejected at any point before it is approved for
//! payment. Cancelled and rejected bookings release the day-worker's date.

use crate::error::CoreError;

crate::define_text_status! {
    /// Status of a day-worker booking.
    BookingStatus {
        AwaitingConfirmation => "awaiting_confirmation",
        Confirmed => "confirmed",
        Approved => "approved",
        SubmittedForPayment => "submitted_for_payment",
        ApprovedForPayment => "approved_for_payment",
        Cancelled => "cancelled",
        Rejected => "rejected",
    }
}

/// Statuses that no longer hold the day-worker's date.
pub const RELEASED_BOOKING_STATUSES: &[BookingStatus] =
    &[BookingStatus::Cancelled, BookingStatus::Rejected];

impl BookingStatus {
    /// Whether the booking still occupies the day-worker on its date.
    pub fn is_live(self) -> bool {
        !RELEASED_BOOKING_STATUSES.contains(&self)
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::ApprovedForPayment | Self::Cancelled | Self::Rejected
        )
    }

    /// The next step of the forward pipeline, if any.
    pub fn next(self) -> Option<BookingStatus> {
        match self {
            Self::AwaitingConfirmation => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Approved),
            Self::Approved => Some(Self::SubmittedForPayment),
            Self::SubmittedForPayment => Some(Self::ApprovedForPayment),
            Self::ApprovedForPayment | Self::Cancelled | Self::Rejected => None,
        }
    }

    /// Check whether a transition from `self` to `to` is valid.
    pub fn can_transition(self, to: BookingStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(to, Self::Cancelled | Self::Rejected) || self.next() == Some(to)
    }

    /// Validate a transition, returning a conflict for invalid ones.
    pub fn validate_transition(self, to: BookingStatus) -> Result<(), CoreError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Booking cannot move from {self} to {to}"
            )))
        }
    }
}

/// Resolve the amount to pay for a booking, in cents.
///
/// An explicit value wins; otherwise the post's configured day rate is used.
pub fn resolve_booking_value(
    explicit_cents: Option<i64>,
    post_day_rate_cents: Option<i64>,
) -> Result<i64, CoreError> {
    let value = explicit_cents.or(post_day_rate_cents).ok_or_else(|| {
        CoreError::Validation(
            "No value given and the post has no day rate configured".to_string(),
        )
    })?;

    if value < 0 {
        return Err(CoreError::Validation(format!(
            "Booking value must not be negative, got {value}"
        )));
    }
    Ok(value)
}
