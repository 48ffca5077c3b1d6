//! External collaborators invoked by a purchase.
//!
//! Seat allocation and payment processing live outside this crate. A purchase
//! only needs the two capabilities below, handed in at construction time.

use cinema_core::{AccountId, BoxError};

/// Seat-reservation gateway.
pub trait SeatReservationService: Send + Sync {
    /// Reserve `seat_count` seats for the account.
    ///
    /// Any error is fatal for the purchase that made the call.
    fn reserve_seats(&self, account_id: AccountId, seat_count: u64) -> Result<(), BoxError>;
}

/// Payment gateway.
pub trait TicketPaymentService: Send + Sync {
    /// Charge `amount` (whole currency units) to the account.
    ///
    /// Any error is fatal for the purchase that made the call.
    fn make_payment(&self, account_id: AccountId, amount: u64) -> Result<(), BoxError>;
}

/// Seat reservation stand-in that always succeeds and records the call in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSeatReservation;

impl SeatReservationService for LoggingSeatReservation {
    fn reserve_seats(&self, account_id: AccountId, seat_count: u64) -> Result<(), BoxError> {
        tracing::info!(account_id = %account_id, seat_count, "seats reserved");
        Ok(())
    }
}

/// Payment stand-in that always succeeds and records the call in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPaymentGateway;

impl TicketPaymentService for LoggingPaymentGateway {
    fn make_payment(&self, account_id: AccountId, amount: u64) -> Result<(), BoxError> {
        tracing::info!(account_id = %account_id, amount, "payment taken");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_gateways_always_succeed() {
        let account_id = AccountId::try_from(9).unwrap();
        assert!(LoggingSeatReservation.reserve_seats(account_id, 3).is_ok());
        assert!(LoggingPaymentGateway.make_payment(account_id, 75).is_ok());
    }
}
