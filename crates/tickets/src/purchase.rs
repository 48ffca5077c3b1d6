//! Purchase orchestration.
//!
//! A purchase runs once, top to bottom:
//!
//! `Received -> Validated -> Priced -> SeatsReserved -> PaymentTaken -> Complete`
//!
//! Any failing step moves the purchase to `Failed` and surfaces an
//! [`InvalidPurchase`]. Earlier steps are not undone: a failed payment leaves
//! the seat reservation in place.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cinema_core::{AccountId, InvalidPurchase, PurchaseId, PurchaseResult, Reason};

use crate::config::TicketConfig;
use crate::gateway::{SeatReservationService, TicketPaymentService};
use crate::pricing::{PriceTable, calculate_total};
use crate::rules::{Order, PurchaseRequest, PurchaseRules, RuleValidator};
use crate::seats::calculate_seats;
use crate::ticket::{TicketCounts, TicketRequest};

/// Lifecycle of a single purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStage {
    Received,
    Validated,
    Priced,
    SeatsReserved,
    PaymentTaken,
    Complete,
    Failed,
}

impl PurchaseStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, PurchaseStage::Complete | PurchaseStage::Failed)
    }
}

/// Tracks the stage of one purchase and logs every transition.
#[derive(Debug)]
pub struct PurchaseFlow {
    purchase_id: PurchaseId,
    stage: PurchaseStage,
}

impl PurchaseFlow {
    pub fn start(purchase_id: PurchaseId) -> Self {
        Self {
            purchase_id,
            stage: PurchaseStage::Received,
        }
    }

    pub fn purchase_id(&self) -> PurchaseId {
        self.purchase_id
    }

    pub fn stage(&self) -> PurchaseStage {
        self.stage
    }

    /// Record the outcome of the step leading to `next`.
    ///
    /// On success the flow moves to `next`; on error it moves to `Failed` and
    /// the error is passed through untouched.
    pub fn advance<T>(
        &mut self,
        next: PurchaseStage,
        step: PurchaseResult<T>,
    ) -> PurchaseResult<T> {
        if self.stage.is_terminal() {
            return Err(InvalidPurchase::new(Reason::PurchaseFinished));
        }

        match step {
            Ok(value) => {
                tracing::debug!(
                    purchase_id = %self.purchase_id,
                    from = ?self.stage,
                    to = ?next,
                    "purchase advanced"
                );
                self.stage = next;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(
                    purchase_id = %self.purchase_id,
                    failed_at = ?self.stage,
                    attempted = ?next,
                    error = %err,
                    "purchase failed"
                );
                self.stage = PurchaseStage::Failed;
                Err(err)
            }
        }
    }
}

/// Price and seat count of a validated order, without side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub account_id: AccountId,
    pub counts: TicketCounts,
    pub total_amount: u64,
    pub total_seats: u64,
}

/// Outcome of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub purchase_id: PurchaseId,
    pub account_id: AccountId,
    pub total_amount: u64,
    pub total_seats: u64,
    pub completed_at: DateTime<Utc>,
}

/// Entry point for buying tickets.
///
/// Holds configuration and the two collaborators; keeps no per-purchase state,
/// so one instance can serve concurrent callers.
#[derive(Clone)]
pub struct TicketService {
    validator: RuleValidator,
    prices: PriceTable,
    seat_reservation: Arc<dyn SeatReservationService>,
    payment: Arc<dyn TicketPaymentService>,
}

impl core::fmt::Debug for TicketService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TicketService")
            .field("rules", &self.validator.rules())
            .field("prices", &self.prices)
            .finish_non_exhaustive()
    }
}

impl TicketService {
    pub fn new(
        rules: PurchaseRules,
        prices: PriceTable,
        seat_reservation: Arc<dyn SeatReservationService>,
        payment: Arc<dyn TicketPaymentService>,
    ) -> Self {
        Self {
            validator: RuleValidator::new(rules),
            prices,
            seat_reservation,
            payment,
        }
    }

    pub fn from_config(
        config: &TicketConfig,
        seat_reservation: Arc<dyn SeatReservationService>,
        payment: Arc<dyn TicketPaymentService>,
    ) -> Self {
        Self::new(config.rules(), config.prices.clone(), seat_reservation, payment)
    }

    pub fn price_table(&self) -> &PriceTable {
        &self.prices
    }

    pub fn rules(&self) -> PurchaseRules {
        self.validator.rules()
    }

    /// Buy `requests` for `account_id`.
    pub fn purchase_tickets(
        &self,
        account_id: i64,
        requests: &[TicketRequest],
    ) -> PurchaseResult<PurchaseReceipt> {
        self.purchase(&PurchaseRequest::new(account_id, requests))
    }

    /// Validate, price, reserve seats, then take payment.
    ///
    /// Seats are reserved before payment is taken. Neither collaborator is
    /// called unless the order passes every rule.
    pub fn purchase(&self, request: &PurchaseRequest) -> PurchaseResult<PurchaseReceipt> {
        let mut flow = PurchaseFlow::start(PurchaseId::new());
        let _span = tracing::info_span!("purchase", purchase_id = %flow.purchase_id()).entered();

        let order = flow.advance(PurchaseStage::Validated, self.validator.validate(request))?;
        let quote = flow.advance(PurchaseStage::Priced, self.price(&order))?;
        let account_id = order.account_id();

        let reserved = self
            .seat_reservation
            .reserve_seats(account_id, quote.total_seats)
            .map_err(|cause| InvalidPurchase::with_cause(Reason::SeatReservationFailed, cause));
        flow.advance(PurchaseStage::SeatsReserved, reserved)?;

        let paid = self
            .payment
            .make_payment(account_id, quote.total_amount)
            .map_err(|cause| InvalidPurchase::with_cause(Reason::PaymentFailed, cause));
        flow.advance(PurchaseStage::PaymentTaken, paid)?;

        flow.advance(PurchaseStage::Complete, Ok(()))?;

        tracing::info!(
            account_id = %account_id,
            total_amount = quote.total_amount,
            total_seats = quote.total_seats,
            "purchase complete"
        );

        Ok(PurchaseReceipt {
            purchase_id: flow.purchase_id(),
            account_id,
            total_amount: quote.total_amount,
            total_seats: quote.total_seats,
            completed_at: Utc::now(),
        })
    }

    /// Validate and price an order without reserving or charging anything.
    pub fn quote(&self, request: &PurchaseRequest) -> PurchaseResult<Quote> {
        let order = self.validator.validate(request)?;
        self.price(&order)
    }

    fn price(&self, order: &Order) -> PurchaseResult<Quote> {
        Ok(Quote {
            account_id: order.account_id(),
            counts: order.counts(),
            total_amount: calculate_total(order.requests(), &self.prices)?,
            total_seats: calculate_seats(order.requests()),
        })
    }
}
