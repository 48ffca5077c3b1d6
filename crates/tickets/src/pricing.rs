//! Unit prices and order totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cinema_core::{InvalidPurchase, PurchaseResult, Reason, ValueObject};

use crate::ticket::{TicketRequest, TicketType};

pub const DEFAULT_ADULT_PRICE: u64 = 25;
pub const DEFAULT_CHILD_PRICE: u64 = 15;
pub const DEFAULT_INFANT_PRICE: u64 = 0;

/// Unit price per ticket type, in whole currency units.
///
/// A table may leave a type out; pricing a request of that type then fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable(BTreeMap<TicketType, u64>);

impl PriceTable {
    /// A table with no prices at all.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with_price(mut self, ticket_type: TicketType, unit_price: u64) -> Self {
        self.0.insert(ticket_type, unit_price);
        self
    }

    pub fn price_of(&self, ticket_type: TicketType) -> Option<u64> {
        self.0.get(&ticket_type).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TicketType, u64)> + '_ {
        self.0.iter().map(|(t, p)| (*t, *p))
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::empty()
            .with_price(TicketType::Adult, DEFAULT_ADULT_PRICE)
            .with_price(TicketType::Child, DEFAULT_CHILD_PRICE)
            .with_price(TicketType::Infant, DEFAULT_INFANT_PRICE)
    }
}

impl ValueObject for PriceTable {}

/// Sum of `unit price x count` over all requests.
///
/// Pure arithmetic: no business rule is checked here, so this can price an
/// order for display before (or without) validating it.
pub fn calculate_total(requests: &[TicketRequest], prices: &PriceTable) -> PurchaseResult<u64> {
    requests.iter().try_fold(0u64, |total, request| {
        let unit_price = prices
            .price_of(request.ticket_type())
            .ok_or_else(|| InvalidPurchase::missing_price(request.ticket_type().as_str()))?;

        unit_price
            .checked_mul(u64::from(request.count()))
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| InvalidPurchase::new(Reason::AmountOverflow))
    })
}
