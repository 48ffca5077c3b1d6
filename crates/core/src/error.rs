//! Purchase error model.

use thiserror::Error;

/// Boxed cause carried by collaborator failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type used across the purchase layer.
pub type PurchaseResult<T> = Result<T, InvalidPurchase>;

/// Why a purchase was rejected.
///
/// Every rule violation, price lookup failure and collaborator failure maps onto
/// exactly one variant. The `Display` text is stable so it can be shown to end users.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Reason {
    /// Account id absent, zero or negative.
    #[error("invalid account: account id must be a positive integer")]
    InvalidAccount,

    /// No ticket requests, or a missing (null) entry among them.
    #[error("at least one ticket request required")]
    NoTicketRequests,

    /// A single request asked for zero tickets of a type.
    #[error("ticket request was for zero tickets ({ticket_type})")]
    ZeroTickets { ticket_type: String },

    /// The order asks for more tickets than a single purchase allows.
    #[error("{requested} tickets exceeds maximum allowed of {max}")]
    ExceedsMaximum { requested: u64, max: u32 },

    /// Child or infant tickets without any adult ticket.
    #[error("child/infant requires at least one adult")]
    AdultRequired,

    /// More infants than adult laps to sit on.
    #[error("infants exceed adults ({infants} infants, {adults} adults)")]
    InfantsExceedAdults { infants: u64, adults: u64 },

    /// Text that does not name a ticket type.
    #[error("unknown ticket type '{0}': expected ADULT, CHILD or INFANT")]
    UnknownTicketType(String),

    /// Text that is not a `TYPE=COUNT` ticket request.
    #[error("malformed ticket request '{0}': expected TYPE=COUNT")]
    MalformedTicketRequest(String),

    /// A ticket line whose count is not a non-negative integer.
    #[error("ticket count for {ticket_type} must be a non-negative integer")]
    InvalidTicketCount { ticket_type: String },

    /// The price table has no entry for a requested type.
    #[error("missing price for type {ticket_type}")]
    MissingPrice { ticket_type: String },

    /// The total amount does not fit the amount type.
    #[error("total amount overflows")]
    AmountOverflow,

    /// The seat reservation collaborator failed.
    #[error("seat reservation failed")]
    SeatReservationFailed,

    /// The payment collaborator failed.
    #[error("payment failed")]
    PaymentFailed,

    /// A step was attempted on a purchase that already completed or failed.
    #[error("purchase already finished")]
    PurchaseFinished,
}

/// The single error kind surfaced by the purchase engine.
#[derive(Debug, Error)]
#[error("invalid purchase: {reason}")]
pub struct InvalidPurchase {
    reason: Reason,
    #[source]
    cause: Option<BoxError>,
}

impl InvalidPurchase {
    pub fn new(reason: Reason) -> Self {
        Self {
            reason,
            cause: None,
        }
    }

    /// Wrap an underlying failure (e.g. from a collaborator).
    pub fn with_cause(reason: Reason, cause: impl Into<BoxError>) -> Self {
        Self {
            reason,
            cause: Some(cause.into()),
        }
    }

    pub fn reason(&self) -> &Reason {
        &self.reason
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn invalid_account() -> Self {
        Self::new(Reason::InvalidAccount)
    }

    pub fn no_ticket_requests() -> Self {
        Self::new(Reason::NoTicketRequests)
    }

    pub fn zero_tickets(ticket_type: impl Into<String>) -> Self {
        Self::new(Reason::ZeroTickets {
            ticket_type: ticket_type.into(),
        })
    }

    pub fn missing_price(ticket_type: impl Into<String>) -> Self {
        Self::new(Reason::MissingPrice {
            ticket_type: ticket_type.into(),
        })
    }
}

impl From<Reason> for InvalidPurchase {
    fn from(reason: Reason) -> Self {
        Self::new(reason)
    }
}
