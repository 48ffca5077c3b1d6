//! Cinema ticket purchasing.
//!
//! Business rules for buying cinema tickets, implemented as deterministic
//! domain logic. Seat reservation and payment are external collaborators
//! passed in by the caller (see [`gateway`]).

pub mod config;
pub mod gateway;
pub mod pricing;
pub mod purchase;
pub mod rules;
pub mod seats;
pub mod ticket;

pub use config::{ConfigError, Environment, TicketConfig};
pub use gateway::{
    LoggingPaymentGateway, LoggingSeatReservation, SeatReservationService, TicketPaymentService,
};
pub use pricing::{PriceTable, calculate_total};
pub use purchase::{PurchaseFlow, PurchaseReceipt, PurchaseStage, Quote, TicketService};
pub use rules::{Order, PurchaseRequest, PurchaseRules, RuleValidator, TicketLine};
pub use seats::calculate_seats;
pub use ticket::{TicketCounts, TicketRequest, TicketType};
