//! Value object trait: equality by value, not identity.
//!
//! Ticket requests, per-type counts and price tables have no identity of their
//! own. Two requests for `ADULT x 2` are the same request.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct TicketRequest {
///     ticket_type: TicketType,
///     count: u32,
/// }
///
/// impl ValueObject for TicketRequest {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
