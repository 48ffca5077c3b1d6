//! `cinema-core` — purchase domain building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no collaborators).

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{BoxError, InvalidPurchase, PurchaseResult, Reason};
pub use id::{AccountId, PurchaseId};
pub use value_object::ValueObject;
