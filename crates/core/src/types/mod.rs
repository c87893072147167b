//! Core types for Storechain.
//!
//! This module provides type-safe wrappers for the storefront domain.

pub mod amount;
pub mod id;
pub mod payload;
pub mod record;
pub mod status;

pub use amount::{AmountError, TokenAmount};
pub use id::*;
pub use payload::*;
pub use record::*;
pub use status::OrderStatus;
