//! Storechain Core - Shared types library.
//!
//! This crate provides common types used across all Storechain components:
//! - `gateway` - HTTP gateway that persists storefront state on-chain
//! - `cli` - Command-line tools for keys, receipts and contract deployment
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no chain
//! access, no HTTP clients. Canonical entity state lives in the storefront
//! contract; these types describe what goes in and what comes back out.
//!
//! # Modules
//!
//! - [`types`] - Entity IDs, token amounts, order status, write payloads and read records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
