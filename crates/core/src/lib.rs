//! Échoppe Core - Shared types library.
//!
//! This crate provides common types used across all Échoppe components:
//! - `client` - Client-side state layer (auth, cart, orders)
//! - `cli` - Command-line shop client
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
