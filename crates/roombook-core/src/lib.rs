//! # roombook-core
//!
//! Core crate for Roombook. Contains the capability traits the booking
//! engine consumes (realtime document store, notifier), configuration
//! schemas, typed identifiers, domain events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Roombook crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
