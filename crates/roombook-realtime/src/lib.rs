//! # roombook-realtime
//!
//! Implementations of the capabilities the booking engine consumes:
//!
//! - [`store::memory::MemoryDocumentStore`]: a single-process document
//!   store that pushes the full collection to every subscriber on change
//! - [`notification`]: a logging notifier and an HTTP mail-gateway notifier

pub mod notification;
pub mod store;

pub use notification::build_notifier;
pub use store::memory::MemoryDocumentStore;
