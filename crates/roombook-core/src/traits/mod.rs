//! Capabilities the engine consumes, implemented by other crates.

pub mod notifier;
pub mod store;

pub use notifier::{Notifier, TemplateParams};
pub use store::{CollectionSnapshot, DocumentStore, StoredDocument, Subscription};
