//! Core type definitions used across the Roombook workspace.

pub mod id;

pub use id::*;
