//! Document store implementations.

pub mod memory;
