//! Repository layer — entity-scoped database operations.

pub mod contract;

pub use contract::*;
