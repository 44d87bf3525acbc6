//! Repository layer — entity-scoped database operations.

mod check_in;

pub use check_in::*;
