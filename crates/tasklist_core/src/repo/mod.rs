//! Task persistence contract and its SQLite implementation.
//!
//! # Responsibility
//! - Define the four store operations consumed by the list controller.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Store APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Listing order is insertion order.

pub mod task_store;
