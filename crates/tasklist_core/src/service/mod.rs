//! Use-case layer between front-ends and the task store.
//!
//! # Responsibility
//! - Drive store calls from user gestures.
//! - Keep the in-memory row cache aligned with the visual list.

pub mod list_controller;
