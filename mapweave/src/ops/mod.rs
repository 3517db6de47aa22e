//! Core operations.
//!
//! This module contains the business logic for mapweave commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod pairs;

pub use check::check;
pub use pairs::pairs;
