//! Core business logic for papyrus.

pub mod services;

pub use services::*;
