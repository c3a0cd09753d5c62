//! # Inkwell Core
//!
//! The domain layer of the Inkwell blogging backend.
//! This crate contains the post ownership rules, the audit message catalog and the
//! audit fan-out logger. It has zero infrastructure dependencies: storage, hashing,
//! tokens and log destinations are reached through the traits in [`ports`].

pub mod audit;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
