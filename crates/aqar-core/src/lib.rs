//! Core domain + application logic for the Aqar listing relay.
//!
//! This crate is intentionally framework-agnostic. Telegram and the HTTP
//! layer live behind ports (traits) implemented in adapter crates.

pub mod channels;
pub mod config;
pub mod delivery;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod listing;
pub mod logging;
pub mod posting;

pub use errors::{Error, Result};
