//! Shared utilities for the manufacturing dashboard client.
//!
//! This crate provides common functionality used across all other crates:
//! - Lenient access to loosely-shaped backend JSON
//! - Timestamp parsing for ISO-ish schedule times
//! - Display formatting for dates and durations
//! - Bearer token claim inspection
//! - Common validation logic

pub mod format;
pub mod jwt;
pub mod lenient;
pub mod time;
pub mod validation;
