//! Domain layer for the manufacturing dashboard.
//!
//! This crate contains:
//! - Typed records for every backend resource, with lenient normalization
//! - Schedule grouping (product/operation and machine trees)
//! - Dashboard aggregation (board ranking, machine donut)
//! - Table keyword filtering and sorting

pub mod models;
pub mod services;
