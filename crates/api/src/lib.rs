//! Client library for the manufacturing operations dashboard.
//!
//! - [`client`]: HTTP core shared by every call
//! - [`endpoints`]: one module per backend resource
//! - [`session`]: sign-in state over the persisted stores
//! - [`view`]: page loaders and cancellation scopes
//! - [`render`]: terminal rendering
//! - [`cli`]: the `mfg-dash` command line

pub mod cli;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod logging;
pub mod render;
pub mod session;
pub mod view;
