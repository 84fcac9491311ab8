//! Copydesk Core - Shared types library.
//!
//! This crate provides the types shared by all Copydesk components:
//! - `server` - Local HTTP API and browser UI
//! - `cli` - Terminal client for the same API
//!
//! # Architecture
//!
//! The core crate contains only types and pure state - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product records, identifiers, and the local API's wire types
//! - [`workspace`] - Client-side state container (search, editor, batch selection)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod workspace;

pub use types::*;
pub use workspace::{BatchProgress, SaveRejected, Workspace, product_matches};
