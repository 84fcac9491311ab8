//! Core types for Copydesk.
//!
//! This module provides the catalog record types and the JSON bodies
//! exchanged with the local API.

pub mod api;
pub mod id;
pub mod product;

pub use api::*;
pub use id::{ParseProductIdError, ProductId};
pub use product::{Product, ProductImage};
