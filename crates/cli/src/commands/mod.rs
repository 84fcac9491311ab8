//! Subcommand implementations.
//!
//! Each command loads what it needs from the server into a
//! [`copydesk_core::Workspace`] and applies the same rules the browser does.

pub mod batch;
pub mod health;
pub mod improve;
pub mod products;

use copydesk_core::{ProductId, SaveRejected};
use thiserror::Error;

use crate::api::ClientError;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Product {0} is not in the catalog")]
    UnknownProduct(ProductId),

    #[error("Nothing to save: {0}")]
    Save(#[from] SaveRejected),

    #[error("No products selected")]
    EmptySelection,
}

/// Write one line of command output to stdout.
///
/// Logs go to stderr, so stdout stays pipeable.
#[allow(clippy::print_stdout)]
pub fn emit(line: impl std::fmt::Display) {
    println!("{line}");
}
