//! daily-spend reads a day of transactions from a Tiller Transactions sheet, compares each
//! category's spending with its daily limit and produces a scored report plus prompts for an AI
//! assistant.
//!
//! The analysis itself is synchronous and pure: [`report::analyze`] takes the parsed
//! [`model::Transactions`] and an immutable [`rules::Rules`] value and returns a
//! [`report::Report`]. The surrounding modules read the configuration and the sheet, and save the
//! results.

pub mod aggregate;
mod api;
mod archive;
pub mod args;
pub mod classify;
pub mod commands;
mod config;
mod error;
pub mod evaluate;
pub mod model;
pub mod prompt;
pub mod report;
pub mod rules;
mod stats;
pub mod trends;
pub mod unusual;
mod utils;
pub mod vendors;

#[cfg(test)]
mod test;

pub use api::Mode;
pub use archive::Archive;
pub use config::Config;
pub use error::{Error, Result, ValidationError};
