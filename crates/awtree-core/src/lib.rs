//! awtree Core - Foundational types for awtree
//!
//! This crate provides the types that all other awtree crates depend on:
//! - `AwtreeError` - The error taxonomy shared by the exporter and CLI
//! - `Result` alias

mod error;

pub use error::{AwtreeError, Result};
