//! # WFA Common Library
//!
//! Shared code for the Word Frequency Analysis services:
//! - API request/response types
//! - Configuration loading
//! - Identifier generation
//! - Common error types

pub mod api;
pub mod config;
pub mod error;
pub mod ids;

pub use error::{Error, Result};
pub use ids::{IdGenerator, UuidGenerator};
