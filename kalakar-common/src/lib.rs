//! # Kalakar Common Library
//!
//! Shared code for the Kalakar services:
//! - Error type used by configuration and input validation
//! - Configuration loading (CLI → ENV → TOML → compiled defaults)
//! - Supported language table (codes, speech locales, voices)
//! - Bearer-token digest helpers for API authentication

pub mod auth;
pub mod config;
pub mod error;
pub mod languages;

pub use error::{Error, Result};
pub use languages::{Language, SUPPORTED_LANGUAGES};
