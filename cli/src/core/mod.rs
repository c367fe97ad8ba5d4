//! # gzbundle Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Infrastructure shared by every command:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the crate-wide `Result` alias
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{GzbundleError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
