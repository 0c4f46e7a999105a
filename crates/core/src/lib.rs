//! Liubiljett Core - Shared types library.
//!
//! This crate provides common types used across all Liubiljett components:
//! - `session` - Session accessor for the current person and cart
//! - `cli` - Command-line tools for inspecting the current session
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O and no HTTP clients. This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe resource IDs and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
