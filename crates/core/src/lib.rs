//! Tu Sport Core - Shared types library.
//!
//! This crate provides common types used across all Tu Sport components:
//! - `api` - REST API serving the public storefront and admin surfaces
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and validation rules - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails, plus the
//!   credential shape rules shared by registration and login

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
