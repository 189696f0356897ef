//! Core types for Tu Sport.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credentials;
pub mod email;
pub mod id;

pub use credentials::{CredentialError, validate_password, validate_username};
pub use email::{Email, EmailError};
pub use id::*;
