//! # casebridge common library
//!
//! Shared code for the casebridge case sender:
//! - Canonical case model (pedigree, reported variants, archived report events)
//! - Historical schema versions and the migration chain that upgrades them
//! - Identifier pseudonymization
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod migration;
pub mod model;
pub mod obfuscation;
pub mod schema;

pub use error::{Error, Result};
pub use migration::{migrate, CanonicalRecord, MigrationContext};
pub use obfuscation::hash_id;
pub use schema::{PayloadKind, SchemaVersion};
