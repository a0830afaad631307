//! casebridge-sender library
//!
//! Submits interpreted genomics cases from the interpretation request service
//! to a patient registry: fetches and migrates the case, picks one consequence
//! per tiered variant, maps patient, family, phenotype and variant records and
//! writes them in order.

pub mod error;
pub mod models;
pub mod services;
pub mod transport;
pub mod types;

pub use error::{CaseError, RegistryError, UnacceptableReason};
pub use types::{CaseSource, Registry, ReportEventQuery, ReportEventSource};
