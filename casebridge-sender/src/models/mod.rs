//! Data models for the casebridge sender
//!
//! - [`registry`]: destination registry records and their field constraints
//! - [`source`]: the interpretation request service's case envelope and listing
//! - [`outcome`]: what one case submission produced

pub mod outcome;
pub mod registry;
pub mod source;

pub use outcome::{
    BulkSummary, CaseOutcome, RejectedPerson, RejectedPhenotype, StateTransition, SubmissionState,
};
pub use registry::{
    ChromosomalSex, Consent, Contribution, FieldError, Genotype, Inheritance, Observation,
    Pathogenicity, Patient, Person, PersonRelation, Phenotype, RegistryAssembly, RegistryPerson,
    RegistryRecord, RegisteredSnv, RelationStatus, Snv,
};
pub use source::{CaseEnvelope, CaseRef, CaseSummary};
