//! Error types for casebridge-sender
//!
//! Severity decides what the orchestrator does:
//! - Per-item registry rejections are collected and the case continues
//! - Everything else ends the case; [`CaseError::is_unacceptable`] tells batch
//!   callers the fault lies in the source data and the next case may proceed

use crate::models::CaseRef;
use crate::services::consequence_selector::SelectionError;
use crate::services::record_mapper::MappingError;
use crate::transport::TransportError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One item of a list write that failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFailure {
    pub index: usize,
    #[serde(default)]
    pub field: Option<String>,
    pub message: String,
}

fn describe(failures: &[RecordFailure]) -> String {
    failures
        .iter()
        .map(|f| match &f.field {
            Some(field) => format!("[{}] {}: {}", f.index, field, f.message),
            None => format!("[{}] {}", f.index, f.message),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Destination registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Records failed client-side validation; nothing was sent
    #[error("Invalid {kind} records: {}", describe(.failures))]
    InvalidRecords {
        kind: &'static str,
        failures: Vec<RecordFailure>,
    },

    /// The registry refused the request
    #[error("Registry rejected {kind} request (HTTP {status}): {message}")]
    Rejected {
        kind: &'static str,
        status: u16,
        message: String,
        failures: Vec<RecordFailure>,
    },

    #[error("Registry transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Unexpected registry response: {0}")]
    UnexpectedResponse(String),
}

impl RegistryError {
    /// The request was refused as invalid, as opposed to not getting through
    pub fn is_item_rejection(&self) -> bool {
        matches!(
            self,
            RegistryError::InvalidRecords { .. } | RegistryError::Rejected { .. }
        )
    }
}

/// Why a case's source data cannot be submitted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnacceptableReason {
    #[error("pedigree has no proband")]
    NoProband,

    #[error("pedigree flags more than one proband: {pedigree_ids:?}")]
    MultipleProbands { pedigree_ids: Vec<u32> },

    #[error("report event {report_event} has no observed variant for the proband")]
    ProbandNotObserved { report_event: String },

    #[error("no report event yields a submittable variant")]
    NoUsableVariants,
}

/// Errors that end the submission of one case
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("Case {case} is unacceptable: {reason}")]
    Unacceptable {
        case: CaseRef,
        reason: UnacceptableReason,
    },

    #[error("Schema error: {0}")]
    Schema(#[from] casebridge_common::Error),

    #[error("Patient registration failed for case {case}: {source}")]
    RegistrationFailed {
        case: CaseRef,
        source: RegistryError,
    },

    #[error("Variant submission failed for case {case}: {source}")]
    VariantSubmissionFailed {
        case: CaseRef,
        source: RegistryError,
    },

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Source service error: {0}")]
    Source(TransportError),

    #[error("Variant archive error: {0}")]
    Archive(TransportError),
}

impl CaseError {
    pub fn is_unacceptable(&self) -> bool {
        matches!(self, CaseError::Unacceptable { .. })
    }

    /// The failure lies with a remote service rather than with the case
    ///
    /// A batch run stops on these; any other error only skips the case.
    pub fn is_infrastructure(&self) -> bool {
        match self {
            CaseError::Source(_) | CaseError::Archive(_) => true,
            CaseError::Registry(source)
            | CaseError::RegistrationFailed { source, .. }
            | CaseError::VariantSubmissionFailed { source, .. } => !source.is_item_rejection(),
            CaseError::Unacceptable { .. }
            | CaseError::Schema(_)
            | CaseError::Selection(_)
            | CaseError::Mapping(_) => false,
        }
    }

    pub fn unacceptable(case: &CaseRef, reason: UnacceptableReason) -> Self {
        CaseError::Unacceptable {
            case: case.clone(),
            reason,
        }
    }
}
