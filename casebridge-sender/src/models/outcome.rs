//! Case submission outcome and state machine
//!
//! A submission moves through:
//! FETCHING_CASE → COLLECTING_VARIANTS → REGISTERING_PATIENT → RESOLVING_FAMILY
//! → SUBMITTING_PHENOTYPES → UPDATING_PARENTS → REGISTERING_RELATIVES
//! → SUBMITTING_VARIANTS → SUBMITTED, or to REJECTED from any state.

use super::source::CaseRef;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionState {
    FetchingCase,
    CollectingVariants,
    RegisteringPatient,
    ResolvingFamily,
    SubmittingPhenotypes,
    UpdatingParents,
    RegisteringRelatives,
    SubmittingVariants,
    Submitted,
    Rejected,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateTransition {
    pub old_state: SubmissionState,
    pub new_state: SubmissionState,
    pub transitioned_at: DateTime<Utc>,
}

/// A phenotype that was not accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedPhenotype {
    /// Pseudonymized participant the observation belongs to
    pub participant: String,
    pub term: String,
    pub reason: String,
}

/// A relative that could not be registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedPerson {
    /// Pseudonymized participant
    pub participant: String,
    pub reason: String,
}

/// Everything one successful case submission produced
#[derive(Debug, Clone, Serialize)]
pub struct CaseOutcome {
    pub run_id: Uuid,
    pub case: CaseRef,
    pub patient_id: i64,
    pub person_ids: Vec<i64>,
    pub phenotype_ids: Vec<i64>,
    pub variant_ids: Vec<i64>,
    pub rejected_phenotypes: Vec<RejectedPhenotype>,
    pub rejected_persons: Vec<RejectedPerson>,
    /// Report events dropped for lack of a GRCh37 representation
    pub skipped_report_events: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub transitions: Vec<StateTransition>,
}

/// Result of submitting every ready case in the source listing
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkSummary {
    pub submitted: Vec<CaseRef>,
    pub unacceptable: Vec<(CaseRef, String)>,
    /// Cases whose payloads match no known schema version
    pub unsupported: Vec<(CaseRef, String)>,
    /// Cases rejected for other data problems, including registry rejections
    pub failed: Vec<(CaseRef, String)>,
    /// Listing entries whose id is not `<id>-<version>`
    pub malformed: Vec<String>,
    pub not_ready: usize,
}

impl BulkSummary {
    pub fn skipped(&self) -> usize {
        self.unacceptable.len() + self.unsupported.len() + self.failed.len() + self.malformed.len()
    }
}
