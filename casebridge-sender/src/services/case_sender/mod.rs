//! Case submission orchestrator
//!
//! # State Progression
//! FETCHING_CASE → COLLECTING_VARIANTS → REGISTERING_PATIENT → RESOLVING_FAMILY
//! → SUBMITTING_PHENOTYPES → UPDATING_PARENTS → REGISTERING_RELATIVES
//! → SUBMITTING_VARIANTS → SUBMITTED
//!
//! Any case-fatal error moves the submission to REJECTED.
//!
//! # Phases
//! - **FETCHING_CASE / COLLECTING_VARIANTS** (`phase_collection`): migrate the
//!   request, find the proband, stream report events and choose one consequence
//!   per variant. All of this happens before the first write, so a case with
//!   bad source data leaves nothing behind in the registry.
//! - **REGISTERING_PATIENT ... REGISTERING_RELATIVES** (`phase_family`): patient,
//!   family persons and phenotypes. Single phenotypes and relatives may be
//!   rejected without ending the case.
//! - **SUBMITTING_VARIANTS** (`phase_variants`): deduplicate and submit in one
//!   batch.
//!
//! Bulk submission over the source listing lives in `bulk`.
//!
//! Earlier writes stay in the registry when a later step fails, unless
//! `rollback_on_failure` is set, in which case the created patient is deleted
//! (the registry removes its persons, phenotypes and variants with it).

use crate::error::CaseError;
use crate::models::{
    CaseOutcome, CaseRef, RejectedPerson, RejectedPhenotype, StateTransition, SubmissionState,
};
use crate::services::consequence_selector::SelectionCriteria;
use crate::types::{CaseSource, Registry, ReportEventSource};
use casebridge_common::config::SubmissionConfig;
use chrono::{DateTime, Datelike, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

mod bulk;
mod phase_collection;
mod phase_family;
mod phase_variants;

/// Behaviour switches for one sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionOptions {
    /// Submit phenotypes observed as absent
    pub send_absent_phenotypes: bool,
    /// Reject a case whose justification names no known inheritance
    pub strict_inheritance: bool,
    /// The archive stores pseudonymized participant ids
    pub archive_ids_pseudonymized: bool,
    /// Delete the created patient when a later step fails
    pub rollback_on_failure: bool,
    /// Year ages are computed against
    pub reference_year: i32,
}

impl SubmissionOptions {
    pub fn from_config(config: &SubmissionConfig) -> Self {
        Self {
            send_absent_phenotypes: config.send_absent_phenotypes,
            strict_inheritance: config.strict_inheritance,
            archive_ids_pseudonymized: config.archive_ids_pseudonymized,
            rollback_on_failure: config.rollback_on_failure,
            reference_year: Utc::now().year(),
        }
    }
}

impl Default for SubmissionOptions {
    fn default() -> Self {
        Self::from_config(&SubmissionConfig::default())
    }
}

/// Progress of one case submission
struct Submission {
    run_id: Uuid,
    case: CaseRef,
    state: SubmissionState,
    transitions: Vec<StateTransition>,
    started_at: DateTime<Utc>,
    patient_id: Option<i64>,
    person_ids: Vec<i64>,
    phenotype_ids: Vec<i64>,
    variant_ids: Vec<i64>,
    rejected_phenotypes: Vec<RejectedPhenotype>,
    rejected_persons: Vec<RejectedPerson>,
    skipped_report_events: usize,
}

impl Submission {
    fn new(case: CaseRef) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            case,
            state: SubmissionState::FetchingCase,
            transitions: Vec::new(),
            started_at: Utc::now(),
            patient_id: None,
            person_ids: Vec::new(),
            phenotype_ids: Vec::new(),
            variant_ids: Vec::new(),
            rejected_phenotypes: Vec::new(),
            rejected_persons: Vec::new(),
            skipped_report_events: 0,
        }
    }

    fn transition_to(&mut self, new_state: SubmissionState) {
        let transition = StateTransition {
            old_state: self.state,
            new_state,
            transitioned_at: Utc::now(),
        };
        info!(
            case = %self.case,
            run_id = %self.run_id,
            from = ?transition.old_state,
            to = ?new_state,
            "Submission state transition"
        );
        self.state = new_state;
        self.transitions.push(transition);
    }

    fn into_outcome(self, patient_id: i64) -> CaseOutcome {
        CaseOutcome {
            run_id: self.run_id,
            case: self.case,
            patient_id,
            person_ids: self.person_ids,
            phenotype_ids: self.phenotype_ids,
            variant_ids: self.variant_ids,
            rejected_phenotypes: self.rejected_phenotypes,
            rejected_persons: self.rejected_persons,
            skipped_report_events: self.skipped_report_events,
            started_at: self.started_at,
            completed_at: Utc::now(),
            transitions: self.transitions,
        }
    }
}

/// Submits cases from the source service to the registry
pub struct CaseSender<S, A, R> {
    source: S,
    archive: A,
    registry: R,
    criteria: SelectionCriteria,
    options: SubmissionOptions,
}

impl<S, A, R> CaseSender<S, A, R>
where
    S: CaseSource,
    A: ReportEventSource,
    R: Registry,
{
    pub fn new(
        source: S,
        archive: A,
        registry: R,
        criteria: SelectionCriteria,
        options: SubmissionOptions,
    ) -> Self {
        Self {
            source,
            archive,
            registry,
            criteria,
            options,
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn options(&self) -> &SubmissionOptions {
        &self.options
    }

    /// Submit one case version
    ///
    /// Returns the registry patient id and what was rejected along the way,
    /// or the error that ended the case.
    pub async fn send_case(&self, case: &CaseRef) -> Result<CaseOutcome, CaseError> {
        let mut run = Submission::new(case.clone());
        info!(case = %case, run_id = %run.run_id, "Submitting case");

        match self.submit(&mut run).await {
            Ok(patient_id) => {
                run.transition_to(SubmissionState::Submitted);
                info!(
                    case = %case,
                    patient_id,
                    variants = run.variant_ids.len(),
                    rejected_phenotypes = run.rejected_phenotypes.len(),
                    rejected_persons = run.rejected_persons.len(),
                    "Case submitted"
                );
                Ok(run.into_outcome(patient_id))
            }
            Err(e) => {
                run.transition_to(SubmissionState::Rejected);
                if e.is_unacceptable() {
                    warn!(case = %case, error = %e, "Case rejected");
                } else {
                    error!(case = %case, error = %e, "Case submission failed");
                }
                self.roll_back(&run).await;
                Err(e)
            }
        }
    }

    async fn submit(&self, run: &mut Submission) -> Result<i64, CaseError> {
        let request = self.phase_fetching(run).await?;
        let view = phase_collection::proband_view(&run.case, &request)?;
        let variants = self.phase_collecting(run, view.proband()).await?;

        let patient_id = self.phase_registering_patient(run, view.proband()).await?;
        let family = self.phase_resolving_family(run, patient_id).await?;
        self.phase_submitting_phenotypes(run, &view, &family).await?;
        self.phase_updating_parents(run, &view, &family).await?;
        self.phase_registering_relatives(run, &view, patient_id).await?;
        self.phase_submitting_variants(run, &variants, patient_id).await?;

        Ok(patient_id)
    }

    /// Compensating delete of the created patient, when enabled
    async fn roll_back(&self, run: &Submission) {
        if !self.options.rollback_on_failure {
            return;
        }
        let Some(patient_id) = run.patient_id else {
            return;
        };

        match self.registry.delete_patient(patient_id).await {
            Ok(()) => info!(case = %run.case, patient_id, "Rolled back created patient"),
            Err(e) => error!(
                case = %run.case,
                patient_id,
                error = %e,
                "Rollback failed, patient left in registry"
            ),
        }
    }
}
