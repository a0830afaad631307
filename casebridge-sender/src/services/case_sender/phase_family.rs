//! REGISTERING_PATIENT through REGISTERING_RELATIVES
//!
//! Phenotypes are sent one per request so a registry rejection names exactly
//! one observation. Rejected phenotypes and relatives are recorded on the
//! submission and the case carries on; anything else ends it.

use super::{CaseSender, Submission};
use crate::error::{CaseError, RegistryError};
use crate::models::{RegistryPerson, RejectedPerson, RejectedPhenotype, SubmissionState};
use crate::services::pedigree_traversal::PedigreeView;
use crate::services::record_mapper::{map_patient, map_person, map_phenotype, map_relation_status};
use crate::types::{CaseSource, Registry, ReportEventSource};
use casebridge_common::hash_id;
use casebridge_common::model::Participant;
use std::slice;
use tracing::{debug, info, warn};

const PATIENT_RELATION: &str = "patient";
const MOTHER_RELATION: &str = "mother";
const FATHER_RELATION: &str = "father";

/// Persons the registry created alongside the patient
pub(super) struct FamilyPersons {
    pub proband: i64,
    pub mother: Option<i64>,
    pub father: Option<i64>,
}

impl FamilyPersons {
    fn from_persons(persons: &[RegistryPerson]) -> Option<Self> {
        let find = |relation: &str| {
            persons
                .iter()
                .find(|p| p.relation == relation)
                .map(|p| p.person_id)
        };
        Some(Self {
            proband: find(PATIENT_RELATION)?,
            mother: find(MOTHER_RELATION),
            father: find(FATHER_RELATION),
        })
    }
}

impl<S, A, R> CaseSender<S, A, R>
where
    S: CaseSource,
    A: ReportEventSource,
    R: Registry,
{
    pub(super) async fn phase_registering_patient(
        &self,
        run: &mut Submission,
        proband: &Participant,
    ) -> Result<i64, CaseError> {
        run.transition_to(SubmissionState::RegisteringPatient);

        let patient = map_patient(
            proband,
            self.registry.project_id(),
            self.registry.user_id(),
            self.options.reference_year,
        );
        let registration_failed = |source| CaseError::RegistrationFailed {
            case: run.case.clone(),
            source,
        };

        let ids = self
            .registry
            .create_patients(slice::from_ref(&patient))
            .await
            .map_err(registration_failed)?;
        let patient_id = ids.first().copied().ok_or_else(|| {
            registration_failed(RegistryError::UnexpectedResponse(
                "no patient id returned".to_string(),
            ))
        })?;

        info!(case = %run.case, patient_id, reference = %patient.reference, "Patient registered");
        run.patient_id = Some(patient_id);
        Ok(patient_id)
    }

    pub(super) async fn phase_resolving_family(
        &self,
        run: &mut Submission,
        patient_id: i64,
    ) -> Result<FamilyPersons, CaseError> {
        run.transition_to(SubmissionState::ResolvingFamily);

        let persons = self.registry.get_persons(patient_id).await?;
        let family = FamilyPersons::from_persons(&persons).ok_or_else(|| {
            RegistryError::UnexpectedResponse(format!(
                "patient {} has no '{}' person",
                patient_id, PATIENT_RELATION
            ))
        })?;

        debug!(
            case = %run.case,
            proband = family.proband,
            mother = ?family.mother,
            father = ?family.father,
            "Resolved registry family persons"
        );
        Ok(family)
    }

    /// Proband, then mother, then father
    pub(super) async fn phase_submitting_phenotypes(
        &self,
        run: &mut Submission,
        view: &PedigreeView<'_>,
        family: &FamilyPersons,
    ) -> Result<(), CaseError> {
        run.transition_to(SubmissionState::SubmittingPhenotypes);

        self.submit_phenotypes(run, family.proband, view.proband())
            .await?;
        if let (Some(person_id), Some(mother)) = (family.mother, view.mother()) {
            self.submit_phenotypes(run, person_id, mother).await?;
        }
        if let (Some(person_id), Some(father)) = (family.father, view.father()) {
            self.submit_phenotypes(run, person_id, father).await?;
        }
        Ok(())
    }

    /// Replace the default status the registry gave the parents
    pub(super) async fn phase_updating_parents(
        &self,
        run: &mut Submission,
        view: &PedigreeView<'_>,
        family: &FamilyPersons,
    ) -> Result<(), CaseError> {
        run.transition_to(SubmissionState::UpdatingParents);

        let parents = [
            (MOTHER_RELATION, family.mother, view.mother()),
            (FATHER_RELATION, family.father, view.father()),
        ];
        for (relation, person_id, member) in parents {
            match (person_id, member) {
                (Some(person_id), Some(member)) => {
                    let status = map_relation_status(member.affection_status);
                    self.registry.update_person_status(person_id, status).await?;
                    debug!(
                        case = %run.case,
                        relation,
                        person_id,
                        status = ?status,
                        "Updated parent status"
                    );
                }
                (None, Some(_)) => warn!(
                    case = %run.case,
                    relation,
                    "Pedigree has this parent but the registry created no person for it"
                ),
                _ => {}
            }
        }
        Ok(())
    }

    /// Every member other than the proband and parents
    pub(super) async fn phase_registering_relatives(
        &self,
        run: &mut Submission,
        view: &PedigreeView<'_>,
        patient_id: i64,
    ) -> Result<(), CaseError> {
        run.transition_to(SubmissionState::RegisteringRelatives);

        for (member, label) in view.relatives() {
            let Some(person) = map_person(member, label, patient_id) else {
                warn!(
                    case = %run.case,
                    relation = ?label,
                    "Relative has no registry relation, skipping"
                );
                run.rejected_persons.push(RejectedPerson {
                    participant: hash_id(&member.participant_id),
                    reason: format!("no registry relation for {:?}", label),
                });
                continue;
            };

            let person_id = match self
                .registry
                .create_persons(patient_id, slice::from_ref(&person))
                .await
            {
                Ok(ids) => ids.first().copied(),
                Err(e) if e.is_item_rejection() => {
                    warn!(
                        case = %run.case,
                        relation = ?person.relation,
                        error = %e,
                        "Relative rejected"
                    );
                    run.rejected_persons.push(RejectedPerson {
                        participant: hash_id(&member.participant_id),
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let Some(person_id) = person_id else {
                let reason = "no person id returned".to_string();
                return Err(RegistryError::UnexpectedResponse(reason).into());
            };
            run.person_ids.push(person_id);
            self.submit_phenotypes(run, person_id, member).await?;
        }
        Ok(())
    }

    async fn submit_phenotypes(
        &self,
        run: &mut Submission,
        person_id: i64,
        member: &Participant,
    ) -> Result<(), CaseError> {
        for observation in &member.phenotypes {
            let reject = |run: &mut Submission, reason: String| {
                run.rejected_phenotypes.push(RejectedPhenotype {
                    participant: hash_id(&member.participant_id),
                    term: observation.term.clone(),
                    reason,
                });
            };

            let phenotype =
                match map_phenotype(observation, person_id, self.options.send_absent_phenotypes) {
                    Ok(Some(phenotype)) => phenotype,
                    Ok(None) => {
                        debug!(
                            term = %observation.term,
                            presence = ?observation.presence,
                            "Phenotype not submitted"
                        );
                        continue;
                    }
                    Err(e) => {
                        warn!(
                            case = %run.case,
                            term = %observation.term,
                            error = %e,
                            "Phenotype rejected"
                        );
                        reject(run, e.to_string());
                        continue;
                    }
                };

            match self
                .registry
                .create_phenotypes(person_id, slice::from_ref(&phenotype))
                .await
            {
                Ok(ids) => run.phenotype_ids.extend(ids),
                Err(e) if e.is_item_rejection() => {
                    warn!(
                        case = %run.case,
                        term = %observation.term,
                        error = %e,
                        "Phenotype rejected"
                    );
                    reject(run, e.to_string());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
