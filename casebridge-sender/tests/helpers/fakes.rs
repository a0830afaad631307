//! In-memory implementations of the service traits
//!
//! `FakeRegistry` validates records the way the real client does and keeps
//! everything it accepted, plus an ordered log of calls.

use async_trait::async_trait;
use casebridge_common::model::ReportEventRecord;
use casebridge_sender::error::{RecordFailure, RegistryError};
use casebridge_sender::models::{
    CaseEnvelope, CaseRef, CaseSummary, Patient, Person, Phenotype, RegisteredSnv,
    RegistryPerson, RelationStatus, Snv,
};
use casebridge_sender::services::registry_client::validate_records;
use casebridge_sender::transport::TransportError;
use casebridge_sender::types::{CaseSource, Registry, ReportEventQuery, ReportEventSource};
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub struct FakeSource {
    cases: HashMap<CaseRef, CaseEnvelope>,
    listing: Vec<CaseSummary>,
}

impl FakeSource {
    pub fn with_case(envelope: CaseEnvelope) -> Self {
        let mut source = Self {
            cases: HashMap::new(),
            listing: Vec::new(),
        };
        source.add_case(envelope, "sent_to_gmcs");
        source
    }

    pub fn empty() -> Self {
        Self {
            cases: HashMap::new(),
            listing: Vec::new(),
        }
    }

    /// Add a case and a listing entry with `status`
    pub fn add_case(&mut self, envelope: CaseEnvelope, status: &str) {
        let case = envelope.case_ref();
        self.listing.push(CaseSummary {
            interpretation_request_id: case.to_string(),
            last_status: status.to_string(),
            assembly: envelope.assembly.clone(),
        });
        self.cases.insert(case, envelope);
    }

    pub fn add_listing_entry(&mut self, id: &str, status: &str) {
        self.listing.push(CaseSummary {
            interpretation_request_id: id.to_string(),
            last_status: status.to_string(),
            assembly: None,
        });
    }
}

#[async_trait]
impl CaseSource for FakeSource {
    async fn fetch_case(&self, case: &CaseRef) -> Result<CaseEnvelope, TransportError> {
        self.cases.get(case).cloned().ok_or(TransportError::Status {
            status: 404,
            body: format!("case {} not found", case),
        })
    }

    fn list_cases(&self) -> BoxStream<'_, Result<CaseSummary, TransportError>> {
        stream::iter(self.listing.iter().cloned().map(Ok)).boxed()
    }
}

/// Serves the same report events for any case, or fails every query
pub struct FakeArchive {
    events: Vec<ReportEventRecord>,
    by_case: HashMap<CaseRef, Vec<ReportEventRecord>>,
    unavailable: bool,
}

impl FakeArchive {
    pub fn new(events: Vec<ReportEventRecord>) -> Self {
        Self {
            events,
            by_case: HashMap::new(),
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            events: Vec::new(),
            by_case: HashMap::new(),
            unavailable: true,
        }
    }

    pub fn with_case_events(mut self, case: CaseRef, events: Vec<ReportEventRecord>) -> Self {
        self.by_case.insert(case, events);
        self
    }
}

impl ReportEventSource for FakeArchive {
    fn report_events<'a>(
        &'a self,
        query: &'a ReportEventQuery,
    ) -> BoxStream<'a, Result<ReportEventRecord, TransportError>> {
        if self.unavailable {
            return stream::once(async {
                Err(TransportError::Connection("archive unreachable".to_string()))
            })
            .boxed();
        }
        let events = self.by_case.get(&query.case).unwrap_or(&self.events);
        stream::iter(events.iter().skip(query.skip as usize).cloned().map(Ok)).boxed()
    }
}

/// One registry write, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    CreatePatient,
    CreatePerson,
    UpdatePerson(i64, RelationStatus),
    CreatePhenotype(u32),
    CreateSnvs(usize),
    DeletePatient(i64),
}

#[derive(Default)]
struct RegistryState {
    next_id: i64,
    calls: Vec<RegistryCall>,
    patients: Vec<(i64, Patient)>,
    persons: HashMap<i64, Vec<RegistryPerson>>,
    created_persons: Vec<Person>,
    phenotypes: Vec<Phenotype>,
    snvs: Vec<RegisteredSnv>,
}

impl RegistryState {
    fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct FakeRegistry {
    state: Mutex<RegistryState>,
    with_parents: bool,
    rejected_terms: HashSet<u32>,
    reject_patients: bool,
    reject_snvs: bool,
}

impl Default for FakeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRegistry {
    /// Registry that creates only the patient's own person
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            with_parents: false,
            rejected_terms: HashSet::new(),
            reject_patients: false,
            reject_snvs: false,
        }
    }

    /// Also create mother and father persons with every patient
    pub fn with_parents(mut self) -> Self {
        self.with_parents = true;
        self
    }

    /// Reject phenotypes for these HPO ids
    pub fn rejecting_terms(mut self, terms: &[u32]) -> Self {
        self.rejected_terms.extend(terms);
        self
    }

    pub fn rejecting_patients(mut self) -> Self {
        self.reject_patients = true;
        self
    }

    pub fn rejecting_snvs(mut self) -> Self {
        self.reject_snvs = true;
        self
    }

    pub fn calls(&self) -> Vec<RegistryCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn patients(&self) -> Vec<Patient> {
        let state = self.state.lock().unwrap();
        state.patients.iter().map(|(_, p)| p.clone()).collect()
    }

    pub fn created_persons(&self) -> Vec<Person> {
        self.state.lock().unwrap().created_persons.clone()
    }

    pub fn phenotypes(&self) -> Vec<Phenotype> {
        self.state.lock().unwrap().phenotypes.clone()
    }

    pub fn snvs(&self) -> Vec<Snv> {
        let state = self.state.lock().unwrap();
        state.snvs.iter().map(|s| s.snv.clone()).collect()
    }

    fn rejection(kind: &'static str, message: &str) -> RegistryError {
        RegistryError::Rejected {
            kind,
            status: 400,
            message: message.to_string(),
            failures: vec![RecordFailure {
                index: 0,
                field: None,
                message: message.to_string(),
            }],
        }
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    fn project_id(&self) -> i64 {
        1
    }

    fn user_id(&self) -> Option<i64> {
        Some(7)
    }

    async fn create_patients(&self, patients: &[Patient]) -> Result<Vec<i64>, RegistryError> {
        validate_records(patients)?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(RegistryCall::CreatePatient);
        if self.reject_patients {
            return Err(Self::rejection("patient", "reference already registered"));
        }

        let mut ids = Vec::new();
        for patient in patients {
            let patient_id = state.allocate();
            let mut family = vec![RegistryPerson {
                person_id: state.allocate(),
                patient_id: Some(patient_id),
                relation: "patient".to_string(),
                relation_status: Some(RelationStatus::Affected),
            }];
            if self.with_parents {
                for relation in ["mother", "father"] {
                    family.push(RegistryPerson {
                        person_id: state.allocate(),
                        patient_id: Some(patient_id),
                        relation: relation.to_string(),
                        relation_status: Some(RelationStatus::Unknown),
                    });
                }
            }
            state.persons.insert(patient_id, family);
            state.patients.push((patient_id, patient.clone()));
            ids.push(patient_id);
        }
        Ok(ids)
    }

    async fn get_persons(&self, patient_id: i64) -> Result<Vec<RegistryPerson>, RegistryError> {
        let state = self.state.lock().unwrap();
        state
            .persons
            .get(&patient_id)
            .cloned()
            .ok_or_else(|| Self::rejection("person", "no such patient"))
    }

    async fn create_persons(
        &self,
        patient_id: i64,
        persons: &[Person],
    ) -> Result<Vec<i64>, RegistryError> {
        validate_records(persons)?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(RegistryCall::CreatePerson);

        let mut ids = Vec::new();
        for person in persons {
            let person_id = state.allocate();
            state.created_persons.push(person.clone());
            state.persons.entry(patient_id).or_default().push(RegistryPerson {
                person_id,
                patient_id: Some(patient_id),
                relation: serde_json::to_value(person.relation)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default(),
                relation_status: Some(person.relation_status),
            });
            ids.push(person_id);
        }
        Ok(ids)
    }

    async fn update_person_status(
        &self,
        person_id: i64,
        status: RelationStatus,
    ) -> Result<i64, RegistryError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RegistryCall::UpdatePerson(person_id, status));
        for family in state.persons.values_mut() {
            if let Some(person) = family.iter_mut().find(|p| p.person_id == person_id) {
                person.relation_status = Some(status);
                return Ok(person_id);
            }
        }
        Err(Self::rejection("person", "no such person"))
    }

    async fn create_phenotypes(
        &self,
        _person_id: i64,
        phenotypes: &[Phenotype],
    ) -> Result<Vec<i64>, RegistryError> {
        validate_records(phenotypes)?;
        let mut state = self.state.lock().unwrap();

        let mut ids = Vec::new();
        for phenotype in phenotypes {
            state.calls.push(RegistryCall::CreatePhenotype(phenotype.phenotype_id));
            if self.rejected_terms.contains(&phenotype.phenotype_id) {
                return Err(Self::rejection("phenotype", "term not allowed for this project"));
            }
            state.phenotypes.push(phenotype.clone());
            ids.push(state.allocate());
        }
        Ok(ids)
    }

    async fn create_snvs(&self, _patient_id: i64, snvs: &[Snv]) -> Result<Vec<i64>, RegistryError> {
        validate_records(snvs)?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(RegistryCall::CreateSnvs(snvs.len()));
        if self.reject_snvs {
            return Err(Self::rejection("snv", "variant overlaps no transcript"));
        }

        let mut ids = Vec::new();
        for snv in snvs {
            let patient_snv_id = state.allocate();
            state.snvs.push(RegisteredSnv {
                patient_snv_id,
                snv: snv.clone(),
            });
            ids.push(patient_snv_id);
        }
        Ok(ids)
    }

    async fn get_snvs(&self, patient_id: i64) -> Result<Vec<RegisteredSnv>, RegistryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .snvs
            .iter()
            .filter(|s| s.snv.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn delete_patient(&self, patient_id: i64) -> Result<(), RegistryError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RegistryCall::DeletePatient(patient_id));
        state.patients.retain(|(id, _)| *id != patient_id);
        state.persons.remove(&patient_id);
        state.snvs.retain(|s| s.snv.patient_id != patient_id);
        Ok(())
    }

    async fn delete_person(&self, person_id: i64) -> Result<(), RegistryError> {
        let mut state = self.state.lock().unwrap();
        for family in state.persons.values_mut() {
            family.retain(|p| p.person_id != person_id);
        }
        Ok(())
    }

    async fn delete_phenotype(&self, _phenotype_id: i64) -> Result<(), RegistryError> {
        Ok(())
    }

    async fn delete_snv(&self, snv_id: i64) -> Result<(), RegistryError> {
        let mut state = self.state.lock().unwrap();
        state.snvs.retain(|s| s.patient_snv_id != snv_id);
        Ok(())
    }
}
