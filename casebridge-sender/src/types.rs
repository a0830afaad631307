//! Service seams
//!
//! The orchestrator talks to the three remote services only through these
//! traits, so a case can be submitted against in-memory implementations.

use crate::error::RegistryError;
use crate::models::{
    CaseEnvelope, CaseRef, CaseSummary, Patient, Person, Phenotype, RegisteredSnv, RegistryPerson,
    RelationStatus, Snv,
};
use crate::transport::TransportError;
use async_trait::async_trait;
use casebridge_common::model::{ReportEventRecord, Tier};
use futures::stream::BoxStream;

/// Interpretation request service
#[async_trait]
pub trait CaseSource: Send + Sync {
    async fn fetch_case(&self, case: &CaseRef) -> Result<CaseEnvelope, TransportError>;

    /// Every case known to the service, page by page
    fn list_cases(&self) -> BoxStream<'_, Result<CaseSummary, TransportError>>;
}

/// Which report events to stream for a case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEventQuery {
    pub case: CaseRef,
    pub tiers: Vec<Tier>,
    /// Number of records to skip, for resuming an interrupted stream
    pub skip: u64,
}

impl ReportEventQuery {
    /// Tiered report events at TIER1 and TIER2
    pub fn tiered(case: CaseRef) -> Self {
        Self {
            case,
            tiers: vec![Tier::Tier1, Tier::Tier2],
            skip: 0,
        }
    }

    pub fn resume_from(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }
}

/// Variant archive
pub trait ReportEventSource: Send + Sync {
    /// Lazily stream matching report events; a new call restarts from `query.skip`
    fn report_events<'a>(
        &'a self,
        query: &'a ReportEventQuery,
    ) -> BoxStream<'a, Result<ReportEventRecord, TransportError>>;
}

/// Destination registry
///
/// Every write validates its records first and fails with
/// [`RegistryError::InvalidRecords`] without sending anything.
#[async_trait]
pub trait Registry: Send + Sync {
    fn project_id(&self) -> i64;

    fn user_id(&self) -> Option<i64>;

    async fn create_patients(&self, patients: &[Patient]) -> Result<Vec<i64>, RegistryError>;

    async fn get_persons(&self, patient_id: i64) -> Result<Vec<RegistryPerson>, RegistryError>;

    async fn create_persons(
        &self,
        patient_id: i64,
        persons: &[Person],
    ) -> Result<Vec<i64>, RegistryError>;

    async fn update_person_status(
        &self,
        person_id: i64,
        status: RelationStatus,
    ) -> Result<i64, RegistryError>;

    async fn create_phenotypes(
        &self,
        person_id: i64,
        phenotypes: &[Phenotype],
    ) -> Result<Vec<i64>, RegistryError>;

    async fn create_snvs(&self, patient_id: i64, snvs: &[Snv]) -> Result<Vec<i64>, RegistryError>;

    async fn get_snvs(&self, patient_id: i64) -> Result<Vec<RegisteredSnv>, RegistryError>;

    async fn delete_patient(&self, patient_id: i64) -> Result<(), RegistryError>;

    async fn delete_person(&self, person_id: i64) -> Result<(), RegistryError>;

    async fn delete_phenotype(&self, phenotype_id: i64) -> Result<(), RegistryError>;

    async fn delete_snv(&self, snv_id: i64) -> Result<(), RegistryError>;
}
