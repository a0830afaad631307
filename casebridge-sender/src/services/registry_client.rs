//! Destination registry client
//!
//! Authenticates with static system and user keys. `connect` reads the
//! project and user the keys belong to; patients are always created in that
//! project.
//!
//! Every write validates its records before sending. List writes either
//! accept every item, returning one id per item in order, or reject the whole
//! list with `{"errors": [{"index", "field", "message"}]}`.

use crate::error::{RecordFailure, RegistryError};
use crate::models::{
    Patient, Person, Phenotype, RegisteredSnv, RegistryPerson, RegistryRecord, RelationStatus, Snv,
};
use crate::transport::{Authenticator, BackoffPolicy, RestClient, TransportError};
use crate::types::Registry;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

const SYSTEM_KEY_HEADER: &str = "X-Auth-Token-System";
const USER_KEY_HEADER: &str = "X-Auth-Token-User";

#[derive(Debug, Deserialize)]
struct InfoResponse {
    user: InfoUser,
}

#[derive(Debug, Deserialize)]
struct InfoUser {
    user_id: i64,
    project: InfoProject,
}

#[derive(Debug, Deserialize)]
struct InfoProject {
    project_id: i64,
}

#[derive(Debug, Deserialize)]
struct PatientCreated {
    patient_id: i64,
}

#[derive(Debug, Deserialize)]
struct PersonCreated {
    person_id: i64,
}

#[derive(Debug, Deserialize)]
struct PhenotypeCreated {
    person_phenotype_id: i64,
}

#[derive(Debug, Deserialize)]
struct SnvCreated {
    patient_snv_id: i64,
}

#[derive(Debug, Deserialize)]
struct PersonsResponse {
    persons: Vec<RegistryPerson>,
}

#[derive(Debug, Serialize)]
struct RelationStatusPatch {
    relation_status: RelationStatus,
}

#[derive(Debug, Deserialize)]
struct RejectionBody {
    #[serde(default)]
    errors: Vec<RecordFailure>,
}

/// Check every record, failing with all violations found
pub fn validate_records<T: RegistryRecord>(records: &[T]) -> Result<(), RegistryError> {
    let failures: Vec<RecordFailure> = records
        .iter()
        .enumerate()
        .flat_map(|(index, record)| {
            record.validate().into_iter().map(move |e| RecordFailure {
                index,
                field: Some(e.field.to_string()),
                message: e.message,
            })
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(RegistryError::InvalidRecords {
            kind: T::KIND,
            failures,
        })
    }
}

/// Turn an HTTP status failure into a structured rejection
fn classify(kind: &'static str, error: TransportError) -> RegistryError {
    match error {
        TransportError::Status { status, body } => {
            let failures = serde_json::from_str::<RejectionBody>(&body)
                .map(|rejection| rejection.errors)
                .unwrap_or_default();
            RegistryError::Rejected {
                kind,
                status,
                message: body,
                failures,
            }
        }
        other => RegistryError::Transport(other),
    }
}

pub struct RegistryClient {
    rest: RestClient,
    project_id: i64,
    user_id: i64,
}

impl RegistryClient {
    /// Authenticate and read the project and user bound to the keys
    pub async fn connect(
        base_url: &str,
        system_key: &str,
        user_key: &str,
        backoff: BackoffPolicy,
        timeout: Duration,
    ) -> Result<Self, RegistryError> {
        let auth = Authenticator::Headers(vec![
            (SYSTEM_KEY_HEADER.to_string(), system_key.to_string()),
            (USER_KEY_HEADER.to_string(), user_key.to_string()),
        ]);
        let rest = RestClient::new(base_url, auth, backoff, timeout)?;

        let info: InfoResponse = rest.get("info", &[]).await.map_err(|e| classify("info", e))?;
        info!(
            user_id = info.user.user_id,
            project_id = info.user.project.project_id,
            "Registry client initialised"
        );

        Ok(Self {
            rest,
            project_id: info.user.project.project_id,
            user_id: info.user.user_id,
        })
    }

    /// Validate, post, and read back one id per record
    async fn create<T, R>(
        &self,
        endpoint: &str,
        records: &[T],
        id_of: impl Fn(R) -> i64,
    ) -> Result<Vec<i64>, RegistryError>
    where
        T: RegistryRecord,
        R: DeserializeOwned,
    {
        validate_records(records)?;
        debug!(kind = T::KIND, count = records.len(), endpoint, "Creating records");

        let created: Vec<R> = self
            .rest
            .post(endpoint, records)
            .await
            .map_err(|e| classify(T::KIND, e))?;

        if created.len() != records.len() {
            return Err(RegistryError::UnexpectedResponse(format!(
                "sent {} {} records, registry returned {} ids",
                records.len(),
                T::KIND,
                created.len()
            )));
        }
        Ok(created.into_iter().map(id_of).collect())
    }

    async fn remove(&self, kind: &'static str, endpoint: String) -> Result<(), RegistryError> {
        self.rest
            .delete(&endpoint)
            .await
            .map_err(|e| classify(kind, e))?;
        info!(kind, endpoint = %endpoint, "Deleted registry record");
        Ok(())
    }
}

#[async_trait]
impl Registry for RegistryClient {
    fn project_id(&self) -> i64 {
        self.project_id
    }

    fn user_id(&self) -> Option<i64> {
        Some(self.user_id)
    }

    async fn create_patients(&self, patients: &[Patient]) -> Result<Vec<i64>, RegistryError> {
        let endpoint = format!("projects/{}/patients", self.project_id);
        self.create(&endpoint, patients, |p: PatientCreated| p.patient_id)
            .await
    }

    async fn get_persons(&self, patient_id: i64) -> Result<Vec<RegistryPerson>, RegistryError> {
        let response: PersonsResponse = self
            .rest
            .get(&format!("patients/{}/persons", patient_id), &[])
            .await
            .map_err(|e| classify("person", e))?;
        Ok(response.persons)
    }

    async fn create_persons(
        &self,
        patient_id: i64,
        persons: &[Person],
    ) -> Result<Vec<i64>, RegistryError> {
        let endpoint = format!("patients/{}/persons", patient_id);
        self.create(&endpoint, persons, |p: PersonCreated| p.person_id)
            .await
    }

    async fn update_person_status(
        &self,
        person_id: i64,
        status: RelationStatus,
    ) -> Result<i64, RegistryError> {
        let updated: PersonCreated = self
            .rest
            .patch(
                &format!("persons/{}", person_id),
                &RelationStatusPatch {
                    relation_status: status,
                },
            )
            .await
            .map_err(|e| classify("person", e))?;

        if updated.person_id != person_id {
            warn!(
                requested = person_id,
                returned = updated.person_id,
                "Registry updated a different person than requested"
            );
        }
        Ok(updated.person_id)
    }

    async fn create_phenotypes(
        &self,
        person_id: i64,
        phenotypes: &[Phenotype],
    ) -> Result<Vec<i64>, RegistryError> {
        let endpoint = format!("persons/{}/phenotypes", person_id);
        self.create(&endpoint, phenotypes, |p: PhenotypeCreated| {
            p.person_phenotype_id
        })
        .await
    }

    async fn create_snvs(&self, patient_id: i64, snvs: &[Snv]) -> Result<Vec<i64>, RegistryError> {
        let endpoint = format!("patients/{}/snvs", patient_id);
        self.create(&endpoint, snvs, |s: SnvCreated| s.patient_snv_id)
            .await
    }

    async fn get_snvs(&self, patient_id: i64) -> Result<Vec<RegisteredSnv>, RegistryError> {
        self.rest
            .get(&format!("patients/{}/snvs", patient_id), &[])
            .await
            .map_err(|e| classify("snv", e))
    }

    async fn delete_patient(&self, patient_id: i64) -> Result<(), RegistryError> {
        self.remove("patient", format!("patients/{}", patient_id))
            .await
    }

    async fn delete_person(&self, person_id: i64) -> Result<(), RegistryError> {
        self.remove("person", format!("persons/{}", person_id)).await
    }

    async fn delete_phenotype(&self, phenotype_id: i64) -> Result<(), RegistryError> {
        self.remove("phenotype", format!("phenotypes/{}", phenotype_id))
            .await
    }

    async fn delete_snv(&self, snv_id: i64) -> Result<(), RegistryError> {
        self.remove("snv", format!("snvs/{}", snv_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonRelation;

    #[test]
    fn test_validation_reports_index_of_each_failure() {
        let persons = vec![
            Person {
                patient_id: 5,
                relation: PersonRelation::Brother,
                relation_status: RelationStatus::Affected,
            },
            Person {
                patient_id: 0,
                relation: PersonRelation::Sister,
                relation_status: RelationStatus::Unknown,
            },
        ];

        match validate_records(&persons) {
            Err(RegistryError::InvalidRecords { kind, failures }) => {
                assert_eq!(kind, "person");
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].index, 1);
                assert_eq!(failures[0].field.as_deref(), Some("patient_id"));
            }
            other => panic!("expected InvalidRecords, got {:?}", other),
        }
    }

    #[test]
    fn test_status_errors_become_structured_rejections() {
        let error = classify(
            "phenotype",
            TransportError::Status {
                status: 400,
                body: r#"{"errors":[{"index":0,"field":"phenotype_id","message":"unknown term"}]}"#
                    .to_string(),
            },
        );
        match error {
            RegistryError::Rejected {
                kind,
                status,
                failures,
                ..
            } => {
                assert_eq!(kind, "phenotype");
                assert_eq!(status, 400);
                assert_eq!(failures[0].message, "unknown term");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
        assert!(!classify("snv", TransportError::Timeout("t".into())).is_item_rejection());
    }
}
