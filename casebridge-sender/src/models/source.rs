//! Interpretation request service payloads

use casebridge_common::model::Assembly;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Identifies one version of a case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseRef {
    pub id: String,
    pub version: u32,
}

impl CaseRef {
    pub fn new(id: impl Into<String>, version: u32) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }
}

impl fmt::Display for CaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.id, self.version)
    }
}

impl FromStr for CaseRef {
    type Err = String;

    /// Parse the service's `<id>-<version>` form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, version) = s
            .rsplit_once('-')
            .ok_or_else(|| format!("'{}' is not of the form <id>-<version>", s))?;
        let version = version
            .parse()
            .map_err(|_| format!("'{}' has a non-numeric version", s))?;
        if id.is_empty() {
            return Err(format!("'{}' has an empty id", s));
        }
        Ok(Self::new(id, version))
    }
}

/// One case version with its raw, versioned payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseEnvelope {
    pub case_id: String,
    pub case_version: u32,
    #[serde(default)]
    pub last_status: Option<String>,
    #[serde(default)]
    pub assembly: Option<String>,
    pub interpretation_request_data: InterpretationRequestData,
    #[serde(default)]
    pub interpreted_genome: Vec<InterpretedGenomeEntry>,
    #[serde(default)]
    pub clinical_report: Vec<ClinicalReportEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretationRequestData {
    pub json_request: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretedGenomeEntry {
    pub created_at: DateTime<Utc>,
    pub interpreted_genome_data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalReportEntry {
    pub created_at: DateTime<Utc>,
    pub clinical_report_data: Value,
}

impl CaseEnvelope {
    pub fn case_ref(&self) -> CaseRef {
        CaseRef::new(self.case_id.clone(), self.case_version)
    }

    pub fn assembly(&self) -> Option<Assembly> {
        self.assembly.as_deref().and_then(Assembly::from_label)
    }

    pub fn request_payload(&self) -> &Value {
        &self.interpretation_request_data.json_request
    }

    /// Most recently created interpreted genome
    pub fn latest_interpreted_genome(&self) -> Option<&Value> {
        self.interpreted_genome
            .iter()
            .max_by_key(|entry| entry.created_at)
            .map(|entry| &entry.interpreted_genome_data)
    }

    /// Most recently created clinical report
    pub fn latest_clinical_report(&self) -> Option<&Value> {
        self.clinical_report
            .iter()
            .max_by_key(|entry| entry.created_at)
            .map(|entry| &entry.clinical_report_data)
    }
}

/// One row of the paged case listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSummary {
    pub interpretation_request_id: String,
    pub last_status: String,
    #[serde(default)]
    pub assembly: Option<String>,
}

impl CaseSummary {
    /// Statuses whose cases cannot be submitted yet
    pub const UNREADY_STATUSES: [&'static str; 2] = ["blocked", "waiting_payload"];

    pub fn is_ready(&self) -> bool {
        !Self::UNREADY_STATUSES.contains(&self.last_status.as_str())
    }

    pub fn case_ref(&self) -> Result<CaseRef, String> {
        self.interpretation_request_id.parse()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CaseListingPage {
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<CaseSummary>,
}
