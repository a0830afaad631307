//! Version 3 payload layouts
//!
//! Vocabularies switch to upper case, consent becomes mandatory on every
//! participant, twins are grouped, and report events always carry a tier.

use crate::model::{
    AffectionStatus, ConsentStatus, KaryotypicSex, ReportEvent, Sex, TermPresence, VariantCall,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterpretationRequest {
    pub interpretation_request_id: String,
    pub interpretation_request_version: u32,
    #[serde(default)]
    pub genome_assembly: Option<String>,
    pub pedigree: Pedigree,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Pedigree {
    pub family_id: String,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Participant {
    pub participant_id: String,
    pub family_id: String,
    pub pedigree_id: u32,
    pub is_proband: bool,
    pub sex: Sex,
    #[serde(default)]
    pub person_karyotypic_sex: Option<KaryotypicSex>,
    #[serde(default)]
    pub father_id: Option<u32>,
    #[serde(default)]
    pub mother_id: Option<u32>,
    pub affection_status: AffectionStatus,
    #[serde(default)]
    pub year_of_birth: Option<i32>,
    pub consent_status: ConsentStatus,
    #[serde(default)]
    pub twin_group: Option<String>,
    pub hpo_term_list: Vec<HpoTerm>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HpoTerm {
    pub term: String,
    pub term_presence: TermPresence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterpretedGenome {
    pub interpretation_request_id: String,
    pub interpretation_request_version: u32,
    pub interpretation_service: String,
    #[serde(default)]
    pub report_url: Option<String>,
    pub variants: Vec<ReportedVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClinicalReport {
    pub interpretation_request_id: String,
    pub interpretation_request_version: u32,
    pub reporting_date: String,
    pub user: String,
    pub variants: Vec<ReportedVariant>,
    #[serde(default)]
    pub interpretation_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReportedVariant {
    pub coordinates: VariantCoordinates,
    pub variant_calls: Vec<VariantCall>,
    pub report_events: Vec<ReportEvent>,
}

/// Same keys as the canonical coordinates, but the assembly is a free label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VariantCoordinates {
    pub chromosome: String,
    pub position: u64,
    pub reference: String,
    pub alternate: String,
    #[serde(default)]
    pub assembly: Option<String>,
}
