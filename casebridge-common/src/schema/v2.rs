//! Version 2 payload layouts
//!
//! Members become `participants` with numeric pedigree links and a family id of
//! their own. Variants group their coordinates and carry an assembly label;
//! report events may name several genomic entities.

use crate::model::{GenomicEntity, Tier, VariantCall};
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
    pub hpo_term_list: Vec<HpoTerm>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HpoTerm {
    pub term: String,
    pub term_presence: TermPresence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KaryotypicSex {
    Unknown,
    Xx,
    Xy,
    Xo,
    Xxy,
    Xxx,
    Xxyy,
    Xxxy,
    Xxxx,
    Xyy,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffectionStatus {
    Affected,
    Unaffected,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermPresence {
    Yes,
    No,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterpretedGenome {
    pub interpretation_request_id: String,
    pub interpretation_request_version: u32,
    pub interpretation_service: String,
    pub reported_variants: Vec<ReportedVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClinicalReport {
    pub interpretation_request_id: String,
    pub interpretation_request_version: u32,
    pub reporting_date: String,
    pub user: String,
    pub variants: Vec<ReportedVariant>,
    pub genomic_interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReportedVariant {
    pub variant_coordinates: VariantCoordinates,
    pub variant_calls: Vec<VariantCall>,
    pub report_events: Vec<ReportEvent>,
}

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

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReportEvent {
    #[serde(default)]
    pub tier: Option<Tier>,
    pub genomic_entities: Vec<GenomicEntity>,
    #[serde(default)]
    pub event_justification: Option<String>,
}
