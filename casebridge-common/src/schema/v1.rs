//! Version 1 payload layouts
//!
//! The oldest layout: members keyed by `gelId`, identifiers and years carried
//! as strings, lower-case vocabularies, no assembly anywhere in the payload.

use crate::model::Tier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterpretationRequest {
    pub interpretation_request_id: String,
    pub interpretation_request_version: u32,
    pub pedigree: Pedigree,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Pedigree {
    pub family_id: String,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Member {
    pub gel_id: String,
    pub pedigree_id: u32,
    pub is_proband: bool,
    pub sex: Sex,
    #[serde(default)]
    pub father_id: Option<String>,
    #[serde(default)]
    pub mother_id: Option<String>,
    pub affection_status: AffectionStatus,
    #[serde(default)]
    pub year_of_birth: Option<String>,
    pub hpo_term_list: Vec<HpoTerm>,
}

/// `termPresence` is free text: `"true"`, `"false"` or `"unknown"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HpoTerm {
    pub term: String,
    pub term_presence: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Unknown,
    Undetermined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffectionStatus {
    Affected,
    Unaffected,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterpretedGenome {
    pub interpretation_request_id: String,
    pub interpretation_request_version: u32,
    pub company_name: String,
    pub reported_variants: Vec<ReportedVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClinicalReport {
    pub interpretation_request_id: String,
    pub interpretation_request_version: u32,
    pub reporting_date: String,
    pub user: String,
    pub candidate_variants: Vec<ReportedVariant>,
    pub genomic_interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReportedVariant {
    pub chromosome: String,
    pub position: u64,
    pub reference: String,
    pub alternate: String,
    pub called_genotypes: Vec<CalledGenotype>,
    pub report_events: Vec<ReportEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CalledGenotype {
    pub gel_id: String,
    pub genotype: Genotype,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genotype {
    Heterozygous,
    HomozygousAlt,
    HomozygousRef,
    Hemizygous,
    Missing,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReportEvent {
    #[serde(default)]
    pub tier: Option<Tier>,
    pub genomic_feature: GenomicFeature,
    #[serde(default)]
    pub event_justification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GenomicFeature {
    #[serde(default)]
    pub gene_symbol: Option<String>,
    pub ensembl_id: String,
}
