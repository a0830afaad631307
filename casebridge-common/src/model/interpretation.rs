//! Canonical interpreted genome and clinical report

use super::vocabulary::{Assembly, GenomicEntity, Tier, Zygosity};
use serde::{Deserialize, Serialize};

/// Variants reported by an interpretation service for one case version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterpretedGenome {
    pub case_id: String,
    pub case_version: u32,
    pub interpretation_service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
    pub variants: Vec<ReportedVariant>,
}

/// Clinician-authored report closing a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClinicalReport {
    pub case_id: String,
    pub case_version: u32,
    pub report_date: String,
    pub user: String,
    pub variants: Vec<ReportedVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReportedVariant {
    pub coordinates: VariantCoordinates,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assembly: Option<Assembly>,
}

/// Genotype of one participant at a variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VariantCall {
    pub participant_id: String,
    pub zygosity: Zygosity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReportEvent {
    pub tier: Tier,
    pub genomic_entities: Vec<GenomicEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_justification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode_of_inheritance: Option<String>,
}
