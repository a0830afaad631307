//! Variant archive model
//!
//! Report events as served by the variant archive. Unlike the versioned
//! payloads these records are read leniently: unknown fields are ignored and
//! optional annotation may be missing entirely.

use super::vocabulary::{Tier, Zygosity};
use serde::{Deserialize, Serialize};

/// One report event plus the variant it was raised on, observed per participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEventRecord {
    pub report_event: ArchivedReportEvent,
    #[serde(default)]
    pub observed_variants: Vec<ObservedVariant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedReportEvent {
    #[serde(default)]
    pub report_event_id: Option<String>,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub genomic_entities: Vec<ArchivedGenomicEntity>,
    #[serde(default)]
    pub event_justification: Option<String>,
}

impl ArchivedReportEvent {
    /// Gene symbols named by the event's genomic entities
    pub fn gene_symbols(&self) -> Vec<String> {
        self.genomic_entities
            .iter()
            .filter_map(|entity| entity.gene_symbol.clone())
            .collect()
    }
}

/// Genomic feature named by an archived report event
///
/// The archive also sends the entity type and cross-references; only the
/// identifiers are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedGenomicEntity {
    #[serde(default)]
    pub gene_symbol: Option<String>,
    #[serde(default)]
    pub ensembl_id: Option<String>,
}

/// A participant's call on a variant, with all representations of that variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedVariant {
    pub variant_call: ObservedCall,
    pub variant: VariantRepresentations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedCall {
    pub participant_id: String,
    pub zygosity: Zygosity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRepresentations {
    #[serde(default)]
    pub variants: Vec<VariantRepresentation>,
}

/// The variant lifted onto one assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRepresentation {
    pub assembly: String,
    pub variant: AnnotatedVariant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedVariant {
    pub chromosome: String,
    pub start: u64,
    pub reference: String,
    pub alternate: String,
    #[serde(default)]
    pub annotation: Option<VariantAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantAnnotation {
    #[serde(default)]
    pub consequence_types: Vec<ConsequenceType>,
}

/// Predicted effect of a variant on one transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsequenceType {
    #[serde(default)]
    pub gene_name: Option<String>,
    #[serde(default)]
    pub ensembl_gene_id: Option<String>,
    #[serde(default)]
    pub ensembl_transcript_id: Option<String>,
    #[serde(default)]
    pub biotype: Option<String>,
    #[serde(default)]
    pub sequence_ontology_terms: Vec<SequenceOntologyTerm>,
    #[serde(default)]
    pub transcript_annotation_flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceOntologyTerm {
    pub accession: String,
    #[serde(default)]
    pub name: Option<String>,
}
