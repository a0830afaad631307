//! Controlled vocabularies of the canonical model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phenotypic sex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

/// Karyotypic (chromosomal) sex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffectionStatus {
    Affected,
    Unaffected,
    Uncertain,
}

/// Whether an HPO term was observed in a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TermPresence {
    Yes,
    No,
    Unknown,
}

/// Reference genome assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Assembly {
    GRCh37,
    GRCh38,
}

impl Assembly {
    /// Parse an assembly label, ignoring any patch suffix (`GRCh37.p13`)
    ///
    /// Returns `None` for labels that name neither supported assembly.
    pub fn from_label(label: &str) -> Option<Self> {
        let base = label.split('.').next().unwrap_or_default().trim();
        match base.to_ascii_lowercase().as_str() {
            "grch37" | "hg19" => Some(Assembly::GRCh37),
            "grch38" | "hg38" => Some(Assembly::GRCh38),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Assembly::GRCh37 => "GRCh37",
            Assembly::GRCh38 => "GRCh38",
        }
    }
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Clinical-relevance tier assigned by the tiering pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Tier1,
    Tier2,
    Tier3,
    #[serde(rename = "NONE")]
    Untiered,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Tier1 => "TIER1",
            Tier::Tier2 => "TIER2",
            Tier::Tier3 => "TIER3",
            Tier::Untiered => "NONE",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Allelic state of a participant at a variant position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zygosity {
    ReferenceHomozygous,
    Heterozygous,
    AlternateHomozygous,
    Missing,
    HalfMissingReference,
    HalfMissingAlternate,
    AlternateHemizygous,
    ReferenceHemizygous,
    Unk,
    Na,
}

/// Gene (or other genomic feature) a report event refers to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GenomicEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gene_symbol: Option<String>,
    pub ensembl_id: String,
}
