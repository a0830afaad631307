//! Consequence selection
//!
//! Picks the one transcript-level annotation a variant is reported against.
//! Filters run in a fixed order, each on the survivors of the previous one:
//!
//! 1. gene symbol named by the report event (skipped if nothing would survive)
//! 2. sequence ontology term allowed for the event's tier
//! 3. transcript biotype
//! 4. transcript annotation flags (`basic`)
//!
//! Survivors are ordered by transcript id and the first is taken, so ties
//! resolve the same way on every run.

use casebridge_common::config::SelectionConfig;
use casebridge_common::model::{ConsequenceType, Tier};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

pub const TIER1_SO_TERMS: [&str; 7] = [
    "SO:0001893", // transcript_ablation
    "SO:0001574", // splice_acceptor_variant
    "SO:0001575", // splice_donor_variant
    "SO:0001587", // stop_gained
    "SO:0001589", // frameshift_variant
    "SO:0001578", // stop_lost
    "SO:0001582", // initiator_codon_variant
];

pub const TIER2_SO_TERMS: [&str; 6] = [
    "SO:0001889", // transcript_amplification
    "SO:0001821", // inframe_insertion
    "SO:0001822", // inframe_deletion
    "SO:0001583", // missense_variant
    "SO:0001630", // splice_region_variant
    "SO:0001626", // incomplete_terminal_codon_variant
];

pub const BIOTYPES: [&str; 11] = [
    "IG_C_gene",
    "IG_D_gene",
    "IG_J_gene",
    "IG_V_gene",
    "protein_coding",
    "nonsense_mediated_decay",
    "non_stop_decay",
    "TR_C_gene",
    "TR_D_gene",
    "TR_J_gene",
    "TR_V_gene",
];

pub const TRANSCRIPT_FLAGS: [&str; 1] = ["basic"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("No consequence type selected for variant {variant} (genes: {})", .genes.join(", "))]
    NoConsequenceSelected { variant: String, genes: Vec<String> },
}

/// Allow-lists used by [`SelectionCriteria::select`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCriteria {
    pub tier1_so_terms: HashSet<String>,
    pub tier2_so_terms: HashSet<String>,
    pub biotypes: HashSet<String>,
    pub transcript_flags: HashSet<String>,
}

fn owned(values: &[&str]) -> HashSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            tier1_so_terms: owned(&TIER1_SO_TERMS),
            tier2_so_terms: owned(&TIER2_SO_TERMS),
            biotypes: owned(&BIOTYPES),
            transcript_flags: owned(&TRANSCRIPT_FLAGS),
        }
    }
}

impl SelectionCriteria {
    /// Built-in lists, replaced by any list the configuration provides
    pub fn from_config(config: &SelectionConfig) -> Self {
        let defaults = Self::default();
        let or_default = |configured: &Option<Vec<String>>, default: HashSet<String>| {
            configured
                .as_ref()
                .map(|values| values.iter().cloned().collect())
                .unwrap_or(default)
        };

        Self {
            tier1_so_terms: or_default(&config.tier1_so_terms, defaults.tier1_so_terms),
            tier2_so_terms: or_default(&config.tier2_so_terms, defaults.tier2_so_terms),
            biotypes: or_default(&config.biotypes, defaults.biotypes),
            transcript_flags: or_default(&config.transcript_flags, defaults.transcript_flags),
        }
    }

    /// SO terms accepted for `tier`; empty for anything below TIER2
    fn so_terms(&self, tier: Tier) -> Option<&HashSet<String>> {
        match tier {
            Tier::Tier1 => Some(&self.tier1_so_terms),
            Tier::Tier2 => Some(&self.tier2_so_terms),
            Tier::Tier3 | Tier::Untiered => None,
        }
    }

    /// Select the consequence type a variant is reported against
    ///
    /// `variant` only labels the error.
    pub fn select<'a>(
        &self,
        variant: &str,
        consequence_types: &'a [ConsequenceType],
        gene_symbols: &[String],
        tier: Tier,
    ) -> Result<&'a ConsequenceType, SelectionError> {
        let on_genes: Vec<&ConsequenceType> = consequence_types
            .iter()
            .filter(|ct| {
                ct.gene_name
                    .as_ref()
                    .is_some_and(|gene| gene_symbols.contains(gene))
            })
            .collect();
        let candidates = if on_genes.is_empty() {
            debug!(
                variant,
                genes = ?gene_symbols,
                "No consequence on reported genes, ignoring gene filter"
            );
            consequence_types.iter().collect()
        } else {
            on_genes
        };

        let mut survivors: Vec<&ConsequenceType> = candidates
            .into_iter()
            .filter(|ct| {
                self.so_terms(tier).is_some_and(|allowed| {
                    ct.sequence_ontology_terms
                        .iter()
                        .any(|term| allowed.contains(&term.accession))
                })
            })
            .filter(|ct| {
                ct.biotype
                    .as_ref()
                    .is_some_and(|biotype| self.biotypes.contains(biotype))
            })
            .filter(|ct| {
                ct.transcript_annotation_flags
                    .iter()
                    .any(|flag| self.transcript_flags.contains(flag))
            })
            .collect();

        // Transcripts without an id sort last
        survivors.sort_by(|a, b| {
            match (&a.ensembl_transcript_id, &b.ensembl_transcript_id) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });

        survivors
            .first()
            .copied()
            .ok_or_else(|| SelectionError::NoConsequenceSelected {
                variant: variant.to_string(),
                genes: gene_symbols.to_vec(),
            })
    }
}
