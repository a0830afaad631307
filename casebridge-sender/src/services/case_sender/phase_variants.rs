//! SUBMITTING_VARIANTS

use super::phase_collection::AcceptedVariant;
use super::{CaseSender, Submission};
use crate::error::CaseError;
use crate::models::{Snv, SubmissionState};
use crate::services::record_mapper::map_snv;
use crate::types::{CaseSource, Registry, ReportEventSource};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Map accepted variants, keeping the last record for each coordinate
///
/// Compound heterozygous report events name the same variant more than once.
pub(super) fn deduplicate(variants: &[AcceptedVariant], patient_id: i64) -> Vec<Snv> {
    let mut by_coordinate = BTreeMap::new();
    for accepted in variants {
        let snv = map_snv(
            &accepted.representation,
            &accepted.call,
            &accepted.consequence,
            accepted.inheritance,
            patient_id,
        );
        if let Some(previous) = by_coordinate.insert(snv.coordinate_key(), snv) {
            debug!(
                chr = %previous.chr,
                start = previous.start,
                "Duplicate variant, keeping the later report event"
            );
        }
    }
    by_coordinate.into_values().collect()
}

impl<S, A, R> CaseSender<S, A, R>
where
    S: CaseSource,
    A: ReportEventSource,
    R: Registry,
{
    /// One batch; a rejection ends the case
    pub(super) async fn phase_submitting_variants(
        &self,
        run: &mut Submission,
        variants: &[AcceptedVariant],
        patient_id: i64,
    ) -> Result<(), CaseError> {
        run.transition_to(SubmissionState::SubmittingVariants);

        let snvs = deduplicate(variants, patient_id);
        let ids = self
            .registry
            .create_snvs(patient_id, &snvs)
            .await
            .map_err(|source| CaseError::VariantSubmissionFailed {
                case: run.case.clone(),
                source,
            })?;

        info!(
            case = %run.case,
            patient_id,
            submitted = ids.len(),
            collapsed = variants.len() - snvs.len(),
            "Variants submitted"
        );
        run.variant_ids = ids;
        Ok(())
    }
}
