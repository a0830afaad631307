//! FETCHING_CASE and COLLECTING_VARIANTS
//!
//! Nothing in these phases writes to the registry.

use super::{CaseSender, Submission};
use crate::error::{CaseError, UnacceptableReason};
use crate::models::{CaseRef, Inheritance, SubmissionState};
use crate::services::pedigree_traversal::PedigreeView;
use crate::services::record_mapper::parse_inheritance;
use crate::types::{CaseSource, Registry, ReportEventQuery, ReportEventSource};
use casebridge_common::hash_id;
use casebridge_common::migration::migrate_interpretation_request;
use casebridge_common::model::{
    Assembly, ConsequenceType, InterpretationRequest, ObservedCall, Participant, ReportEventRecord,
    Tier, VariantRepresentation,
};
use futures::StreamExt;
use tracing::{debug, info, warn};

/// A report event's variant as it will be submitted for the proband
#[derive(Debug, Clone)]
pub(super) struct AcceptedVariant {
    pub representation: VariantRepresentation,
    pub call: ObservedCall,
    pub consequence: ConsequenceType,
    pub inheritance: Option<Inheritance>,
}

/// Identify the proband, rejecting a pedigree with none or several
pub(super) fn proband_view<'a>(
    case: &CaseRef,
    request: &'a InterpretationRequest,
) -> Result<PedigreeView<'a>, CaseError> {
    PedigreeView::new(&request.pedigree).map_err(|reason| CaseError::unacceptable(case, reason))
}

fn variant_label(representation: &VariantRepresentation) -> String {
    let v = &representation.variant;
    format!("{}:{} {}>{}", v.chromosome, v.start, v.reference, v.alternate)
}

fn event_label(record: &ReportEventRecord, position: usize) -> String {
    record
        .report_event
        .report_event_id
        .clone()
        .unwrap_or_else(|| format!("#{}", position))
}

impl<S, A, R> CaseSender<S, A, R>
where
    S: CaseSource,
    A: ReportEventSource,
    R: Registry,
{
    /// Fetch the case and migrate its interpretation request
    pub(super) async fn phase_fetching(
        &self,
        run: &mut Submission,
    ) -> Result<InterpretationRequest, CaseError> {
        run.transition_to(SubmissionState::FetchingCase);

        let envelope = self
            .source
            .fetch_case(&run.case)
            .await
            .map_err(CaseError::Source)?;
        let request =
            migrate_interpretation_request(envelope.request_payload(), envelope.assembly())?;

        info!(
            case = %run.case,
            family_id = %request.pedigree.family_id,
            members = request.pedigree.members.len(),
            assembly = ?request.assembly,
            "Fetched case"
        );
        Ok(request)
    }

    /// Stream tiered report events and keep one consequence per proband variant
    pub(super) async fn phase_collecting(
        &self,
        run: &mut Submission,
        proband: &Participant,
    ) -> Result<Vec<AcceptedVariant>, CaseError> {
        run.transition_to(SubmissionState::CollectingVariants);

        let proband_id = if self.options.archive_ids_pseudonymized {
            hash_id(&proband.participant_id)
        } else {
            proband.participant_id.clone()
        };

        let query = ReportEventQuery::tiered(run.case.clone());
        let mut events = self.archive.report_events(&query);
        let mut accepted = Vec::new();
        let mut position = 0usize;

        while let Some(record) = events.next().await {
            let record = record.map_err(CaseError::Archive)?;
            position += 1;

            let observed = record
                .observed_variants
                .iter()
                .find(|ov| ov.variant_call.participant_id == proband_id)
                .ok_or_else(|| {
                    CaseError::unacceptable(
                        &run.case,
                        UnacceptableReason::ProbandNotObserved {
                            report_event: event_label(&record, position),
                        },
                    )
                })?;

            let Some(grch37) = observed
                .variant
                .variants
                .iter()
                .find(|r| Assembly::from_label(&r.assembly) == Some(Assembly::GRCh37))
            else {
                warn!(
                    case = %run.case,
                    report_event = %event_label(&record, position),
                    "Report event has no GRCh37 representation, skipping"
                );
                run.skipped_report_events += 1;
                continue;
            };

            let label = variant_label(grch37);
            let consequence_types = grch37
                .variant
                .annotation
                .as_ref()
                .map(|a| a.consequence_types.as_slice())
                .unwrap_or_default();
            let tier = record.report_event.tier.unwrap_or(Tier::Untiered);
            let consequence = self
                .criteria
                .select(
                    &label,
                    consequence_types,
                    &record.report_event.gene_symbols(),
                    tier,
                )?
                .clone();

            let inheritance =
                match parse_inheritance(record.report_event.event_justification.as_deref()) {
                    Ok(inheritance) => inheritance,
                    Err(e) if !self.options.strict_inheritance => {
                        warn!(
                            case = %run.case,
                            variant = %label,
                            error = %e,
                            "Submitting variant without inheritance"
                        );
                        None
                    }
                    Err(e) => return Err(e.into()),
                };

            debug!(
                case = %run.case,
                variant = %label,
                tier = %tier,
                transcript = ?consequence.ensembl_transcript_id,
                "Variant accepted"
            );
            accepted.push(AcceptedVariant {
                representation: grch37.clone(),
                call: observed.variant_call.clone(),
                consequence,
                inheritance,
            });
        }

        if accepted.is_empty() {
            return Err(CaseError::unacceptable(
                &run.case,
                UnacceptableReason::NoUsableVariants,
            ));
        }

        info!(
            case = %run.case,
            variants = accepted.len(),
            skipped = run.skipped_report_events,
            "Collected variants"
        );
        Ok(accepted)
    }
}
