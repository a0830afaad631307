//! Hop from version 3 to the canonical version 4

use crate::model::{
    Assembly, ClinicalReport, InterpretationRequest, InterpretedGenome, Participant, Pedigree,
    PhenotypeObservation, ReportedVariant, VariantCoordinates,
};
use crate::schema::v3;

pub fn interpretation_request(request: v3::InterpretationRequest) -> InterpretationRequest {
    InterpretationRequest {
        case_id: request.interpretation_request_id,
        case_version: request.interpretation_request_version,
        assembly: request.genome_assembly.as_deref().and_then(Assembly::from_label),
        pedigree: Pedigree {
            family_id: request.pedigree.family_id,
            members: request
                .pedigree
                .participants
                .into_iter()
                .map(participant)
                .collect(),
        },
    }
}

pub fn interpreted_genome(genome: v3::InterpretedGenome) -> InterpretedGenome {
    InterpretedGenome {
        case_id: genome.interpretation_request_id,
        case_version: genome.interpretation_request_version,
        interpretation_service: genome.interpretation_service,
        report_url: genome.report_url,
        variants: genome.variants.into_iter().map(reported_variant).collect(),
    }
}

pub fn clinical_report(report: v3::ClinicalReport) -> ClinicalReport {
    ClinicalReport {
        case_id: report.interpretation_request_id,
        case_version: report.interpretation_request_version,
        report_date: report.reporting_date,
        user: report.user,
        variants: report.variants.into_iter().map(reported_variant).collect(),
        interpretation_summary: report.interpretation_summary,
    }
}

fn participant(p: v3::Participant) -> Participant {
    Participant {
        participant_id: p.participant_id,
        family_id: p.family_id,
        pedigree_id: p.pedigree_id,
        is_proband: p.is_proband,
        sex: p.sex,
        karyotypic_sex: p.person_karyotypic_sex,
        year_of_birth: p.year_of_birth,
        father_id: p.father_id,
        mother_id: p.mother_id,
        affection_status: p.affection_status,
        consent_status: Some(p.consent_status),
        twin_group: p.twin_group,
        phenotypes: p
            .hpo_term_list
            .into_iter()
            .map(|t| PhenotypeObservation {
                term: t.term,
                presence: t.term_presence,
            })
            .collect(),
    }
}

fn reported_variant(variant: v3::ReportedVariant) -> ReportedVariant {
    let coords = variant.coordinates;
    ReportedVariant {
        coordinates: VariantCoordinates {
            assembly: coords.assembly.as_deref().and_then(Assembly::from_label),
            chromosome: coords.chromosome,
            position: coords.position,
            reference: coords.reference,
            alternate: coords.alternate,
        },
        variant_calls: variant.variant_calls,
        report_events: variant.report_events,
    }
}
