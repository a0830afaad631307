//! Hop from version 2 to version 3

use crate::model::{
    AffectionStatus, ConsentStatus, KaryotypicSex, ReportEvent, Sex, TermPresence, Tier,
};
use crate::schema::{v2, v3};

/// Version 3 requires consent on every participant. Version 2 recorded none,
/// which reads as no consent given.
const NO_CONSENT_RECORDED: ConsentStatus = ConsentStatus {
    programme_consent: false,
    primary_finding_consent: false,
    secondary_finding_consent: false,
    carrier_status_consent: false,
};

pub fn interpretation_request(request: v2::InterpretationRequest) -> v3::InterpretationRequest {
    v3::InterpretationRequest {
        interpretation_request_id: request.interpretation_request_id,
        interpretation_request_version: request.interpretation_request_version,
        genome_assembly: request.genome_assembly,
        pedigree: v3::Pedigree {
            family_id: request.pedigree.family_id,
            participants: request
                .pedigree
                .participants
                .into_iter()
                .map(participant)
                .collect(),
        },
    }
}

pub fn interpreted_genome(genome: v2::InterpretedGenome) -> v3::InterpretedGenome {
    v3::InterpretedGenome {
        interpretation_request_id: genome.interpretation_request_id,
        interpretation_request_version: genome.interpretation_request_version,
        interpretation_service: genome.interpretation_service,
        report_url: None,
        variants: genome
            .reported_variants
            .into_iter()
            .map(reported_variant)
            .collect(),
    }
}

pub fn clinical_report(report: v2::ClinicalReport) -> v3::ClinicalReport {
    v3::ClinicalReport {
        interpretation_request_id: report.interpretation_request_id,
        interpretation_request_version: report.interpretation_request_version,
        reporting_date: report.reporting_date,
        user: report.user,
        variants: report.variants.into_iter().map(reported_variant).collect(),
        interpretation_summary: Some(report.genomic_interpretation),
    }
}

fn participant(p: v2::Participant) -> v3::Participant {
    v3::Participant {
        participant_id: p.participant_id,
        family_id: p.family_id,
        pedigree_id: p.pedigree_id,
        is_proband: p.is_proband,
        sex: match p.sex {
            v2::Sex::Male => Sex::Male,
            v2::Sex::Female => Sex::Female,
            v2::Sex::Unknown => Sex::Unknown,
        },
        person_karyotypic_sex: p.person_karyotypic_sex.map(karyotypic_sex),
        father_id: p.father_id,
        mother_id: p.mother_id,
        affection_status: match p.affection_status {
            v2::AffectionStatus::Affected => AffectionStatus::Affected,
            v2::AffectionStatus::Unaffected => AffectionStatus::Unaffected,
            v2::AffectionStatus::Unknown => AffectionStatus::Uncertain,
        },
        year_of_birth: p.year_of_birth,
        consent_status: NO_CONSENT_RECORDED,
        twin_group: None,
        hpo_term_list: p
            .hpo_term_list
            .into_iter()
            .map(|t| v3::HpoTerm {
                term: t.term,
                term_presence: match t.term_presence {
                    v2::TermPresence::Yes => TermPresence::Yes,
                    v2::TermPresence::No => TermPresence::No,
                    v2::TermPresence::Unknown => TermPresence::Unknown,
                },
            })
            .collect(),
    }
}

fn karyotypic_sex(sex: v2::KaryotypicSex) -> KaryotypicSex {
    match sex {
        v2::KaryotypicSex::Unknown => KaryotypicSex::Unknown,
        v2::KaryotypicSex::Xx => KaryotypicSex::Xx,
        v2::KaryotypicSex::Xy => KaryotypicSex::Xy,
        v2::KaryotypicSex::Xo => KaryotypicSex::Xo,
        v2::KaryotypicSex::Xxy => KaryotypicSex::Xxy,
        v2::KaryotypicSex::Xxx => KaryotypicSex::Xxx,
        v2::KaryotypicSex::Xxyy => KaryotypicSex::Xxyy,
        v2::KaryotypicSex::Xxxy => KaryotypicSex::Xxxy,
        v2::KaryotypicSex::Xxxx => KaryotypicSex::Xxxx,
        v2::KaryotypicSex::Xyy => KaryotypicSex::Xyy,
        v2::KaryotypicSex::Other => KaryotypicSex::Other,
    }
}

fn reported_variant(variant: v2::ReportedVariant) -> v3::ReportedVariant {
    let coords = variant.variant_coordinates;
    v3::ReportedVariant {
        coordinates: v3::VariantCoordinates {
            chromosome: coords.chromosome,
            position: coords.position,
            reference: coords.reference,
            alternate: coords.alternate,
            assembly: coords.assembly,
        },
        variant_calls: variant.variant_calls,
        report_events: variant
            .report_events
            .into_iter()
            .map(|event| ReportEvent {
                tier: event.tier.unwrap_or(Tier::Untiered),
                genomic_entities: event.genomic_entities,
                event_justification: event.event_justification,
                mode_of_inheritance: None,
            })
            .collect(),
    }
}
