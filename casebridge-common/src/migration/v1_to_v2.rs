//! Hop from version 1 to version 2

use super::MigrationContext;
use crate::model::{GenomicEntity, VariantCall, Zygosity};
use crate::schema::{v1, v2};

pub fn interpretation_request(
    request: v1::InterpretationRequest,
    ctx: &MigrationContext,
) -> v2::InterpretationRequest {
    let family_id = request.pedigree.family_id;
    let participants = request
        .pedigree
        .members
        .into_iter()
        .map(|member| participant(member, &family_id))
        .collect();

    v2::InterpretationRequest {
        interpretation_request_id: request.interpretation_request_id,
        interpretation_request_version: request.interpretation_request_version,
        genome_assembly: ctx.assembly.map(|a| a.label().to_string()),
        pedigree: v2::Pedigree {
            family_id,
            participants,
        },
    }
}

pub fn interpreted_genome(
    genome: v1::InterpretedGenome,
    ctx: &MigrationContext,
) -> v2::InterpretedGenome {
    v2::InterpretedGenome {
        interpretation_request_id: genome.interpretation_request_id,
        interpretation_request_version: genome.interpretation_request_version,
        interpretation_service: genome.company_name,
        reported_variants: genome
            .reported_variants
            .into_iter()
            .map(|v| reported_variant(v, ctx))
            .collect(),
    }
}

pub fn clinical_report(report: v1::ClinicalReport, ctx: &MigrationContext) -> v2::ClinicalReport {
    v2::ClinicalReport {
        interpretation_request_id: report.interpretation_request_id,
        interpretation_request_version: report.interpretation_request_version,
        reporting_date: report.reporting_date,
        user: report.user,
        variants: report
            .candidate_variants
            .into_iter()
            .map(|v| reported_variant(v, ctx))
            .collect(),
        genomic_interpretation: report.genomic_interpretation,
    }
}

fn participant(member: v1::Member, family_id: &str) -> v2::Participant {
    v2::Participant {
        participant_id: member.gel_id,
        family_id: family_id.to_string(),
        pedigree_id: member.pedigree_id,
        is_proband: member.is_proband,
        sex: match member.sex {
            v1::Sex::Male => v2::Sex::Male,
            v1::Sex::Female => v2::Sex::Female,
            v1::Sex::Unknown | v1::Sex::Undetermined => v2::Sex::Unknown,
        },
        person_karyotypic_sex: None,
        father_id: parse_number(member.father_id.as_deref()),
        mother_id: parse_number(member.mother_id.as_deref()),
        affection_status: match member.affection_status {
            v1::AffectionStatus::Affected => v2::AffectionStatus::Affected,
            v1::AffectionStatus::Unaffected => v2::AffectionStatus::Unaffected,
            v1::AffectionStatus::Unknown => v2::AffectionStatus::Unknown,
        },
        year_of_birth: parse_number(member.year_of_birth.as_deref()),
        hpo_term_list: member
            .hpo_term_list
            .into_iter()
            .map(|t| v2::HpoTerm {
                term_presence: term_presence(&t.term_presence),
                term: t.term,
            })
            .collect(),
    }
}

/// Numeric fields were free text; anything unparseable becomes absent
fn parse_number<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|s| s.trim().parse().ok())
}

fn term_presence(raw: &str) -> v2::TermPresence {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" => v2::TermPresence::Yes,
        "false" | "no" => v2::TermPresence::No,
        _ => v2::TermPresence::Unknown,
    }
}

fn reported_variant(variant: v1::ReportedVariant, ctx: &MigrationContext) -> v2::ReportedVariant {
    v2::ReportedVariant {
        variant_coordinates: v2::VariantCoordinates {
            chromosome: variant.chromosome,
            position: variant.position,
            reference: variant.reference,
            alternate: variant.alternate,
            assembly: ctx.assembly.map(|a| a.label().to_string()),
        },
        variant_calls: variant
            .called_genotypes
            .into_iter()
            .map(|call| VariantCall {
                participant_id: call.gel_id,
                zygosity: zygosity(call.genotype),
            })
            .collect(),
        report_events: variant
            .report_events
            .into_iter()
            .map(|event| v2::ReportEvent {
                tier: event.tier,
                genomic_entities: vec![GenomicEntity {
                    gene_symbol: event.genomic_feature.gene_symbol,
                    ensembl_id: event.genomic_feature.ensembl_id,
                }],
                event_justification: event.event_justification,
            })
            .collect(),
    }
}

fn zygosity(genotype: v1::Genotype) -> Zygosity {
    match genotype {
        v1::Genotype::Heterozygous => Zygosity::Heterozygous,
        v1::Genotype::HomozygousAlt => Zygosity::AlternateHomozygous,
        v1::Genotype::HomozygousRef => Zygosity::ReferenceHomozygous,
        v1::Genotype::Hemizygous => Zygosity::AlternateHemizygous,
        v1::Genotype::Missing => Zygosity::Missing,
        v1::Genotype::Unknown => Zygosity::Unk,
    }
}
