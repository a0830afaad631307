//! Canonical → registry record mapping
//!
//! Free functions, no state. Vocabulary translations that have no registry
//! equivalent return `None` and the caller decides whether that is fatal.
//! Identifiers leave this module pseudonymized; the canonical participant is
//! never modified.

use super::pedigree_traversal::RelationLabel;
use casebridge_common::hash_id;
use casebridge_common::model::{
    AffectionStatus, Assembly, ConsentStatus, ConsequenceType, KaryotypicSex, ObservedCall,
    Participant, PhenotypeObservation, Sex, TermPresence, VariantRepresentation, Zygosity,
};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::{
    ChromosomalSex, Consent, Genotype, Inheritance, Observation, Patient, Person, PersonRelation,
    Phenotype, RegistryAssembly, RelationStatus, Snv,
};

/// Oldest age the registry records in whole years
pub const MAX_AGE_YEARS: i32 = 100;

const UNKNOWN_AGE: &str = "unknown";

static INHERITANCE_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)inheritance filter:\s*([a-z_]+)").expect("inheritance pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("Invalid HPO term '{0}'")]
    InvalidHpoTerm(String),

    #[error("Inheritance not recognized in justification '{justification}'")]
    InheritanceNotRecognized { justification: String },
}

/// Chromosomal sex, from the karyotype when it is known
pub fn map_sex(sex: Sex, karyotypic_sex: Option<KaryotypicSex>) -> ChromosomalSex {
    match karyotypic_sex {
        Some(KaryotypicSex::Xx) => ChromosomalSex::Xx46,
        Some(KaryotypicSex::Xy) => ChromosomalSex::Xy46,
        Some(KaryotypicSex::Xo) => ChromosomalSex::X45,
        Some(KaryotypicSex::Xxx) => ChromosomalSex::Xx47,
        Some(KaryotypicSex::Xxy) => ChromosomalSex::Xxy47,
        Some(KaryotypicSex::Xyy) => ChromosomalSex::Xyy47,
        Some(
            KaryotypicSex::Xxyy
            | KaryotypicSex::Xxxy
            | KaryotypicSex::Xxxx
            | KaryotypicSex::Other,
        ) => ChromosomalSex::Other,
        Some(KaryotypicSex::Unknown) | None => match sex {
            Sex::Male => ChromosomalSex::Xy46,
            Sex::Female => ChromosomalSex::Xx46,
            Sex::Unknown => ChromosomalSex::Unknown,
        },
    }
}

/// Age in whole years at `reference_year`, or `unknown`
pub fn map_age(year_of_birth: Option<i32>, reference_year: i32) -> String {
    match year_of_birth.map(|year| reference_year - year) {
        Some(age) if (0..=MAX_AGE_YEARS).contains(&age) => age.to_string(),
        _ => UNKNOWN_AGE.to_string(),
    }
}

/// Consent is only given when both programme and primary finding consent are
pub fn map_consent(consent: Option<&ConsentStatus>) -> Consent {
    match consent {
        Some(c) if c.programme_consent && c.primary_finding_consent => Consent::Yes,
        _ => Consent::No,
    }
}

pub fn map_genotype(zygosity: Zygosity) -> Option<Genotype> {
    match zygosity {
        Zygosity::Heterozygous => Some(Genotype::Heterozygous),
        Zygosity::AlternateHomozygous => Some(Genotype::Homozygous),
        Zygosity::AlternateHemizygous => Some(Genotype::Hemizygous),
        _ => None,
    }
}

pub fn map_relation_status(status: AffectionStatus) -> RelationStatus {
    match status {
        AffectionStatus::Affected => RelationStatus::Affected,
        AffectionStatus::Unaffected => RelationStatus::Unaffected,
        AffectionStatus::Uncertain => RelationStatus::Unknown,
    }
}

/// Registry relation for a member, given their relation label and sex
///
/// The proband and parents have no person relation (the registry creates
/// them with the patient) and unrelated members are not submitted: all map to
/// `None`. Sex-dependent labels for a member of unknown sex fall back to the
/// "other relative" code for their side of the family.
pub fn map_relation(label: RelationLabel, sex: Sex) -> Option<PersonRelation> {
    use PersonRelation::*;

    let by_sex = |male: PersonRelation, female: PersonRelation| match sex {
        Sex::Male => male,
        Sex::Female => female,
        Sex::Unknown if label.is_maternal() => OtherMaternalRelative,
        Sex::Unknown if label.is_paternal() => OtherPaternalRelative,
        Sex::Unknown => OtherBloodRelative,
    };

    let relation = match label {
        RelationLabel::Proband
        | RelationLabel::Father
        | RelationLabel::Mother
        | RelationLabel::Unrelated => return None,
        RelationLabel::Child => by_sex(Son, Daughter),
        RelationLabel::GrandchildThroughSon => by_sex(GrandsonThroughSon, GranddaughterThroughSon),
        RelationLabel::GrandchildThroughDaughter => {
            by_sex(GrandsonThroughDaughter, GranddaughterThroughDaughter)
        }
        RelationLabel::FullSibling | RelationLabel::Twin => by_sex(Brother, Sister),
        RelationLabel::MaternalHalfSibling => by_sex(MaternalHalfBrother, MaternalHalfSister),
        RelationLabel::PaternalHalfSibling => by_sex(PaternalHalfBrother, PaternalHalfSister),
        RelationLabel::MaternalGrandparent => by_sex(MaternalGrandfather, MaternalGrandmother),
        RelationLabel::PaternalGrandparent => by_sex(PaternalGrandfather, PaternalGrandmother),
        RelationLabel::MaternalAuntOrUncle => by_sex(MaternalUncle, MaternalAunt),
        RelationLabel::PaternalAuntOrUncle => by_sex(PaternalUncle, PaternalAunt),
        RelationLabel::MaternalCousin => MaternalCousin,
        RelationLabel::PaternalCousin => PaternalCousin,
        RelationLabel::FraternalNephewOrNiece => by_sex(FraternalNephew, FraternalNiece),
        RelationLabel::SororalNephewOrNiece => by_sex(SororalNephew, SororalNiece),
        RelationLabel::OtherMaternal => OtherMaternalRelative,
        RelationLabel::OtherPaternal => OtherPaternalRelative,
        RelationLabel::OtherBlood => OtherBloodRelative,
    };
    Some(relation)
}

/// GRCh37 is the only assembly the registry accepts
pub fn map_assembly(assembly: Assembly) -> Option<RegistryAssembly> {
    match assembly {
        Assembly::GRCh37 => Some(RegistryAssembly::Grch37Hg19),
        Assembly::GRCh38 => None,
    }
}

/// Strip any `chr` prefix; the mitochondrial chromosome is `MT`
pub fn normalise_chromosome(chromosome: &str) -> String {
    let upper = chromosome.trim().to_ascii_uppercase();
    let bare = upper.strip_prefix("CHR").unwrap_or(&upper);
    match bare {
        "M" => "MT".to_string(),
        other => other.to_string(),
    }
}

/// Numeric part of an HPO identifier: `HP:0001250` → `1250`
pub fn phenotype_id(term: &str) -> Result<u32, MappingError> {
    term.trim()
        .strip_prefix("HP:")
        .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        .and_then(|digits| digits.parse::<u32>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| MappingError::InvalidHpoTerm(term.to_string()))
}

/// Registry phenotype for an observation, if it should be submitted
///
/// Observations of unknown presence are never submitted; absent ones only
/// when `send_absent` is set.
pub fn map_phenotype(
    observation: &PhenotypeObservation,
    person_id: i64,
    send_absent: bool,
) -> Result<Option<Phenotype>, MappingError> {
    let observation_code = match observation.presence {
        TermPresence::Yes => Observation::Present,
        TermPresence::No if send_absent => Observation::Absent,
        TermPresence::No | TermPresence::Unknown => return Ok(None),
    };

    Ok(Some(Phenotype {
        person_id,
        phenotype_id: phenotype_id(&observation.term)?,
        observation: observation_code,
    }))
}

/// Inheritance encoded in a report event justification
///
/// The interpretation pipeline writes `inheritance filter: <pattern>` into the
/// justification. No justification means no inheritance; a justification
/// without a known pattern is an error so that upstream wording changes are
/// noticed.
pub fn parse_inheritance(justification: Option<&str>) -> Result<Option<Inheritance>, MappingError> {
    let Some(text) = justification.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let not_recognized = || MappingError::InheritanceNotRecognized {
        justification: text.to_string(),
    };

    let pattern = INHERITANCE_PHRASE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
        .ok_or_else(not_recognized)?;

    let inheritance = match pattern.as_str() {
        "de_novo" | "denovo" => Inheritance::DeNovoConstitutive,
        "paternal" => Inheritance::PaternalConstitutive,
        "maternal" | "x_linked" => Inheritance::MaternalConstitutive,
        "biparental" | "compound_heterozygous" | "homozygous_recessive" => Inheritance::Biparental,
        "unknown" => Inheritance::Unknown,
        _ => return Err(not_recognized()),
    };
    Ok(Some(inheritance))
}

/// Patient record for the proband
pub fn map_patient(
    proband: &Participant,
    project_id: i64,
    user_id: Option<i64>,
    reference_year: i32,
) -> Patient {
    Patient {
        sex: Some(map_sex(proband.sex, proband.karyotypic_sex)),
        reference: hash_id(&proband.participant_id),
        project_id,
        age: map_age(proband.year_of_birth, reference_year),
        prenatal: None,
        aneuploidy: false,
        user_id,
        note: None,
        consent: map_consent(proband.consent_status.as_ref()),
    }
}

/// Person record for a relative, `None` when the relation has no registry code
pub fn map_person(
    member: &Participant,
    label: RelationLabel,
    patient_id: i64,
) -> Option<Person> {
    map_relation(label, member.sex).map(|relation| Person {
        patient_id,
        relation,
        relation_status: map_relation_status(member.affection_status),
    })
}

/// Variant record from the proband's call on a GRCh37 representation
pub fn map_snv(
    representation: &VariantRepresentation,
    call: &ObservedCall,
    consequence: &ConsequenceType,
    inheritance: Option<Inheritance>,
    patient_id: i64,
) -> Snv {
    let variant = &representation.variant;
    Snv {
        patient_id,
        assembly: Assembly::from_label(&representation.assembly).and_then(map_assembly),
        chr: normalise_chromosome(&variant.chromosome),
        start: variant.start,
        ref_allele: variant.reference.clone(),
        alt_allele: variant.alternate.clone(),
        genotype: map_genotype(call.zygosity),
        user_transcript: consequence.ensembl_transcript_id.clone(),
        user_gene: consequence.gene_name.clone(),
        intergenic: false,
        inheritance,
        pathogenicity: None,
        contribution: None,
        shared: None,
    }
}
