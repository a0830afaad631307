//! Case payloads and report events
//!
//! Family FAM1, case 1001 version 2: proband P1 (male, born 2010, affected),
//! father P2 and mother P3. Payload builders take the members so tests can
//! shape the pedigree.

use super::fakes::{FakeArchive, FakeRegistry, FakeSource};
use casebridge_common::model::ReportEventRecord;
use casebridge_sender::models::{CaseEnvelope, CaseRef};
use casebridge_sender::services::{CaseSender, SelectionCriteria, SubmissionOptions};
use serde_json::{json, Value};

pub const CASE_ID: &str = "1001";
pub const CASE_VERSION: u32 = 2;
pub const REFERENCE_YEAR: i32 = 2018;

pub fn case_ref() -> CaseRef {
    CaseRef::new(CASE_ID, CASE_VERSION)
}

fn no_consent() -> Value {
    json!({
        "programmeConsent": false, "primaryFindingConsent": false,
        "secondaryFindingConsent": false, "carrierStatusConsent": false
    })
}

/// Canonical pedigree member
pub fn member_v4(
    id: u32,
    sex: &str,
    father: Option<u32>,
    mother: Option<u32>,
    affection: &str,
    phenotypes: &[(&str, &str)],
) -> Value {
    let mut member = json!({
        "participantId": format!("P{}", id),
        "familyId": "FAM1",
        "pedigreeId": id,
        "isProband": id == 1,
        "sex": sex,
        "affectionStatus": affection,
        "consentStatus": no_consent(),
        "phenotypes": phenotypes
            .iter()
            .map(|(term, presence)| json!({"term": term, "presence": presence}))
            .collect::<Vec<_>>(),
    });
    if id == 1 {
        member["karyotypicSex"] = json!("XY");
        member["yearOfBirth"] = json!(2010);
    }
    if let Some(father) = father {
        member["fatherId"] = json!(father);
    }
    if let Some(mother) = mother {
        member["motherId"] = json!(mother);
    }
    member
}

pub fn request_v4(members: Vec<Value>) -> Value {
    json!({
        "caseId": CASE_ID,
        "caseVersion": CASE_VERSION,
        "assembly": "GRCh37",
        "pedigree": {"familyId": "FAM1", "members": members}
    })
}

/// The trio in the version 2 layout; the same family as the trio built with
/// [`member_v4`]
pub fn request_v2() -> Value {
    json!({
        "interpretationRequestId": CASE_ID,
        "interpretationRequestVersion": CASE_VERSION,
        "genomeAssembly": "GRCh37.p13",
        "pedigree": {
            "familyId": "FAM1",
            "participants": [
                {
                    "participantId": "P1", "familyId": "FAM1", "pedigreeId": 1, "isProband": true,
                    "sex": "male", "personKaryotypicSex": "xy", "fatherId": 2, "motherId": 3,
                    "affectionStatus": "affected", "yearOfBirth": 2010,
                    "hpoTermList": [
                        {"term": "HP:0001250", "termPresence": "yes"},
                        {"term": "HP:0000252", "termPresence": "no"}
                    ]
                },
                {
                    "participantId": "P2", "familyId": "FAM1", "pedigreeId": 2, "isProband": false,
                    "sex": "male", "affectionStatus": "unaffected",
                    "hpoTermList": []
                },
                {
                    "participantId": "P3", "familyId": "FAM1", "pedigreeId": 3, "isProband": false,
                    "sex": "female", "affectionStatus": "affected",
                    "hpoTermList": [{"term": "HP:0001250", "termPresence": "yes"}]
                }
            ]
        }
    })
}

pub fn envelope(request: Value) -> CaseEnvelope {
    serde_json::from_value(json!({
        "case_id": CASE_ID,
        "case_version": CASE_VERSION,
        "last_status": "sent_to_gmcs",
        "assembly": "GRCh37.p13",
        "interpretation_request_data": {"json_request": request}
    }))
    .unwrap()
}

pub fn consequence(gene: &str, transcript: &str, so_term: &str, biotype: &str) -> Value {
    json!({
        "geneName": gene,
        "ensemblTranscriptId": transcript,
        "biotype": biotype,
        "sequenceOntologyTerms": [{"accession": so_term}],
        "transcriptAnnotationFlags": ["basic"]
    })
}

fn representation(
    assembly: &str,
    chromosome: &str,
    start: u64,
    reference: &str,
    alternate: &str,
    consequences: Vec<Value>,
) -> Value {
    json!({
        "assembly": assembly,
        "variant": {
            "chromosome": chromosome,
            "start": start,
            "reference": reference,
            "alternate": alternate,
            "annotation": {"consequenceTypes": consequences}
        }
    })
}

pub fn grch37(
    chromosome: &str,
    start: u64,
    reference: &str,
    alternate: &str,
    consequences: Vec<Value>,
) -> Value {
    representation("GRCh37", chromosome, start, reference, alternate, consequences)
}

pub fn grch38(chromosome: &str, start: u64, reference: &str, alternate: &str) -> Value {
    representation("GRCh38", chromosome, start, reference, alternate, Vec::new())
}

pub fn observed(participant: &str, zygosity: &str, representations: Vec<Value>) -> Value {
    json!({
        "variantCall": {"participantId": participant, "zygosity": zygosity},
        "variant": {"variants": representations}
    })
}

pub fn report_event(
    id: &str,
    tier: &str,
    gene: &str,
    justification: Option<&str>,
    observed_variants: Vec<Value>,
) -> ReportEventRecord {
    serde_json::from_value(json!({
        "reportEvent": {
            "reportEventId": id,
            "tier": tier,
            "genomicEntities": [{
                "type": "gene",
                "geneSymbol": gene,
                "ensemblId": "ENSG00000001626",
                "otherIds": []
            }],
            "eventJustification": justification
        },
        "observedVariants": observed_variants
    }))
    .unwrap()
}

/// The CFTR deletion called heterozygous in the proband
pub fn cftr_event(id: &str, justification: Option<&str>) -> ReportEventRecord {
    report_event(
        id,
        "TIER1",
        "CFTR",
        justification,
        vec![observed(
            "P1",
            "heterozygous",
            vec![grch37(
                "chr7",
                117119258,
                "TCTC",
                "T",
                vec![
                    consequence("CFTR", "ENST00000546407", "SO:0001589", "protein_coding"),
                    consequence("CFTR", "ENST00000600166", "SO:0001589", "retained_intron"),
                ],
            )],
        )],
    )
}

pub fn options() -> SubmissionOptions {
    SubmissionOptions {
        send_absent_phenotypes: false,
        strict_inheritance: true,
        archive_ids_pseudonymized: false,
        rollback_on_failure: false,
        reference_year: REFERENCE_YEAR,
    }
}

pub fn sender(
    request: Value,
    events: Vec<ReportEventRecord>,
    registry: FakeRegistry,
    options: SubmissionOptions,
) -> CaseSender<FakeSource, FakeArchive, FakeRegistry> {
    CaseSender::new(
        FakeSource::with_case(envelope(request)),
        FakeArchive::new(events),
        registry,
        SelectionCriteria::default(),
        options,
    )
}
