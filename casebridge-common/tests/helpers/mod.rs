//! Shared fixtures: the same three-member case written in every schema version
//!
//! Proband P1 (male, affected, born 2010) with father P2 and mother P3, one
//! heterozygous CFTR variant reported at TIER1.

#![allow(dead_code)]

use serde_json::{json, Value};

pub fn request_v1() -> Value {
    json!({
        "interpretationRequestId": "1001",
        "interpretationRequestVersion": 2,
        "pedigree": {
            "familyId": "FAM1",
            "members": [
                {
                    "gelId": "P1", "pedigreeId": 1, "isProband": true, "sex": "male",
                    "fatherId": "2", "motherId": "3", "affectionStatus": "affected",
                    "yearOfBirth": "2010",
                    "hpoTermList": [
                        {"term": "HP:0001250", "termPresence": "true"},
                        {"term": "HP:0000252", "termPresence": "false"}
                    ]
                },
                {
                    "gelId": "P2", "pedigreeId": 2, "isProband": false, "sex": "male",
                    "affectionStatus": "unaffected", "yearOfBirth": "1980", "hpoTermList": []
                },
                {
                    "gelId": "P3", "pedigreeId": 3, "isProband": false, "sex": "female",
                    "affectionStatus": "affected", "yearOfBirth": "1982",
                    "hpoTermList": [{"term": "HP:0001250", "termPresence": "true"}]
                }
            ]
        }
    })
}

pub fn request_v2() -> Value {
    json!({
        "interpretationRequestId": "1001",
        "interpretationRequestVersion": 2,
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
                    "sex": "male", "affectionStatus": "unaffected", "yearOfBirth": 1980,
                    "hpoTermList": []
                },
                {
                    "participantId": "P3", "familyId": "FAM1", "pedigreeId": 3, "isProband": false,
                    "sex": "female", "affectionStatus": "affected", "yearOfBirth": 1982,
                    "hpoTermList": [{"term": "HP:0001250", "termPresence": "yes"}]
                }
            ]
        }
    })
}

fn no_consent() -> Value {
    json!({
        "programmeConsent": false,
        "primaryFindingConsent": false,
        "secondaryFindingConsent": false,
        "carrierStatusConsent": false
    })
}

pub fn request_v3() -> Value {
    json!({
        "interpretationRequestId": "1001",
        "interpretationRequestVersion": 2,
        "genomeAssembly": "GRCh37.p13",
        "pedigree": {
            "familyId": "FAM1",
            "participants": [
                {
                    "participantId": "P1", "familyId": "FAM1", "pedigreeId": 1, "isProband": true,
                    "sex": "MALE", "personKaryotypicSex": "XY", "fatherId": 2, "motherId": 3,
                    "affectionStatus": "AFFECTED", "yearOfBirth": 2010,
                    "consentStatus": no_consent(),
                    "hpoTermList": [
                        {"term": "HP:0001250", "termPresence": "YES"},
                        {"term": "HP:0000252", "termPresence": "NO"}
                    ]
                },
                {
                    "participantId": "P2", "familyId": "FAM1", "pedigreeId": 2, "isProband": false,
                    "sex": "MALE", "affectionStatus": "UNAFFECTED", "yearOfBirth": 1980,
                    "consentStatus": no_consent(), "hpoTermList": []
                },
                {
                    "participantId": "P3", "familyId": "FAM1", "pedigreeId": 3, "isProband": false,
                    "sex": "FEMALE", "affectionStatus": "AFFECTED", "yearOfBirth": 1982,
                    "consentStatus": no_consent(),
                    "hpoTermList": [{"term": "HP:0001250", "termPresence": "YES"}]
                }
            ]
        }
    })
}

/// Hand-authored canonical equivalent of [`request_v2`] / [`request_v3`]
pub fn request_v4() -> Value {
    json!({
        "caseId": "1001",
        "caseVersion": 2,
        "assembly": "GRCh37",
        "pedigree": {
            "familyId": "FAM1",
            "members": [
                {
                    "participantId": "P1", "familyId": "FAM1", "pedigreeId": 1, "isProband": true,
                    "sex": "MALE", "karyotypicSex": "XY", "fatherId": 2, "motherId": 3,
                    "affectionStatus": "AFFECTED", "yearOfBirth": 2010,
                    "consentStatus": no_consent(),
                    "phenotypes": [
                        {"term": "HP:0001250", "presence": "YES"},
                        {"term": "HP:0000252", "presence": "NO"}
                    ]
                },
                {
                    "participantId": "P2", "familyId": "FAM1", "pedigreeId": 2, "isProband": false,
                    "sex": "MALE", "affectionStatus": "UNAFFECTED", "yearOfBirth": 1980,
                    "consentStatus": no_consent(), "phenotypes": []
                },
                {
                    "participantId": "P3", "familyId": "FAM1", "pedigreeId": 3, "isProband": false,
                    "sex": "FEMALE", "affectionStatus": "AFFECTED", "yearOfBirth": 1982,
                    "consentStatus": no_consent(),
                    "phenotypes": [{"term": "HP:0001250", "presence": "YES"}]
                }
            ]
        }
    })
}

fn variant_v1() -> Value {
    json!({
        "chromosome": "7", "position": 117119258, "reference": "TCTC", "alternate": "T",
        "calledGenotypes": [
            {"gelId": "P1", "genotype": "heterozygous"},
            {"gelId": "P2", "genotype": "homozygous_ref"}
        ],
        "reportEvents": [{
            "tier": "TIER1",
            "genomicFeature": {"geneSymbol": "CFTR", "ensemblId": "ENSG00000001626"}
        }]
    })
}

fn variant_v2() -> Value {
    json!({
        "variantCoordinates": {
            "chromosome": "7", "position": 117119258, "reference": "TCTC", "alternate": "T",
            "assembly": "GRCh37"
        },
        "variantCalls": [
            {"participantId": "P1", "zygosity": "heterozygous"},
            {"participantId": "P2", "zygosity": "reference_homozygous"}
        ],
        "reportEvents": [{
            "tier": "TIER1",
            "genomicEntities": [{"geneSymbol": "CFTR", "ensemblId": "ENSG00000001626"}]
        }]
    })
}

fn variant_v3() -> Value {
    json!({
        "coordinates": {
            "chromosome": "7", "position": 117119258, "reference": "TCTC", "alternate": "T",
            "assembly": "GRCh37"
        },
        "variantCalls": [
            {"participantId": "P1", "zygosity": "heterozygous"},
            {"participantId": "P2", "zygosity": "reference_homozygous"}
        ],
        "reportEvents": [{
            "tier": "TIER1",
            "genomicEntities": [{"geneSymbol": "CFTR", "ensemblId": "ENSG00000001626"}]
        }]
    })
}

pub fn genome_v1() -> Value {
    json!({
        "interpretationRequestId": "1001",
        "interpretationRequestVersion": 2,
        "companyName": "exomiser",
        "reportedVariants": [variant_v1()]
    })
}

pub fn genome_v2() -> Value {
    json!({
        "interpretationRequestId": "1001",
        "interpretationRequestVersion": 2,
        "interpretationService": "exomiser",
        "reportedVariants": [variant_v2()]
    })
}

pub fn genome_v3() -> Value {
    json!({
        "interpretationRequestId": "1001",
        "interpretationRequestVersion": 2,
        "interpretationService": "exomiser",
        "variants": [variant_v3()]
    })
}

pub fn genome_v4() -> Value {
    json!({
        "caseId": "1001",
        "caseVersion": 2,
        "interpretationService": "exomiser",
        "variants": [variant_v3()]
    })
}

pub fn report_v1() -> Value {
    json!({
        "interpretationRequestId": "1001",
        "interpretationRequestVersion": 2,
        "reportingDate": "2019-03-01",
        "user": "clinician",
        "candidateVariants": [variant_v1()],
        "genomicInterpretation": "Likely causative CFTR variant"
    })
}

pub fn report_v2() -> Value {
    json!({
        "interpretationRequestId": "1001",
        "interpretationRequestVersion": 2,
        "reportingDate": "2019-03-01",
        "user": "clinician",
        "variants": [variant_v2()],
        "genomicInterpretation": "Likely causative CFTR variant"
    })
}

pub fn report_v3() -> Value {
    json!({
        "interpretationRequestId": "1001",
        "interpretationRequestVersion": 2,
        "reportingDate": "2019-03-01",
        "user": "clinician",
        "variants": [variant_v3()],
        "interpretationSummary": "Likely causative CFTR variant"
    })
}

pub fn report_v4() -> Value {
    json!({
        "caseId": "1001",
        "caseVersion": 2,
        "reportDate": "2019-03-01",
        "user": "clinician",
        "variants": [variant_v3()],
        "interpretationSummary": "Likely causative CFTR variant"
    })
}
