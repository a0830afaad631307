//! Canonical interpretation request and pedigree

use super::vocabulary::{AffectionStatus, Assembly, KaryotypicSex, Sex, TermPresence};
use serde::{Deserialize, Serialize};

/// A case: the family pedigree plus the assembly its variants are called on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterpretationRequest {
    pub case_id: String,
    pub case_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assembly: Option<Assembly>,
    pub pedigree: Pedigree,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Pedigree {
    pub family_id: String,
    pub members: Vec<Participant>,
}

impl Pedigree {
    /// Every member flagged as proband
    pub fn probands(&self) -> impl Iterator<Item = &Participant> {
        self.members.iter().filter(|m| m.is_proband)
    }

    /// The proband, if exactly one member is flagged
    pub fn proband(&self) -> Option<&Participant> {
        let mut probands = self.probands();
        match (probands.next(), probands.next()) {
            (Some(proband), None) => Some(proband),
            _ => None,
        }
    }

    pub fn member(&self, pedigree_id: u32) -> Option<&Participant> {
        self.members.iter().find(|m| m.pedigree_id == pedigree_id)
    }

    pub fn father_of(&self, participant: &Participant) -> Option<&Participant> {
        participant.father_id.and_then(|id| self.member(id))
    }

    pub fn mother_of(&self, participant: &Participant) -> Option<&Participant> {
        participant.mother_id.and_then(|id| self.member(id))
    }
}

/// One pedigree member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Participant {
    pub participant_id: String,
    pub family_id: String,
    pub pedigree_id: u32,
    pub is_proband: bool,
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub karyotypic_sex: Option<KaryotypicSex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_of_birth: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_id: Option<u32>,
    pub affection_status: AffectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_status: Option<ConsentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twin_group: Option<String>,
    pub phenotypes: Vec<PhenotypeObservation>,
}

/// Consent flags recorded for a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConsentStatus {
    pub programme_consent: bool,
    pub primary_finding_consent: bool,
    pub secondary_finding_consent: bool,
    pub carrier_status_consent: bool,
}

/// An HPO term with its observed presence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhenotypeObservation {
    pub term: String,
    pub presence: TermPresence,
}
