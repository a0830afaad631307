//! Destination registry records
//!
//! Field vocabularies are closed enums, so most constraints hold by
//! construction. Required fields whose value may fail to map are `Option`s and
//! are checked by [`RegistryRecord::validate`] before any request is sent.

use serde::{Deserialize, Serialize};

/// Chromosomes the registry accepts, already normalised (no `chr` prefix)
pub const CHROMOSOMES: [&str; 25] = [
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16", "17",
    "18", "19", "20", "21", "22", "X", "Y", "MT",
];

/// One failed field constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn required(field: &'static str) -> Self {
        Self::new(field, "is required")
    }
}

/// A record that can be written to the registry
pub trait RegistryRecord: Serialize + Send + Sync {
    /// Record kind, used in log and error messages
    const KIND: &'static str;

    /// Every constraint the record violates; empty when valid
    fn validate(&self) -> Vec<FieldError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChromosomalSex {
    #[serde(rename = "46XY")]
    Xy46,
    #[serde(rename = "46XX")]
    Xx46,
    #[serde(rename = "45X")]
    X45,
    #[serde(rename = "47XX")]
    Xx47,
    #[serde(rename = "47XXY")]
    Xxy47,
    #[serde(rename = "47XYY")]
    Xyy47,
    #[serde(rename = "other")]
    Other,
    #[serde(rename = "unknown")]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Consent {
    Yes,
    #[default]
    No,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<ChromosomalSex>,
    pub reference: String,
    pub project_id: i64,
    /// `unknown`, `Prenatal`, or whole years `0` to `100`
    pub age: String,
    /// Weeks of gestation, 10 to 42
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prenatal: Option<u8>,
    pub aneuploidy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub consent: Consent,
}

impl RegistryRecord for Patient {
    const KIND: &'static str = "patient";

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.sex.is_none() {
            errors.push(FieldError::required("sex"));
        }
        if self.reference.trim().is_empty() {
            errors.push(FieldError::required("reference"));
        }
        if self.project_id <= 0 {
            errors.push(FieldError::new("project_id", "must be positive"));
        }
        let age_ok = match self.age.as_str() {
            "unknown" | "Prenatal" => true,
            years => years.parse::<u8>().is_ok_and(|y| y <= 100),
        };
        if !age_ok {
            errors.push(FieldError::new(
                "age",
                format!("'{}' is not unknown, Prenatal or 0-100", self.age),
            ));
        }
        if let Some(weeks) = self.prenatal {
            if !(10..=42).contains(&weeks) {
                errors.push(FieldError::new("prenatal", "must be between 10 and 42 weeks"));
            }
        }
        errors
    }
}

/// Relation of a family member to the patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonRelation {
    Brother,
    Sister,
    Son,
    Daughter,
    MaternalHalfBrother,
    MaternalHalfSister,
    MaternalGrandmother,
    MaternalGrandfather,
    MaternalAunt,
    MaternalUncle,
    MaternalCousin,
    PaternalHalfBrother,
    PaternalHalfSister,
    PaternalGrandmother,
    PaternalGrandfather,
    PaternalAunt,
    PaternalUncle,
    PaternalCousin,
    FraternalNephew,
    FraternalNiece,
    SororalNephew,
    SororalNiece,
    GrandsonThroughDaughter,
    GrandsonThroughSon,
    GranddaughterThroughDaughter,
    GranddaughterThroughSon,
    OtherMaternalRelative,
    OtherPaternalRelative,
    OtherBloodRelative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationStatus {
    Affected,
    Unaffected,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub patient_id: i64,
    pub relation: PersonRelation,
    pub relation_status: RelationStatus,
}

impl RegistryRecord for Person {
    const KIND: &'static str = "person";

    fn validate(&self) -> Vec<FieldError> {
        if self.patient_id <= 0 {
            vec![FieldError::new("patient_id", "must be positive")]
        } else {
            Vec::new()
        }
    }
}

/// A person as listed by the registry, including the auto-created ones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryPerson {
    pub person_id: i64,
    #[serde(default)]
    pub patient_id: Option<i64>,
    /// `patient`, `mother`, `father` or a [`PersonRelation`] label
    pub relation: String,
    #[serde(default)]
    pub relation_status: Option<RelationStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Observation {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phenotype {
    pub person_id: i64,
    /// Numeric part of the HPO identifier
    pub phenotype_id: u32,
    pub observation: Observation,
}

impl RegistryRecord for Phenotype {
    const KIND: &'static str = "phenotype";

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.person_id <= 0 {
            errors.push(FieldError::new("person_id", "must be positive"));
        }
        if self.phenotype_id == 0 {
            errors.push(FieldError::new("phenotype_id", "must be positive"));
        }
        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistryAssembly {
    #[serde(rename = "GRCh37/hg19")]
    Grch37Hg19,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genotype {
    Homozygous,
    Heterozygous,
    Hemizygous,
    #[serde(rename = "Mitochondrial Homoplasmy")]
    MitochondrialHomoplasmy,
    #[serde(rename = "Mitochondrial Heteroplasmy")]
    MitochondrialHeteroplasmy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Inheritance {
    Unknown,
    #[serde(rename = "De novo constitutive")]
    DeNovoConstitutive,
    #[serde(rename = "De novo mosaic")]
    DeNovoMosaic,
    #[serde(rename = "Paternally inherited, constitutive in father")]
    PaternalConstitutive,
    #[serde(rename = "Paternally inherited, mosaic in father")]
    PaternalMosaic,
    #[serde(rename = "Maternally inherited, constitutive in mother")]
    MaternalConstitutive,
    #[serde(rename = "Maternally inherited, mosaic in mother")]
    MaternalMosaic,
    Biparental,
    #[serde(rename = "Imbalance arising from a balanced parental rearrangement")]
    BalancedParentalRearrangement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pathogenicity {
    #[serde(rename = "Definitely pathogenic")]
    DefinitelyPathogenic,
    #[serde(rename = "Likely pathogenic")]
    LikelyPathogenic,
    Uncertain,
    #[serde(rename = "Likely benign")]
    LikelyBenign,
    Benign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Contribution {
    Full,
    Partial,
    Uncertain,
    #[serde(rename = "None")]
    NoContribution,
}

/// A single-nucleotide (or short indel) variant record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snv {
    pub patient_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assembly: Option<RegistryAssembly>,
    pub chr: String,
    pub start: u64,
    pub ref_allele: String,
    pub alt_allele: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genotype: Option<Genotype>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_gene: Option<String>,
    #[serde(default)]
    pub intergenic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inheritance: Option<Inheritance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathogenicity: Option<Pathogenicity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution: Option<Contribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<String>,
}

impl Snv {
    /// Deduplication key: chromosome, start, reference and alternate allele
    pub fn coordinate_key(&self) -> (String, u64, String, String) {
        (
            self.chr.clone(),
            self.start,
            self.ref_allele.clone(),
            self.alt_allele.clone(),
        )
    }
}

fn is_allele(sequence: &str) -> bool {
    !sequence.is_empty()
        && sequence
            .chars()
            .all(|c| matches!(c.to_ascii_uppercase(), 'A' | 'C' | 'G' | 'T' | 'N'))
}

impl RegistryRecord for Snv {
    const KIND: &'static str = "snv";

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.patient_id <= 0 {
            errors.push(FieldError::new("patient_id", "must be positive"));
        }
        if self.assembly.is_none() {
            errors.push(FieldError::required("assembly"));
        }
        if !CHROMOSOMES.contains(&self.chr.as_str()) {
            errors.push(FieldError::new(
                "chr",
                format!("'{}' is not one of 1-22, X, Y, MT", self.chr),
            ));
        }
        if self.start == 0 {
            errors.push(FieldError::new("start", "must be a 1-based position"));
        }
        if !is_allele(&self.ref_allele) {
            errors.push(FieldError::new("ref_allele", "must be a non-empty nucleotide sequence"));
        }
        if !is_allele(&self.alt_allele) {
            errors.push(FieldError::new("alt_allele", "must be a non-empty nucleotide sequence"));
        }
        if self.genotype.is_none() {
            errors.push(FieldError::required("genotype"));
        }
        errors
    }
}

/// A variant record as listed by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredSnv {
    pub patient_snv_id: i64,
    #[serde(flatten)]
    pub snv: Snv,
}
