//! Canonical case model
//!
//! The newest schema version. Everything downstream of the migration chain
//! (pedigree traversal, consequence selection, record mapping) works on these
//! types only. The archive model in [`archive`] has a single version and is
//! read as served.

pub mod archive;
pub mod interpretation;
pub mod pedigree;
pub mod vocabulary;

pub use archive::{
    AnnotatedVariant, ArchivedGenomicEntity, ArchivedReportEvent, ConsequenceType, ObservedCall,
    ObservedVariant, ReportEventRecord, SequenceOntologyTerm, VariantAnnotation,
    VariantRepresentation, VariantRepresentations,
};
pub use interpretation::{
    ClinicalReport, InterpretedGenome, ReportEvent, ReportedVariant, VariantCall,
    VariantCoordinates,
};
pub use pedigree::{
    ConsentStatus, InterpretationRequest, Participant, Pedigree, PhenotypeObservation,
};
pub use vocabulary::{
    AffectionStatus, Assembly, GenomicEntity, KaryotypicSex, Sex, TermPresence, Tier, Zygosity,
};
