//! Historical payload schemas
//!
//! Each module holds one version's typed layout for the three payload kinds.
//! Every struct rejects unknown fields, so a successful typed parse is the
//! structural check that decides which version a payload belongs to.
//! The newest version is the canonical model in [`crate::model`].

pub mod v1;
pub mod v2;
pub mod v3;

pub use crate::model as v4;

use serde::Serialize;
use std::fmt;

/// Known schema versions, ordered oldest to newest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SchemaVersion {
    V1,
    V2,
    V3,
    V4,
}

impl SchemaVersion {
    /// The version the whole pipeline works on
    pub const CANONICAL: SchemaVersion = SchemaVersion::V4;

    /// All versions, newest first (detection order)
    pub const DESCENDING: [SchemaVersion; 4] = [
        SchemaVersion::V4,
        SchemaVersion::V3,
        SchemaVersion::V2,
        SchemaVersion::V1,
    ];
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SchemaVersion::V1 => "v1",
            SchemaVersion::V2 => "v2",
            SchemaVersion::V3 => "v3",
            SchemaVersion::V4 => "v4",
        };
        f.write_str(label)
    }
}

/// The three payload kinds a case is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PayloadKind {
    InterpretationRequest,
    InterpretedGenome,
    ClinicalReport,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PayloadKind::InterpretationRequest => "interpretation request",
            PayloadKind::InterpretedGenome => "interpreted genome",
            PayloadKind::ClinicalReport => "clinical report",
        };
        f.write_str(label)
    }
}
