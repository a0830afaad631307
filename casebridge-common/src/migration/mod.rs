//! Schema migration chain
//!
//! Upgrades a raw payload of any known schema version to the canonical model.
//!
//! # Algorithm
//!
//! 1. Try each version's typed layout, newest first. The first successful
//!    parse decides the version; a payload matching nothing is rejected with
//!    [`Error::UnsupportedSchemaVersion`].
//! 2. Apply single-hop migrators (`v1 -> v2 -> v3 -> v4`) until canonical.
//!
//! Each hop is a pure function. Fields the newer version cannot reconstruct are
//! passed through as absent. The only outside input is the assembly, needed
//! because version 1 payloads do not record one.

mod stages;
pub mod v1_to_v2;
pub mod v2_to_v3;
pub mod v3_to_v4;

use crate::error::{Error, Result};
use crate::model::{Assembly, ClinicalReport, InterpretationRequest, InterpretedGenome};
use crate::schema::{PayloadKind, SchemaVersion};
use serde::Serialize;
use serde_json::Value;
use stages::{GenomeStage, ReportStage, RequestStage, Stage};
use tracing::debug;

/// Outside knowledge the hops may need
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationContext {
    /// Assembly of the case, supplied to payloads that predate the field
    pub assembly: Option<Assembly>,
}

impl MigrationContext {
    pub fn new(assembly: Option<Assembly>) -> Self {
        Self { assembly }
    }
}

/// A payload of any kind, upgraded to the canonical version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CanonicalRecord {
    InterpretationRequest(InterpretationRequest),
    InterpretedGenome(InterpretedGenome),
    ClinicalReport(ClinicalReport),
}

/// Upgrade `payload` of the given kind to the canonical model
pub fn migrate(
    payload: &Value,
    kind: PayloadKind,
    assembly: Option<Assembly>,
) -> Result<CanonicalRecord> {
    let ctx = MigrationContext::new(assembly);
    Ok(match kind {
        PayloadKind::InterpretationRequest => {
            CanonicalRecord::InterpretationRequest(run::<RequestStage>(payload, &ctx)?)
        }
        PayloadKind::InterpretedGenome => {
            CanonicalRecord::InterpretedGenome(run::<GenomeStage>(payload, &ctx)?)
        }
        PayloadKind::ClinicalReport => {
            CanonicalRecord::ClinicalReport(run::<ReportStage>(payload, &ctx)?)
        }
    })
}

pub fn migrate_interpretation_request(
    payload: &Value,
    assembly: Option<Assembly>,
) -> Result<InterpretationRequest> {
    run::<RequestStage>(payload, &MigrationContext::new(assembly))
}

pub fn migrate_interpreted_genome(
    payload: &Value,
    assembly: Option<Assembly>,
) -> Result<InterpretedGenome> {
    run::<GenomeStage>(payload, &MigrationContext::new(assembly))
}

pub fn migrate_clinical_report(
    payload: &Value,
    assembly: Option<Assembly>,
) -> Result<ClinicalReport> {
    run::<ReportStage>(payload, &MigrationContext::new(assembly))
}

/// Report which schema version `payload` structurally belongs to
pub fn detect_version(payload: &Value, kind: PayloadKind) -> Result<SchemaVersion> {
    Ok(match kind {
        PayloadKind::InterpretationRequest => detect::<RequestStage>(payload)?.version(),
        PayloadKind::InterpretedGenome => detect::<GenomeStage>(payload)?.version(),
        PayloadKind::ClinicalReport => detect::<ReportStage>(payload)?.version(),
    })
}

fn detect<S: Stage>(payload: &Value) -> Result<S> {
    let mut attempted = Vec::with_capacity(SchemaVersion::DESCENDING.len());
    for version in SchemaVersion::DESCENDING {
        attempted.push(version);
        if let Some(stage) = S::parse(version, payload) {
            debug!(kind = %S::KIND, version = %version, "Detected payload schema version");
            return Ok(stage);
        }
    }
    Err(Error::UnsupportedSchemaVersion {
        kind: S::KIND,
        attempted,
    })
}

fn run<S: Stage>(payload: &Value, ctx: &MigrationContext) -> Result<S::Canonical> {
    let mut stage = detect::<S>(payload)?;
    loop {
        match stage.into_canonical() {
            Ok(canonical) => return Ok(canonical),
            Err(older) => {
                let from = older.version();
                stage = older.upgrade(ctx);
                debug!(
                    kind = %S::KIND,
                    from = %from,
                    to = %stage.version(),
                    "Applied schema migration hop"
                );
            }
        }
    }
}
