//! A payload parsed at some version, one enum per payload kind

use super::{v1_to_v2, v2_to_v3, v3_to_v4, MigrationContext};
use crate::model;
use crate::schema::{v1, v2, v3, PayloadKind, SchemaVersion};
use serde::Deserialize;
use serde_json::Value;

pub(crate) trait Stage: Sized {
    type Canonical;
    const KIND: PayloadKind;

    /// Structural check and typed parse in one step
    fn parse(version: SchemaVersion, payload: &Value) -> Option<Self>;

    fn version(&self) -> SchemaVersion;

    /// Apply exactly one hop. Canonical values are returned unchanged.
    fn upgrade(self, ctx: &MigrationContext) -> Self;

    fn into_canonical(self) -> Result<Self::Canonical, Self>;
}

fn parse_as<'a, T: Deserialize<'a>>(payload: &'a Value) -> Option<T> {
    T::deserialize(payload).ok()
}

pub(crate) enum RequestStage {
    V1(v1::InterpretationRequest),
    V2(v2::InterpretationRequest),
    V3(v3::InterpretationRequest),
    V4(model::InterpretationRequest),
}

impl Stage for RequestStage {
    type Canonical = model::InterpretationRequest;
    const KIND: PayloadKind = PayloadKind::InterpretationRequest;

    fn parse(version: SchemaVersion, payload: &Value) -> Option<Self> {
        match version {
            SchemaVersion::V1 => parse_as(payload).map(Self::V1),
            SchemaVersion::V2 => parse_as(payload).map(Self::V2),
            SchemaVersion::V3 => parse_as(payload).map(Self::V3),
            SchemaVersion::V4 => parse_as(payload).map(Self::V4),
        }
    }

    fn version(&self) -> SchemaVersion {
        match self {
            Self::V1(_) => SchemaVersion::V1,
            Self::V2(_) => SchemaVersion::V2,
            Self::V3(_) => SchemaVersion::V3,
            Self::V4(_) => SchemaVersion::V4,
        }
    }

    fn upgrade(self, ctx: &MigrationContext) -> Self {
        match self {
            Self::V1(r) => Self::V2(v1_to_v2::interpretation_request(r, ctx)),
            Self::V2(r) => Self::V3(v2_to_v3::interpretation_request(r)),
            Self::V3(r) => Self::V4(v3_to_v4::interpretation_request(r)),
            canonical @ Self::V4(_) => canonical,
        }
    }

    fn into_canonical(self) -> Result<Self::Canonical, Self> {
        match self {
            Self::V4(r) => Ok(r),
            older => Err(older),
        }
    }
}

pub(crate) enum GenomeStage {
    V1(v1::InterpretedGenome),
    V2(v2::InterpretedGenome),
    V3(v3::InterpretedGenome),
    V4(model::InterpretedGenome),
}

impl Stage for GenomeStage {
    type Canonical = model::InterpretedGenome;
    const KIND: PayloadKind = PayloadKind::InterpretedGenome;

    fn parse(version: SchemaVersion, payload: &Value) -> Option<Self> {
        match version {
            SchemaVersion::V1 => parse_as(payload).map(Self::V1),
            SchemaVersion::V2 => parse_as(payload).map(Self::V2),
            SchemaVersion::V3 => parse_as(payload).map(Self::V3),
            SchemaVersion::V4 => parse_as(payload).map(Self::V4),
        }
    }

    fn version(&self) -> SchemaVersion {
        match self {
            Self::V1(_) => SchemaVersion::V1,
            Self::V2(_) => SchemaVersion::V2,
            Self::V3(_) => SchemaVersion::V3,
            Self::V4(_) => SchemaVersion::V4,
        }
    }

    fn upgrade(self, ctx: &MigrationContext) -> Self {
        match self {
            Self::V1(g) => Self::V2(v1_to_v2::interpreted_genome(g, ctx)),
            Self::V2(g) => Self::V3(v2_to_v3::interpreted_genome(g)),
            Self::V3(g) => Self::V4(v3_to_v4::interpreted_genome(g)),
            canonical @ Self::V4(_) => canonical,
        }
    }

    fn into_canonical(self) -> Result<Self::Canonical, Self> {
        match self {
            Self::V4(g) => Ok(g),
            older => Err(older),
        }
    }
}

pub(crate) enum ReportStage {
    V1(v1::ClinicalReport),
    V2(v2::ClinicalReport),
    V3(v3::ClinicalReport),
    V4(model::ClinicalReport),
}

impl Stage for ReportStage {
    type Canonical = model::ClinicalReport;
    const KIND: PayloadKind = PayloadKind::ClinicalReport;

    fn parse(version: SchemaVersion, payload: &Value) -> Option<Self> {
        match version {
            SchemaVersion::V1 => parse_as(payload).map(Self::V1),
            SchemaVersion::V2 => parse_as(payload).map(Self::V2),
            SchemaVersion::V3 => parse_as(payload).map(Self::V3),
            SchemaVersion::V4 => parse_as(payload).map(Self::V4),
        }
    }

    fn version(&self) -> SchemaVersion {
        match self {
            Self::V1(_) => SchemaVersion::V1,
            Self::V2(_) => SchemaVersion::V2,
            Self::V3(_) => SchemaVersion::V3,
            Self::V4(_) => SchemaVersion::V4,
        }
    }

    fn upgrade(self, ctx: &MigrationContext) -> Self {
        match self {
            Self::V1(c) => Self::V2(v1_to_v2::clinical_report(c, ctx)),
            Self::V2(c) => Self::V3(v2_to_v3::clinical_report(c)),
            Self::V3(c) => Self::V4(v3_to_v4::clinical_report(c)),
            canonical @ Self::V4(_) => canonical,
        }
    }

    fn into_canonical(self) -> Result<Self::Canonical, Self> {
        match self {
            Self::V4(c) => Ok(c),
            older => Err(older),
        }
    }
}
