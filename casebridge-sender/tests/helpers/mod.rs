//! Test helper utilities
//!
//! Shared fixtures and in-memory service fakes for casebridge-sender tests

#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;

pub use fakes::{FakeArchive, FakeRegistry, FakeSource, RegistryCall};
pub use fixtures::{
    case_ref, cftr_event, consequence, envelope, grch37, grch38, member_v4, observed, options,
    report_event, request_v2, request_v4, sender, CASE_ID, CASE_VERSION, REFERENCE_YEAR,
};
