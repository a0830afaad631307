//! HTTP client tests against local mock services
//!
//! Each test binds an axum router on an ephemeral port and points a real
//! client at it. Backoff runs without delay.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use casebridge_sender::error::RegistryError;
use casebridge_sender::models::{
    CaseRef, ChromosomalSex, Consent, Genotype, Patient, RegistryAssembly, Snv,
};
use casebridge_sender::services::{ArchiveClient, RegistryClient, SourceClient};
use casebridge_sender::transport::{BackoffPolicy, TransportError};
use casebridge_sender::types::{CaseSource, Registry, ReportEventQuery, ReportEventSource};
use futures::StreamExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Default)]
struct Counters {
    tokens: Arc<AtomicUsize>,
    requests: Arc<AtomicUsize>,
}

impl Counters {
    fn tokens(&self) -> usize {
        self.tokens.load(Ordering::SeqCst)
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn backoff() -> BackoffPolicy {
    BackoffPolicy::default().without_delay()
}

async fn issue_token(State(counters): State<Counters>) -> Json<Value> {
    let n = counters.tokens.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({ "token": format!("t{}", n) }))
}

fn envelope_json() -> Value {
    json!({
        "case_id": "1001",
        "case_version": 2,
        "last_status": "sent_to_gmcs",
        "assembly": "GRCh37",
        "interpretation_request_data": {"json_request": {}}
    })
}

// ============================================================================
// Source client
// ============================================================================

/// Accepts only the second token ever issued
async fn case_requiring_renewal(State(counters): State<Counters>, headers: HeaderMap) -> Response {
    counters.requests.fetch_add(1, Ordering::SeqCst);
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if authorization == "JWT t2" {
        Json(envelope_json()).into_response()
    } else {
        (StatusCode::FORBIDDEN, "token expired").into_response()
    }
}

async fn case_always_forbidden(State(counters): State<Counters>) -> Response {
    counters.requests.fetch_add(1, Ordering::SeqCst);
    (StatusCode::FORBIDDEN, "not allowed").into_response()
}

fn source_router(case_handler: Router<Counters>, counters: Counters) -> Router {
    Router::new()
        .route("/api/2/get-token/", post(issue_token))
        .merge(case_handler)
        .with_state(counters)
}

#[tokio::test]
async fn test_forbidden_response_renews_token_once() {
    // Given: a service that rejects the first token
    let counters = Counters::default();
    let cases = Router::new().route(
        "/api/2/interpretation-request/1001/2",
        get(case_requiring_renewal),
    );
    let url = spawn(source_router(cases, counters.clone())).await;
    let client = SourceClient::new(&url, "user", "secret", backoff(), TIMEOUT, 50).unwrap();

    // When: the case is fetched
    let envelope = client.fetch_case(&CaseRef::new("1001", 2)).await.unwrap();

    // Then: one renewal, one resend
    assert_eq!(envelope.case_ref(), CaseRef::new("1001", 2));
    assert_eq!(counters.tokens(), 2);
    assert_eq!(counters.requests(), 2);
}

#[tokio::test]
async fn test_second_forbidden_response_is_returned() {
    // Given: a service that rejects every token
    let counters = Counters::default();
    let cases = Router::new().route(
        "/api/2/interpretation-request/1001/2",
        get(case_always_forbidden),
    );
    let url = spawn(source_router(cases, counters.clone())).await;
    let client = SourceClient::new(&url, "user", "secret", backoff(), TIMEOUT, 50).unwrap();

    // When
    let err = client.fetch_case(&CaseRef::new("1001", 2)).await.unwrap_err();

    // Then: no retry loop, the 403 surfaces
    assert!(matches!(err, TransportError::Status { status: 403, .. }));
    assert_eq!(counters.tokens(), 2);
    assert_eq!(counters.requests(), 2);
}

async fn listing(
    State(counters): State<Counters>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    counters.requests.fetch_add(1, Ordering::SeqCst);
    let entry = |id: &str, status: &str| {
        json!({"interpretation_request_id": id, "last_status": status})
    };
    match params.get("page").map(String::as_str) {
        Some("1") => Json(json!({
            "next": "page=2",
            "results": [entry("1001-2", "sent_to_gmcs"), entry("1002-1", "blocked")]
        })),
        _ => Json(json!({
            "next": null,
            "results": [entry("1003-4", "report_generated")]
        })),
    }
}

#[tokio::test]
async fn test_listing_follows_pages_until_next_is_empty() {
    // Given: a listing split over two pages
    let counters = Counters::default();
    let cases = Router::new().route("/api/2/interpretation-request", get(listing));
    let url = spawn(source_router(cases, counters.clone())).await;
    let client = SourceClient::new(&url, "user", "secret", backoff(), TIMEOUT, 2).unwrap();

    // When: the stream is drained
    let ids: Vec<String> = client
        .list_cases()
        .map(|entry| entry.unwrap().interpretation_request_id)
        .collect()
        .await;

    // Then
    assert_eq!(ids, vec!["1001-2", "1002-1", "1003-4"]);
    assert_eq!(counters.requests(), 2);
}

// ============================================================================
// Variant archive client
// ============================================================================

fn archived_event(n: u64) -> Value {
    json!({
        "reportEvent": {
            "reportEventId": format!("RE{}", n),
            "tier": "TIER1",
            "genomicEntities": [{
                "type": "gene",
                "ensemblId": "ENSG00000001626",
                "geneSymbol": "CFTR",
                "otherIds": []
            }]
        },
        "observedVariants": []
    })
}

const ARCHIVED_EVENTS: u64 = 5;

async fn report_events(
    State(counters): State<Counters>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    counters.requests.fetch_add(1, Ordering::SeqCst);
    let number = |name: &str| {
        params
            .get(name)
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or_default()
    };
    let (skip, limit) = (number("skip"), number("limit"));
    assert_eq!(params.get("tier").map(String::as_str), Some("TIER1,TIER2"));
    assert_eq!(params.get("parent_id").map(String::as_str), Some("1001"));

    let results: Vec<Value> = (skip..ARCHIVED_EVENTS.min(skip + limit))
        .map(archived_event)
        .collect();
    Json(json!({"total": ARCHIVED_EVENTS, "results": results}))
}

#[tokio::test]
async fn test_report_events_resume_from_offset() {
    // Given: five archived events served two at a time
    let counters = Counters::default();
    let router = Router::new()
        .route("/cva/api/0/authentication", post(issue_token))
        .route("/cva/api/0/report-events", get(report_events))
        .with_state(counters.clone());
    let url = spawn(router).await;
    let client = ArchiveClient::new(&url, "user", "secret", backoff(), TIMEOUT, 2).unwrap();

    // When: the stream is resumed after the first event
    let query = ReportEventQuery::tiered(CaseRef::new("1001", 2)).resume_from(1);
    let ids: Vec<String> = client
        .report_events(&query)
        .map(|record| record.unwrap().report_event.report_event_id.unwrap_or_default())
        .collect()
        .await;

    // Then: the remaining four, fetched in two windows
    assert_eq!(ids, vec!["RE1", "RE2", "RE3", "RE4"]);
    assert_eq!(counters.requests(), 2);
    assert_eq!(counters.tokens(), 1);
}

// ============================================================================
// Registry client
// ============================================================================

async fn registry_info() -> Json<Value> {
    Json(json!({"user": {"user_id": 7, "project": {"project_id": 3}}}))
}

async fn count_and_refuse(State(counters): State<Counters>) -> Response {
    counters.requests.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "errors": [{"index": 0, "field": "reference", "message": "already registered"}]
        })),
    )
        .into_response()
}

async fn registry(counters: &Counters) -> RegistryClient {
    let router = Router::new()
        .route("/info", get(registry_info))
        .fallback(count_and_refuse)
        .with_state(counters.clone());
    let url = spawn(router).await;
    RegistryClient::connect(&url, "system-key", "user-key", backoff(), TIMEOUT)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_connect_reads_project_and_user() {
    // Given / When
    let counters = Counters::default();
    let client = registry(&counters).await;

    // Then
    assert_eq!(client.project_id(), 3);
    assert_eq!(client.user_id(), Some(7));
}

#[tokio::test]
async fn test_invalid_snv_is_rejected_before_sending() {
    // Given: a variant with a prefixed chromosome
    let counters = Counters::default();
    let client = registry(&counters).await;
    let snv = Snv {
        patient_id: 10,
        assembly: Some(RegistryAssembly::Grch37Hg19),
        chr: "chr7".to_string(),
        start: 117119258,
        ref_allele: "TCTC".to_string(),
        alt_allele: "T".to_string(),
        genotype: Some(Genotype::Heterozygous),
        user_transcript: None,
        user_gene: None,
        intergenic: false,
        inheritance: None,
        pathogenicity: None,
        contribution: None,
        shared: None,
    };

    // When
    let err = client.create_snvs(10, &[snv]).await.unwrap_err();

    // Then: a local validation failure, nothing reached the registry
    match err {
        RegistryError::InvalidRecords { kind, failures } => {
            assert_eq!(kind, "snv");
            assert_eq!(failures[0].index, 0);
            assert_eq!(failures[0].field.as_deref(), Some("chr"));
        }
        other => panic!("expected InvalidRecords, got {other:?}"),
    }
    assert_eq!(counters.requests(), 0);
}

#[tokio::test]
async fn test_registry_rejection_is_structured() {
    // Given: a registry that refuses the patient
    let counters = Counters::default();
    let client = registry(&counters).await;
    let patient = Patient {
        sex: Some(ChromosomalSex::Xy46),
        reference: "5f4dcc3b".to_string(),
        project_id: 3,
        age: "8".to_string(),
        prenatal: None,
        aneuploidy: false,
        user_id: Some(7),
        note: None,
        consent: Consent::No,
    };

    // When
    let err = client.create_patients(&[patient]).await.unwrap_err();

    // Then: status and per-item failures are kept
    assert!(err.is_item_rejection());
    match err {
        RegistryError::Rejected {
            kind,
            status,
            failures,
            ..
        } => {
            assert_eq!(kind, "patient");
            assert_eq!(status, 400);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].field.as_deref(), Some("reference"));
            assert_eq!(failures[0].message, "already registered");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
    assert_eq!(counters.requests(), 1);
}
