//! Variant archive client
//!
//! Report events are served in `skip`/`limit` windows. The stream fetches the
//! next window only when the previous one is exhausted and stops once `total`
//! records have been seen, so a consumer can abandon it early or restart it
//! from any offset.

use crate::transport::{Authenticator, BackoffPolicy, RestClient, TransportError};
use crate::types::{ReportEventQuery, ReportEventSource};
use async_stream::stream;
use casebridge_common::model::ReportEventRecord;
use futures::stream::BoxStream;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const TOKEN_ENDPOINT: &str = "cva/api/0/authentication";
const REPORT_EVENTS_ENDPOINT: &str = "cva/api/0/report-events";

#[derive(Debug, Deserialize)]
struct ReportEventPage {
    total: u64,
    #[serde(default)]
    results: Vec<ReportEventRecord>,
}

pub struct ArchiveClient {
    rest: RestClient,
    page_size: u32,
}

impl ArchiveClient {
    pub fn new(
        base_url: &str,
        user: &str,
        password: &str,
        backoff: BackoffPolicy,
        timeout: Duration,
        page_size: u32,
    ) -> Result<Self, TransportError> {
        let auth = Authenticator::Token {
            endpoint: TOKEN_ENDPOINT.to_string(),
            scheme: "Bearer".to_string(),
            user: user.to_string(),
            password: password.to_string(),
        };
        let rest = RestClient::new(base_url, auth, backoff, timeout)?;
        info!(url = %rest.base_url(), "Variant archive client initialised");

        Ok(Self {
            rest,
            page_size: page_size.max(1),
        })
    }

    fn query_params(&self, query: &ReportEventQuery, skip: u64) -> Vec<(&'static str, String)> {
        let tiers = query
            .tiers
            .iter()
            .map(|tier| tier.label())
            .collect::<Vec<_>>()
            .join(",");
        vec![
            ("parent_id", query.case.id.clone()),
            ("parent_version", query.case.version.to_string()),
            ("re_type", "tiered".to_string()),
            ("tier", tiers),
            ("skip", skip.to_string()),
            ("limit", self.page_size.to_string()),
        ]
    }
}

impl ReportEventSource for ArchiveClient {
    fn report_events<'a>(
        &'a self,
        query: &'a ReportEventQuery,
    ) -> BoxStream<'a, Result<ReportEventRecord, TransportError>> {
        Box::pin(stream! {
            let mut skip = query.skip;
            loop {
                let params = self.query_params(query, skip);
                let fetched = self
                    .rest
                    .get::<ReportEventPage>(REPORT_EVENTS_ENDPOINT, &params)
                    .await;
                let page = match fetched {
                    Ok(page) => page,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                };
                debug!(
                    case = %query.case,
                    skip,
                    total = page.total,
                    fetched = page.results.len(),
                    "Fetched report events"
                );

                if page.results.is_empty() {
                    break;
                }
                skip += page.results.len() as u64;
                for record in page.results {
                    yield Ok(record);
                }
                if skip >= page.total {
                    break;
                }
            }
        })
    }
}
