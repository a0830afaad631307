//! Interpretation request service client
//!
//! Authenticates with a JWT obtained from `api/2/get-token/`. Cases are
//! fetched one version at a time; the listing is paged and consumed lazily.

use crate::models::source::CaseListingPage;
use crate::models::{CaseEnvelope, CaseRef, CaseSummary};
use crate::transport::{Authenticator, BackoffPolicy, RestClient, TransportError};
use crate::types::CaseSource;
use async_stream::stream;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::time::Duration;
use tracing::{debug, info};

const TOKEN_ENDPOINT: &str = "api/2/get-token/";
const CASES_ENDPOINT: &str = "api/2/interpretation-request";

pub struct SourceClient {
    rest: RestClient,
    page_size: u32,
}

impl SourceClient {
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
            scheme: "JWT".to_string(),
            user: user.to_string(),
            password: password.to_string(),
        };
        let rest = RestClient::new(base_url, auth, backoff, timeout)?;
        info!(url = %rest.base_url(), "Source client initialised");

        Ok(Self {
            rest,
            page_size: page_size.max(1),
        })
    }
}

#[async_trait]
impl CaseSource for SourceClient {
    async fn fetch_case(&self, case: &CaseRef) -> Result<CaseEnvelope, TransportError> {
        let endpoint = format!("{}/{}/{}", CASES_ENDPOINT, case.id, case.version);
        debug!(case = %case, "Fetching case");
        self.rest.get(&endpoint, &[]).await
    }

    fn list_cases(&self) -> BoxStream<'_, Result<CaseSummary, TransportError>> {
        Box::pin(stream! {
            let mut page = 1u32;
            loop {
                let query = [
                    ("page", page.to_string()),
                    ("page_size", self.page_size.to_string()),
                ];
                let listing: CaseListingPage = match self.rest.get(CASES_ENDPOINT, &query).await {
                    Ok(listing) => listing,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                };
                debug!(page, cases = listing.results.len(), "Fetched case listing page");

                for summary in listing.results {
                    yield Ok(summary);
                }
                if listing.next.is_none() {
                    break;
                }
                page += 1;
            }
        })
    }
}
