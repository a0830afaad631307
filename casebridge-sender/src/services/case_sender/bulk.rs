//! Bulk submission over the source case listing

use super::CaseSender;
use crate::error::CaseError;
use crate::models::BulkSummary;
use crate::types::{CaseSource, Registry, ReportEventSource};
use futures::StreamExt;
use tracing::{debug, info, warn};

impl<S, A, R> CaseSender<S, A, R>
where
    S: CaseSource,
    A: ReportEventSource,
    R: Registry,
{
    /// Submit every ready case in the listing, one after another
    ///
    /// Cases that fail for their own data are recorded and skipped. The run
    /// stops at the first infrastructure error.
    pub async fn send_all(&self) -> Result<BulkSummary, CaseError> {
        let mut summary = BulkSummary::default();
        let mut listing = self.source.list_cases();

        while let Some(entry) = listing.next().await {
            let entry = entry.map_err(CaseError::Source)?;

            if !entry.is_ready() {
                debug!(
                    case = %entry.interpretation_request_id,
                    status = %entry.last_status,
                    "Case not ready"
                );
                summary.not_ready += 1;
                continue;
            }

            let case = match entry.case_ref() {
                Ok(case) => case,
                Err(reason) => {
                    warn!(reason = %reason, "Skipping malformed listing entry");
                    summary.malformed.push(entry.interpretation_request_id);
                    continue;
                }
            };

            match self.send_case(&case).await {
                Ok(_) => summary.submitted.push(case),
                Err(e) if e.is_infrastructure() => return Err(e),
                Err(e @ CaseError::Unacceptable { .. }) => {
                    summary.unacceptable.push((case, e.to_string()))
                }
                Err(e @ CaseError::Schema(_)) => summary.unsupported.push((case, e.to_string())),
                Err(e) => summary.failed.push((case, e.to_string())),
            }
        }

        info!(
            submitted = summary.submitted.len(),
            skipped = summary.skipped(),
            not_ready = summary.not_ready,
            "Bulk submission finished"
        );
        Ok(summary)
    }
}
