//! Scan orchestration: fetch the raw audit, normalize it, record history.

use std::sync::Arc;

use tracing::{error, info};
use url::Url;

use crate::domain::report::NormalizedReport;
use crate::error::{AppError, Result};
use crate::report::normalize::normalize;
use crate::repository::ReportStore;
use crate::service::AuditClient;

pub struct ReportService<S> {
    client: AuditClient,
    store: Arc<S>,
}

impl<S: ReportStore> ReportService<S> {
    /// The store is an explicit dependency rather than ambient global state.
    pub fn new(client: AuditClient, store: Arc<S>) -> Self {
        Self { client, store }
    }

    /// Run one scan end to end and return the normalized report.
    ///
    /// Persisting the report to history is best-effort: a store failure is
    /// logged and swallowed because presenting the report takes priority over
    /// recording it.
    pub async fn scan(&self, user_id: &str, url: &str) -> Result<NormalizedReport> {
        Url::parse(url).map_err(|e| AppError::InvalidUrl(format!("{url}: {e}")))?;

        info!(%url, "starting scan");
        let payload = self.client.generate_report(url).await?;
        let report = normalize(&payload, url);

        if let Err(e) = self.store.save_report(user_id, url, &report).await {
            error!(error = %e, %url, "failed to persist report history");
        }

        info!(%url, score = report.overall_score, "scan complete");
        Ok(report)
    }
}
