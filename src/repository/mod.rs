//! Report history storage seam.
//!
//! Which backend holds report history is outside this crate; `ReportStore`
//! is the explicit dependency handed to the service layer. The in-memory
//! implementation backs tests and local wiring.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::report::NormalizedReport;
use crate::error::Result;

/// A stored report plus its storage metadata.
#[derive(Debug, Clone)]
pub struct StoredReport {
    pub id: String,
    pub url: String,
    pub report: NormalizedReport,
    pub saved_at: DateTime<Utc>,
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist a finished report under the user's collection; returns its id.
    async fn save_report(
        &self,
        user_id: &str,
        url: &str,
        report: &NormalizedReport,
    ) -> Result<String>;

    /// All of the user's reports, newest first.
    async fn list_reports(&self, user_id: &str) -> Result<Vec<StoredReport>>;

    async fn delete_report(&self, user_id: &str, report_id: &str) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryReportStore {
    reports: RwLock<HashMap<String, Vec<StoredReport>>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn save_report(
        &self,
        user_id: &str,
        url: &str,
        report: &NormalizedReport,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let stored = StoredReport {
            id: id.clone(),
            url: url.to_string(),
            report: report.clone(),
            saved_at: Utc::now(),
        };

        self.reports
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push(stored);

        Ok(id)
    }

    async fn list_reports(&self, user_id: &str) -> Result<Vec<StoredReport>> {
        let guard = self.reports.read().await;
        let mut reports = guard.get(user_id).cloned().unwrap_or_default();
        reports.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(reports)
    }

    async fn delete_report(&self, user_id: &str, report_id: &str) -> Result<()> {
        let mut guard = self.reports.write().await;
        if let Some(reports) = guard.get_mut(user_id) {
            reports.retain(|r| r.id != report_id);
        }
        Ok(())
    }
}
