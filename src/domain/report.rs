//! Presentation-ready report types produced by the normalizer.
//!
//! Field names serialize in camelCase because the dashboard consumes these
//! documents directly.

use serde::Serialize;

use crate::domain::models::{
    ContentAnalysis, HeadingEntry, HeadingIssue, LinkAudit, SitemapReport, SpeedAudit,
};
use crate::report::classify::AltCoverage;

/// Three-valued health indicator attached to every finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Good,
    Warning,
    Bad,
}

impl Status {
    pub fn is_good(self) -> bool {
        matches!(self, Status::Good)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Good => "good",
            Status::Warning => "warning",
            Status::Bad => "bad",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeadingCounts {
    pub h1: u32,
    pub h2: u32,
    pub h3: u32,
}

/// One categorized result row in a normalized report.
///
/// `id` is a stable slug the dashboard routes detail views by. Structured
/// detail fields are populated per finding and passed through verbatim from
/// the payload; absent details are omitted from the serialized document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub id: String,
    pub title: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_counts: Option<HeadingCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_order: Option<Vec<HeadingEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_issues: Option<Vec<HeadingIssue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<AltCoverage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_audit_data: Option<SpeedAudit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sitemap_data: Option<SitemapReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_audit_data: Option<LinkAudit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_analysis_data: Option<ContentAnalysis>,
}

impl Finding {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        status: Status,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            explanation: Some(explanation.into()),
            heading_counts: None,
            heading_order: None,
            heading_issues: None,
            image_alt: None,
            speed_audit_data: None,
            sitemap_data: None,
            link_audit_data: None,
            content_analysis_data: None,
        }
    }
}

/// The canonical, presentation-ready report for one scanned URL.
///
/// Never mutated after creation; a new scan produces a new report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReport {
    /// The originally requested URL, not the payload's own notion of it.
    pub url: String,
    pub timestamp: String,
    pub overall_score: u8,
    /// Findings in fixed construction order; the dashboard relies on it.
    pub sections: Vec<Finding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_audit: Option<LinkAudit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_analysis: Option<ContentAnalysis>,
}
