//! Typed model of the raw audit payload returned by the backend service.
//!
//! The payload is externally defined and only partially reliable: fields come
//! and go between backend versions and malformed values do show up. Every
//! field therefore deserializes leniently - a missing or wrong-typed field
//! degrades to its default instead of failing the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a field through `serde_json::Value` so a wrong-typed value
/// falls back to the default instead of poisoning the surrounding struct.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Severity of a single heading issue.
///
/// The backend encodes severity as a leading emoji on the issue string; that
/// convention is decoded here, at the payload boundary, and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Blocking,
    Advisory,
    Info,
}

/// One heading issue with its severity made explicit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingIssue {
    pub severity: IssueSeverity,
    pub message: String,
}

impl HeadingIssue {
    /// Decode the backend convention: `❌` marks a blocking issue, `⚠️` an
    /// advisory one, anything else is informational.
    pub fn from_raw(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix('❌') {
            Self {
                severity: IssueSeverity::Blocking,
                message: rest.trim().to_string(),
            }
        } else if let Some(rest) = raw.strip_prefix("⚠️").or_else(|| raw.strip_prefix('⚠')) {
            Self {
                severity: IssueSeverity::Advisory,
                message: rest.trim().to_string(),
            }
        } else {
            Self {
                severity: IssueSeverity::Info,
                message: raw.trim().to_string(),
            }
        }
    }
}

impl<'de> Deserialize<'de> for HeadingIssue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_raw(&raw))
    }
}

/// One entry of the page's heading outline, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadingEntry {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub text: String,
}

/// Image alt coverage as the backend reports it: either an `"m/n"` string or
/// an object with explicit counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AltImageRatio {
    Ratio(String),
    Counts {
        #[serde(default, rename = "withAlt")]
        with_alt: u64,
        #[serde(default)]
        total: u64,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedAudit {
    #[serde(default)]
    pub issues: Vec<String>,
    /// Remaining backend fields, passed through verbatim for presentation.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitemapReport {
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub url_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokenLink {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkAudit {
    #[serde(default)]
    pub broken_links_count: u64,
    #[serde(default)]
    pub broken_links: Vec<BrokenLink>,
    #[serde(default)]
    pub internal_links_count: u64,
    #[serde(default)]
    pub external_links_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordStat {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub frequency: u64,
    #[serde(default)]
    pub density: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    #[serde(default)]
    pub flesch_reading_ease_score: Option<f64>,
    #[serde(default)]
    pub total_word_count: u64,
    #[serde(default)]
    pub top_keywords: Vec<KeywordStat>,
    #[serde(default)]
    pub keyword_suggestions: Vec<String>,
}

/// The raw audit document for one scanned URL.
///
/// The backend may send the literal string `"Missing"` for absent text fields;
/// the classifier treats that sentinel the same as a missing field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub title_tag: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub meta_description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub h1_count: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub h2_count: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub h3_count: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub heading_order: Vec<HeadingEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub heading_issues: Vec<HeadingIssue>,
    #[serde(default, deserialize_with = "lenient")]
    pub alt_image_ratio: Option<AltImageRatio>,
    #[serde(default, deserialize_with = "lenient")]
    pub canonical: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub responsive: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub uses_https: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub has_robots_txt: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub has_favicon: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub speed_audit: Option<SpeedAudit>,
    #[serde(default, deserialize_with = "lenient")]
    pub sitemap: Option<SitemapReport>,
    #[serde(default, deserialize_with = "lenient")]
    pub link_audit: Option<LinkAudit>,
    #[serde(default, deserialize_with = "lenient")]
    pub content_analysis: Option<ContentAnalysis>,
    /// Server-computed score override, when present.
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<f64>,
}
