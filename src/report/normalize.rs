//! Turns a raw audit payload into the fixed, ordered list of report findings.
//!
//! The construction order below is significant: the dashboard groups and
//! routes sections by position and slug, so new findings go at the end.

use chrono::{DateTime, Utc};

use crate::domain::models::{AuditPayload, IssueSeverity};
use crate::domain::report::{Finding, HeadingCounts, NormalizedReport, Status};
use crate::report::classify::{classify, classify_readability, AltCoverage, RawSignal};

/// Number of findings every report carries.
pub const SECTION_COUNT: usize = 13;

/// Normalize a raw audit payload into a presentation-ready report.
///
/// Never fails: missing or malformed sub-objects degrade to empty defaults
/// upstream in deserialization, and every rule here tolerates them.
pub fn normalize(payload: &AuditPayload, requested_url: &str) -> NormalizedReport {
    normalize_at(payload, requested_url, Utc::now())
}

/// Timestamp-injecting variant of [`normalize`], used by tests to assert
/// structural idempotence.
pub fn normalize_at(
    payload: &AuditPayload,
    requested_url: &str,
    generated_at: DateTime<Utc>,
) -> NormalizedReport {
    let mut sections = Vec::with_capacity(SECTION_COUNT);

    sections.push(title_tag(payload));
    sections.push(meta_description(payload));
    sections.push(heading_structure(payload));
    sections.push(image_alt(payload));
    sections.push(canonical(payload));
    sections.push(responsive(payload));
    sections.push(https(payload));
    sections.push(robots(payload));
    sections.push(favicon(payload));
    sections.push(speed_heuristics(payload));
    sections.push(sitemap_validator(payload));
    sections.push(link_audit(payload));
    sections.push(content_analysis(payload));

    let overall_score = overall_score(payload, &sections);

    NormalizedReport {
        url: requested_url.to_string(),
        timestamp: generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        overall_score,
        sections,
        link_audit: payload.link_audit.clone(),
        content_analysis: payload.content_analysis.clone(),
    }
}

/// Server-computed score wins when present; otherwise the share of good
/// findings, rounded. The empty-sections guard cannot trigger with the fixed
/// list above but costs nothing.
fn overall_score(payload: &AuditPayload, sections: &[Finding]) -> u8 {
    if let Some(score) = payload.score {
        return score.round().clamp(0.0, 100.0) as u8;
    }
    if sections.is_empty() {
        return 0;
    }
    let good = sections.iter().filter(|f| f.status.is_good()).count();
    ((good as f64 / sections.len() as f64) * 100.0).round() as u8
}

fn title_tag(payload: &AuditPayload) -> Finding {
    let status = classify(RawSignal::Text(payload.title_tag.as_deref()));
    let explanation = match (&payload.title_tag, status) {
        (Some(title), Status::Good) => format!("Title tag found: \"{title}\""),
        _ => "Title tag is missing.".to_string(),
    };
    Finding::new("title-tag", "Title Tag", status, explanation)
}

fn meta_description(payload: &AuditPayload) -> Finding {
    let status = classify(RawSignal::Text(payload.meta_description.as_deref()));
    let explanation = match (&payload.meta_description, status) {
        (Some(desc), Status::Good) => format!("Meta description found: \"{desc}\""),
        _ => "Meta description is missing.".to_string(),
    };
    Finding::new("meta-description", "Meta Description", status, explanation)
}

fn heading_structure(payload: &AuditPayload) -> Finding {
    let has_blocking = payload
        .heading_issues
        .iter()
        .any(|i| i.severity == IssueSeverity::Blocking);
    let has_advisory = payload
        .heading_issues
        .iter()
        .any(|i| i.severity == IssueSeverity::Advisory);

    let status = if payload.h1_count == 0 || has_blocking {
        Status::Bad
    } else if payload.h1_count > 1 || has_advisory {
        Status::Warning
    } else {
        Status::Good
    };

    let explanation = if payload.h1_count == 0 {
        "Page has no H1 heading.".to_string()
    } else if payload.h1_count > 1 {
        format!("Page has {} H1 headings; use exactly one.", payload.h1_count)
    } else if !payload.heading_issues.is_empty() {
        format!("{} heading issue(s) detected.", payload.heading_issues.len())
    } else {
        "Heading structure looks good.".to_string()
    };

    let mut finding = Finding::new("heading-structure", "Heading Structure", status, explanation);
    finding.heading_counts = Some(HeadingCounts {
        h1: payload.h1_count,
        h2: payload.h2_count,
        h3: payload.h3_count,
    });
    finding.heading_order = Some(payload.heading_order.clone());
    finding.heading_issues = Some(payload.heading_issues.clone());
    finding
}

fn image_alt(payload: &AuditPayload) -> Finding {
    let coverage = AltCoverage::parse(payload.alt_image_ratio.as_ref());
    let explanation = if coverage.total == 0 {
        "No images found on the page.".to_string()
    } else if coverage.with_alt == coverage.total {
        format!("All {} images have alt text.", coverage.total)
    } else {
        format!(
            "{} of {} images have alt text",
            coverage.with_alt, coverage.total
        )
    };

    let mut finding = Finding::new("image-alt", "Image Alt Text", coverage.status(), explanation);
    finding.image_alt = Some(coverage);
    finding
}

fn canonical(payload: &AuditPayload) -> Finding {
    let status = classify(RawSignal::Text(payload.canonical.as_deref()));
    let explanation = match (&payload.canonical, status) {
        (Some(href), Status::Good) => format!("Canonical URL: {href}"),
        _ => "Canonical link is missing.".to_string(),
    };
    Finding::new("canonical", "Canonical Tag", status, explanation)
}

fn responsive(payload: &AuditPayload) -> Finding {
    let status = classify(RawSignal::Flag(payload.responsive));
    let explanation = if payload.responsive {
        "Page is mobile responsive."
    } else {
        "Page is not mobile responsive."
    };
    Finding::new("responsive", "Mobile Responsiveness", status, explanation)
}

fn https(payload: &AuditPayload) -> Finding {
    let status = classify(RawSignal::Flag(payload.uses_https));
    let explanation = if payload.uses_https {
        "Site is served over HTTPS."
    } else {
        "Site is not served over HTTPS."
    };
    Finding::new("https", "HTTPS Usage", status, explanation)
}

fn robots(payload: &AuditPayload) -> Finding {
    let status = classify(RawSignal::Flag(payload.has_robots_txt));
    let explanation = if payload.has_robots_txt {
        "robots.txt found."
    } else {
        "robots.txt is missing."
    };
    Finding::new("robots", "Robots.txt", status, explanation)
}

fn favicon(payload: &AuditPayload) -> Finding {
    let status = classify(RawSignal::Flag(payload.has_favicon));
    let explanation = if payload.has_favicon {
        "Favicon found."
    } else {
        "Favicon is missing."
    };
    Finding::new("favicon", "Favicon", status, explanation)
}

fn speed_heuristics(payload: &AuditPayload) -> Finding {
    let speed = payload.speed_audit.clone().unwrap_or_default();
    // Intentionally never Bad regardless of issue severity; pending product
    // clarification on whether severe speed issues should escalate.
    let status = if speed.issues.is_empty() {
        Status::Good
    } else {
        Status::Warning
    };
    let explanation = if speed.issues.is_empty() {
        "No speed issues detected.".to_string()
    } else {
        format!("{} speed issue(s) detected.", speed.issues.len())
    };

    let mut finding = Finding::new("speed-heuristics", "Page Speed", status, explanation);
    finding.speed_audit_data = Some(speed);
    finding
}

fn sitemap_validator(payload: &AuditPayload) -> Finding {
    let sitemap = payload.sitemap.clone().unwrap_or_default();
    let (status, explanation) = if sitemap.found && sitemap.url_count > 0 {
        (
            Status::Good,
            format!("Sitemap found with {} URLs.", sitemap.url_count),
        )
    } else if sitemap.found {
        (Status::Warning, "Sitemap found but lists no URLs.".to_string())
    } else {
        (Status::Bad, "Sitemap not found.".to_string())
    };

    let mut finding = Finding::new("sitemap-validator", "Sitemap", status, explanation);
    finding.sitemap_data = Some(sitemap);
    finding
}

fn link_audit(payload: &AuditPayload) -> Finding {
    let links = payload.link_audit.clone().unwrap_or_default();
    // No warning tier here: any broken link is Bad.
    let (status, explanation) = if links.broken_links_count == 0 {
        (Status::Good, "No broken links detected.".to_string())
    } else {
        (
            Status::Bad,
            format!("{} broken link(s) found.", links.broken_links_count),
        )
    };

    let mut finding = Finding::new("link-audit", "Link Audit", status, explanation);
    finding.link_audit_data = Some(links);
    finding
}

fn content_analysis(payload: &AuditPayload) -> Finding {
    let content = payload.content_analysis.clone().unwrap_or_default();
    let readability = classify_readability(content.flesch_reading_ease_score);
    let explanation = format!(
        "Readability: {} ({} words).",
        readability.label, content.total_word_count
    );

    let mut finding = Finding::new(
        "content-analysis",
        "Content Analysis",
        readability.status,
        explanation,
    );
    finding.content_analysis_data = Some(content);
    finding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        AltImageRatio, ContentAnalysis, HeadingIssue, LinkAudit, SitemapReport, SpeedAudit,
    };

    fn fully_good_payload() -> AuditPayload {
        AuditPayload {
            title_tag: Some("Acme SEO Title".into()),
            meta_description: Some("A fine description".into()),
            h1_count: 1,
            h2_count: 3,
            h3_count: 2,
            alt_image_ratio: Some(AltImageRatio::Ratio("3/3".into())),
            canonical: Some("https://acme.test/".into()),
            responsive: true,
            uses_https: true,
            has_robots_txt: true,
            has_favicon: true,
            sitemap: Some(SitemapReport {
                found: true,
                url_count: 12,
            }),
            content_analysis: Some(ContentAnalysis {
                flesch_reading_ease_score: Some(95.0),
                total_word_count: 900,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn section<'a>(report: &'a NormalizedReport, id: &str) -> &'a Finding {
        report
            .sections
            .iter()
            .find(|f| f.id == id)
            .unwrap_or_else(|| panic!("missing section {id}"))
    }

    #[test]
    fn empty_payload_yields_all_sections_without_panicking() {
        let report = normalize(&AuditPayload::default(), "https://example.com");

        assert_eq!(report.sections.len(), SECTION_COUNT);
        assert!(report.overall_score <= 100);
        for finding in &report.sections {
            assert!(finding.explanation.is_some(), "{} has no explanation", finding.id);
        }

        // Documented fallbacks: absent data is Bad except where "nothing to
        // flag" is itself healthy (no images, no speed issues, no broken links).
        assert_eq!(section(&report, "title-tag").status, Status::Bad);
        assert_eq!(section(&report, "heading-structure").status, Status::Bad);
        assert_eq!(section(&report, "sitemap-validator").status, Status::Bad);
        assert_eq!(section(&report, "content-analysis").status, Status::Bad);
        assert_eq!(section(&report, "image-alt").status, Status::Good);
        assert_eq!(section(&report, "speed-heuristics").status, Status::Good);
        assert_eq!(section(&report, "link-audit").status, Status::Good);
    }

    #[test]
    fn section_order_is_fixed() {
        let report = normalize(&AuditPayload::default(), "https://example.com");
        let ids: Vec<&str> = report.sections.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "title-tag",
                "meta-description",
                "heading-structure",
                "image-alt",
                "canonical",
                "responsive",
                "https",
                "robots",
                "favicon",
                "speed-heuristics",
                "sitemap-validator",
                "link-audit",
                "content-analysis",
            ]
        );
    }

    #[test]
    fn overall_score_is_rounded_share_of_good_sections() {
        // 13 of 13 good.
        let report = normalize(&fully_good_payload(), "https://acme.test");
        assert_eq!(report.overall_score, 100);

        // 7 of 13 good.
        let mut partial = fully_good_payload();
        partial.meta_description = None;
        partial.canonical = None;
        partial.responsive = false;
        partial.uses_https = false;
        partial.has_robots_txt = false;
        partial.has_favicon = false;
        let report = normalize(&partial, "https://acme.test");
        assert_eq!(report.overall_score, 54);

        // 0 of 13 good.
        let mut none_good = AuditPayload::default();
        none_good.alt_image_ratio = Some(AltImageRatio::Ratio("1/2".into()));
        none_good.speed_audit = Some(SpeedAudit {
            issues: vec!["Large images".into()],
            ..Default::default()
        });
        none_good.link_audit = Some(LinkAudit {
            broken_links_count: 1,
            ..Default::default()
        });
        let report = normalize(&none_good, "https://acme.test");
        assert_eq!(report.overall_score, 0);
    }

    #[test]
    fn server_score_overrides_derived_score() {
        let mut payload = fully_good_payload();
        payload.score = Some(42.4);
        let report = normalize(&payload, "https://acme.test");
        assert_eq!(report.overall_score, 42);
    }

    #[test]
    fn heading_structure_is_bad_without_h1_regardless_of_issues() {
        let mut payload = fully_good_payload();
        payload.h1_count = 0;
        payload.heading_issues = vec![HeadingIssue::from_raw("Heading outline is flat")];

        let report = normalize(&payload, "https://acme.test");
        assert_eq!(section(&report, "heading-structure").status, Status::Bad);
    }

    #[test]
    fn heading_structure_warns_on_multiple_h1_without_blocking_issues() {
        let mut payload = fully_good_payload();
        payload.h1_count = 2;
        payload.heading_issues = vec![HeadingIssue::from_raw("⚠️ H3 appears before first H2")];

        let report = normalize(&payload, "https://acme.test");
        assert_eq!(section(&report, "heading-structure").status, Status::Warning);
    }

    #[test]
    fn heading_structure_blocking_issue_is_bad_even_with_one_h1() {
        let mut payload = fully_good_payload();
        payload.heading_issues = vec![HeadingIssue::from_raw("❌ Empty H2 heading")];

        let report = normalize(&payload, "https://acme.test");
        assert_eq!(section(&report, "heading-structure").status, Status::Bad);
    }

    #[test]
    fn speed_heuristics_never_goes_bad() {
        let mut payload = fully_good_payload();
        payload.speed_audit = Some(SpeedAudit {
            issues: vec!["Render-blocking scripts".into(), "No compression".into()],
            ..Default::default()
        });

        let report = normalize(&payload, "https://acme.test");
        assert_eq!(section(&report, "speed-heuristics").status, Status::Warning);
    }

    #[test]
    fn sitemap_found_without_urls_is_warning() {
        let mut payload = fully_good_payload();
        payload.sitemap = Some(SitemapReport {
            found: true,
            url_count: 0,
        });

        let report = normalize(&payload, "https://acme.test");
        assert_eq!(section(&report, "sitemap-validator").status, Status::Warning);
    }

    #[test]
    fn normalize_is_structurally_idempotent() {
        let payload = fully_good_payload();
        let at = Utc::now();

        let first = normalize_at(&payload, "https://acme.test", at);
        let second = normalize_at(&payload, "https://acme.test", at);
        assert_eq!(first, second);

        // Only the explicit timestamp may legitimately differ between calls.
        let later = normalize(&payload, "https://acme.test");
        assert_eq!(first.sections, later.sections);
        assert_eq!(first.overall_score, later.overall_score);
        assert_eq!(first.url, later.url);
    }

    #[test]
    fn end_to_end_mixed_payload() {
        let payload: AuditPayload = serde_json::from_value(serde_json::json!({
            "title_tag": "Missing",
            "meta_description": "Great page",
            "h1_count": 0,
            "alt_image_ratio": "2/4",
            "uses_https": true,
            "has_robots_txt": false,
            "link_audit": {"broken_links_count": 2}
        }))
        .unwrap();

        let report = normalize(&payload, "https://example.com");

        assert_eq!(section(&report, "title-tag").status, Status::Bad);
        assert_eq!(section(&report, "meta-description").status, Status::Good);
        assert_eq!(section(&report, "heading-structure").status, Status::Bad);
        assert_eq!(section(&report, "image-alt").status, Status::Warning);
        assert_eq!(
            section(&report, "image-alt").explanation.as_deref(),
            Some("2 of 4 images have alt text")
        );
        assert_eq!(section(&report, "https").status, Status::Good);
        assert_eq!(section(&report, "robots").status, Status::Bad);
        assert_eq!(section(&report, "link-audit").status, Status::Bad);
        assert!(report.overall_score < 50);
    }

    #[test]
    fn report_carries_requested_url_not_payload_url() {
        let report = normalize(&AuditPayload::default(), "https://asked-for.test/page");
        assert_eq!(report.url, "https://asked-for.test/page");
    }

    #[test]
    fn passthrough_details_survive_verbatim() {
        let payload: AuditPayload = serde_json::from_value(serde_json::json!({
            "speed_audit": {"issues": ["Large images"], "page_size_kb": 2048},
            "link_audit": {"broken_links_count": 1,
                           "broken_links": [{"url": "https://x.test/dead", "reason": "404"}]}
        }))
        .unwrap();

        let report = normalize(&payload, "https://x.test");

        let speed = section(&report, "speed-heuristics")
            .speed_audit_data
            .as_ref()
            .unwrap();
        assert_eq!(speed.extra["page_size_kb"], serde_json::json!(2048));

        let links = section(&report, "link-audit").link_audit_data.as_ref().unwrap();
        assert_eq!(links.broken_links[0].reason, "404");
        assert_eq!(report.link_audit.as_ref().unwrap().broken_links_count, 1);
    }
}
