//! Pure field classifiers shared by the report normalizer.

use serde::Serialize;

use crate::domain::models::AltImageRatio;
use crate::domain::report::Status;

/// Sentinel the backend sends for absent text fields.
const MISSING_SENTINEL: &str = "Missing";

/// A raw payload field reduced to the shape the binary classifier cares about.
#[derive(Debug, Clone, Copy)]
pub enum RawSignal<'a> {
    /// Free-text field; `None` and the `"Missing"` sentinel count as absent.
    Text(Option<&'a str>),
    Flag(bool),
    Count(u64),
    List(usize),
}

/// Crude binary health signal.
///
/// Deliberately two-valued: callers that need `Warning` layer field-specific
/// rules on top (multiple H1s, partial alt coverage, and so on).
pub fn classify(signal: RawSignal<'_>) -> Status {
    match signal {
        RawSignal::Flag(true) => Status::Good,
        RawSignal::Flag(false) => Status::Bad,
        RawSignal::Text(value) => match value {
            Some(s) if !s.is_empty() && s != MISSING_SENTINEL => Status::Good,
            _ => Status::Bad,
        },
        RawSignal::Count(0) | RawSignal::List(0) => Status::Bad,
        RawSignal::Count(_) | RawSignal::List(_) => Status::Good,
    }
}

/// Readability bucket derived from a Flesch reading-ease score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readability {
    pub label: &'static str,
    pub status: Status,
}

/// Inclusive lower bounds, evaluated top-down; first match wins.
const READABILITY_BUCKETS: &[(f64, &str, Status)] = &[
    (90.0, "Very Easy", Status::Good),
    (80.0, "Easy", Status::Good),
    (70.0, "Fairly Easy", Status::Good),
    (60.0, "Standard", Status::Warning),
    (50.0, "Fairly Difficult", Status::Warning),
    (30.0, "Difficult", Status::Bad),
];

/// Classify a Flesch reading-ease score. A missing score lands in the lowest
/// bucket rather than failing.
pub fn classify_readability(score: Option<f64>) -> Readability {
    if let Some(score) = score {
        for &(floor, label, status) in READABILITY_BUCKETS {
            if score >= floor {
                return Readability { label, status };
            }
        }
    }
    Readability {
        label: "Very Difficult",
        status: Status::Bad,
    }
}

/// Image alt coverage reduced to explicit counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AltCoverage {
    pub with_alt: u64,
    pub total: u64,
}

impl AltCoverage {
    /// Parse whichever shape the backend sent. Halves of an `"m/n"` string
    /// that fail integer parsing default to zero, as do missing object fields.
    pub fn parse(raw: Option<&AltImageRatio>) -> Self {
        match raw {
            None => Self::default(),
            Some(AltImageRatio::Counts { with_alt, total }) => Self {
                with_alt: *with_alt,
                total: *total,
            },
            Some(AltImageRatio::Ratio(text)) => {
                let mut halves = text.splitn(2, '/');
                let with_alt = halves
                    .next()
                    .and_then(|h| h.trim().parse().ok())
                    .unwrap_or(0);
                let total = halves
                    .next()
                    .and_then(|h| h.trim().parse().ok())
                    .unwrap_or(0);
                Self { with_alt, total }
            }
        }
    }

    /// Nothing to flag when there are no images; partial coverage is a
    /// warning, never bad.
    pub fn status(&self) -> Status {
        if self.total == 0 || self.with_alt == self.total {
            Status::Good
        } else {
            Status::Warning
        }
    }
}
