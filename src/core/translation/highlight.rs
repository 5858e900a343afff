//! Cosmetic highlighting of medical numeric/unit patterns in translated
//! text: dosages, vital-sign values, and timing phrases. Purely
//! presentational; never affects stored data.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// What a highlighted span represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    Dosage,
    VitalSign,
    Timing,
}

/// A byte range in the translated text worth emphasizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub kind: HighlightKind,
}

static DOSAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d+(?:\.\d+)?\s?(?:mg|mcg|ml|g|units?|tablets?|tabletas?|pills?|drops?|comprimidos?)\b")
        .expect("dosage pattern")
});

static VITAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{2,3}/\d{2,3}\b|\b\d+(?:\.\d+)?\s?(?:bpm|mmhg|°\s?[cf])").expect("vital pattern")
});

static TIMING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:every|each|cada)\s\d+\s(?:hours?|minutes?|days?|horas?|minutos?|d[ií]as?)\b|\b(?:once|twice|three times)\s(?:daily|a day)\b")
        .expect("timing pattern")
});

/// Find highlightable spans, sorted by position. Overlapping matches keep
/// the earlier span.
pub fn find_highlights(text: &str) -> Vec<HighlightSpan> {
    let mut spans: Vec<HighlightSpan> = Vec::new();
    for (regex, kind) in [
        (&*DOSAGE_RE, HighlightKind::Dosage),
        (&*VITAL_RE, HighlightKind::VitalSign),
        (&*TIMING_RE, HighlightKind::Timing),
    ] {
        for found in regex.find_iter(text) {
            spans.push(HighlightSpan {
                start: found.start(),
                end: found.end(),
                kind,
            });
        }
    }

    spans.sort_by_key(|span| (span.start, span.end));
    let mut kept: Vec<HighlightSpan> = Vec::new();
    for span in spans {
        if kept
            .last()
            .map(|prev| span.start >= prev.end)
            .unwrap_or(true)
        {
            kept.push(span);
        }
    }
    kept
}
