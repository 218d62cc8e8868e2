//! Extraction, validation and fallback for raw model output
//!
//! `process` is total: it returns either the cleaned `<svg>` span from the
//! reply, proven well-formed by a strict XML parse, or [`FALLBACK_SVG`].
//! Only the failure classes in [`FallbackReason`] lead to the placeholder.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use shared::{process_warn, ProcessId};
use tracing::debug;

/// Replies above this size are not scanned
pub const MAX_RESPONSE_BYTES: usize = 256 * 1024;

/// Closing tags considered when widening a span
pub const MAX_SPAN_CANDIDATES: usize = 32;

/// Placeholder returned whenever no usable markup can be extracted
pub const FALLBACK_SVG: &str = r#"<svg viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg">
  <circle cx="12" cy="12" r="10" fill="none" stroke="black" stroke-width="2"/>
  <text x="12" y="16" text-anchor="middle" font-size="10" fill="black">?</text>
</svg>"#;

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*\r?\n?").expect("valid fence regex"));
static FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n?[ \t]*```$").expect("valid fence regex"));

const OPEN_TAG: &str = "<svg";
const CLOSE_TAG: &str = "</svg";

/// Why a reply degraded to the placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    Oversized { bytes: usize },
    NoMarkup,
    Malformed { reason: String },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Oversized { bytes } => {
                write!(f, "response of {bytes} bytes exceeds {MAX_RESPONSE_BYTES} byte limit")
            }
            FallbackReason::NoMarkup => write!(f, "no <svg> element found"),
            FallbackReason::Malformed { reason } => write!(f, "markup is not well-formed: {reason}"),
        }
    }
}

/// Outcome of extraction before the fallback is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Markup(String),
    Fallback(FallbackReason),
}

impl Extraction {
    pub fn into_markup(self) -> String {
        match self {
            Extraction::Markup(markup) => markup,
            Extraction::Fallback(_) => FALLBACK_SVG.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Extraction::Fallback(_))
    }
}

/// Turn a raw reply into final markup; never fails
pub fn process(raw: &str, description: &str) -> String {
    let extraction = extract(raw);
    match &extraction {
        Extraction::Markup(markup) => debug!(bytes = markup.len(), "Extracted SVG markup"),
        Extraction::Fallback(reason) => {
            process_warn!(
                ProcessId::current(),
                reason = %reason,
                description,
                "Falling back to placeholder icon"
            );
        }
    }
    extraction.into_markup()
}

/// Run the extraction steps and report what happened
///
/// Candidate spans are tried shortest first; the first one that parses wins.
pub fn extract(raw: &str) -> Extraction {
    if raw.len() > MAX_RESPONSE_BYTES {
        return Extraction::Fallback(FallbackReason::Oversized { bytes: raw.len() });
    }

    let unfenced = strip_code_fences(raw);
    let spans = svg_spans(unfenced.trim());
    if spans.is_empty() {
        return Extraction::Fallback(FallbackReason::NoMarkup);
    }

    let mut last_error = String::new();
    for span in spans {
        let cleaned = normalize(span);
        match validate(&cleaned) {
            Ok(()) => return Extraction::Markup(cleaned),
            Err(reason) => last_error = reason,
        }
    }
    Extraction::Fallback(FallbackReason::Malformed { reason: last_error })
}

/// Remove a leading ```lang fence and a trailing ``` fence
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let start = FENCE_OPEN.find(trimmed).map_or(0, |m| m.end());
    let body = &trimmed[start..];
    let end = FENCE_CLOSE.find(body).map_or(body.len(), |m| m.start());
    &body[..end]
}

/// Spans from the first `<svg` opening tag to each `</svg>` closing tag after it,
/// shortest first and at most `MAX_SPAN_CANDIDATES` of them
pub fn svg_spans(text: &str) -> Vec<&str> {
    // ASCII lowercasing keeps byte offsets identical
    let lower = text.to_ascii_lowercase();
    let Some(start) = find_open_tag(&lower) else {
        return Vec::new();
    };
    close_tag_ends(&lower[start..])
        .into_iter()
        .map(|end| &text[start..start + end])
        .collect()
}

fn find_open_tag(lower: &str) -> Option<usize> {
    let bytes = lower.as_bytes();
    let mut from = 0;

    while let Some(offset) = lower[from..].find(OPEN_TAG) {
        let index = from + offset;
        match bytes.get(index + OPEN_TAG.len()) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(index),
            _ => from = index + OPEN_TAG.len(),
        }
    }
    None
}

/// Byte offsets just past each closing `>`, in order of appearance
fn close_tag_ends(lower: &str) -> Vec<usize> {
    let mut ends = Vec::new();
    let mut from = 0;

    while ends.len() < MAX_SPAN_CANDIDATES {
        let Some(offset) = lower[from..].find(CLOSE_TAG) else {
            break;
        };
        let index = from + offset;
        let rest = &lower[index + CLOSE_TAG.len()..];
        let after_ws = rest.trim_start();
        if after_ws.starts_with('>') {
            let whitespace = rest.len() - after_ws.len();
            ends.push(index + CLOSE_TAG.len() + whitespace + 1);
        }
        from = index + CLOSE_TAG.len();
    }
    ends
}

/// Undo escaped-string artifacts and collapse whitespace
pub fn normalize(span: &str) -> String {
    let unescaped = span
        .replace("\\\"", "\"")
        .replace("\\'", "'")
        .replace("\\n", "")
        .replace("\\t", "")
        .replace("\\r", "");

    unescaped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("> <", "><")
}

/// Strict XML parse; the root element must be `svg`
pub fn validate(markup: &str) -> Result<(), String> {
    let document = roxmltree::Document::parse(markup).map_err(|e| e.to_string())?;
    let root = document.root_element().tag_name().name();
    if root.eq_ignore_ascii_case("svg") {
        Ok(())
    } else {
        Err(format!("root element is <{root}>, expected <svg>"))
    }
}
