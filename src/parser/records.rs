use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::sections::SUB_ID_PREFIX;
use super::{strip_bold, AssignmentRecord, EMBED_TAG};

static ABSTRACT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">>\s*\[!abstract\](.*)").unwrap());
static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s*\d+\.\s*(.*)").unwrap());
static REFLECTION_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s*#### Reflexionsfrage\s*$").unwrap());
static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>\s*(.*)$").unwrap());

/// Split a `subId:` document into record spans.
///
/// A record starts at every line beginning with [`SUB_ID_PREFIX`] and runs up
/// to the next such line. Text before the first record is not part of any.
pub fn split_records(content: &str) -> Vec<&str> {
    let mut starts = Vec::new();
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if is_record_start(line) {
            starts.push(offset);
        }
        offset += line.len();
    }

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(content.len());
            &content[start..end]
        })
        .collect()
}

fn is_record_start(line: &str) -> bool {
    line.starts_with(SUB_ID_PREFIX)
}

/// Best-effort field extraction. Never fails: missing fields stay empty.
pub fn parse_record(span: &str) -> AssignmentRecord {
    let lines: Vec<&str> = span.lines().collect();

    let identifier = lines
        .first()
        .and_then(|l| l.strip_prefix(SUB_ID_PREFIX))
        .map(|id| id.trim().to_string())
        .unwrap_or_default();

    let abstract_text = lines
        .iter()
        .find_map(|l| ABSTRACT_RE.captures(l))
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default();

    // Only the first two numbered lines count, in document order.
    let mut questions = lines
        .iter()
        .filter_map(|l| QUESTION_RE.captures(l))
        .map(|caps| strip_bold(caps[1].trim()));
    let question1 = questions.next().unwrap_or_default();
    let question2 = questions.next().unwrap_or_default();

    let reflection = lines
        .windows(2)
        .find_map(|pair| reflection_after(pair[0], pair[1]))
        .unwrap_or_default();

    debug!(
        "Parsed record '{}' (abstract: {}, questions: {}/{}, reflection: {})",
        identifier,
        !abstract_text.is_empty(),
        !question1.is_empty(),
        !question2.is_empty(),
        !reflection.is_empty()
    );

    AssignmentRecord {
        identifier,
        abstract_text,
        question1,
        question2,
        reflection,
    }
}

/// The reflection question is the quoted line right after the header, unless
/// that line is already an embed line from an earlier run.
fn reflection_after(header: &str, next: &str) -> Option<String> {
    if !REFLECTION_HEADER_RE.is_match(header) {
        return None;
    }
    let caps = QUOTED_RE.captures(next)?;
    let text = caps[1].trim();
    if text.starts_with(EMBED_TAG) {
        return None;
    }
    Some(strip_bold(text))
}

// ── Tests ──
