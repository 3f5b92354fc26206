use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::embed::{self, LinkBuilder};

use super::{strip_bold, AssignmentRecord, EMBED_TAG, QUESTION_HEADER};

const ABSTRACT_MARKER: &str = ">> [!abstract]";
const COMPREHENSION_HEADER: &str = "> #### Verständnisfragen";
const REFLECTION_HEADER: &str = "> #### Reflexionsfrage";

/// Separates the document body from the relocated reflection blocks.
pub const APPENDIX_MARKER: &str = "\n<!-- Appended Reflexionsfragen -->\n";

static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>\s*(\d+)\.\s*(.*)").unwrap());

/// Result of one in-place pass.
#[derive(Debug)]
pub struct Rewritten {
    pub text: String,
    pub records: usize,
    pub relocated: usize,
}

/// Lines of one Auftrag as found in the source.
struct RecordBlock<'a> {
    header: &'a str,
    abstract_line: Option<&'a str>,
    reflection: Option<ReflectionBlock<'a>>,
    record: AssignmentRecord,
}

struct ReflectionBlock<'a> {
    header: &'a str,
    question: Option<&'a str>,
}

/// Regenerate every record's embed link in place.
///
/// Lines outside records are copied byte for byte. Each record keeps its
/// header and abstract and gets one fresh link right after them. Its question
/// lines are folded into that link and its old link is dropped. Reflection
/// blocks are moved behind [`APPENDIX_MARKER`] at the end of the document, in
/// record order, each carrying the record's new link.
pub fn rewrite(content: &str, links: &LinkBuilder) -> Rewritten {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let mut out = String::with_capacity(content.len() + 1024);
    let mut appendix: Vec<String> = Vec::new();
    let mut records = 0;
    let mut i = 0;

    while i < lines.len() {
        if !lines[i].starts_with(QUESTION_HEADER) {
            out.push_str(lines[i]);
            i += 1;
            continue;
        }

        let (block, next) = scan_record(&lines, i, links);
        i = next;
        records += 1;

        let record = &block.record;
        let url = links.record_url(&record.identifier, &record.question1, &record.question2);
        let link_line = format!(">{}\n", embed::iframe(&url));

        push_line(&mut out, block.header);
        if let Some(line) = block.abstract_line {
            push_line(&mut out, line);
        }
        out.push_str(&link_line);

        if let Some(reflection) = block.reflection {
            let mut moved = String::new();
            push_line(&mut moved, reflection.header);
            if let Some(question) = reflection.question {
                push_line(&mut moved, question);
            }
            moved.push_str(&link_line);
            appendix.push(moved);
        }
    }

    let relocated = appendix.len();
    if relocated > 0 {
        out.push_str(APPENDIX_MARKER);
        for moved in &appendix {
            out.push_str(moved);
        }
    }

    Rewritten {
        text: out,
        records,
        relocated,
    }
}

/// Consume one record starting at the header line `start`.
/// Returns the block and the index of the first line after it. Only embeds
/// that point at the answer page are treated as stale links; other iframes
/// end the record and stay where they are.
fn scan_record<'a>(lines: &[&'a str], start: usize, links: &LinkBuilder) -> (RecordBlock<'a>, usize) {
    let header = lines[start];
    let mut record = AssignmentRecord {
        identifier: strip_bold(header[QUESTION_HEADER.len()..].trim()),
        ..Default::default()
    };
    let mut i = start + 1;

    let mut abstract_line = None;
    if let Some(line) = lines.get(i).filter(|l| l.trim_start().starts_with(ABSTRACT_MARKER)) {
        record.abstract_text = line.trim_start()[ABSTRACT_MARKER.len()..].trim().to_string();
        abstract_line = Some(*line);
        i += 1;
    }

    let mut reflection = None;
    while i < lines.len() {
        let line = lines[i];
        let stripped = line.trim_start();

        if line.starts_with(QUESTION_HEADER) {
            break;
        }

        if stripped.starts_with(COMPREHENSION_HEADER) {
            i += 1;
            if let Some(q) = lines.get(i).and_then(|l| numbered(l, 1)) {
                record.question1 = q;
                i += 1;
            }
            if let Some(q) = lines.get(i).and_then(|l| numbered(l, 2)) {
                record.question2 = q;
                i += 1;
            }
            continue;
        }

        if stripped.starts_with(REFLECTION_HEADER) {
            i += 1;
            let question = lines
                .get(i)
                .copied()
                .filter(|l| l.trim_start().starts_with('>') && !l.contains(EMBED_TAG));
            if let Some(q) = question {
                record.reflection = strip_bold(q.trim_start()[1..].trim());
                i += 1;
            }
            // The old link of the reflection block is replaced.
            if lines.get(i).is_some_and(|l| links.is_own_link(l)) {
                i += 1;
            }
            reflection = Some(ReflectionBlock {
                header: line,
                question,
            });
            break;
        }

        // Stale link from an earlier run.
        if links.is_own_link(line) {
            i += 1;
            continue;
        }

        break;
    }

    debug!(
        "Rewrote record '{}' (questions: {}/{}, reflection: {})",
        record.identifier,
        !record.question1.is_empty(),
        !record.question2.is_empty(),
        reflection.is_some()
    );

    (
        RecordBlock {
            header,
            abstract_line,
            reflection,
            record,
        },
        i,
    )
}

/// Question text of a `>N. text` line, if it carries number `n`.
fn numbered(line: &str, n: u32) -> Option<String> {
    let caps = NUMBERED_RE.captures(line)?;
    if caps[1].parse::<u32>().ok()? != n {
        return None;
    }
    Some(strip_bold(caps[2].trim()))
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    if !line.ends_with('\n') {
        out.push('\n');
    }
}

// ── Tests ──
