use super::QUESTION_HEADER;

/// Closing token of an Auftrag section (end of its embed line).
pub const SECTION_END: &str = "</iframe>";

/// Marker each extracted section is relabelled with.
pub const SUB_ID_PREFIX: &str = "subId:";

/// Lazy scan over the Auftrag sections of a document, in document order.
///
/// A section runs from just after [`QUESTION_HEADER`] through the next
/// [`SECTION_END`], inclusive. Sections are non-overlapping: a header that
/// appears before the pending end token belongs to the current section. A
/// trailing section with no end token is dropped.
pub struct Sections<'a> {
    rest: &'a str,
}

pub fn sections(content: &str) -> Sections<'_> {
    Sections { rest: content }
}

impl Iterator for Sections<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let start = self.rest.find(QUESTION_HEADER)?;
        let body = &self.rest[start + QUESTION_HEADER.len()..];

        let Some(end) = body.find(SECTION_END) else {
            self.rest = "";
            return None;
        };
        let end = end + SECTION_END.len();
        self.rest = &body[end..];

        Some(format!("{}{}", SUB_ID_PREFIX, body[..end].trim()))
    }
}

/// Collect every section into one document, separated by a blank line.
/// Returns `None` when the document has no complete section.
pub fn extract_sections(content: &str) -> Option<String> {
    let found: Vec<String> = sections(content).collect();
    if found.is_empty() {
        None
    } else {
        Some(found.join("\n\n"))
    }
}

// ── Tests ──
