use crate::embed::{self, LinkBuilder};

use super::{AssignmentRecord, QUESTION_HEADER};

pub const REFLECTION_SECTION: &str = "#### Reflexionsfragen";

/// Rebuild a document from parsed records.
///
/// Each record becomes header, abstract, link and a blank line. Non-empty
/// reflections from all records are then gathered under one trailing section
/// with a single link; that section is left out when there are none.
pub fn assemble(records: &[AssignmentRecord], links: &LinkBuilder) -> String {
    let mut out: Vec<String> = Vec::with_capacity(records.len() * 4 + 3);

    for record in records {
        out.push(format!("{} {}", QUESTION_HEADER, record.identifier));
        out.push(format!(">>[!abstract] {}", record.abstract_text));
        let url = links.record_url(&record.identifier, &record.question1, &record.question2);
        out.push(format!(">>{}", embed::iframe(&url)));
        out.push(String::new());
    }

    let reflections: Vec<&str> = records
        .iter()
        .map(|r| r.reflection.as_str())
        .filter(|r| !r.is_empty())
        .collect();
    if !reflections.is_empty() {
        out.push(REFLECTION_SECTION.to_string());
        out.push(embed::iframe(&links.reflection_url(reflections)));
        out.push(String::new());
    }

    out.join("\n")
}

// ── Tests ──
