pub mod assemble;
pub mod records;
pub mod rewrite;
pub mod sections;

/// Line prefix that opens an Auftrag in a Lehrmittel document.
pub const QUESTION_HEADER: &str = "> [!question]- ⤵ Auftrag:";

/// Tag name shared by every generated embed line.
pub const EMBED_TAG: &str = "<iframe";

/// One Auftrag as seen by every pass. Fields that were not found stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentRecord {
    pub identifier: String,
    pub abstract_text: String,
    pub question1: String,
    pub question2: String,
    pub reflection: String,
}

/// Two-pass pipeline: `subId:` document → record spans → parsed records.
pub fn parse_document(content: &str) -> Vec<AssignmentRecord> {
    records::split_records(content)
        .into_iter()
        .map(records::parse_record)
        .collect()
}

pub(crate) fn strip_bold(text: &str) -> String {
    text.replace("**", "")
}
