use std::borrow::Cow;

use clap::ValueEnum;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://allgemeinbildung.github.io/textbox/answers.html";

/// `subIds` value the answer page stores aggregated reflections under.
pub const REFLECTION_SUB_ID: &str = "Refexionsfrage";

/// Matches Python's `urllib.parse.quote` with its default `safe="/"`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// How query values are written into generated links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Values are inserted as-is.
    Raw,
    /// Values are percent-encoded.
    Percent,
}

impl Encoding {
    pub fn apply(self, value: &str) -> Cow<'_, str> {
        match self {
            Encoding::Raw => Cow::Borrowed(value),
            Encoding::Percent => utf8_percent_encode(value, QUERY_VALUE).into(),
        }
    }
}

/// Builds answer-page URLs for one document.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    endpoint: String,
    assignment_id: String,
    encoding: Encoding,
}

impl LinkBuilder {
    pub fn new(endpoint: impl Into<String>, assignment_id: impl Into<String>, encoding: Encoding) -> Self {
        LinkBuilder {
            endpoint: endpoint.into(),
            assignment_id: assignment_id.into(),
            encoding,
        }
    }

    /// Link for one record's two comprehension questions.
    pub fn record_url(&self, sub_id: &str, question1: &str, question2: &str) -> String {
        self.url(sub_id, [question1, question2])
    }

    /// Link collecting reflection questions, numbered `question1..N` in the
    /// order given.
    pub fn reflection_url<'q>(&self, reflections: impl IntoIterator<Item = &'q str>) -> String {
        self.url(REFLECTION_SUB_ID, reflections)
    }

    /// Whether `line` holds an iframe pointing at this builder's endpoint,
    /// i.e. a link generated by an earlier run.
    pub fn is_own_link(&self, line: &str) -> bool {
        line.contains(&format!("<iframe src=\"{}", self.endpoint))
    }

    fn url<'q>(&self, sub_id: &str, questions: impl IntoIterator<Item = &'q str>) -> String {
        let enc = self.encoding;
        let mut params = vec![
            format!("assignmentId={}", enc.apply(&self.assignment_id)),
            format!("subIds={}", enc.apply(sub_id)),
        ];
        params.extend(
            questions
                .into_iter()
                .enumerate()
                .map(|(i, q)| format!("question{}={}", i + 1, enc.apply(q))),
        );
        format!("{}?{}", self.endpoint, params.join("&"))
    }
}

/// Wrap a URL in the answer-box iframe tag.
pub fn iframe(url: &str) -> String {
    format!(
        "<iframe src=\"{}\" style=\"border:0px #ffffff none;\" name=\"myiFrame\" scrolling=\"no\" \
         frameborder=\"1\" marginheight=\"0px\" marginwidth=\"0px\" height=\"500px\" width=\"100%\" \
         allowfullscreen></iframe>",
        url
    )
}

// ── Tests ──
