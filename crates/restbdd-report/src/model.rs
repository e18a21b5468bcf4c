//! Subset of the cucumber JSON run log the report reads
//!
//! Unknown fields are ignored and missing ones default, so logs from other
//! cucumber implementations load as well.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Feature {
    pub uri: Option<String>,
    pub keyword: String,
    pub name: String,
    pub tags: Vec<Tag>,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Element {
    pub keyword: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub tags: Vec<Tag>,
    pub steps: Vec<Step>,
}

impl Element {
    pub fn is_background(&self) -> bool {
        self.kind == "background"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Step {
    pub keyword: String,
    pub name: String,
    pub result: StepResult,
    /// Attachments, including the log lines captured while the step ran
    pub embeddings: Vec<Embedding>,
}

/// Mime type cucumber gives the log output it captures for a step
pub const LOG_MIME_TYPE: &str = "text/x.cucumber.log+plain";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Embedding {
    /// Base64 encoded payload
    pub data: String,
    pub mime_type: String,
}

impl Embedding {
    /// Decoded payload of a textual attachment
    pub fn text(&self) -> Option<String> {
        if !self.mime_type.starts_with("text/") {
            return None;
        }
        let bytes = base64::decode(self.data.trim()).ok()?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StepResult {
    pub status: String,
    /// Nanoseconds
    pub duration: Option<u64>,
    pub error_message: Option<String>,
}
