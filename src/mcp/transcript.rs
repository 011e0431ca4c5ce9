//! The embedded tool-call transcript protocol.
//!
//! A tool message stores its machine payloads inside the message's own text:
//! the content starts with [`TOOL_CALLS_MARKER`] followed by a base64 blob
//! describing the calls, and each result appended later is introduced by
//! [`TOOL_RESULT_MARKER`] followed by its own base64 blob. Parsing splits a
//! message back into that structure exactly once; callers carry the
//! resulting [`ToolSegment`] alongside the message instead of re-deriving
//! it on every render.
//!
//! Parsing is deliberately forgiving: content without the calls marker is
//! simply not a tool message, and a truncated or garbled tail degrades to
//! an empty calls payload or an empty result list. Nothing here panics on
//! any input.

pub const TOOL_CALLS_MARKER: &str = "##Tool Calls:";
pub const TOOL_RESULT_MARKER: &str = "##Tool Result:";

/// The calls payload and ordered result fragments embedded in one message.
///
/// Both the calls payload and each result fragment are undecoded blobs;
/// [`crate::mcp::render`] turns them into displayable items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolSegment {
    pub calls: String,
    pub results: Vec<String>,
}

impl ToolSegment {
    pub fn new(calls: impl Into<String>, results: Vec<String>) -> Self {
        Self {
            calls: calls.into(),
            results,
        }
    }

    /// Parse a message's content into its tool segment.
    ///
    /// Returns `None` when the content does not start with the calls
    /// marker, i.e. the message is not a tool message. The calls payload is
    /// everything up to the first result marker (or the end of the
    /// content); the rest is split on every result marker, discarding
    /// fragments that are empty or whitespace-only.
    pub fn parse(content: &str) -> Option<ToolSegment> {
        let rest = content.strip_prefix(TOOL_CALLS_MARKER)?;

        let Some(result_index) = rest.find(TOOL_RESULT_MARKER) else {
            return Some(ToolSegment {
                calls: rest.to_string(),
                results: Vec::new(),
            });
        };

        let calls = rest[..result_index].to_string();
        let results = rest[result_index + TOOL_RESULT_MARKER.len()..]
            .split(TOOL_RESULT_MARKER)
            .filter(|fragment| !fragment.trim().is_empty())
            .map(str::to_string)
            .collect();

        Some(ToolSegment { calls, results })
    }

    /// Render the segment back into message content, the inverse of
    /// [`ToolSegment::parse`] modulo marker-adjacent whitespace.
    pub fn render(&self) -> String {
        let mut content = String::with_capacity(
            TOOL_CALLS_MARKER.len()
                + self.calls.len()
                + self
                    .results
                    .iter()
                    .map(|r| TOOL_RESULT_MARKER.len() + r.len())
                    .sum::<usize>(),
        );
        content.push_str(TOOL_CALLS_MARKER);
        content.push_str(&self.calls);
        for result in &self.results {
            content.push_str(TOOL_RESULT_MARKER);
            content.push_str(result);
        }
        content
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }
}
