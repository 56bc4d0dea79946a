//! File context attached to outgoing chat messages.
//!
//! The buffer is rebuilt from scratch by every upload and read on every send.

use crate::protocol::FileResult;

/// Default character budget for the context sent with a message.
pub const DEFAULT_CONTEXT_LIMIT: usize = 12000;

/// Appended after the kept prefix when the context is cut.
pub const TRUNCATION_MARKER: &str = "\n...[TRUNCATED]";

/// Server-side extraction prefixes its warnings and failures with these.
const WARNING_MARKERS: &[&str] = &["⚠️", "❌"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextBuffer {
    pub text: String,
    pub source_name: String,
}

impl ContextBuffer {
    /// Build the context from an upload result.
    ///
    /// Every file with non-blank content contributes one block
    /// `### FILE: <filename> <tag>\n<content>`; blocks are separated by a
    /// blank line. `source_name` is the first file's name, even when that
    /// file contributed no block.
    pub fn from_files(files: &[FileResult]) -> Self {
        let blocks: Vec<String> = files
            .iter()
            .filter_map(|f| {
                let content = f.file_content.trim();
                if content.is_empty() {
                    return None;
                }
                Some(format!(
                    "### FILE: {} {}\n{}",
                    f.filename,
                    content_tag(content),
                    content
                ))
            })
            .collect();

        Self {
            text: blocks.join("\n\n"),
            source_name: files.first().map(|f| f.filename.clone()).unwrap_or_default(),
        }
    }

    /// True when there is something worth attaching.
    pub fn is_attachable(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.source_name.clear();
    }

    /// Number of `### FILE:` blocks in the buffer.
    pub fn block_count(&self) -> usize {
        self.text.matches("### FILE: ").count()
    }
}

/// `[WARN]` for extraction warnings/errors, `[OK]` otherwise.
pub fn content_tag(content: &str) -> &'static str {
    if WARNING_MARKERS.iter().any(|m| content.starts_with(m)) {
        "[WARN]"
    } else {
        "[OK]"
    }
}

/// Trim `text` and cut it to `limit` characters, marking the cut.
///
/// Blank input yields an empty string. Limits count chars, not bytes.
pub fn truncate_context(text: &str, limit: usize) -> String {
    let t = text.trim();
    if t.is_empty() {
        return String::new();
    }
    match t.char_indices().nth(limit) {
        None => t.to_string(),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
            out.push_str(&t[..cut]);
            out.push_str(TRUNCATION_MARKER);
            out
        }
    }
}
