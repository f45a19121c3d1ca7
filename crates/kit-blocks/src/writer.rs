//! Revision block writing.
//!
//! Replaces or inserts the tracked-revision block while preserving every
//! byte of unrelated content. Writing the same revision twice produces
//! byte-identical output to writing it once.

use crate::error::{Error, Result};
use crate::parser::{REVISION_MARKER, SECTION_HEADER, SECTION_REGEX, has_revision_block};
use regex::Regex;
use std::sync::LazyLock;

/// Matches the full replaceable span of an existing block: the marker line
/// plus the revision assignment on the following line.
static BLOCK_SPAN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^# kitsync tracked revision - do not edit[ \t]*\r?\n[ \t]*revision[ \t]*=[ \t]*"[0-9a-fA-F]*""#,
    )
    .expect("Invalid block span regex")
});

/// Canonical rendering of the block for a given revision.
fn format_block(revision: &str) -> String {
    format!("{}\nrevision = \"{}\"", REVISION_MARKER, revision)
}

/// Replace an existing tracked-revision block, or insert one under an
/// existing `[upstream]` section header.
///
/// # Errors
///
/// Returns [`Error::SectionNotFound`] when the content has neither a block
/// nor an `[upstream]` header. Callers are expected to fall back to
/// [`append_section`] in that case.
pub fn upsert_revision(content: &str, revision: &str) -> Result<String> {
    let block = format_block(revision);

    if has_revision_block(content) || BLOCK_SPAN_REGEX.is_match(content) {
        return Ok(BLOCK_SPAN_REGEX
            .replace(content, block.as_str())
            .into_owned());
    }

    if let Some(header) = SECTION_REGEX.find(content) {
        let mut out = String::with_capacity(content.len() + block.len() + 1);
        out.push_str(&content[..header.end()]);
        out.push('\n');
        out.push_str(&block);
        out.push_str(&content[header.end()..]);
        return Ok(out);
    }

    Err(Error::SectionNotFound)
}

/// Append a synthesized minimal `[upstream]` section holding the block.
///
/// Used when the configuration has no recognizable enclosing structure at
/// all; the existing content is kept untouched above the new section.
pub fn append_section(content: &str, revision: &str) -> String {
    let section = format!("{}\n{}\n", SECTION_HEADER, format_block(revision));

    if content.is_empty() {
        section
    } else if content.ends_with('\n') {
        format!("{}\n{}", content, section)
    } else {
        format!("{}\n\n{}", content, section)
    }
}
