//! Revision block parsing.
//!
//! Locates the tracked-revision block by its fixed marker comment. Parsing
//! is deliberately lenient: any content without a well-formed block simply
//! has no tracked revision.

use regex::Regex;
use std::sync::LazyLock;

/// Marker comment that precedes the tracked-revision key.
pub const REVISION_MARKER: &str = "# kitsync tracked revision - do not edit";

/// Section header the block lives under.
pub const SECTION_HEADER: &str = "[upstream]";

/// Regex for the marker comment followed by the revision key on the next
/// line. The revision value must be a non-empty hex string; anything else
/// counts as a malformed (absent) block.
static BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^# kitsync tracked revision - do not edit[ \t]*\r?\n[ \t]*revision[ \t]*=[ \t]*"([0-9a-fA-F]+)""#,
    )
    .expect("Invalid revision block regex")
});

/// Regex for the `[upstream]` section header on a line of its own.
pub(crate) static SECTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\[upstream\][ \t]*$").expect("Invalid section regex"));

/// Extract the tracked revision from configuration content.
///
/// Returns `None` if the marker is absent or the line after it is not a
/// well-formed revision assignment.
pub fn find_revision(content: &str) -> Option<&str> {
    BLOCK_REGEX
        .captures(content)
        .map(|caps| caps.get(1).unwrap().as_str())
}

/// Check whether content contains a well-formed tracked-revision block.
pub fn has_revision_block(content: &str) -> bool {
    find_revision(content).is_some()
}
