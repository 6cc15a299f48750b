// README section rendering and in-place splicing.
//
// The section is owned by this tool: everything from its header up to the
// next level-two heading is replaced on every run. Other content is left
// byte-for-byte alone.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::similarity::ScoredCandidate;

pub const DEFAULT_SECTION_HEADER: &str = "## 🔗 Adjacent Repositories";

/// One bullet: `- [owner/name](url) — description`.
pub fn render_entry(candidate: &ScoredCandidate) -> String {
    let id = candidate.id();
    let description = candidate.description().trim();
    if description.is_empty() {
        format!("- [{}]({})", id.full_name(), id.html_url())
    } else {
        format!("- [{}]({}) — {}", id.full_name(), id.html_url(), description)
    }
}

/// Render the full section block: header, blank line, one entry per line.
pub fn render_section(header: &str, ranked: &[ScoredCandidate]) -> String {
    let mut block = format!("{header}\n\n");
    for candidate in ranked {
        block.push_str(&render_entry(candidate));
        block.push('\n');
    }
    block
}

/// Replace the section starting at `header` with `block`.
///
/// The old section runs from the header line to the next `## ` heading
/// (exclusive) or the end of the document. When the header is absent the
/// block is appended after a blank line.
pub fn splice_section(document: &str, header: &str, block: &str) -> String {
    let header = header.trim();
    let mut out = String::with_capacity(document.len() + block.len());
    let mut in_section = false;
    let mut found = false;

    for line in document.split_inclusive('\n') {
        let trimmed = line.trim();
        if !found && trimmed == header {
            out.push_str(block);
            in_section = true;
            found = true;
            continue;
        }
        if in_section {
            if trimmed.starts_with("## ") {
                in_section = false;
                out.push('\n');
                out.push_str(line);
            }
            continue;
        }
        out.push_str(line);
    }

    if !found {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
        out.push_str(block);
    }

    out
}

/// Write the ranked section into the README at `path`.
///
/// Returns `true` when the file changed. A missing README is treated as
/// empty and created.
pub fn update_readme(path: &Path, header: &str, ranked: &[ScoredCandidate]) -> Result<bool> {
    let current = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let block = render_section(header, ranked);
    let updated = splice_section(&current, header, &block);
    if updated == current {
        info!(path = %path.display(), "README section already up to date");
        return Ok(false);
    }

    std::fs::write(path, &updated)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), entries = ranked.len(), "README section updated");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = DEFAULT_SECTION_HEADER;

    fn block(entries: &[&str]) -> String {
        let mut b = format!("{HEADER}\n\n");
        for e in entries {
            b.push_str(e);
            b.push('\n');
        }
        b
    }

    #[test]
    fn test_splice_appends_when_missing() {
        let doc = "# Bloomjoin\n\nFast joins.\n";
        let out = splice_section(doc, HEADER, &block(&["- a"]));
        assert_eq!(out, format!("# Bloomjoin\n\nFast joins.\n\n{HEADER}\n\n- a\n"));
    }

    #[test]
    fn test_splice_appends_to_unterminated_document() {
        let out = splice_section("# Title", HEADER, &block(&["- a"]));
        assert_eq!(out, format!("# Title\n\n{HEADER}\n\n- a\n"));
    }

    #[test]
    fn test_splice_replaces_up_to_next_heading() {
        let doc = format!("# T\n\n{HEADER}\n\n- old\n- older\n\n## License\n\nMIT\n");
        let out = splice_section(&doc, HEADER, &block(&["- new"]));
        assert_eq!(out, format!("# T\n\n{HEADER}\n\n- new\n\n## License\n\nMIT\n"));
    }

    #[test]
    fn test_splice_replaces_to_end_of_document() {
        let doc = format!("# T\n\n{HEADER}\n\n- old\n");
        let out = splice_section(&doc, HEADER, &block(&["- new"]));
        assert_eq!(out, format!("# T\n\n{HEADER}\n\n- new\n"));
    }

    #[test]
    fn test_splice_is_idempotent() {
        let doc = "# T\n\nIntro.\n\n## Usage\n\nRun it.\n";
        let b = block(&["- x", "- y"]);
        let once = splice_section(doc, HEADER, &b);
        let twice = splice_section(&once, HEADER, &b);
        assert_eq!(once, twice);

        let with_section = format!("# T\n\n{HEADER}\n\n- z\n\n## Usage\n");
        let once = splice_section(&with_section, HEADER, &b);
        assert_eq!(splice_section(&once, HEADER, &b), once);
    }

    #[test]
    fn test_splice_keeps_deeper_headings_inside_section_out() {
        // "### " is not a level-two heading, so it belongs to the old section
        let doc = format!("{HEADER}\n\n- old\n### Note\n## Next\n");
        let out = splice_section(&doc, HEADER, &block(&["- new"]));
        assert_eq!(out, format!("{HEADER}\n\n- new\n\n## Next\n"));
    }

    #[test]
    fn test_splice_empty_document() {
        let out = splice_section("", HEADER, &block(&[]));
        assert_eq!(out, format!("\n{HEADER}\n\n"));
    }
}
