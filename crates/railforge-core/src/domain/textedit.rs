//! Anchored text editing.
//!
//! Every configuration-file mutation in the pipeline is one of a handful of
//! operations: insert before/after a marker, append, or rewrite the tail of
//! a matching line. The original scaffolding behavior of silently assuming
//! the marker exists is replaced by an explicit [`EditError`] — a missing
//! anchor means the target tree is not the freshly generated app this tool
//! expects, and the run should fail loudly.
//!
//! All operations are pure: they take the current file content and return
//! the edited content. The application layer owns the read/write around it.

use thiserror::Error;

/// Where to cut the text for an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor<'a> {
    /// First occurrence of a literal substring.
    Substring(&'a str),
    /// First line that starts with the given prefix (at column 0).
    LineStartsWith(&'a str),
}

/// Failure to locate an anchor in the edited text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("marker {marker:?} not found in {file}")]
    MarkerNotFound { marker: String, file: String },
}

impl EditError {
    /// Attach the file path the edit was aimed at. The textedit functions
    /// themselves only see content, so the caller fills this in.
    pub fn with_file(self, file: impl Into<String>) -> Self {
        match self {
            Self::MarkerNotFound { marker, .. } => Self::MarkerNotFound {
                marker,
                file: file.into(),
            },
        }
    }
}

type EditResult = Result<String, EditError>;

/// Insert `insertion` immediately before the anchor.
///
/// For [`Anchor::LineStartsWith`] the insertion lands before the start of
/// the matching line, so inserting whole lines keeps the file line-shaped.
pub fn insert_before(text: &str, anchor: Anchor<'_>, insertion: &str) -> EditResult {
    let at = locate(text, anchor)?.0;
    let mut out = String::with_capacity(text.len() + insertion.len());
    out.push_str(&text[..at]);
    out.push_str(insertion);
    out.push_str(&text[at..]);
    Ok(out)
}

/// Insert `insertion` immediately after the anchor.
///
/// For [`Anchor::LineStartsWith`] the insertion lands after the matching
/// line's terminating newline (or at end of text for a final unterminated
/// line).
pub fn insert_after(text: &str, anchor: Anchor<'_>, insertion: &str) -> EditResult {
    let at = locate(text, anchor)?.1;
    let mut out = String::with_capacity(text.len() + insertion.len());
    out.push_str(&text[..at]);
    out.push_str(insertion);
    out.push_str(&text[at..]);
    Ok(out)
}

/// Append `suffix` to the text, making sure the existing content ends with
/// a newline first. Mirrors the append-to-file primitive of the original
/// generator toolkit: appends always start on a fresh line.
pub fn append(text: &str, suffix: &str) -> String {
    let mut out = String::with_capacity(text.len() + suffix.len() + 1);
    out.push_str(text);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(suffix);
    out
}

/// Replace everything from the first occurrence of `needle` to the end of
/// that line with `replacement`. Leading indentation before the needle is
/// preserved — this matches substitute-to-end-of-line semantics.
pub fn replace_line_tail(text: &str, needle: &str, replacement: &str) -> EditResult {
    let start = text.find(needle).ok_or_else(|| EditError::MarkerNotFound {
        marker: needle.to_string(),
        file: String::new(),
    })?;
    let line_end = text[start..]
        .find('\n')
        .map(|i| start + i)
        .unwrap_or(text.len());

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..start]);
    out.push_str(replacement);
    out.push_str(&text[line_end..]);
    Ok(out)
}

/// Resolve an anchor to `(before_offset, after_offset)` byte positions.
fn locate(text: &str, anchor: Anchor<'_>) -> Result<(usize, usize), EditError> {
    match anchor {
        Anchor::Substring(needle) => {
            let start = text.find(needle).ok_or_else(|| missing(needle))?;
            Ok((start, start + needle.len()))
        }
        Anchor::LineStartsWith(prefix) => {
            let mut offset = 0usize;
            for line in text.split_inclusive('\n') {
                if line.starts_with(prefix) {
                    return Ok((offset, offset + line.len()));
                }
                offset += line.len();
            }
            Err(missing(prefix))
        }
    }
}

fn missing(marker: &str) -> EditError {
    EditError::MarkerNotFound {
        marker: marker.to_string(),
        file: String::new(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const CONTROLLER: &str = "class ApplicationController < ActionController::Base\n\
                              \x20 before_action :authenticate_user!\n\
                              end\n";

    // ── insert_before ─────────────────────────────────────────────────────

    #[test]
    fn insert_before_substring() {
        let out = insert_before("const x = 1;\nmodule.exports = env;\n",
                                Anchor::Substring("module.exports"),
                                "const webpack = require('webpack');\n")
            .unwrap();
        assert_eq!(
            out,
            "const x = 1;\nconst webpack = require('webpack');\nmodule.exports = env;\n"
        );
    }

    #[test]
    fn insert_before_final_end_line() {
        let out = insert_before(CONTROLLER, Anchor::LineStartsWith("end"),
                                "  # injected\n")
            .unwrap();
        assert!(out.ends_with("  # injected\nend\n"));
    }

    #[test]
    fn line_anchor_ignores_indented_end() {
        // An indented `end` (inside a nested block) must not match a
        // column-0 anchor.
        let text = "def a\n  if b\n  end\nend\n";
        let out = insert_before(text, Anchor::LineStartsWith("end"), "X\n").unwrap();
        assert_eq!(out, "def a\n  if b\n  end\nX\nend\n");
    }

    // ── insert_after ──────────────────────────────────────────────────────

    #[test]
    fn insert_after_substring_marker() {
        let out = insert_after(CONTROLLER,
                               Anchor::Substring(":authenticate_user!\n"),
                               "  include Pundit\n")
            .unwrap();
        assert!(out.contains(":authenticate_user!\n  include Pundit\nend\n"));
    }

    #[test]
    fn insert_after_line_includes_newline() {
        let text = "Rails.application.configure do\n  # settings\nend\n";
        let out = insert_after(text,
                               Anchor::LineStartsWith("Rails.application.configure do"),
                               "  config.x = 1\n")
            .unwrap();
        assert_eq!(out, "Rails.application.configure do\n  config.x = 1\n  # settings\nend\n");
    }

    // ── missing markers ───────────────────────────────────────────────────

    #[test]
    fn missing_substring_is_explicit_error() {
        let err = insert_before("abc", Anchor::Substring("zzz"), "x").unwrap_err();
        assert!(matches!(err, EditError::MarkerNotFound { ref marker, .. } if marker == "zzz"));
    }

    #[test]
    fn missing_line_prefix_is_explicit_error() {
        assert!(insert_after("a\nb\n", Anchor::LineStartsWith("end"), "x").is_err());
    }

    #[test]
    fn with_file_attaches_path() {
        let err = missing("end").with_file("config/routes.rb");
        let EditError::MarkerNotFound { file, .. } = err;
        assert_eq!(file, "config/routes.rb");
    }

    // ── append ────────────────────────────────────────────────────────────

    #[test]
    fn append_adds_missing_newline_first() {
        assert_eq!(append("web: rails s", "worker: sidekiq\n"),
                   "web: rails s\nworker: sidekiq\n");
    }

    #[test]
    fn append_to_empty_has_no_leading_newline() {
        assert_eq!(append("", ".env*\n"), ".env*\n");
    }

    // ── replace_line_tail ─────────────────────────────────────────────────

    #[test]
    fn replace_tail_preserves_indentation() {
        let text = "  config.assets.debug = true\n  config.other = 1\n";
        let out = replace_line_tail(text, "config.assets.debug",
                                    "config.assets.debug = false")
            .unwrap();
        assert_eq!(out, "  config.assets.debug = false\n  config.other = 1\n");
    }

    #[test]
    fn replace_tail_on_last_unterminated_line() {
        let out = replace_line_tail("a = 1", "a", "a = 2").unwrap();
        assert_eq!(out, "a = 2");
    }

    #[test]
    fn replace_tail_missing_needle() {
        assert!(replace_line_tail("x\n", "missing", "y").is_err());
    }
}
