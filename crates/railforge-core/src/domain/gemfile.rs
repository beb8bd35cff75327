//! Gemfile text operations.
//!
//! The dependency-declaration step only ever *appends* to the Gemfile; the
//! single read operation is looking up the version constraint an existing
//! `gem` line already carries, so a re-declared gem keeps its pin.

/// A gem to declare in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemEntry {
    pub name: &'static str,
    /// `require: false` gems are loaded manually (rubocop and friends).
    pub autorequire: bool,
}

impl GemEntry {
    pub const fn new(name: &'static str) -> Self {
        Self { name, autorequire: true }
    }

    pub const fn without_require(name: &'static str) -> Self {
        Self { name, autorequire: false }
    }

    /// Render a `gem` line, reusing `constraint` when the original manifest
    /// already pinned this gem.
    pub fn render(&self, constraint: Option<&str>) -> String {
        let mut line = format!("gem '{}'", self.name);
        if let Some(c) = constraint {
            line.push_str(", ");
            line.push_str(&c.replace('"', "'"));
        }
        if !self.autorequire {
            line.push_str(", require: false");
        }
        line
    }
}

/// Look up the version constraint an existing `gem` declaration carries.
///
/// Matches a line of the form `gem 'name', '>= 2.0'` (either quote style)
/// and returns the constraint portion with quotes normalized to double
/// quotes, e.g. `">= 2.0"`. Returns `None` when the gem is not declared or
/// carries no constraint.
pub fn requirement(manifest: &str, name: &str) -> Option<String> {
    for line in manifest.lines() {
        let trimmed = line.trim_start();
        let Some(rest) = trimmed.strip_prefix("gem") else {
            continue;
        };
        let rest = rest.trim_start();

        // The declared name, in either quote style.
        let quoted_single = format!("'{name}'");
        let quoted_double = format!("\"{name}\"");
        let tail = if let Some(t) = rest.strip_prefix(quoted_single.as_str()) {
            t
        } else if let Some(t) = rest.strip_prefix(quoted_double.as_str()) {
            t
        } else {
            continue;
        };

        // Anything after the name is `, <constraint>[, options]`.
        let tail = tail.trim_start();
        let Some(tail) = tail.strip_prefix(',') else {
            return None; // declared without a constraint
        };
        let constraint = tail
            .split(',')
            .next()
            .unwrap_or("")
            .trim()
            .replace('\'', "\"");
        if constraint.starts_with('"') {
            return Some(constraint);
        }
        return None; // `gem 'x', require: false` — options, no constraint
    }
    None
}

/// Render a `group ... do` block around already-rendered gem lines.
pub fn group_block(groups: &[&str], lines: &[String]) -> String {
    let mut out = String::new();
    out.push_str("group ");
    out.push_str(
        &groups
            .iter()
            .map(|g| format!(":{g}"))
            .collect::<Vec<_>>()
            .join(", "),
    );
    out.push_str(" do\n");
    for line in lines {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("end\n");
    out
}

// ── tests ─────────────────────────────────────────────────────────────────────
