//! Link rules: no `../` targets, and internal inline links must resolve.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::tree::{display_path, normalize, DocTree};
use super::Violation;

// Target part of an inline link, matched right after a `]`:
// (target) or (target "title"). Images and badge links included.
static INLINE_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\(\s*(<[^>]*>|[^)\s]*)(?:\s+(?:"[^"]*"|'[^']*'))?\s*\)"#).unwrap()
});

// ](../ anywhere on the line, whether or not the target parses.
static PARENT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]\(\s*<?(?:\./)*\.\./").unwrap());

// [label]: target
static REFERENCE_DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[[^\]]+\]:\s*(<[^>]*>|\S+)").unwrap());

/// How a link target is treated by the link rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// Empty or `#anchor` only.
    Anchor,
    /// Has a URI scheme or is network-path (`//host`).
    External,
    /// Path into the repository, fragment stripped.
    Internal { path: &'a str },
}

fn strip_angle_brackets(target: &str) -> &str {
    target
        .strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .unwrap_or(target)
}

fn has_uri_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

/// Classify a raw link target.
pub fn classify(raw: &str) -> LinkTarget<'_> {
    let target = strip_angle_brackets(raw.trim());
    if target.is_empty() || target.starts_with('#') {
        return LinkTarget::Anchor;
    }
    if has_uri_scheme(target) || target.starts_with("//") {
        return LinkTarget::External;
    }
    let path = target.split_once('#').map_or(target, |(path, _)| path);
    if path.is_empty() {
        return LinkTarget::Anchor;
    }
    LinkTarget::Internal { path }
}

fn climbs_to_parent(path: &str) -> bool {
    path == ".." || path.starts_with("../") || path.contains("/../") || path.ends_with("/..")
}

/// Resolve an internal target against the file that contains it.
///
/// `None` means the target climbs above the repository root.
pub fn resolve(file: &Path, target: &str) -> Option<PathBuf> {
    if target.starts_with('/') {
        return normalize(Path::new(target));
    }
    let base = file.parent().unwrap_or(Path::new(""));
    normalize(&base.join(target))
}

/// Targets of every `](...)` on the line.
///
/// Parsing forward from each `](` means link text may hold brackets and
/// nested images, so both targets of `[![alt](img)](page)` are found.
fn inline_targets(line: &str) -> impl Iterator<Item = &str> {
    line.match_indices("](").filter_map(move |(idx, _)| {
        INLINE_TARGET
            .captures(&line[idx + 1..])
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    })
}

/// Scan one file for parent-relative and broken links.
pub fn check_links<T: DocTree + ?Sized>(tree: &T, path: &Path, text: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if !line.contains("](") && !line.contains("]:") {
            continue;
        }

        let inline: Vec<&str> = inline_targets(line).collect();
        let reference = REFERENCE_DEF
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());

        let parent_relative = PARENT_LINK.is_match(line)
            || inline.iter().copied().chain(reference).any(|raw| {
                matches!(classify(raw), LinkTarget::Internal { path } if climbs_to_parent(path))
            });
        if parent_relative {
            violations.push(Violation::at_line(
                path,
                line_no,
                "Documentation links must not use '../' (use repo-root paths or local links).",
            ));
        }

        for raw in inline {
            let LinkTarget::Internal { path: target } = classify(raw) else {
                continue;
            };
            match resolve(path, target) {
                Some(resolved) if tree.exists(&resolved) => {}
                Some(resolved) => violations.push(Violation::at_line(
                    path,
                    line_no,
                    format!(
                        "Broken link target `{}` (resolved `{}`).",
                        target,
                        display_path(&resolved)
                    ),
                )),
                None => violations.push(Violation::at_line(
                    path,
                    line_no,
                    format!(
                        "Broken link target `{}` (resolves outside the repository).",
                        target
                    ),
                )),
            }
        }
    }

    violations
}
