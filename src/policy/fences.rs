//! Fenced block rules.
//!
//! Only Mermaid diagrams may be fenced, and only with backticks. A delimiter
//! line toggles fence state; there is no nesting.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::Violation;

static FENCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(`{3,}|~{3,})(.*)$").unwrap());

const ALLOWED_INFO: &str = "mermaid";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Backtick,
    Tilde,
}

#[derive(Debug)]
struct OpenFence {
    delimiter: Delimiter,
    line: usize,
}

/// Parse a delimiter line into its delimiter and trimmed info string.
fn parse_delimiter(line: &str) -> Option<(Delimiter, &str)> {
    let caps = FENCE_LINE.captures(line)?;
    let run = caps.get(1)?.as_str();
    let info = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
    let delimiter = if run.starts_with('`') {
        Delimiter::Backtick
    } else {
        Delimiter::Tilde
    };
    Some((delimiter, info))
}

fn tilde_violation(path: &Path, line: usize) -> Violation {
    Violation::at_line(path, line, "Tilde fenced blocks are forbidden under docs.")
}

/// Scan one file for fence violations.
pub fn check_fences(path: &Path, text: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut open: Option<OpenFence> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let Some((delimiter, info)) = parse_delimiter(line) else {
            continue;
        };

        match open.as_ref().map(|fence| fence.delimiter) {
            None => {
                match delimiter {
                    Delimiter::Tilde => violations.push(tilde_violation(path, line_no)),
                    Delimiter::Backtick if info != ALLOWED_INFO => {
                        violations.push(Violation::at_line(
                            path,
                            line_no,
                            format!(
                                "Fenced blocks are forbidden under docs except a Mermaid fence \
                                 with info string exactly '{}'.",
                                ALLOWED_INFO
                            ),
                        ));
                    }
                    Delimiter::Backtick => {}
                }
                open = Some(OpenFence {
                    delimiter,
                    line: line_no,
                });
            }
            Some(current) if current == delimiter => open = None,
            // Other delimiter inside a fence is content, but tildes stay forbidden.
            Some(_) => {
                if delimiter == Delimiter::Tilde {
                    violations.push(tilde_violation(path, line_no));
                }
            }
        }
    }

    if let Some(fence) = open {
        violations.push(Violation::new(
            path,
            None,
            format!("Unterminated fence (opened at line {}).", fence.line),
        ));
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str) -> Vec<Violation> {
        check_fences(Path::new("docs/page.md"), text)
    }

    #[test]
    fn test_mermaid_fence_is_allowed() {
        assert!(check("# Flow\n\n```mermaid\ngraph TD\n  A-->B\n```\n").is_empty());
    }

    #[test]
    fn test_mermaid_info_is_trimmed() {
        assert!(check("```  mermaid  \nA-->B\n```\n").is_empty());
    }

    #[test]
    fn test_other_info_strings_are_rejected() {
        let violations = check("intro\n```rust\nfn main() {}\n```\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, Some(2));
    }

    #[test]
    fn test_empty_info_string_is_rejected() {
        let violations = check("```\nplain\n```\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, Some(1));
    }

    #[test]
    fn test_mermaid_is_case_sensitive() {
        assert_eq!(check("```Mermaid\nA\n```\n").len(), 1);
    }

    #[test]
    fn test_tilde_fence_reported_at_opening_line() {
        let violations = check("text\n\n~~~mermaid\nA-->B\n~~~\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, Some(3));
        assert!(violations[0].message.contains("Tilde"));
    }

    #[test]
    fn test_tilde_inside_backtick_fence_still_reported() {
        let violations = check("```mermaid\n~~~\n```\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, Some(2));
    }

    #[test]
    fn test_backtick_inside_tilde_fence_is_content() {
        let violations = check("~~~\n```rust\n~~~\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, Some(1));
    }

    #[test]
    fn test_unterminated_fence_reported_once() {
        let violations = check("```mermaid\nA-->B\nstill going\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, None);
        assert_eq!(violations[0].message, "Unterminated fence (opened at line 1).");
    }

    #[test]
    fn test_unterminated_plain_fence() {
        let violations = check("```\ncode\n");
        let unterminated: Vec<_> = violations
            .iter()
            .filter(|v| v.message.starts_with("Unterminated"))
            .collect();
        assert_eq!(unterminated.len(), 1);
    }

    #[test]
    fn test_closing_line_info_is_ignored() {
        assert!(check("```mermaid\nA\n```mermaid\n").is_empty());
    }

    #[test]
    fn test_indented_and_longer_runs() {
        assert!(check("  ````mermaid\nA\n  ````\n").is_empty());
        assert!(check("``not a fence``\n").is_empty());
    }
}
