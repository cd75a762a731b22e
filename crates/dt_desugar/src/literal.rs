//! Literal text rendering.
//!
//! Converts one run of literal text between tags into quoted
//! string-concatenation expressions. Line breaks inside the text collapse to
//! a single space in the produced value, while the original indentation is
//! re-emitted as raw source whitespace outside the quoted segments, so the
//! rewritten file keeps its shape.

use crate::emitter::Emitter;

/// Render a literal text run as one or more quoted segments.
///
/// `end` is the byte offset just past the literal's source range; the cursor
/// advances there unconditionally so the next sibling copy starts in the
/// right place even though the content was synthesized. `is_last` suppresses
/// the trailing `, ` separator for the final renderable child.
pub(crate) fn render_text(em: &mut Emitter<'_>, value: &str, end: usize, is_last: bool) {
    let lines = split_lines(value);

    let mut last_non_empty = 0;
    for (index, line) in lines.iter().enumerate() {
        if line.chars().any(|c| c != ' ' && c != '\t') {
            last_non_empty = index;
        }
    }

    for (index, line) in lines.iter().enumerate() {
        let is_first_line = index == 0;
        let is_last_line = index == lines.len() - 1;
        let is_last_non_empty = index == last_non_empty;

        // Rendered whitespace: tabs count as spaces.
        let replaced = line.replace('\t', " ");
        let mut trimmed: &str = &replaced;
        if !is_first_line {
            trimmed = trimmed.trim_start_matches(' ');
        }
        if !is_last_line {
            trimmed = trimmed.trim_end_matches(' ');
        }

        if !is_first_line {
            em.append(leading_whitespace(line));
        }

        if !trimmed.is_empty() || is_last_non_empty {
            em.append(&quote(trimmed));
            if !is_last_non_empty {
                em.append(" + ' ' +");
            } else if !is_last {
                em.append(", ");
            }
            // Only restore tail whitespace if the line had content.
            if !trimmed.is_empty() && !is_last_line {
                em.append(trailing_whitespace(line));
            }
        }

        if !is_last_line {
            em.append("\n");
        }
    }

    em.skip_to(end);
}

/// Quote a text segment as a double-quoted string with JSON escapes.
fn quote(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

/// Split on `\r\n`, `\n`, or `\r`, keeping empty leading/trailing lines.
fn split_lines(value: &str) -> Vec<&str> {
    let bytes = value.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                lines.push(&value[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            b'\n' => {
                lines.push(&value[start..i]);
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push(&value[start..]);
    lines
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start_matches([' ', '\t']).len()]
}

fn trailing_whitespace(line: &str) -> &str {
    &line[line.trim_end_matches([' ', '\t']).len()..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(value: &str, is_last: bool) -> String {
        let mut em = Emitter::new("", 0);
        render_text(&mut em, value, 0, is_last);
        em.finish()
    }

    #[test]
    fn single_line_is_one_quoted_segment() {
        assert_eq!(render("Hello", true), "\"Hello\"");
        assert_eq!(render("Hello ", false), "\"Hello \", ");
    }

    #[test]
    fn two_lines_join_with_space_literal() {
        assert_eq!(render("Hello\n  World", true), "\"Hello\" + ' ' +\n  \"World\"");
    }

    #[test]
    fn surrounding_blank_lines_contribute_no_segments() {
        assert_eq!(
            render("\n  Hello\n  World\n", true),
            "\n  \"Hello\" + ' ' +\n  \"World\"\n"
        );
    }

    #[test]
    fn interior_blank_line_keeps_raw_whitespace_only() {
        assert_eq!(render("a\n\nb", true), "\"a\" + ' ' +\n\n\"b\"");
    }

    #[test]
    fn tabs_become_spaces_inside_segments() {
        assert_eq!(render("a\tb", true), "\"a b\"");
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        assert_eq!(render("say \"hi\"", true), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn carriage_return_line_breaks_split_too() {
        assert_eq!(render("a\r\nb", true), "\"a\" + ' ' +\n\"b\"");
    }

    #[test]
    fn split_lines_keeps_boundary_lines() {
        assert_eq!(split_lines("\nx\n"), vec!["", "x", ""]);
        assert_eq!(split_lines("x"), vec!["x"]);
    }
}
