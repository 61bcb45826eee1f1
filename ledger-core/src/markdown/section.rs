//! Heading-delimited sections.
//!
//! A section starts after a `## <title>` line and runs until the next heading
//! of level one or two, a standalone `---` rule, or the end of the document.
//! Deeper headings (`###`) stay inside the enclosing section.

use std::ops::Range;

const SECTION_LEVEL: usize = 2;

/// Byte span of a section body within its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    pub body: Range<usize>,
    /// False when the heading is the last line and has no trailing newline.
    pub heading_terminated: bool,
}

/// Split `text` into lines (newline included) paired with their byte offset.
fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |line| {
        let start = offset;
        offset += line.len();
        (start, line)
    })
}

/// Level and title of an ATX heading line, if `line` is one.
fn heading(line: &str) -> Option<(usize, &str)> {
    let line = line.trim_end();
    let level = line.bytes().take_while(|b| *b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((level, rest.trim()))
}

fn is_rule(line: &str) -> bool {
    line.trim_end() == "---"
}

fn ends_section(line: &str) -> bool {
    is_rule(line) || heading(line).is_some_and(|(level, _)| level <= SECTION_LEVEL)
}

/// Locate the body of the first `## <title>` section. Titles match exactly.
pub fn find_section(text: &str, title: &str) -> Option<SectionSpan> {
    let mut lines = lines_with_offsets(text);

    let (start, heading_terminated) = lines.by_ref().find_map(|(offset, line)| {
        match heading(line) {
            Some((SECTION_LEVEL, found)) if found == title => {
                Some((offset + line.len(), line.ends_with('\n')))
            }
            _ => None,
        }
    })?;

    let end = lines
        .find(|(_, line)| ends_section(line))
        .map(|(offset, _)| offset)
        .unwrap_or(text.len());

    Some(SectionSpan {
        body: start..end,
        heading_terminated,
    })
}

/// Titles of all `##` sections, in document order.
pub fn headings(text: &str) -> Vec<String> {
    lines_with_offsets(text)
        .filter_map(|(_, line)| match heading(line) {
            Some((SECTION_LEVEL, title)) => Some(title.to_string()),
            _ => None,
        })
        .collect()
}

/// Replace the body of section `title` with `body`.
///
/// Text outside the section is kept byte-for-byte. Returns `None` when the
/// section does not exist.
pub fn replace_section(text: &str, title: &str, body: &str) -> Option<String> {
    let span = find_section(text, title)?;

    let mut output = String::with_capacity(text.len() + body.len());
    output.push_str(&text[..span.body.start]);
    if !span.heading_terminated {
        output.push('\n');
    }
    output.push_str(body);
    output.push_str(&text[span.body.end..]);
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Active Context\n\nIntro.\n\n## In Progress\n\n| Task |\n|---|\n| A |\n\n## Completed This Session\n\nbody\n### Detail\nmore\n---\ntrailer\n";

    fn body<'a>(text: &'a str, title: &str) -> Option<&'a str> {
        find_section(text, title).map(|span| &text[span.body])
    }

    #[test]
    fn test_section_ends_at_next_heading() {
        assert_eq!(body(DOC, "In Progress"), Some("\n| Task |\n|---|\n| A |\n\n"));
    }

    #[test]
    fn test_section_ends_at_rule_and_keeps_subheadings() {
        assert_eq!(
            body(DOC, "Completed This Session"),
            Some("\nbody\n### Detail\nmore\n")
        );
    }

    #[test]
    fn test_section_runs_to_end_of_document() {
        let text = "## Notes\nlast line";
        assert_eq!(body(text, "Notes"), Some("last line"));
    }

    #[test]
    fn test_section_ends_at_top_level_heading() {
        let text = "## A\none\n# Other\ntwo\n";
        assert_eq!(body(text, "A"), Some("one\n"));
    }

    #[test]
    fn test_title_must_match_exactly() {
        assert!(find_section(DOC, "in progress").is_none());
        assert!(find_section(DOC, "In").is_none());
        assert!(find_section(DOC, "Detail").is_none());
        assert!(find_section("## In Progress   \nx\n", "In Progress").is_some());
    }

    #[test]
    fn test_missing_section_is_none() {
        assert!(find_section("", "Anything").is_none());
        assert!(replace_section(DOC, "Missing", "x").is_none());
    }

    #[test]
    fn test_replace_preserves_surrounding_text() {
        let replaced = replace_section(DOC, "In Progress", "\nnew\n\n").unwrap();
        assert_eq!(
            replaced,
            DOC.replace("\n| Task |\n|---|\n| A |\n\n", "\nnew\n\n")
        );
    }

    #[test]
    fn test_replace_unterminated_heading() {
        let replaced = replace_section("## Notes", "Notes", "\nbody\n").unwrap();
        assert_eq!(replaced, "## Notes\n\nbody\n");
    }

    #[test]
    fn test_headings_lists_second_level_titles() {
        assert_eq!(headings(DOC), vec!["In Progress", "Completed This Session"]);
    }
}
