//! Turn formatting.
//!
//! Classifies each physical line of a turn and renders its inline links.
//! Classification is total: anything unrecognized is a paragraph.

use serde::Serialize;

use super::links::{render_links, Segment};
use crate::domain::conversation::Speaker;

/// Glyph that opens a warning callout.
pub const WARNING_GLYPH: char = '⚠';

// Emoji presentation selector that often trails the warning glyph.
const VARIATION_SELECTOR: char = '\u{FE0F}';

/// The closed set of line kinds, carrying the content to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Starts with the warning glyph; content follows the glyph.
    Warning(&'a str),
    /// Starts with `- ` or `* `; content follows the prefix.
    Bullet(&'a str),
    /// Empty after trimming.
    Blank,
    /// Anything else.
    Paragraph(&'a str),
}

/// Classifies one line.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    if let Some(rest) = trimmed.strip_prefix(WARNING_GLYPH) {
        return LineKind::Warning(rest.trim_start_matches(VARIATION_SELECTOR).trim_start());
    }

    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return LineKind::Bullet(rest);
    }

    LineKind::Paragraph(trimmed)
}

/// One classified line with its inline segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderLine<'a> {
    Paragraph {
        segments: Vec<Segment<'a>>,
        /// Bold-weight question line in an assistant turn.
        emphasized: bool,
    },
    Bullet {
        segments: Vec<Segment<'a>>,
    },
    Warning {
        segments: Vec<Segment<'a>>,
    },
    Blank,
}

impl<'a> RenderLine<'a> {
    /// Inline segments; empty for blank lines.
    pub fn segments(&self) -> &[Segment<'a>] {
        match self {
            RenderLine::Paragraph { segments, .. }
            | RenderLine::Bullet { segments }
            | RenderLine::Warning { segments } => segments,
            RenderLine::Blank => &[],
        }
    }
}

/// Rendered lines of a turn plus the trailing-question flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedTurn<'a> {
    pub lines: Vec<RenderLine<'a>>,
    /// Assistant turn whose last non-blank line ends with `?`.
    pub ends_with_question: bool,
}

/// Formats a turn's text for display.
pub fn format_turn(text: &str, speaker: Speaker) -> FormattedTurn<'_> {
    let is_assistant = speaker == Speaker::Assistant;

    let lines = text
        .lines()
        .map(|line| match classify_line(line) {
            LineKind::Warning(content) => RenderLine::Warning {
                segments: render_links(content).collect(),
            },
            LineKind::Bullet(content) => RenderLine::Bullet {
                segments: render_links(content).collect(),
            },
            LineKind::Blank => RenderLine::Blank,
            LineKind::Paragraph(content) => RenderLine::Paragraph {
                segments: render_links(content).collect(),
                emphasized: is_assistant && content.contains('?'),
            },
        })
        .collect();

    let ends_with_question = is_assistant
        && text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .is_some_and(|line| line.ends_with('?'));

    FormattedTurn {
        lines,
        ends_with_question,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod classify {
        use super::*;

        #[test]
        fn warning_glyph_with_and_without_selector() {
            assert_eq!(
                classify_line("⚠️ RRSP withdrawals are taxable"),
                LineKind::Warning("RRSP withdrawals are taxable")
            );
            assert_eq!(classify_line("⚠ Careful"), LineKind::Warning("Careful"));
        }

        #[test]
        fn dash_and_star_bullets() {
            assert_eq!(classify_line("- Emergency fund"), LineKind::Bullet("Emergency fund"));
            assert_eq!(classify_line("* Index funds"), LineKind::Bullet("Index funds"));
        }

        #[test]
        fn bold_text_is_not_a_bullet() {
            assert_eq!(
                classify_line("**Bold** statement"),
                LineKind::Paragraph("**Bold** statement")
            );
        }

        #[test]
        fn blank_lines() {
            assert_eq!(classify_line(""), LineKind::Blank);
            assert_eq!(classify_line("   \t"), LineKind::Blank);
        }

        #[test]
        fn everything_else_is_paragraph() {
            assert_eq!(classify_line("-no space"), LineKind::Paragraph("-no space"));
            assert_eq!(classify_line("  Plain  "), LineKind::Paragraph("Plain"));
        }
    }

    mod format {
        use super::*;

        #[test]
        fn assistant_question_lines_are_emphasized() {
            let formatted = format_turn("Got it.\nHow much can you save?", Speaker::Assistant);
            assert_eq!(
                formatted.lines,
                vec![
                    RenderLine::Paragraph {
                        segments: vec![Segment::Text("Got it.")],
                        emphasized: false
                    },
                    RenderLine::Paragraph {
                        segments: vec![Segment::Text("How much can you save?")],
                        emphasized: true
                    },
                ]
            );
            assert!(formatted.ends_with_question);
        }

        #[test]
        fn question_mark_mid_line_is_still_emphasized() {
            let formatted = format_turn("Why? Because fees compound.", Speaker::Assistant);
            assert!(matches!(
                formatted.lines[0],
                RenderLine::Paragraph { emphasized: true, .. }
            ));
            assert!(!formatted.ends_with_question);
        }

        #[test]
        fn user_turns_are_never_emphasized() {
            let formatted = format_turn("Is a TFSA better?", Speaker::User);
            assert!(matches!(
                formatted.lines[0],
                RenderLine::Paragraph { emphasized: false, .. }
            ));
            assert!(!formatted.ends_with_question);
        }

        #[test]
        fn trailing_blank_lines_do_not_hide_question() {
            let formatted = format_turn("Ready to start?\n\n  \n", Speaker::Assistant);
            assert!(formatted.ends_with_question);
        }

        #[test]
        fn mixed_kinds_render_links() {
            let text = "⚠️ See [limits](https://canada.ca)\n- one\n\nDone";
            let formatted = format_turn(text, Speaker::Assistant);

            assert_eq!(formatted.lines.len(), 4);
            assert_eq!(
                formatted.lines[0],
                RenderLine::Warning {
                    segments: vec![
                        Segment::Text("See "),
                        Segment::Link {
                            label: "limits",
                            url: "https://canada.ca"
                        }
                    ]
                }
            );
            assert_eq!(formatted.lines[1].segments(), &[Segment::Text("one")]);
            assert_eq!(formatted.lines[2], RenderLine::Blank);
            assert!(!formatted.ends_with_question);
        }

        #[test]
        fn empty_text_has_no_lines() {
            let formatted = format_turn("", Speaker::Assistant);
            assert!(formatted.lines.is_empty());
            assert!(!formatted.ends_with_question);
        }
    }
}
