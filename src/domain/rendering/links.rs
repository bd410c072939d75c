//! Inline link rendering.
//!
//! Splits one line of text into plain and `[label](url)` link segments.
//! Only `http://` and `https://` targets are links; anything else stays text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// `[label](url)` with a non-empty, bracket-free label and an http(s) url
/// that contains no whitespace and no unescaped `)`.
static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\[\]]+)\]\((https?://(?:\\.|[^)\\\s])+)\)")
        .expect("link pattern is valid")
});

/// One piece of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Segment<'a> {
    Text(&'a str),
    Link { label: &'a str, url: &'a str },
}

impl<'a> Segment<'a> {
    /// Returns the text a reader sees for this segment.
    pub fn visible_text(&self) -> &'a str {
        match self {
            Segment::Text(text) => text,
            Segment::Link { label, .. } => label,
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Segment::Link { .. })
    }
}

/// Lazy segment iterator over a single line.
///
/// Clone it before consuming, or call [`render_links`] again, to walk the
/// same line twice.
#[derive(Debug, Clone)]
pub struct Links<'a> {
    line: &'a str,
    pos: usize,
    pending: Option<Segment<'a>>,
    emitted: bool,
}

/// Starts rendering links in `line`.
///
/// A line without any link yields exactly one `Text` segment holding the
/// whole line, even when the line is empty.
pub fn render_links(line: &str) -> Links<'_> {
    Links {
        line,
        pos: 0,
        pending: None,
        emitted: false,
    }
}

impl<'a> Iterator for Links<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(link) = self.pending.take() {
            self.emitted = true;
            return Some(link);
        }

        if self.pos >= self.line.len() {
            if !self.emitted {
                self.emitted = true;
                return Some(Segment::Text(self.line));
            }
            return None;
        }

        let start = self.pos;
        let item = match LINK_PATTERN.captures_at(self.line, start) {
            Some(caps) => {
                let whole = caps.get(0).map_or(start..start, |m| m.range());
                let link = Segment::Link {
                    label: caps.get(1).map_or("", |m| m.as_str()),
                    url: caps.get(2).map_or("", |m| m.as_str()),
                };
                self.pos = whole.end;
                if whole.start > start {
                    self.pending = Some(link);
                    Segment::Text(&self.line[start..whole.start])
                } else {
                    link
                }
            }
            None => {
                self.pos = self.line.len();
                Segment::Text(&self.line[start..])
            }
        };

        self.emitted = true;
        Some(item)
    }
}

impl std::iter::FusedIterator for Links<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn segments(line: &str) -> Vec<Segment<'_>> {
        render_links(line).collect()
    }

    #[test]
    fn plain_line_is_single_segment() {
        assert_eq!(
            segments("Max out your TFSA first."),
            vec![Segment::Text("Max out your TFSA first.")]
        );
    }

    #[test]
    fn empty_line_is_single_empty_segment() {
        assert_eq!(segments(""), vec![Segment::Text("")]);
    }

    #[test]
    fn one_link_with_surrounding_text_yields_three_segments() {
        let line = "See [CRA limits](https://canada.ca/tfsa) for details.";
        assert_eq!(
            segments(line),
            vec![
                Segment::Text("See "),
                Segment::Link {
                    label: "CRA limits",
                    url: "https://canada.ca/tfsa"
                },
                Segment::Text(" for details."),
            ]
        );
    }

    #[test]
    fn link_alone_yields_single_link() {
        assert_eq!(
            segments("[docs](http://example.com)"),
            vec![Segment::Link {
                label: "docs",
                url: "http://example.com"
            }]
        );
    }

    #[test]
    fn adjacent_links_keep_order() {
        let line = "[a](https://a.io)[b](https://b.io) and [c](https://c.io)";
        let visible: Vec<_> = render_links(line).map(|s| s.visible_text()).collect();
        assert_eq!(visible, vec!["a", "b", " and ", "c"]);
    }

    #[test]
    fn non_http_scheme_is_plain_text() {
        let line = "[click](javascript:alert(1)) or [mail](mailto:me@x.io)";
        assert_eq!(segments(line), vec![Segment::Text(line)]);
    }

    #[test]
    fn unbalanced_brackets_are_plain_text() {
        let line = "[broken(https://example.com) and [also](https://example.com";
        assert_eq!(segments(line), vec![Segment::Text(line)]);
    }

    #[test]
    fn nested_label_matches_innermost_only() {
        let line = "[outer [inner](https://x.io)]";
        assert_eq!(
            segments(line),
            vec![
                Segment::Text("[outer "),
                Segment::Link {
                    label: "inner",
                    url: "https://x.io"
                },
                Segment::Text("]"),
            ]
        );
    }

    #[test]
    fn url_stops_at_first_closing_paren() {
        let line = "[wiki](https://en.wikipedia.org/wiki/RRSP) (Canada)";
        let segs = segments(line);
        assert_eq!(
            segs[0],
            Segment::Link {
                label: "wiki",
                url: "https://en.wikipedia.org/wiki/RRSP"
            }
        );
        assert_eq!(segs[1], Segment::Text(" (Canada)"));
    }

    #[test]
    fn escaped_paren_stays_inside_url() {
        let line = r"[x](https://x.io/a\)b)";
        assert_eq!(
            segments(line),
            vec![Segment::Link {
                label: "x",
                url: r"https://x.io/a\)b"
            }]
        );
    }

    #[test]
    fn iterator_is_restartable_by_clone() {
        let line = "go [here](https://x.io) now";
        let links = render_links(line);
        let first: Vec<_> = links.clone().collect();
        let second: Vec<_> = links.collect();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn segments_reassemble_visible_text_in_order(line in "[a-z \\[\\]():/.]{0,40}") {
            let rebuilt: String = render_links(&line)
                .map(|s| match s {
                    Segment::Text(t) => t.to_string(),
                    Segment::Link { label, url } => format!("[{}]({})", label, url),
                })
                .collect();
            prop_assert_eq!(rebuilt, line);
        }

        #[test]
        fn rendering_plain_output_is_a_no_op(
            prefix in "[a-z ]{0,10}",
            label in "[a-z]{1,8}",
            middle in "[a-z \\[\\]()]{0,10}",
            suffix in "[a-z ]{0,10}",
        ) {
            let line = format!("{}[{}](https://{}.io){}{}", prefix, label, label, middle, suffix);
            for segment in render_links(&line) {
                if let Segment::Text(text) = segment {
                    let again: Vec<_> = render_links(text).collect();
                    prop_assert_eq!(again, vec![Segment::Text(text)]);
                }
            }
        }

        #[test]
        fn zero_links_yield_exactly_one_segment(line in "[a-zA-Z0-9 .,!?]{0,60}") {
            prop_assert_eq!(render_links(&line).count(), 1);
        }
    }
}
