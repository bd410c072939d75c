//! Styled terminal output for turn views.

use colored::{ColoredString, Colorize};

use crate::domain::conversation::{FeedbackLabel, Speaker};
use crate::domain::rendering::{RenderLine, Segment, TurnView};

/// Draws [`TurnView`]s as terminal lines.
///
/// With color off the output is plain text.
#[derive(Debug, Clone, Copy)]
pub struct TerminalRenderer {
    color: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TerminalRenderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Renders one turn: a speaker header, the body, then any pills.
    pub fn render_turn(&self, view: &TurnView) -> Vec<String> {
        let mut out = vec![self.header(view.speaker)];

        for line in view.formatted().lines {
            out.push(self.render_line(&line));
        }

        if view.has_quick_replies() {
            out.push(String::new());
            out.extend(
                view.quick_replies
                    .iter()
                    .enumerate()
                    .map(|(i, option)| self.pill(i + 1, option)),
            );
        } else if view.awaiting_free_text {
            out.push(self.paint(Style::Hint, "(type your answer)"));
        }

        out
    }

    /// Renders the feedback prompt with its numbered labels.
    pub fn render_feedback_prompt(&self) -> Vec<String> {
        let mut out = vec![
            String::new(),
            self.paint(Style::Header, "How helpful was this conversation?"),
        ];
        out.extend(
            FeedbackLabel::ALL
                .iter()
                .enumerate()
                .map(|(i, label)| self.pill(i + 1, label.label())),
        );
        out.push(self.paint(Style::Hint, "(answer with /feedback <number>)"));
        out
    }

    /// Renders a one-line status notice such as a startup greeting.
    pub fn render_notice(&self, text: &str) -> String {
        self.paint(Style::Hint, text)
    }

    fn header(&self, speaker: Speaker) -> String {
        let name = match speaker {
            Speaker::User => "You",
            Speaker::Assistant => "Advisor",
        };
        self.paint(Style::Header, &format!("{}:", name))
    }

    fn render_line(&self, line: &RenderLine<'_>) -> String {
        match line {
            RenderLine::Paragraph {
                segments,
                emphasized,
            } => {
                let style = if *emphasized { Style::Strong } else { Style::Plain };
                format!("  {}", self.segments(segments, style))
            }
            RenderLine::Bullet { segments } => {
                format!("  • {}", self.segments(segments, Style::Plain))
            }
            RenderLine::Warning { segments } => format!(
                "  {} {}",
                self.paint(Style::Warning, "⚠"),
                self.segments(segments, Style::Warning)
            ),
            RenderLine::Blank => String::new(),
        }
    }

    fn segments(&self, segments: &[Segment<'_>], style: Style) -> String {
        segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => self.paint(style, text),
                Segment::Link { label, url } => format!(
                    "{} {}",
                    self.paint(Style::LinkLabel, label),
                    self.paint(Style::LinkUrl, &format!("<{}>", url))
                ),
            })
            .collect()
    }

    fn pill(&self, number: usize, label: &str) -> String {
        format!(
            "  {} {}",
            self.paint(Style::PillNumber, &format!("[{}]", number)),
            label
        )
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        style.apply(text).to_string()
    }
}

#[derive(Debug, Clone, Copy)]
enum Style {
    Plain,
    Strong,
    Header,
    Warning,
    LinkLabel,
    LinkUrl,
    PillNumber,
    Hint,
}

impl Style {
    fn apply(self, text: &str) -> ColoredString {
        match self {
            Style::Plain => text.normal(),
            Style::Strong => text.bold(),
            Style::Header => text.cyan().bold(),
            Style::Warning => text.yellow().bold(),
            Style::LinkLabel => text.underline(),
            Style::LinkUrl => text.blue(),
            Style::PillNumber => text.green().bold(),
            Style::Hint => text.dimmed(),
        }
    }
}
