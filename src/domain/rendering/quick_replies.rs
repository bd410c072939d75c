//! Quick-reply extraction.
//!
//! Finds an enumerated list of options in an assistant reply and turns it
//! into one-tap choices. Options that are vague, templated, or long stay as
//! prose: the whole list is rejected rather than showing a broken pill.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Longest option (in characters) that still works as a pill.
pub const MAX_OPTION_LEN: usize = 60;

/// Fewest options worth presenting as a choice.
pub const MIN_OPTIONS: usize = 2;

static LETTER_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-D]\)\s+(.+)$").expect("letter option pattern is valid"));

static NUMBERED_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s+(.+)$").expect("numbered option pattern is valid"));

static BULLET_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^•\s+(.+)$").expect("bullet option pattern is valid"));

// Further letter markers on the same line: "A) Yes  B) No".
static INLINE_LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+[A-D]\)\s+").expect("inline letter pattern is valid"));

// "$X", a standalone "X", "[...]" or "<...>".
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$X|\bX\b|\[[^\]]*\]|<[^>]*>").expect("placeholder pattern is valid")
});

/// Which enumeration marker introduced an option line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionMarker {
    /// `A)` through `D)`
    Letter,
    /// `1.`, `2.`, ...
    Number,
    /// `•`
    Bullet,
}

/// Options pulled out of a reply, plus the reply without those lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickReplies {
    pub options: Vec<String>,
    pub remaining_text: String,
}

/// Classifies a trimmed line as an option line, returning its marker and the
/// raw body after the marker. Markers are tried in priority order.
pub fn classify_option(line: &str) -> Option<(OptionMarker, &str)> {
    let candidates: [(OptionMarker, &Regex); 3] = [
        (OptionMarker::Letter, &*LETTER_OPTION),
        (OptionMarker::Number, &*NUMBERED_OPTION),
        (OptionMarker::Bullet, &*BULLET_OPTION),
    ];

    candidates.into_iter().find_map(|(marker, pattern)| {
        pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|body| (marker, body.as_str()))
    })
}

/// Extracts quick-reply options from an assistant reply.
///
/// Returns `None` when fewer than [`MIN_OPTIONS`] lines match, or when any
/// option contains a placeholder or exceeds [`MAX_OPTION_LEN`] characters.
pub fn extract_quick_replies(text: &str) -> Option<QuickReplies> {
    let lines: Vec<&str> = text.lines().collect();
    let mut option_lines = vec![false; lines.len()];
    let mut options = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some((marker, body)) = classify_option(trimmed) else {
            continue;
        };

        let bodies: Vec<String> = match marker {
            OptionMarker::Letter => INLINE_LETTER.split(body).map(clean_option).collect(),
            OptionMarker::Number | OptionMarker::Bullet => vec![clean_option(body)],
        };
        let bodies: Vec<String> = bodies.into_iter().filter(|b| !b.is_empty()).collect();
        if bodies.is_empty() {
            continue;
        }

        option_lines[idx] = true;
        options.extend(bodies);
    }

    if options.len() < MIN_OPTIONS || !options.iter().all(|o| is_concrete(o)) {
        return None;
    }

    let remaining_text = lines
        .iter()
        .zip(&option_lines)
        .filter(|(_, is_option)| !**is_option)
        .map(|(line, _)| *line)
        .collect::<Vec<_>>()
        .join("\n");

    Some(QuickReplies {
        options,
        remaining_text,
    })
}

/// Strips bold/emphasis wrapping and surrounding whitespace.
fn clean_option(body: &str) -> String {
    let unbolded = body.replace("**", "").replace("__", "");
    let mut cleaned = unbolded.trim();

    for wrapper in ['*', '_'] {
        if cleaned.len() >= 2 && cleaned.starts_with(wrapper) && cleaned.ends_with(wrapper) {
            cleaned = cleaned[1..cleaned.len() - 1].trim();
        }
    }

    cleaned.to_string()
}

/// True if the option is short and free of fill-in-the-blank markers.
fn is_concrete(option: &str) -> bool {
    option.chars().count() <= MAX_OPTION_LEN && !PLACEHOLDER.is_match(option)
}
