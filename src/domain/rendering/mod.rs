//! Rendering module.
//!
//! Pure projections from a turn's stored text to what the UI draws:
//! inline links, quick-reply options, and classified lines. Nothing here
//! holds state, so every function is safe to call from any observer.

mod formatter;
mod links;
mod quick_replies;
mod view;

pub use formatter::{classify_line, format_turn, FormattedTurn, LineKind, RenderLine, WARNING_GLYPH};
pub use links::{render_links, Links, Segment};
pub use quick_replies::{
    classify_option, extract_quick_replies, OptionMarker, QuickReplies, MAX_OPTION_LEN,
    MIN_OPTIONS,
};
pub use view::TurnView;
