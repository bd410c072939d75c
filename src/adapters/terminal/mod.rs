//! Terminal shell adapter.
//!
//! Draws projected turns for an interactive terminal session.

mod renderer;

pub use renderer::TerminalRenderer;
