//! Advisor Chat - conversational personal-finance assistant.
//!
//! Sends the user's turns to a language model and renders each reply as an
//! interactive chat turn: quick-reply options, inline links, warning
//! callouts, and a one-time end-of-conversation feedback prompt.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
