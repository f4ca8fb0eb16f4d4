//! Annotation session
//!
//! This module contains:
//! - Session state (one loaded spectrogram, its model and text fields)
//! - Message types driving the session
//! - Parsing of shell command lines into messages

pub mod commands;
pub mod messages;
pub mod state;
