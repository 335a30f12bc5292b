//! Interactive terminal front end for MentorAI.
//!
//! This module provides the REPL pieces built on top of [`Session`](crate::Session):
//!
//! - Slash commands standing in for the settings panel
//! - ANSI-styled output with a typing indicator
//! - Configurable model, level, goal, tone, outputs and creativity
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: Slash command parsing

mod commands;
mod config;

pub use crate::render::{PlainTextRenderer, Renderer, TYPING_INDICATOR};
pub use commands::{ChatCommand, QUICK_START_EXAMPLES, help_text, parse_command};
pub use config::{ChatArgs, ChatArgsError, ChatConfig, parse_creativity, parse_output_list};
