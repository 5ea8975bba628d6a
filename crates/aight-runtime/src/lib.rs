//! aight runtime: command implementations behind the `aight` binary.
//! Kept as a library so the chat session and config loading can be driven
//! from integration tests.

pub mod app;
pub mod chat;
pub mod cli;
pub mod cmd_config;
pub mod cmd_detect;
pub mod cmd_generate;
pub mod cmd_reload;
pub mod cmd_states;
pub mod cmd_suggest;
pub mod config;
pub mod input;
pub mod render;
