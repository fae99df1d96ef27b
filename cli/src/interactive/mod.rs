//! Interactive mode
//!
//! A full-terminal calculator built on iocraft: input fields driven by the
//! keyboard and the virtual keypad, a status line while requests are out,
//! and a result region redrawn from the session's region view.

pub mod app;
pub mod components;
pub mod keymap;
pub mod message_handler;
pub mod text_utils;
