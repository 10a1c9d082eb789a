// src/gcode/mod.rs
pub mod command;
pub mod parser;

pub use command::{Axes, Mnemonic, UnknownMnemonic};
pub use parser::{GCodeCommand, GCodeSpan, Parameter, ParseError, parse_line, strip_comment, strip_comment_bytes};
