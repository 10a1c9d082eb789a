// src/lib.rs
pub mod canvas;
pub mod config;
pub mod gcode;
pub mod interpreter;
pub mod layers;
pub mod motion;
pub mod printer;

pub use canvas::RasterCanvas;
pub use config::{Config, load_config};
pub use interpreter::{Interpreter, InterpreterError, RunSummary};
