//! Run loop: reads the program line by line, dispatches each command to the
//! motors or the printer status, and tracks progress through the input.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::gcode::{
    Axes, GCodeCommand, Mnemonic, ParseError, UnknownMnemonic, parse_line, strip_comment_bytes,
};
use crate::motion::{MotionError, Motors};
use crate::printer::PrinterStatus;

#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("Cannot open input '{}': {source}", path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("IO error while reading input: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },
    #[error("Unknown G-code: {mnemonic} (line {line}, {progress:.2} % of input)")]
    UnknownGCode {
        mnemonic: String,
        line: usize,
        progress: f64,
    },
    #[error("Line {line}: {source}")]
    Motion {
        line: usize,
        #[source]
        source: MotionError,
    },
}

/// Totals for a run that reached the end of its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub lines: usize,
    pub commands: usize,
    pub layers: u32,
    pub bytes_read: u64,
}

pub struct Interpreter<M: Motors> {
    reader: Box<dyn BufRead>,
    total_bytes: u64,
    bytes_read: u64,
    line: usize,
    commands: usize,
    motors: M,
    status: PrinterStatus,
}

impl<M: Motors> Interpreter<M> {
    pub fn new<R: BufRead + 'static>(reader: R, total_bytes: u64, motors: M) -> Self {
        Self {
            reader: Box::new(reader),
            total_bytes,
            bytes_read: 0,
            line: 0,
            commands: 0,
            motors,
            status: PrinterStatus::new(),
        }
    }

    /// Open a program file. Fails before any processing if it cannot be read.
    pub fn open(path: &Path, motors: M) -> Result<Self, InterpreterError> {
        let unavailable = |source| InterpreterError::InputUnavailable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unavailable)?;
        let total_bytes = file.metadata().map_err(unavailable)?.len();
        tracing::info!("Reading G-code file: {} ({} bytes)", path.display(), total_bytes);
        Ok(Self::new(BufReader::new(file), total_bytes, motors))
    }

    /// Interpret an in-memory program.
    pub fn from_source(source: &str, motors: M) -> Self {
        let total_bytes = source.len() as u64;
        Self::new(Cursor::new(source.to_owned()), total_bytes, motors)
    }

    pub fn motors(&self) -> &M {
        &self.motors
    }

    pub fn into_motors(self) -> M {
        self.motors
    }

    pub fn status(&self) -> &PrinterStatus {
        &self.status
    }

    /// Percentage of the input consumed so far.
    pub fn progress(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.total_bytes as f64 * 100.0
    }

    /// Interpret the whole input. Motors are disabled when the run ends,
    /// whether it succeeded or not.
    pub fn run(&mut self) -> Result<RunSummary, InterpreterError> {
        let result = self.run_lines();
        self.motors.disable();
        match &result {
            Ok(summary) => tracing::info!(
                "Finished: {} lines, {} commands, {} layers",
                summary.lines,
                summary.commands,
                summary.layers
            ),
            Err(InterpreterError::UnknownGCode { mnemonic, progress, .. }) => {
                tracing::error!("{:.2} %", progress);
                tracing::error!("Unknown G-code: {}", mnemonic);
            }
            Err(e) => tracing::error!("Run aborted: {}", e),
        }
        result
    }

    fn run_lines(&mut self) -> Result<RunSummary, InterpreterError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = self.reader.read_until(b'\n', &mut buf)?;
            if n == 0 {
                break;
            }
            self.bytes_read += n as u64;
            // comments may carry any encoding; only the code part is decoded
            let code = String::from_utf8_lossy(strip_comment_bytes(&buf));
            self.execute_line(&code)?;
        }
        self.motors
            .finish()
            .map_err(|source| InterpreterError::Motion { line: self.line, source })?;
        Ok(RunSummary {
            lines: self.line,
            commands: self.commands,
            layers: self.motors.layers_captured(),
            bytes_read: self.bytes_read,
        })
    }

    /// Tokenize and dispatch a single line.
    pub fn execute_line(&mut self, line: &str) -> Result<(), InterpreterError> {
        self.line += 1;
        let parsed = parse_line(line).map_err(|source| InterpreterError::Parse {
            line: self.line,
            source,
        })?;
        match parsed {
            Some(cmd) => {
                self.commands += 1;
                self.dispatch(&cmd)
            }
            None => Ok(()),
        }
    }

    fn dispatch(&mut self, cmd: &GCodeCommand) -> Result<(), InterpreterError> {
        let mnemonic: Mnemonic = cmd.mnemonic.parse().map_err(|UnknownMnemonic(mnemonic)| {
            InterpreterError::UnknownGCode {
                mnemonic,
                line: self.line,
                progress: self.progress(),
            }
        })?;
        tracing::debug!("Processing G-code: {}", mnemonic);

        let axes = Axes::from(cmd);
        let line = self.line;
        let motion = |source| InterpreterError::Motion { line, source };
        match mnemonic {
            Mnemonic::G0 => self.motors.travel(&axes).map_err(motion)?,
            Mnemonic::G1 => self.motors.extrude(&axes).map_err(motion)?,
            Mnemonic::G28 => {
                tracing::info!("G28: move to origin");
                self.motors.home().map_err(motion)?;
            }
            Mnemonic::G90 => {
                tracing::info!("G90: absolute coordinates");
                self.motors.set_absolute();
            }
            Mnemonic::G91 => {
                tracing::info!("G91: relative coordinates");
                self.motors.set_relative();
            }
            Mnemonic::G92 => {
                tracing::info!("G92: set position");
                self.motors.set_position(&axes).map_err(motion)?;
            }
            Mnemonic::M17 => self.motors.enable(),
            Mnemonic::M84 => {
                tracing::info!("M84: disable motors");
                self.motors.disable();
            }
            Mnemonic::M82
            | Mnemonic::M104
            | Mnemonic::M105
            | Mnemonic::M106
            | Mnemonic::M107
            | Mnemonic::M109
            | Mnemonic::M140
            | Mnemonic::M190 => self.status.apply(mnemonic, cmd),
        }
        Ok(())
    }
}
