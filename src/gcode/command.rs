use std::fmt;
use std::str::FromStr;

use super::parser::{GCodeCommand, Parameter};

/// Mnemonics the interpreter knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    /// Travel move.
    G0,
    /// Extruding move.
    G1,
    /// Home.
    G28,
    /// Absolute positioning.
    G90,
    /// Relative positioning.
    G91,
    /// Set position.
    G92,
    /// Enable motors.
    M17,
    /// Absolute extrusion.
    M82,
    /// Disable motors.
    M84,
    /// Set hotend temperature, no wait.
    M104,
    /// Report temperatures.
    M105,
    /// Fan on.
    M106,
    /// Fan off.
    M107,
    /// Set hotend temperature and wait.
    M109,
    /// Set bed temperature, no wait.
    M140,
    /// Set bed temperature and wait.
    M190,
}

/// Returned when a mnemonic is not in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMnemonic(pub String);

impl FromStr for Mnemonic {
    type Err = UnknownMnemonic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "G0" => Mnemonic::G0,
            "G1" => Mnemonic::G1,
            "G28" => Mnemonic::G28,
            "G90" => Mnemonic::G90,
            "G91" => Mnemonic::G91,
            "G92" => Mnemonic::G92,
            "M17" => Mnemonic::M17,
            "M82" => Mnemonic::M82,
            "M84" => Mnemonic::M84,
            "M104" => Mnemonic::M104,
            "M105" => Mnemonic::M105,
            "M106" => Mnemonic::M106,
            "M107" => Mnemonic::M107,
            "M109" => Mnemonic::M109,
            "M140" => Mnemonic::M140,
            "M190" => Mnemonic::M190,
            other => return Err(UnknownMnemonic(other.to_string())),
        })
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Explicit axis parameters of one line. `None` means the letter was absent
/// or carried no number.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Axes {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
    pub e: Option<f32>,
    pub feed_rate: Option<u32>,
}

impl Axes {
    pub fn from_parameters(parameters: &[Parameter]) -> Self {
        let mut axes = Axes::default();
        for p in parameters {
            match p.letter {
                'X' => axes.x = p.value,
                'Y' => axes.y = p.value,
                'Z' => axes.z = p.value,
                'E' => axes.e = p.value,
                // float-to-int `as` saturates; negative feeds clamp to 0
                'F' => axes.feed_rate = p.value.map(|f| f as u32),
                _ => {}
            }
        }
        axes
    }
}

impl From<&GCodeCommand> for Axes {
    fn from(cmd: &GCodeCommand) -> Self {
        Axes::from_parameters(&cmd.parameters)
    }
}
