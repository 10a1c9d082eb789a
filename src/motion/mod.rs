// src/motion/mod.rs
pub mod passthrough;
pub mod simulated;
pub mod state;

use thiserror::Error;

use crate::gcode::Axes;
use crate::layers::ExportError;

pub use passthrough::PassthroughMotors;
pub use simulated::SimulatedMotors;
pub use state::{AxisState, PositioningMode};

#[derive(Debug, Error)]
pub enum MotionError {
    #[error("Print move endpoint ({x}, {y}) lies outside the {width}x{height} bed")]
    OutOfBed {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },
    #[error("{axis}{value} does not fit the coordinate range")]
    CoordinateOverflow { axis: char, value: f32 },
    #[error("Layer export error: {0}")]
    Export(#[from] ExportError),
}

/// Motion capability the interpreter drives. Implementations are chosen at
/// construction: [`SimulatedMotors`] renders to a canvas,
/// [`PassthroughMotors`] only tracks and logs.
pub trait Motors {
    /// Non-extruding move (G0).
    fn travel(&mut self, axes: &Axes) -> Result<(), MotionError>;
    /// Extruding move (G1).
    fn extrude(&mut self, axes: &Axes) -> Result<(), MotionError>;
    /// Return to the origin (G28).
    fn home(&mut self) -> Result<(), MotionError>;
    /// Redefine the current position without moving (G92).
    fn set_position(&mut self, axes: &Axes) -> Result<(), MotionError>;
    fn enable(&mut self);
    fn disable(&mut self);
    fn set_absolute(&mut self);
    fn set_relative(&mut self);
    /// Called once when the input is exhausted.
    fn finish(&mut self) -> Result<(), MotionError>;
    /// Layers captured so far.
    fn layers_captured(&self) -> u32;
    fn state(&self) -> &AxisState;
}

impl<M: Motors + ?Sized> Motors for Box<M> {
    fn travel(&mut self, axes: &Axes) -> Result<(), MotionError> {
        (**self).travel(axes)
    }
    fn extrude(&mut self, axes: &Axes) -> Result<(), MotionError> {
        (**self).extrude(axes)
    }
    fn home(&mut self) -> Result<(), MotionError> {
        (**self).home()
    }
    fn set_position(&mut self, axes: &Axes) -> Result<(), MotionError> {
        (**self).set_position(axes)
    }
    fn enable(&mut self) {
        (**self).enable()
    }
    fn disable(&mut self) {
        (**self).disable()
    }
    fn set_absolute(&mut self) {
        (**self).set_absolute()
    }
    fn set_relative(&mut self) {
        (**self).set_relative()
    }
    fn finish(&mut self) -> Result<(), MotionError> {
        (**self).finish()
    }
    fn layers_captured(&self) -> u32 {
        (**self).layers_captured()
    }
    fn state(&self) -> &AxisState {
        (**self).state()
    }
}
