//! Motors that render nothing. Positions are still resolved and tracked so a
//! dry run reports the same coordinates a rendering run would use.

use crate::gcode::Axes;

use super::{AxisState, Motors, MotionError, PositioningMode};

#[derive(Debug, Clone)]
pub struct PassthroughMotors {
    state: AxisState,
    layers: u32,
}

impl PassthroughMotors {
    pub fn new(pixels_per_mm: f64) -> Self {
        Self {
            state: AxisState::new(pixels_per_mm),
            layers: 0,
        }
    }

    fn apply_move(&mut self, kind: &str, axes: &Axes) -> Result<(), MotionError> {
        if !self.state.motors_enabled {
            tracing::debug!("Motors disabled, {} ignored", kind);
            return Ok(());
        }
        let (x, y) = self.state.resolve_xy(axes)?;
        tracing::debug!("{} to ({}, {})", kind, x, y);
        if let Some(height) = self.state.commit_move(axes, x, y)? {
            tracing::info!("Layer {} boundary at Z{}", self.layers, height);
            self.layers += 1;
        }
        Ok(())
    }
}

impl Motors for PassthroughMotors {
    fn travel(&mut self, axes: &Axes) -> Result<(), MotionError> {
        self.apply_move("travel", axes)
    }

    fn extrude(&mut self, axes: &Axes) -> Result<(), MotionError> {
        self.apply_move("extrude", axes)
    }

    fn home(&mut self) -> Result<(), MotionError> {
        if self.state.motors_enabled {
            self.state.home();
        }
        Ok(())
    }

    fn set_position(&mut self, axes: &Axes) -> Result<(), MotionError> {
        self.state.set_position(axes)
    }

    fn enable(&mut self) {
        self.state.motors_enabled = true;
        tracing::info!("---> Motors enabled");
    }

    fn disable(&mut self) {
        self.state.motors_enabled = false;
        tracing::info!("---> Motors disabled");
    }

    fn set_absolute(&mut self) {
        self.state.mode = PositioningMode::Absolute;
    }

    fn set_relative(&mut self) {
        self.state.mode = PositioningMode::Relative;
    }

    fn finish(&mut self) -> Result<(), MotionError> {
        Ok(())
    }

    fn layers_captured(&self) -> u32 {
        self.layers
    }

    fn state(&self) -> &AxisState {
        &self.state
    }
}
