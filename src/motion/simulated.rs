//! Motors that draw every extruding move onto a raster canvas and hand the
//! canvas to a [`LayerSink`] whenever a move sets Z.

use crate::canvas::RasterCanvas;
use crate::config::Config;
use crate::gcode::Axes;
use crate::layers::LayerSink;

use super::{AxisState, Motors, MotionError, PositioningMode};

pub struct SimulatedMotors<S: LayerSink> {
    state: AxisState,
    canvas: RasterCanvas,
    sink: S,
    intensity: u8,
    flush_final_layer: bool,
}

impl<S: LayerSink> SimulatedMotors<S> {
    pub fn new(canvas: RasterCanvas, pixels_per_mm: f64, sink: S) -> Self {
        Self {
            state: AxisState::new(pixels_per_mm),
            canvas,
            sink,
            intensity: u8::MAX,
            flush_final_layer: false,
        }
    }

    /// Canvas and rendering options from a run configuration.
    pub fn from_config(config: &Config, sink: S) -> Self {
        let size = config.bed.canvas_size();
        let mut motors = Self::new(RasterCanvas::new(size, size), config.bed.pixels_per_mm, sink);
        motors.intensity = config.render.intensity;
        motors.flush_final_layer = config.simulation.flush_final_layer;
        motors
    }

    pub fn with_intensity(mut self, intensity: u8) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_final_flush(mut self, enabled: bool) -> Self {
        self.flush_final_layer = enabled;
        self
    }

    pub fn canvas(&self) -> &RasterCanvas {
        &self.canvas
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn check_on_bed(&self, x: i64, y: i64) -> Result<(), MotionError> {
        if self.canvas.contains(x, y) {
            Ok(())
        } else {
            Err(MotionError::OutOfBed {
                x,
                y,
                width: self.canvas.width(),
                height: self.canvas.height(),
            })
        }
    }

    fn capture_layer(&mut self, height_mm: f32) -> Result<(), MotionError> {
        let record = self.sink.capture(&self.canvas, height_mm)?;
        tracing::debug!(
            "Captured layer {} at Z{} ({} lit pixels)",
            record.index,
            record.height_label,
            self.canvas.lit_pixels()
        );
        self.canvas.clear();
        Ok(())
    }

    fn apply_move(&mut self, axes: &Axes, draw: bool) -> Result<(), MotionError> {
        if !self.state.motors_enabled {
            tracing::debug!("Motors disabled, move ignored");
            return Ok(());
        }
        let (x0, y0) = self.state.position();
        let (x1, y1) = self.state.resolve_xy(axes)?;
        if draw && (x0, y0) != (x1, y1) {
            self.check_on_bed(x0, y0)?;
            self.check_on_bed(x1, y1)?;
            self.canvas.draw_line(x0, y0, x1, y1, self.intensity);
        }
        if let Some(height) = self.state.commit_move(axes, x1, y1)? {
            self.capture_layer(height)?;
        }
        Ok(())
    }
}

impl<S: LayerSink> Motors for SimulatedMotors<S> {
    fn travel(&mut self, axes: &Axes) -> Result<(), MotionError> {
        self.apply_move(axes, false)
    }

    fn extrude(&mut self, axes: &Axes) -> Result<(), MotionError> {
        self.apply_move(axes, true)
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
        tracing::info!("---> Absolute positioning");
    }

    fn set_relative(&mut self) {
        self.state.mode = PositioningMode::Relative;
        tracing::info!("---> Relative positioning");
    }

    fn finish(&mut self) -> Result<(), MotionError> {
        if self.flush_final_layer && !self.canvas.is_blank() {
            let height = self.state.z_mm;
            self.capture_layer(height)?;
        }
        Ok(())
    }

    fn layers_captured(&self) -> u32 {
        self.sink.captured()
    }

    fn state(&self) -> &AxisState {
        &self.state
    }
}
