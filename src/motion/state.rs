//! Tool position and positioning mode.
//!
//! Positions are fixed-point integers in canvas units: millimetres times the
//! bed's pixels-per-millimetre, rounded half away from zero (`f64::round`).

use crate::gcode::Axes;

use super::MotionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositioningMode {
    #[default]
    Absolute,
    Relative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisState {
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub e: i64,
    /// Unscaled Z height in millimetres, used to label layers.
    pub z_mm: f32,
    pub feed_rate: Option<u32>,
    pub mode: PositioningMode,
    pub motors_enabled: bool,
    scale: f64,
}

impl AxisState {
    pub fn new(pixels_per_mm: f64) -> Self {
        Self {
            x: 0,
            y: 0,
            z: 0,
            e: 0,
            z_mm: 0.0,
            feed_rate: None,
            mode: PositioningMode::Absolute,
            motors_enabled: true,
            scale: pixels_per_mm,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Millimetres to canvas units. Fails when the scaled value does not fit
    /// the fixed-point range.
    pub fn to_units(&self, axis: char, mm: f32) -> Result<i64, MotionError> {
        let scaled = (f64::from(mm) * self.scale).round();
        // i64::MAX as f64 rounds up to 2^63, which itself is out of range
        if scaled.is_finite() && scaled >= i64::MIN as f64 && scaled < i64::MAX as f64 {
            Ok(scaled as i64)
        } else {
            Err(MotionError::CoordinateOverflow { axis, value: mm })
        }
    }

    fn resolve(&self, axis: char, previous: i64, value: Option<f32>) -> Result<i64, MotionError> {
        let Some(v) = value else {
            return Ok(previous);
        };
        let units = self.to_units(axis, v)?;
        match self.mode {
            PositioningMode::Absolute => Ok(units),
            PositioningMode::Relative => previous
                .checked_add(units)
                .ok_or(MotionError::CoordinateOverflow { axis, value: v }),
        }
    }

    /// Target X/Y of a move; absent axes keep their own previous value.
    pub fn resolve_xy(&self, axes: &Axes) -> Result<(i64, i64), MotionError> {
        Ok((self.resolve('X', self.x, axes.x)?, self.resolve('Y', self.y, axes.y)?))
    }

    /// Commit a move whose X/Y target was already resolved. Returns the new
    /// Z height in millimetres when the move carried a Z value. Nothing is
    /// changed if E or Z cannot be resolved.
    pub fn commit_move(&mut self, axes: &Axes, x: i64, y: i64) -> Result<Option<f32>, MotionError> {
        let e = self.resolve('E', self.e, axes.e)?;
        let z = self.resolve('Z', self.z, axes.z)?;
        self.x = x;
        self.y = y;
        self.e = e;
        self.z = z;
        if axes.feed_rate.is_some() {
            self.feed_rate = axes.feed_rate;
        }
        let Some(dz) = axes.z else {
            return Ok(None);
        };
        self.z_mm = match self.mode {
            PositioningMode::Absolute => dz,
            PositioningMode::Relative => self.z_mm + dz,
        };
        Ok(Some(self.z_mm))
    }

    /// Redefine the current position without motion. Always absolute; each
    /// absent axis keeps its own value.
    pub fn set_position(&mut self, axes: &Axes) -> Result<(), MotionError> {
        let x = axes.x.map(|v| self.to_units('X', v)).transpose()?;
        let y = axes.y.map(|v| self.to_units('Y', v)).transpose()?;
        let z = axes.z.map(|v| self.to_units('Z', v)).transpose()?;
        let e = axes.e.map(|v| self.to_units('E', v)).transpose()?;
        self.x = x.unwrap_or(self.x);
        self.y = y.unwrap_or(self.y);
        if let (Some(z), Some(z_mm)) = (z, axes.z) {
            self.z = z;
            self.z_mm = z_mm;
        }
        self.e = e.unwrap_or(self.e);
        Ok(())
    }

    pub fn home(&mut self) {
        self.x = 0;
        self.y = 0;
        self.z = 0;
        self.z_mm = 0.0;
    }

    pub fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }
}
