// src/printer.rs - Thermal and fan status driven by M-commands
use crate::gcode::{GCodeCommand, Mnemonic};

/// Informational printer state. Nothing here affects the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PrinterStatus {
    pub hotend_target: Option<f32>,
    pub bed_target: Option<f32>,
    /// Part-cooling fan power in percent.
    pub fan_percent: f32,
    pub extruder_absolute: bool,
}

impl PrinterStatus {
    pub fn new() -> Self {
        Self {
            hotend_target: None,
            bed_target: None,
            fan_percent: 0.0,
            extruder_absolute: true,
        }
    }

    /// Apply a thermal, fan or extruder-mode command and report it.
    /// Other mnemonics are ignored.
    pub fn apply(&mut self, mnemonic: Mnemonic, cmd: &GCodeCommand) {
        match mnemonic {
            Mnemonic::M82 => {
                self.extruder_absolute = true;
                tracing::info!("M82: extruder set to absolute mode");
            }
            Mnemonic::M104 | Mnemonic::M109 => {
                let wait = mnemonic == Mnemonic::M109;
                if let Some(t) = temperature(cmd) {
                    self.hotend_target = Some(t);
                    tracing::info!("{}: set hotend temperature to {} C, {}", mnemonic, t as i32, wait_label(wait));
                } else {
                    tracing::warn!("{}: no temperature given", mnemonic);
                }
            }
            Mnemonic::M140 | Mnemonic::M190 => {
                let wait = mnemonic == Mnemonic::M190;
                if let Some(t) = temperature(cmd) {
                    self.bed_target = Some(t);
                    tracing::info!("{}: set bed temperature to {} C, {}", mnemonic, t as i32, wait_label(wait));
                } else {
                    tracing::warn!("{}: no temperature given", mnemonic);
                }
            }
            Mnemonic::M105 => {
                tracing::info!(
                    "M105: hotend target {:?} C, bed target {:?} C",
                    self.hotend_target,
                    self.bed_target
                );
            }
            Mnemonic::M106 => {
                let pwm = cmd.value('S').unwrap_or(255.0).clamp(0.0, 255.0);
                self.fan_percent = (pwm / 255.0 * 100.0).round();
                tracing::info!("M106: part fan on at {} %", self.fan_percent);
            }
            Mnemonic::M107 => {
                self.fan_percent = 0.0;
                tracing::info!("M107: part fan off");
            }
            _ => {}
        }
    }
}

impl Default for PrinterStatus {
    fn default() -> Self {
        Self::new()
    }
}

fn temperature(cmd: &GCodeCommand) -> Option<f32> {
    cmd.value('S').or_else(|| cmd.parameters.first().and_then(|p| p.value))
}

fn wait_label(wait: bool) -> &'static str {
    if wait { "waiting" } else { "not waiting" }
}
