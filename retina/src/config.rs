//! Simulation configuration.
//!
//! Loading order:
//! 1. TOML file (missing keys fall back to defaults)
//! 2. Environment variables (`RETINA_*`)
//! 3. Validation
//!
//! Grid and block sizes are checked by the topology builder, which reports
//! them as construction errors.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::layer::LayerId;
use crate::network::OutputClamp;
use crate::scheduler::Schedule;
use crate::topology::{OFF_CENTER, ON_CENTER, ON_LINE, OUTPUT_SELECTED, RetinaParams};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub rows: usize,
    pub cols: usize,
    /// Integration step in seconds.
    pub dt: f32,
    /// Ticks between two renders; the render interval is `dt * ticks_per_frame`.
    pub ticks_per_frame: u32,
    pub membrane_tau: f32,
    pub block_size: usize,
    /// Vertical, horizontal, diagonal-down, diagonal-up.
    pub modulation_period: [u32; 4],
    pub output_min: f32,
    pub output_max: f32,
    /// Image brightness to photoreceptor current.
    pub input_gain: f32,
    pub bipolar_bias: f32,
    pub active_layer: LayerId,
    pub schedule: Schedule,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: 28,
            cols: 28,
            dt: 0.01,
            ticks_per_frame: 4,
            membrane_tau: 1.0,
            block_size: 3,
            modulation_period: [2; 4],
            output_min: 0.0,
            output_max: 255.0,
            input_gain: 10.0,
            bipolar_bias: 0.0,
            active_layer: LayerId::Photoreceptor,
            schedule: Schedule::RowParallel,
        }
    }
}

impl SimulationConfig {
    /// Read `path`, apply `RETINA_*` environment overrides and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Supported variables:
    /// - `RETINA_ROWS`, `RETINA_COLS`
    /// - `RETINA_DT`
    /// - `RETINA_TICKS_PER_FRAME`
    /// - `RETINA_ACTIVE_LAYER`
    /// - `RETINA_SCHEDULE`
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Same as [`apply_env_overrides`](Self::apply_env_overrides) with an
    /// arbitrary lookup. Unparseable numbers are ignored; unknown layer or
    /// schedule names are errors.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(rows) = lookup("RETINA_ROWS").and_then(|v| v.parse().ok()) {
            self.rows = rows;
        }
        if let Some(cols) = lookup("RETINA_COLS").and_then(|v| v.parse().ok()) {
            self.cols = cols;
        }
        if let Some(dt) = lookup("RETINA_DT").and_then(|v| v.parse().ok()) {
            self.dt = dt;
        }
        if let Some(n) = lookup("RETINA_TICKS_PER_FRAME").and_then(|v| v.parse().ok()) {
            self.ticks_per_frame = n;
        }
        if let Some(layer) = lookup("RETINA_ACTIVE_LAYER") {
            self.active_layer = layer.parse()?;
        }
        if let Some(schedule) = lookup("RETINA_SCHEDULE") {
            self.schedule = schedule.parse()?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidDt(self.dt));
        }
        if self.ticks_per_frame < 1 {
            return Err(ConfigError::InvalidTicksPerFrame(self.ticks_per_frame));
        }
        if !(self.membrane_tau.is_finite() && self.membrane_tau > 0.0) {
            return Err(ConfigError::InvalidMembraneTau(self.membrane_tau));
        }
        if !(self.output_min <= self.output_max) {
            return Err(ConfigError::InvalidClamp {
                min: self.output_min,
                max: self.output_max,
            });
        }
        Ok(())
    }

    /// Explicit Euler and the synapse filters stay well behaved while `dt`
    /// is below every time constant. Not enforced; reported here.
    pub fn stability_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.dt >= self.membrane_tau {
            warnings.push(format!(
                "dt {} is not below membrane_tau {}",
                self.dt, self.membrane_tau
            ));
        }
        let filtered = [
            ON_CENTER.center.tau,
            OFF_CENTER.center.tau,
            ON_LINE.0.tau,
            OUTPUT_SELECTED.tau,
        ];
        let min_tau = filtered.into_iter().fold(f32::INFINITY, f32::min);
        if self.dt >= min_tau {
            warnings.push(format!(
                "dt {} is not below the smallest synapse tau {}",
                self.dt, min_tau
            ));
        }
        warnings
    }

    pub fn log_stability_warnings(&self) {
        for warning in self.stability_warnings() {
            warn!("{warning}");
        }
    }

    pub fn clamp(&self) -> OutputClamp {
        OutputClamp {
            min: self.output_min,
            max: self.output_max,
        }
    }

    pub fn retina_params(&self) -> RetinaParams {
        RetinaParams {
            rows: self.rows,
            cols: self.cols,
            block_size: self.block_size,
            modulation_period: self.modulation_period,
            bipolar_bias: self.bipolar_bias,
            membrane_tau: self.membrane_tau,
            clamp: self.clamp(),
        }
    }

    /// Simulated seconds between two renders.
    pub fn render_interval(&self) -> f32 {
        self.dt * self.ticks_per_frame as f32
    }
}
