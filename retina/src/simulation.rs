use tracing::{info, trace};

use crate::clock::Clock;
use crate::config::SimulationConfig;
use crate::error::RetinaError;
use crate::image::Image;
use crate::layer::LayerId;
use crate::topology::Retina;
use crate::view::LayerView;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStats {
    pub layer: LayerId,
    pub mean: f32,
    pub max: f32,
}

/// Outcome of one `run_frame`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStats {
    pub ticks: u32,
    /// Simulated time after the frame, in seconds.
    pub time: f64,
    pub layers: Vec<LayerStats>,
}

impl FrameStats {
    pub fn layer(&self, id: LayerId) -> Option<&LayerStats> {
        self.layers.iter().find(|s| s.layer == id)
    }
}

/// Owns everything a run needs: configuration, clock, the wired retina and
/// the layer currently selected for display.
pub struct Simulation {
    config: SimulationConfig,
    clock: Clock,
    retina: Retina,
    active_layer: LayerId,
    /// Per-node injected current, refilled every tick.
    injection: Vec<f32>,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, RetinaError> {
        config.validate()?;
        config.log_stability_warnings();
        let retina = Retina::build(&config.retina_params())?;

        info!(
            rows = config.rows,
            cols = config.cols,
            nodes = retina.network().len(),
            synapses = retina.network().synapse_count(),
            dt = config.dt,
            schedule = ?config.schedule,
            "simulation created"
        );

        Ok(Self {
            clock: Clock::new(config.dt),
            injection: vec![0.0; retina.network().len()],
            active_layer: config.active_layer,
            retina,
            config,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn retina(&self) -> &Retina {
        &self.retina
    }

    /// Advance the whole network by one tick, driving the photoreceptors
    /// with `image` (or nothing).
    pub fn tick(&mut self, image: Option<&Image>) {
        self.fill_injection(image);
        self.retina.step(
            self.clock.step_size(),
            Some(&self.injection),
            self.config.schedule,
        );
        self.clock.advance();
        trace!(t = self.clock.current_time(), "tick");
    }

    /// Run the ticks that make up one rendered frame.
    pub fn run_frame(&mut self, image: Option<&Image>) -> FrameStats {
        let ticks = self.ticks_per_frame();
        for _ in 0..ticks {
            self.tick(image);
        }
        FrameStats {
            ticks,
            time: self.clock.current_time(),
            layers: LayerId::ALL.into_iter().map(|id| self.layer_stats(id)).collect(),
        }
    }

    pub fn ticks_per_frame(&self) -> u32 {
        self.clock.ticks_per_frame(self.config.render_interval())
    }

    pub fn active_layer(&self) -> LayerId {
        self.active_layer
    }

    pub fn set_active_layer(&mut self, layer: LayerId) {
        self.active_layer = layer;
    }

    /// Select the next layer for display and return it.
    pub fn cycle_layer(&mut self) -> LayerId {
        self.active_layer = self.active_layer.next();
        self.active_layer
    }

    pub fn view(&self, layer: LayerId) -> LayerView {
        LayerView::capture(&self.retina, layer)
    }

    pub fn active_view(&self) -> LayerView {
        self.view(self.active_layer)
    }

    pub fn layer_stats(&self, id: LayerId) -> LayerStats {
        let net = self.retina.network();
        let clamp = net.clamp();
        let nodes = self.retina.layer(id).nodes();
        let len = nodes.len().max(1) as f32;
        let (sum, max) = net.potentials()[nodes]
            .iter()
            .map(|&v| clamp.apply(v))
            .fold((0.0f32, f32::MIN), |(sum, max), out| (sum + out, max.max(out)));
        LayerStats {
            layer: id,
            mean: sum / len,
            max,
        }
    }

    fn fill_injection(&mut self, image: Option<&Image>) {
        self.injection.fill(0.0);
        let Some(image) = image else {
            return;
        };
        let photo = self.retina.layer(LayerId::Photoreceptor);
        let gain = self.config.input_gain;
        for (slot, pos) in self.injection[photo.nodes()].iter_mut().zip(photo.positions()) {
            *slot = gain * image.get(pos.row, pos.col);
        }
    }
}
