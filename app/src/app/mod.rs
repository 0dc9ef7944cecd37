use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use retina::{
    ImageSequence, ImageSource, RetinaError, Simulation, SimulationConfig, render,
};
use tracing::{debug, info};

mod stimuli;

/// Headless retina simulation driver.
///
/// Log level is read from RUST_LOG (default: info).
#[derive(Parser, Debug, Clone)]
#[command(name = "retina-app", version, long_about = None)]
pub struct Options {
    /// TOML configuration file; defaults plus RETINA_* overrides when absent
    #[arg(env = "RETINA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Frames to simulate
    #[arg(long, default_value_t = 300)]
    pub frames: u32,

    /// Frames shown per stimulus image before advancing
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..))]
    pub frames_per_image: u32,

    /// Also render the active layer to PNG through Graphviz
    #[arg(long)]
    pub png: bool,

    /// DOT output path; the PNG lands next to it
    #[arg(long, default_value = "retina.dot")]
    pub out: PathBuf,
}

pub struct App {
    simulation: Simulation,
    images: ImageSequence,
    frames_per_image: u32,
    frame: u64,
    last_report: Instant,
}

impl App {
    pub fn new(options: &Options) -> Result<Self, RetinaError> {
        let config = match &options.config {
            Some(path) => {
                info!(path = %path.display(), "loading config");
                SimulationConfig::load(path)?
            }
            None => {
                let mut config = SimulationConfig::default();
                config.apply_env_overrides()?;
                config
            }
        };

        let mut rng = StdRng::seed_from_u64(7);
        let images = stimuli::sequence(config.rows, config.cols, &mut rng);
        let simulation = Simulation::new(config)?;

        Ok(Self {
            simulation,
            images,
            frames_per_image: options.frames_per_image.max(1),
            frame: 0,
            last_report: Instant::now(),
        })
    }

    pub fn run(&mut self, frames: u32) {
        for _ in 0..frames {
            self.update();
        }
        info!(
            frames = self.frame,
            t = self.simulation.clock().current_time(),
            "run finished"
        );
    }

    fn update(&mut self) {
        const REPORT_INTERVAL: Duration = Duration::from_millis(500);

        let stats = self.simulation.run_frame(Some(self.images.current()));
        self.frame += 1;

        if self.frame % self.frames_per_image as u64 == 0 {
            let index = self.images.step_forward();
            debug!(index, "next image");
        }

        if self.last_report.elapsed() >= REPORT_INTERVAL {
            self.last_report = Instant::now();
            let active = self.simulation.active_layer();
            if let Some(layer) = stats.layer(active) {
                info!(
                    frame = self.frame,
                    t = stats.time,
                    layer = %active,
                    mean = layer.mean,
                    max = layer.max,
                    "frame"
                );
            }
            for layer in &stats.layers {
                debug!(layer = %layer.layer, mean = layer.mean, max = layer.max);
            }
        }
    }

    /// Write the active layer as DOT to `out`, and as PNG next to it when
    /// `png` is set.
    pub fn export(&self, out: &Path, png: bool) -> io::Result<()> {
        let view = self.simulation.active_view();
        let clamp_max = self.simulation.config().output_max;

        fs::write(out, render::to_dot(&view, clamp_max))?;
        info!(path = %out.display(), layer = %view.layer, "wrote dot");

        if png {
            let png_path = out.with_extension("png");
            fs::write(&png_path, render::to_neato_png(&view, clamp_max)?)?;
            info!(path = %png_path.display(), "wrote png");
        }
        Ok(())
    }
}
