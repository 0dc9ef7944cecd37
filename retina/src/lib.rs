//! Continuous-time network simulator wired as a simplified retina.
//!
//! Nodes carry a leaky scalar potential, synapses carry a low-pass filtered,
//! weighted copy of their source's output, and every tick is computed from the
//! outputs committed by the previous one. [`topology`] wires photoreceptors,
//! center-surround bipolar cells, oriented line detectors and a reconstruction
//! layer on top of that engine; [`Simulation`] drives it.

pub mod clock;
pub mod config;
pub mod error;
pub mod image;
pub mod layer;
pub mod network;
pub mod render;
pub mod scheduler;
pub mod simulation;
pub mod synapse;
pub mod topology;
pub mod view;

pub use clock::Clock;
pub use config::SimulationConfig;
pub use error::{ConfigError, ConstructionError, RetinaError};
pub use image::{Image, ImageSequence, ImageSource};
pub use layer::{Layer, LayerId, Position};
pub use network::{Network, NetworkBuilder, NodeId, NodeKind, OutputClamp};
pub use scheduler::Schedule;
pub use simulation::{FrameStats, LayerStats, Simulation};
pub use synapse::{Sign, SynapseSpec};
pub use topology::{Orientation, Retina, RetinaParams};
pub use view::LayerView;
