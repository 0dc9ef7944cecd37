use thiserror::Error;

use crate::network::NodeId;

/// Raised while wiring the network. Construction is all-or-nothing: a builder
/// that returns one of these has produced no usable topology.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConstructionError {
    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("block size must be odd and at least 1, got {0}")]
    InvalidBlockSize(usize),
    #[error("modulation period must be at least 1, got {0}")]
    InvalidPeriod(u32),
    #[error("membrane time constant must be a finite value > 0, got {0}")]
    InvalidMembraneTau(f32),
    #[error("output clamp bounds are inverted: [{min}, {max}]")]
    InvalidClamp { min: f32, max: f32 },
    #[error("network needs {0} nodes, more than a u32 id can address")]
    TooManyNodes(usize),
    #[error("network needs more than {} synapses", u32::MAX)]
    TooManySynapses,
    #[error("synapse time constant must be a finite value >= 0, got {0}")]
    InvalidTau(f32),
    #[error("synapse weight must be finite, got {0}")]
    InvalidWeight(f32),
    #[error("node {0:?} is an input node and cannot receive synapses")]
    InputTarget(NodeId),
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),
    #[error("synapses must be connected in target order, {target:?} comes after {last:?}")]
    OutOfOrder { target: NodeId, last: NodeId },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("dt must be > 0, got {0}")]
    InvalidDt(f32),
    #[error("ticks per frame must be >= 1, got {0}")]
    InvalidTicksPerFrame(u32),
    #[error("membrane time constant must be > 0, got {0}")]
    InvalidMembraneTau(f32),
    #[error("output clamp bounds are inverted: [{min}, {max}]")]
    InvalidClamp { min: f32, max: f32 },
    #[error("unknown layer '{0}'")]
    UnknownLayer(String),
    #[error("unknown schedule '{0}'")]
    UnknownSchedule(String),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum RetinaError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
