use crate::layer::{LayerId, Position};
use crate::synapse::Sign;
use crate::topology::Retina;

/// Incoming synapse as a renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynapseView {
    pub source_layer: LayerId,
    pub source: Position,
    pub sign: Sign,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub position: Position,
    pub output: f32,
    pub synapses: Vec<SynapseView>,
}

/// Snapshot of one layer's committed state. Owns its data, so a renderer
/// can hold it while the simulation keeps ticking.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerView {
    pub layer: LayerId,
    pub rows: usize,
    pub cols: usize,
    /// Row-major.
    pub nodes: Vec<NodeView>,
}

impl LayerView {
    pub fn capture(retina: &Retina, id: LayerId) -> Self {
        let layer = retina.layer(id);
        let net = retina.network();

        let nodes = layer
            .positions()
            .filter_map(|position| {
                let node = layer.node(position)?;
                let synapses = net
                    .incoming(node)
                    .filter_map(|s| {
                        let (source_layer, source) = retina.locate(s.source)?;
                        Some(SynapseView {
                            source_layer,
                            source,
                            sign: s.spec.sign,
                            weight: s.spec.weight,
                        })
                    })
                    .collect();
                Some(NodeView {
                    position,
                    output: net.output(node),
                    synapses,
                })
            })
            .collect();

        Self {
            layer: id,
            rows: layer.rows,
            cols: layer.cols,
            nodes,
        }
    }

    pub fn output(&self, row: usize, col: usize) -> Option<f32> {
        (row < self.rows && col < self.cols).then(|| self.nodes[row * self.cols + col].output)
    }

    /// Outputs only, row-major.
    pub fn outputs(&self) -> Vec<f32> {
        self.nodes.iter().map(|n| n.output).collect()
    }

    pub fn max_output(&self) -> f32 {
        self.nodes.iter().map(|n| n.output).fold(0.0, f32::max)
    }

    pub fn mean_output(&self) -> f32 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        self.nodes.iter().map(|n| n.output).sum::<f32>() / self.nodes.len() as f32
    }
}
