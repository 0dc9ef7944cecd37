use std::ops::Range;

use crate::error::ConstructionError;
use crate::synapse::{SynapseRef, SynapseSpec, filter_alpha, filter_step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Driven by injected current only; never the target of a synapse.
    Input,
    /// Driven by incoming synapses plus an optional constant bias.
    Internal,
}

/// Bounds applied to a node's potential to produce its output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputClamp {
    pub min: f32,
    pub max: f32,
}

impl OutputClamp {
    #[inline]
    pub fn apply(&self, v: f32) -> f32 {
        v.max(self.min).min(self.max)
    }
}

impl Default for OutputClamp {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 255.0,
        }
    }
}

/// Collects nodes and synapses, then freezes them into a [`Network`].
///
/// Synapses must be connected in non-decreasing target order, which is what
/// every layer builder does naturally: create a node, wire it, move on.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    kind: Vec<NodeKind>,
    bias: Vec<f32>,

    target: Vec<u32>,
    source: Vec<u32>,
    spec: Vec<SynapseSpec>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, synapses: usize) -> Self {
        Self {
            kind: Vec::with_capacity(nodes),
            bias: Vec::with_capacity(nodes),
            target: Vec::with_capacity(synapses),
            source: Vec::with_capacity(synapses),
            spec: Vec::with_capacity(synapses),
        }
    }

    pub fn add_node(&mut self, kind: NodeKind, bias: f32) -> Result<NodeId, ConstructionError> {
        let id = u32::try_from(self.kind.len())
            .map(NodeId)
            .map_err(|_| ConstructionError::TooManyNodes(self.kind.len() + 1))?;
        self.kind.push(kind);
        self.bias.push(bias);
        Ok(id)
    }

    /// Add a synapse carrying `source`'s output into `target`.
    pub fn connect(
        &mut self,
        target: NodeId,
        source: NodeId,
        spec: SynapseSpec,
    ) -> Result<(), ConstructionError> {
        spec.validate()?;
        let kind = self
            .kind
            .get(target.index())
            .ok_or(ConstructionError::UnknownNode(target))?;
        if *kind == NodeKind::Input {
            return Err(ConstructionError::InputTarget(target));
        }
        if source.index() >= self.kind.len() {
            return Err(ConstructionError::UnknownNode(source));
        }
        if let Some(&last) = self.target.last() {
            if target.0 < last {
                return Err(ConstructionError::OutOfOrder {
                    target,
                    last: NodeId(last),
                });
            }
        }
        // in_offset is u32
        if self.spec.len() >= u32::MAX as usize {
            return Err(ConstructionError::TooManySynapses);
        }

        self.target.push(target.0);
        self.source.push(source.0);
        self.spec.push(spec);
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.kind.len()
    }

    pub fn synapse_count(&self) -> usize {
        self.spec.len()
    }

    pub fn build(self, membrane_tau: f32, clamp: OutputClamp) -> Network {
        let n = self.kind.len();

        // CSR prefix over targets.
        let mut in_offset = Vec::with_capacity(n + 1);
        in_offset.push(0u32);
        let mut cursor = 0usize;
        for node in 0..n {
            while cursor < self.target.len() && self.target[cursor] as usize == node {
                cursor += 1;
            }
            in_offset.push(cursor as u32);
        }
        debug_assert_eq!(cursor, self.target.len());

        let synapses = self.spec.len();
        Network {
            v: vec![0.0; n],
            kind: self.kind,
            bias: self.bias,
            membrane_tau,
            clamp,
            in_offset,
            source: self.source,
            spec: self.spec,
            filtered: vec![0.0; synapses],
            snapshot: vec![0.0; n],
            next_v: vec![0.0; n],
            next_f: vec![0.0; synapses],
        }
    }
}

// SoA
#[derive(Debug, Clone)]
pub struct Network {
    // ----------------------- Nodes
    /// Committed potential
    pub(crate) v: Vec<f32>,
    pub(crate) kind: Vec<NodeKind>,
    /// Constant current added every tick
    pub(crate) bias: Vec<f32>,
    pub(crate) membrane_tau: f32,
    pub(crate) clamp: OutputClamp,

    // ----------------------- CSR incoming synapses
    /// Synapses of node i are in_offset[i]..in_offset[i+1]
    pub(crate) in_offset: Vec<u32>,
    pub(crate) source: Vec<u32>,
    pub(crate) spec: Vec<SynapseSpec>,
    /// Committed low-pass filter state
    pub(crate) filtered: Vec<f32>,

    // ----------------------- Per-tick scratch
    /// Outputs at the start of the tick being computed
    pub(crate) snapshot: Vec<f32>,
    pub(crate) next_v: Vec<f32>,
    pub(crate) next_f: Vec<f32>,
}

impl Network {
    pub fn len(&self) -> usize {
        self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    pub fn synapse_count(&self) -> usize {
        self.spec.len()
    }

    pub fn membrane_tau(&self) -> f32 {
        self.membrane_tau
    }

    pub fn clamp(&self) -> OutputClamp {
        self.clamp
    }

    pub fn kind(&self, node: NodeId) -> NodeKind {
        self.kind[node.index()]
    }

    pub fn potential(&self, node: NodeId) -> f32 {
        self.v[node.index()]
    }

    pub fn set_potential(&mut self, node: NodeId, v: f32) {
        self.v[node.index()] = v;
    }

    pub fn output(&self, node: NodeId) -> f32 {
        self.clamp.apply(self.v[node.index()])
    }

    pub fn potentials(&self) -> &[f32] {
        &self.v
    }

    pub fn incoming_count(&self, node: NodeId) -> usize {
        let i = node.index();
        (self.in_offset[i + 1] - self.in_offset[i]) as usize
    }

    pub fn incoming(&self, node: NodeId) -> impl Iterator<Item = SynapseRef> + '_ {
        let i = node.index();
        let range = self.in_offset[i] as usize..self.in_offset[i + 1] as usize;
        range.map(move |k| SynapseRef {
            source: NodeId(self.source[k]),
            spec: self.spec[k],
            filtered: self.filtered[k],
        })
    }

    /// Sum of `sign * weight * f` over the committed filter state.
    pub fn synaptic_input(&self, node: NodeId) -> f32 {
        self.incoming(node).map(|s| s.contribution()).sum()
    }

    /// Range of synapse slots owned by the nodes in `nodes`.
    pub(crate) fn synapse_range(&self, nodes: &Range<usize>) -> Range<usize> {
        self.in_offset[nodes.start] as usize..self.in_offset[nodes.end] as usize
    }

    /// Compute node `i`'s next potential, writing its synapses' next filter
    /// values into `next_f`. Reads only committed state and `snapshot`.
    ///
    /// Explicit Euler, stable while `dt < membrane_tau`:
    /// v' = v + dt * (-v / tau_m + I + sum(sign * w * f'))
    #[inline]
    pub(crate) fn integrate(&self, i: usize, dt: f32, injected: f32, next_f: &mut [f32]) -> f32 {
        let start = self.in_offset[i] as usize;
        let end = self.in_offset[i + 1] as usize;
        debug_assert_eq!(next_f.len(), end - start);

        let mut input = injected + self.bias[i];
        for (k, slot) in (start..end).zip(next_f.iter_mut()) {
            let spec = &self.spec[k];
            let x = self.snapshot[self.source[k] as usize];
            let f = filter_step(self.filtered[k], x, filter_alpha(dt, spec.tau));
            *slot = f;
            input += spec.gain() * f;
        }

        let v = self.v[i];
        v + dt * (-v / self.membrane_tau + input)
    }
}
