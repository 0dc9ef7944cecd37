//! Wiring of the multi-stage retina on top of the generic network.
//!
//! Stages, in construction order:
//!
//! ```text
//! photoreceptor ──► on-center / off-center bipolar ──► line detectors (4 orientations)
//!       │                                                      │
//!       └──────────────────────────► output ◄──────────────────┘
//! ```
//!
//! Every layer has the same `rows x cols` grid. Neighbour cells that fall
//! outside the grid are skipped, never clamped or wrapped.

use std::ops::Range;

use tracing::debug;

use crate::error::ConstructionError;
use crate::layer::{Layer, LayerId, Position};
use crate::network::{Network, NetworkBuilder, NodeId, NodeKind, OutputClamp};
use crate::scheduler::Schedule;
use crate::synapse::SynapseSpec;

/// 8-neighbourhood as `(drow, dcol)`, clockwise from north.
/// Even entries are cardinal, odd entries diagonal.
pub const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// Center and surround synapses of one bipolar polarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BipolarTable {
    pub center: SynapseSpec,
    pub cardinal: SynapseSpec,
    pub diagonal: SynapseSpec,
}

pub const ON_CENTER: BipolarTable = BipolarTable {
    center: SynapseSpec::excitatory(1.0, 2.0),
    cardinal: SynapseSpec::inhibitory(0.1, 0.0),
    diagonal: SynapseSpec::inhibitory(0.3, 0.0),
};

pub const OFF_CENTER: BipolarTable = BipolarTable {
    center: SynapseSpec::inhibitory(1.0, 1.0),
    cardinal: SynapseSpec::excitatory(0.3, 0.0),
    diagonal: SynapseSpec::excitatory(0.1, 0.0),
};

/// Line detector synapses from the (on-center, off-center) bipolar pair.
pub const ON_LINE: (SynapseSpec, SynapseSpec) = (
    SynapseSpec::excitatory(1.0, 0.5),
    SynapseSpec::inhibitory(1.0, 0.5),
);
pub const OFF_LINE: (SynapseSpec, SynapseSpec) = (
    SynapseSpec::inhibitory(0.3, 0.5),
    SynapseSpec::excitatory(0.3, 0.5),
);

pub const OUTPUT_IDENTITY: SynapseSpec = SynapseSpec::excitatory(1.0, 0.0);
pub const OUTPUT_SELECTED: SynapseSpec = SynapseSpec::excitatory(0.5, 0.5);
pub const OUTPUT_UNSELECTED: SynapseSpec = SynapseSpec::inhibitory(0.05, 0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Vertical,
    Horizontal,
    /// Top-left to bottom-right.
    DiagonalDown,
    /// Top-right to bottom-left.
    DiagonalUp,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Vertical,
        Orientation::Horizontal,
        Orientation::DiagonalDown,
        Orientation::DiagonalUp,
    ];

    pub fn layer(self) -> LayerId {
        match self {
            Orientation::Vertical => LayerId::Vertical,
            Orientation::Horizontal => LayerId::Horizontal,
            Orientation::DiagonalDown => LayerId::DiagonalDown,
            Orientation::DiagonalUp => LayerId::DiagonalUp,
        }
    }

    /// Whether block offset `(dr, dc)` from the centre lies on this
    /// orientation's line. The diagonals are the cells equally far from the
    /// block's top-left (↘) or top-right (↙) corner in both axes.
    pub fn on_line(self, dr: isize, dc: isize) -> bool {
        match self {
            Orientation::Vertical => dc == 0,
            Orientation::Horizontal => dr == 0,
            Orientation::DiagonalDown => dr == dc,
            Orientation::DiagonalUp => dr == -dc,
        }
    }

    /// Coordinate across the orientation's lines; cells on one line share it.
    pub fn cross_coordinate(self, pos: Position) -> isize {
        let (r, c) = (pos.row as isize, pos.col as isize);
        match self {
            Orientation::Vertical => c,
            Orientation::Horizontal => r,
            Orientation::DiagonalDown => c - r,
            Orientation::DiagonalUp => r + c,
        }
    }
}

/// `cos(2π · phase / period) >= 0`, evaluated exactly on integers.
pub fn on_crest(cross: isize, period: u32) -> bool {
    let period = period.max(1) as isize;
    let phase = cross.rem_euclid(period);
    4 * phase <= period || 4 * phase >= 3 * period
}

/// Inputs of the retina builder.
#[derive(Debug, Clone, PartialEq)]
pub struct RetinaParams {
    pub rows: usize,
    pub cols: usize,
    /// Odd side length of the line detector and output neighbourhoods.
    pub block_size: usize,
    /// Sinusoidal modulation period per orientation, in `Orientation::ALL` order.
    pub modulation_period: [u32; 4],
    /// Constant drive added to both bipolar layers.
    pub bipolar_bias: f32,
    pub membrane_tau: f32,
    pub clamp: OutputClamp,
}

impl Default for RetinaParams {
    fn default() -> Self {
        Self {
            rows: 28,
            cols: 28,
            block_size: 3,
            modulation_period: [2; 4],
            bipolar_bias: 0.0,
            membrane_tau: 1.0,
            clamp: OutputClamp::default(),
        }
    }
}

impl RetinaParams {
    pub fn validate(&self) -> Result<(), ConstructionError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConstructionError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.block_size == 0 || self.block_size % 2 == 0 {
            return Err(ConstructionError::InvalidBlockSize(self.block_size));
        }
        if let Some(&p) = self.modulation_period.iter().find(|&&p| p == 0) {
            return Err(ConstructionError::InvalidPeriod(p));
        }
        if !(self.membrane_tau.is_finite() && self.membrane_tau > 0.0) {
            return Err(ConstructionError::InvalidMembraneTau(self.membrane_tau));
        }
        if !(self.clamp.min <= self.clamp.max) {
            return Err(ConstructionError::InvalidClamp {
                min: self.clamp.min,
                max: self.clamp.max,
            });
        }
        self.node_count()?;
        self.synapse_count()?;
        Ok(())
    }

    /// Nodes of the built network: one per cell in every layer.
    pub fn node_count(&self) -> Result<usize, ConstructionError> {
        let nodes = self
            .rows
            .checked_mul(self.cols)
            .and_then(|cells| cells.checked_mul(LayerId::ALL.len()))
            .ok_or(ConstructionError::TooManyNodes(usize::MAX))?;
        if u32::try_from(nodes).is_err() {
            return Err(ConstructionError::TooManyNodes(nodes));
        }
        Ok(nodes)
    }

    /// Exact synapse count after out-of-grid neighbours are skipped.
    ///
    /// Every layer wires a square window around each cell: the bipolar
    /// center plus ring is the 3x3 window, a line detector takes two synapses
    /// per block cell, the output takes one per block cell and orientation
    /// plus its identity synapse.
    pub fn synapse_count(&self) -> Result<usize, ConstructionError> {
        let count = || -> Option<usize> {
            let ring = window_pairs(self.rows, self.cols, 3)?;
            let block = window_pairs(self.rows, self.cols, self.block_size)?;
            let cells = self.rows.checked_mul(self.cols)?;
            ring.checked_mul(2)?
                .checked_add(block.checked_mul(3 * Orientation::ALL.len())?)?
                .checked_add(cells)
        };
        match count() {
            Some(n) if u32::try_from(n).is_ok() => Ok(n),
            _ => Err(ConstructionError::TooManySynapses),
        }
    }
}

/// In-grid `(cell, offset)` pairs of a `size x size` window over a grid.
fn window_pairs(rows: usize, cols: usize, size: usize) -> Option<usize> {
    axis_pairs(rows, size / 2)?.checked_mul(axis_pairs(cols, size / 2)?)
}

/// `sum(n - |d|)` for `|d| <= min(h, n - 1)`.
fn axis_pairs(n: usize, h: usize) -> Option<usize> {
    let m = h.min(n.saturating_sub(1));
    // m + 1 <= n, so m * (m + 1) cannot overflow once m * n did not
    let tail = m.checked_mul(n)? - m * (m + 1) / 2;
    n.checked_add(tail.checked_mul(2)?)
}

/// The built network plus the layers that address it.
#[derive(Debug, Clone)]
pub struct Retina {
    network: Network,
    /// Indexed by `LayerId::index()`.
    layers: Vec<Layer>,
    block_size: usize,
    spans: Vec<Range<usize>>,
}

impl Retina {
    pub fn build(params: &RetinaParams) -> Result<Self, ConstructionError> {
        params.validate()?;
        let (rows, cols) = (params.rows, params.cols);
        let synapses = params.synapse_count()?;
        let mut b = NetworkBuilder::with_capacity(params.node_count()?, synapses);

        let photo = photoreceptor_layer(&mut b, rows, cols)?;
        let on = bipolar_layer(&mut b, &photo, LayerId::OnCenter, &ON_CENTER, params.bipolar_bias)?;
        let off = bipolar_layer(&mut b, &photo, LayerId::OffCenter, &OFF_CENTER, params.bipolar_bias)?;

        let mut detectors = Vec::with_capacity(Orientation::ALL.len());
        for orientation in Orientation::ALL {
            detectors.push(line_detector_layer(
                &mut b,
                &on,
                &off,
                orientation,
                params.block_size,
            )?);
        }

        let output = output_layer(
            &mut b,
            &photo,
            &detectors,
            params.block_size,
            &params.modulation_period,
        )?;

        let mut layers = vec![photo, on, off];
        layers.extend(detectors);
        layers.push(output);
        debug_assert!(layers.iter().zip(LayerId::ALL).all(|(l, id)| l.id == id));

        debug_assert_eq!(b.synapse_count(), synapses);

        let spans = layers.iter().flat_map(|l| l.row_spans()).collect();
        debug!(
            nodes = b.node_count(),
            synapses = b.synapse_count(),
            rows,
            cols,
            "retina built"
        );

        Ok(Self {
            network: b.build(params.membrane_tau, params.clamp),
            layers,
            block_size: params.block_size,
            spans,
        })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn layer(&self, id: LayerId) -> &Layer {
        &self.layers[id.index()]
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Which layer a node belongs to, and where.
    pub fn locate(&self, node: NodeId) -> Option<(LayerId, Position)> {
        self.layers
            .iter()
            .find_map(|l| l.position(node).map(|p| (l.id, p)))
    }

    /// Advance every layer by one tick, in construction order.
    pub fn step(&mut self, dt: f32, injection: Option<&[f32]>, schedule: Schedule) {
        self.network.step(&self.spans, dt, injection, schedule);
    }

    /// Advance a single layer by one tick against the currently committed
    /// state of every other layer.
    pub fn step_layer(
        &mut self,
        id: LayerId,
        dt: f32,
        injection: Option<&[f32]>,
        schedule: Schedule,
    ) {
        let spans: Vec<_> = self.layers[id.index()].row_spans().collect();
        self.network.step(&spans, dt, injection, schedule);
    }
}

fn next_layer(
    b: &NetworkBuilder,
    id: LayerId,
    rows: usize,
    cols: usize,
) -> Result<Layer, ConstructionError> {
    let first = u32::try_from(b.node_count())
        .map_err(|_| ConstructionError::TooManyNodes(b.node_count()))?;
    Ok(Layer {
        id,
        rows,
        cols,
        first: NodeId(first),
    })
}

/// Offsets of the `block_size` window around `pos` that stay inside the
/// layer, row-major. A block larger than the grid costs no more than the grid.
fn block_offsets(
    layer: &Layer,
    pos: Position,
    block_size: usize,
) -> impl Iterator<Item = (isize, isize)> + use<> {
    let h = block_size / 2;
    let up = h.min(pos.row) as isize;
    let down = h.min(layer.rows - 1 - pos.row) as isize;
    let left = h.min(pos.col) as isize;
    let right = h.min(layer.cols - 1 - pos.col) as isize;
    (-up..=down).flat_map(move |dr| (-left..=right).map(move |dc| (dr, dc)))
}

fn photoreceptor_layer(
    b: &mut NetworkBuilder,
    rows: usize,
    cols: usize,
) -> Result<Layer, ConstructionError> {
    let layer = next_layer(b, LayerId::Photoreceptor, rows, cols)?;
    for _ in 0..layer.len() {
        b.add_node(NodeKind::Input, 0.0)?;
    }
    debug!(layer = %layer.id, nodes = layer.len(), "wired");
    Ok(layer)
}

fn bipolar_layer(
    b: &mut NetworkBuilder,
    photo: &Layer,
    id: LayerId,
    table: &BipolarTable,
    bias: f32,
) -> Result<Layer, ConstructionError> {
    let layer = next_layer(b, id, photo.rows, photo.cols)?;
    let before = b.synapse_count();

    for pos in layer.positions() {
        let node = b.add_node(NodeKind::Internal, bias)?;
        let center = photo
            .node(pos)
            .ok_or(ConstructionError::UnknownNode(node))?;
        b.connect(node, center, table.center)?;

        for (k, &(dr, dc)) in NEIGHBOURS.iter().enumerate() {
            let Some(source) = photo.neighbour(pos, dr, dc) else {
                continue;
            };
            let spec = if k % 2 == 0 { table.cardinal } else { table.diagonal };
            b.connect(node, source, spec)?;
        }
    }

    debug!(layer = %id, nodes = layer.len(), synapses = b.synapse_count() - before, "wired");
    Ok(layer)
}

fn line_detector_layer(
    b: &mut NetworkBuilder,
    on: &Layer,
    off: &Layer,
    orientation: Orientation,
    block_size: usize,
) -> Result<Layer, ConstructionError> {
    let layer = next_layer(b, orientation.layer(), on.rows, on.cols)?;
    let before = b.synapse_count();

    for pos in layer.positions() {
        let node = b.add_node(NodeKind::Internal, 0.0)?;
        for (dr, dc) in block_offsets(&layer, pos, block_size) {
            let (Some(from_on), Some(from_off)) =
                (on.neighbour(pos, dr, dc), off.neighbour(pos, dr, dc))
            else {
                continue;
            };
            let (on_spec, off_spec) = if orientation.on_line(dr, dc) {
                ON_LINE
            } else {
                OFF_LINE
            };
            b.connect(node, from_on, on_spec)?;
            b.connect(node, from_off, off_spec)?;
        }
    }

    debug!(layer = %layer.id, nodes = layer.len(), synapses = b.synapse_count() - before, "wired");
    Ok(layer)
}

fn output_layer(
    b: &mut NetworkBuilder,
    photo: &Layer,
    detectors: &[Layer],
    block_size: usize,
    periods: &[u32; 4],
) -> Result<Layer, ConstructionError> {
    let layer = next_layer(b, LayerId::Output, photo.rows, photo.cols)?;
    let before = b.synapse_count();

    for pos in layer.positions() {
        let node = b.add_node(NodeKind::Internal, 0.0)?;
        let identity = photo
            .node(pos)
            .ok_or(ConstructionError::UnknownNode(node))?;
        b.connect(node, identity, OUTPUT_IDENTITY)?;

        for ((orientation, detector), &period) in
            Orientation::ALL.into_iter().zip(detectors).zip(periods)
        {
            let crest = on_crest(orientation.cross_coordinate(pos), period);
            for (dr, dc) in block_offsets(&layer, pos, block_size) {
                let Some(source) = detector.neighbour(pos, dr, dc) else {
                    continue;
                };
                let spec = if crest && orientation.on_line(dr, dc) {
                    OUTPUT_SELECTED
                } else {
                    OUTPUT_UNSELECTED
                };
                b.connect(node, source, spec)?;
            }
        }
    }

    debug!(layer = %layer.id, nodes = layer.len(), synapses = b.synapse_count() - before, "wired");
    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synapse::Sign;

    fn params(rows: usize, cols: usize) -> RetinaParams {
        RetinaParams {
            rows,
            cols,
            ..Default::default()
        }
    }

    #[test]
    fn rejects_bad_params() {
        assert_eq!(
            Retina::build(&params(0, 4)).unwrap_err(),
            ConstructionError::InvalidDimensions { rows: 0, cols: 4 }
        );
        let even = RetinaParams {
            block_size: 4,
            ..params(4, 4)
        };
        assert_eq!(
            Retina::build(&even).unwrap_err(),
            ConstructionError::InvalidBlockSize(4)
        );
        let flat = RetinaParams {
            modulation_period: [2, 0, 2, 2],
            ..params(4, 4)
        };
        assert_eq!(
            Retina::build(&flat).unwrap_err(),
            ConstructionError::InvalidPeriod(0)
        );
    }

    #[test]
    fn rejects_bad_membrane_tau_and_clamp() {
        for tau in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let p = RetinaParams {
                membrane_tau: tau,
                ..params(2, 2)
            };
            assert!(matches!(
                Retina::build(&p),
                Err(ConstructionError::InvalidMembraneTau(_))
            ));
        }
        let inverted = RetinaParams {
            clamp: OutputClamp { min: 5.0, max: 1.0 },
            ..params(2, 2)
        };
        assert_eq!(
            Retina::build(&inverted).unwrap_err(),
            ConstructionError::InvalidClamp { min: 5.0, max: 1.0 }
        );
    }

    #[test]
    fn oversized_grids_fail_before_allocating() {
        let huge = params(70_000, 70_000);
        assert!(matches!(
            Retina::build(&huge),
            Err(ConstructionError::TooManyNodes(_))
        ));
        // nodes fit in u32, synapses do not
        let dense = params(20_000, 20_000);
        assert_eq!(dense.node_count().unwrap(), 20_000 * 20_000 * 8);
        assert_eq!(
            Retina::build(&dense).unwrap_err(),
            ConstructionError::TooManySynapses
        );
    }

    #[test]
    fn block_larger_than_grid_is_clipped() {
        let wide = RetinaParams {
            block_size: 40_001,
            ..params(1, 2)
        };
        let retina = Retina::build(&wide).unwrap();
        let reference = Retina::build(&RetinaParams {
            block_size: 3,
            ..params(1, 2)
        })
        .unwrap();

        assert_eq!(
            retina.network().synapse_count(),
            reference.network().synapse_count()
        );
        assert_eq!(retina.network().synapse_count(), wide.synapse_count().unwrap());
        let wiring = |r: &Retina, node| -> Vec<_> {
            r.network()
                .incoming(node)
                .map(|s| (s.source, s.spec))
                .collect()
        };
        for i in 0..retina.network().len() {
            let node = NodeId(i as u32);
            assert_eq!(wiring(&retina, node), wiring(&reference, node));
        }
    }

    #[test]
    fn synapse_count_is_exact() {
        for (rows, cols, block_size) in [(1, 1, 1), (3, 2, 3), (5, 7, 5), (28, 28, 3)] {
            let p = RetinaParams {
                block_size,
                ..params(rows, cols)
            };
            let retina = Retina::build(&p).unwrap();
            assert_eq!(retina.network().synapse_count(), p.synapse_count().unwrap());
            assert_eq!(retina.network().len(), p.node_count().unwrap());
        }
    }

    #[test]
    fn neighbour_table_is_clockwise_ring() {
        for (k, (dr, dc)) in NEIGHBOURS.iter().enumerate() {
            let diagonal = dr.abs() == 1 && dc.abs() == 1;
            assert_eq!(diagonal, k % 2 == 1);
        }
    }

    #[test]
    fn orientation_predicates() {
        assert!(Orientation::Vertical.on_line(-1, 0));
        assert!(!Orientation::Vertical.on_line(0, 1));
        assert!(Orientation::Horizontal.on_line(0, -1));
        assert!(Orientation::DiagonalDown.on_line(-1, -1));
        assert!(Orientation::DiagonalDown.on_line(1, 1));
        assert!(!Orientation::DiagonalDown.on_line(-1, 1));
        assert!(Orientation::DiagonalUp.on_line(-1, 1));
        assert!(Orientation::DiagonalUp.on_line(1, -1));
        assert!(Orientation::DiagonalUp.on_line(0, 0));
    }

    #[test]
    fn crest_matches_cosine_sign() {
        // period 2 alternates
        assert!(on_crest(0, 2));
        assert!(!on_crest(1, 2));
        assert!(on_crest(-2, 2));
        // period 4: phases 0, 1, 3 are >= 0
        assert!(on_crest(1, 4));
        assert!(!on_crest(2, 4));
        assert!(on_crest(3, 4));
        assert!(on_crest(5, 1));
    }

    #[test]
    fn bipolar_center_and_ring() {
        let retina = Retina::build(&params(5, 5)).unwrap();
        let net = retina.network();
        let on = retina.layer(LayerId::OnCenter);
        let photo = retina.layer(LayerId::Photoreceptor);

        let center = on.node(Position::new(2, 2)).unwrap();
        let syn: Vec<_> = net.incoming(center).collect();
        assert_eq!(syn.len(), 9);
        assert_eq!(syn[0].source, photo.node(Position::new(2, 2)).unwrap());
        assert_eq!(syn[0].spec, ON_CENTER.center);
        assert!(syn[1..].iter().all(|s| s.spec.sign == Sign::Inhibitory));

        let corner = retina.layer(LayerId::OffCenter).node(Position::new(0, 0)).unwrap();
        assert_eq!(net.incoming_count(corner), 4);
        let edge = on.node(Position::new(0, 2)).unwrap();
        assert_eq!(net.incoming_count(edge), 6);
    }

    #[test]
    fn line_detector_weights_follow_orientation() {
        let retina = Retina::build(&params(5, 5)).unwrap();
        let net = retina.network();
        let on = retina.layer(LayerId::OnCenter);
        let vertical = retina.layer(LayerId::Vertical);
        let node = vertical.node(Position::new(2, 2)).unwrap();

        for syn in net.incoming(node) {
            let Some((LayerId::OnCenter, pos)) = retina.locate(syn.source) else {
                continue;
            };
            assert_eq!(on.node(pos), Some(syn.source));
            if pos.col == 2 {
                assert_eq!(syn.spec, ON_LINE.0);
            } else {
                assert_eq!(syn.spec, OFF_LINE.0);
            }
        }
    }

    #[test]
    fn output_count_and_identity() {
        let retina = Retina::build(&params(4, 4)).unwrap();
        let net = retina.network();
        let output = retina.layer(LayerId::Output);
        let photo = retina.layer(LayerId::Photoreceptor);

        let interior = output.node(Position::new(1, 1)).unwrap();
        assert_eq!(net.incoming_count(interior), 1 + 4 * 9);
        let first = net.incoming(interior).next().unwrap();
        assert_eq!(first.source, photo.node(Position::new(1, 1)).unwrap());
        assert_eq!(first.spec, OUTPUT_IDENTITY);

        let corner = output.node(Position::new(0, 0)).unwrap();
        assert_eq!(net.incoming_count(corner), 1 + 4 * 4);
    }

    #[test]
    fn output_modulation_selects_on_crest_only() {
        let retina = Retina::build(&params(4, 4)).unwrap();
        let net = retina.network();
        let output = retina.layer(LayerId::Output);

        let count_selected = |pos: Position, layer: LayerId| {
            let node = output.node(pos).unwrap();
            net.incoming(node)
                .filter(|s| retina.locate(s.source).map(|(id, _)| id) == Some(layer))
                .filter(|s| s.spec == OUTPUT_SELECTED)
                .count()
        };

        // column 2 is a crest for period 2, column 1 a trough
        assert_eq!(count_selected(Position::new(1, 2), LayerId::Vertical), 3);
        assert_eq!(count_selected(Position::new(1, 1), LayerId::Vertical), 0);
        // row 2 is a crest for horizontal
        assert_eq!(count_selected(Position::new(2, 1), LayerId::Horizontal), 3);
        assert_eq!(count_selected(Position::new(1, 1), LayerId::Horizontal), 0);
    }

    #[test]
    fn layers_are_contiguous_in_construction_order() {
        let retina = Retina::build(&params(3, 2)).unwrap();
        let mut expected = 0;
        for (layer, id) in retina.layers().iter().zip(LayerId::ALL) {
            assert_eq!(layer.id, id);
            assert_eq!(layer.first.index(), expected);
            expected += layer.len();
        }
        assert_eq!(expected, retina.network().len());
        assert_eq!(
            retina.locate(NodeId(7)),
            Some((LayerId::OnCenter, Position::new(0, 1)))
        );
    }
}
