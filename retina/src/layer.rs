use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::network::NodeId;

/// Stable identifier of every layer the retina builder produces, in
/// construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerId {
    Photoreceptor,
    OnCenter,
    OffCenter,
    Vertical,
    Horizontal,
    DiagonalDown,
    DiagonalUp,
    Output,
}

impl LayerId {
    pub const ALL: [LayerId; 8] = [
        LayerId::Photoreceptor,
        LayerId::OnCenter,
        LayerId::OffCenter,
        LayerId::Vertical,
        LayerId::Horizontal,
        LayerId::DiagonalDown,
        LayerId::DiagonalUp,
        LayerId::Output,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayerId::Photoreceptor => "photoreceptor",
            LayerId::OnCenter => "on-center",
            LayerId::OffCenter => "off-center",
            LayerId::Vertical => "vertical",
            LayerId::Horizontal => "horizontal",
            LayerId::DiagonalDown => "diagonal-down",
            LayerId::DiagonalUp => "diagonal-up",
            LayerId::Output => "output",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The layer after this one, wrapping around. Drives display cycling.
    pub fn next(self) -> LayerId {
        LayerId::ALL[(self.index() + 1) % LayerId::ALL.len()]
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayerId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        LayerId::ALL
            .into_iter()
            .find(|id| id.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownLayer(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// `self + (dr, dc)`, or `None` when it leaves `[0, rows) x [0, cols)`.
    pub fn offset(self, dr: isize, dc: isize, rows: usize, cols: usize) -> Option<Position> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        (row < rows && col < cols).then_some(Position { row, col })
    }
}

/// Row-major block of nodes built by one stage. Pure addressing: the nodes
/// themselves live in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
    pub id: LayerId,
    pub rows: usize,
    pub cols: usize,
    pub first: NodeId,
}

impl Layer {
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn nodes(&self) -> Range<usize> {
        let start = self.first.index();
        start..start + self.len()
    }

    pub fn node(&self, pos: Position) -> Option<NodeId> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return None;
        }
        let offset = u32::try_from(pos.row * self.cols + pos.col).ok()?;
        self.first.0.checked_add(offset).map(NodeId)
    }

    /// Bounds-checked neighbour lookup. Out-of-range cells are skipped by
    /// callers, never clamped or wrapped.
    pub fn neighbour(&self, pos: Position, dr: isize, dc: isize) -> Option<NodeId> {
        pos.offset(dr, dc, self.rows, self.cols)
            .and_then(|p| self.node(p))
    }

    pub fn position(&self, node: NodeId) -> Option<Position> {
        let i = node.index().checked_sub(self.first.index())?;
        (i < self.len()).then(|| Position::new(i / self.cols, i % self.cols))
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Position::new(row, col)))
    }

    /// One node range per grid row.
    pub fn row_spans(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        let start = self.first.index();
        (0..self.rows).map(move |r| {
            let s = start + r * self.cols;
            s..s + self.cols
        })
    }
}
