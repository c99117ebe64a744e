use crate::gate::Gate;
use crate::BoxId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Debug-friendly box chain between two boxes.
///
/// `gates.len()` is `boxes.len() - 1`: `gates[i]` is the crossing from
/// `boxes[i]` into `boxes[i + 1]`. A route from a box to itself has a single
/// box and no gates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxRoute {
    pub boxes: Vec<BoxId>,
    pub gates: Vec<Gate>,
}

impl BoxRoute {
    /// Number of box crossings along the route.
    pub fn hops(&self) -> usize {
        self.gates.len()
    }

    pub fn first(&self) -> Option<BoxId> {
        self.boxes.first().copied()
    }

    pub fn last(&self) -> Option<BoxId> {
        self.boxes.last().copied()
    }
}
