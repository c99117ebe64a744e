//! Precomputed next-hop table ("path matrix") for a room's walkbox graph.

use tracing::debug;

use crate::adjacency::{CostMatrix, UNREACHABLE_COST};
use crate::{BoxFlags, BoxId, BoxStore};

const UNSEEN: u32 = u32::MAX;

/// One run of destinations sharing the same first hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopRange {
    pub lo: BoxId,
    pub hi: BoxId,
    pub next: BoxId,
}

impl HopRange {
    const END: Self = Self {
        lo: BoxId(u16::MAX),
        hi: BoxId(u16::MAX),
        next: BoxId(u16::MAX),
    };

    fn is_end(&self) -> bool {
        *self == Self::END
    }

    pub fn contains(&self, dest: BoxId) -> bool {
        self.lo <= dest && dest <= self.hi
    }
}

/// Run-length compressed first-hop table.
///
/// For every source box the table stores ascending `(lo, hi, next)` runs
/// followed by a terminator. Unreachable destinations are left out, so a
/// lookup miss means "no path".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMatrix {
    runs: Vec<HopRange>,
    row_start: Vec<usize>,
}

/// Reusable scratch buffers for [`PathMatrix::compile_with`].
#[derive(Debug, Default, Clone)]
pub struct CompileScratch {
    dist: Vec<u32>,
    first_hop: Vec<Option<BoxId>>,
    settled: Vec<bool>,
}

impl CompileScratch {
    fn reset(&mut self, count: usize) {
        self.dist.clear();
        self.dist.resize(count, UNSEEN);
        self.first_hop.clear();
        self.first_hop.resize(count, None);
        self.settled.clear();
        self.settled.resize(count, false);
    }
}

impl PathMatrix {
    pub fn compile(store: &BoxStore) -> Self {
        let mut scratch = CompileScratch::default();
        Self::compile_with(store, &CostMatrix::build(store), &mut scratch)
    }

    /// Shortest-hop first-hop table for every `(source, destination)` pair.
    ///
    /// Among equally short paths the one with the lowest-numbered first hop
    /// is chosen, so compilation is deterministic. Invisible sources only
    /// reach themselves.
    pub fn compile_with(store: &BoxStore, costs: &CostMatrix, scratch: &mut CompileScratch) -> Self {
        let count = store.len();
        let mut matrix = PathMatrix {
            runs: Vec::with_capacity(count * 2),
            row_start: Vec::with_capacity(count),
        };

        for source in store.ids() {
            matrix.row_start.push(matrix.runs.len());

            if store.flags(source).contains(BoxFlags::INVISIBLE) {
                matrix.runs.push(HopRange {
                    lo: source,
                    hi: source,
                    next: source,
                });
                matrix.runs.push(HopRange::END);
                continue;
            }

            shortest_first_hops(source, costs, scratch);
            matrix.push_row(&scratch.first_hop);
        }

        debug!(
            boxes = count,
            runs = matrix.runs.len() - count,
            "compiled path matrix"
        );
        matrix
    }

    fn push_row(&mut self, hops: &[Option<BoxId>]) {
        let mut j = 0;
        while j < hops.len() {
            if let Some(next) = hops[j] {
                let lo = j;
                while j + 1 < hops.len() && hops[j + 1] == Some(next) {
                    j += 1;
                }
                self.runs.push(HopRange {
                    lo: BoxId(lo as u16),
                    hi: BoxId(j as u16),
                    next,
                });
            }
            j += 1;
        }
        self.runs.push(HopRange::END);
    }

    /// Number of source rows.
    pub fn len(&self) -> usize {
        self.row_start.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_start.is_empty()
    }

    /// Runs for `source`, without the terminator. Empty for unknown sources.
    pub fn row(&self, source: BoxId) -> &[HopRange] {
        let Some(&start) = self.row_start.get(source.index()) else {
            return &[];
        };
        let len = self.runs[start..]
            .iter()
            .position(HopRange::is_end)
            .unwrap_or(self.runs.len() - start);
        &self.runs[start..start + len]
    }

    pub fn rows(&self) -> impl Iterator<Item = (BoxId, &[HopRange])> + '_ {
        (0..self.len() as u16).map(BoxId).map(|id| (id, self.row(id)))
    }

    /// Box to enter next when walking from `current` towards `dest`.
    ///
    /// Returns `current` when already there and `None` when `dest` is
    /// unreachable.
    pub fn next_hop(&self, current: BoxId, dest: BoxId) -> Option<BoxId> {
        if current == dest {
            return Some(current);
        }
        self.row(current)
            .iter()
            .find(|run| run.contains(dest))
            .map(|run| run.next)
    }
}

fn shortest_first_hops(source: BoxId, costs: &CostMatrix, scratch: &mut CompileScratch) {
    let count = costs.len();
    scratch.reset(count);
    scratch.dist[source.index()] = 0;
    scratch.first_hop[source.index()] = Some(source);

    loop {
        // Lowest id wins ties so the settle order is stable.
        let mut current: Option<usize> = None;
        for i in 0..count {
            if scratch.settled[i] || scratch.dist[i] == UNSEEN {
                continue;
            }
            if current.is_none_or(|c| scratch.dist[i] < scratch.dist[c]) {
                current = Some(i);
            }
        }
        let Some(u) = current else {
            break;
        };
        scratch.settled[u] = true;

        let from = BoxId(u as u16);
        for v in 0..count {
            if v == u || scratch.settled[v] {
                continue;
            }
            let step = costs.cost(from, BoxId(v as u16));
            if step == UNREACHABLE_COST {
                continue;
            }
            let candidate = scratch.dist[u] + step as u32;
            let hop = if from == source {
                Some(BoxId(v as u16))
            } else {
                scratch.first_hop[u]
            };
            let better = candidate < scratch.dist[v]
                || (candidate == scratch.dist[v] && hop < scratch.first_hop[v]);
            if better {
                scratch.dist[v] = candidate;
                scratch.first_hop[v] = hop;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxCoords, WalkBox};

    #[test]
    fn runs_compress_contiguous_destinations() {
        let mut matrix = PathMatrix::default();
        matrix.row_start.push(0);
        matrix.push_row(&[
            Some(BoxId(0)),
            Some(BoxId(1)),
            Some(BoxId(1)),
            None,
            Some(BoxId(1)),
        ]);
        assert_eq!(
            matrix.row(BoxId(0)),
            &[
                HopRange { lo: BoxId(0), hi: BoxId(0), next: BoxId(0) },
                HopRange { lo: BoxId(1), hi: BoxId(2), next: BoxId(1) },
                HopRange { lo: BoxId(4), hi: BoxId(4), next: BoxId(1) },
            ]
        );
        assert_eq!(matrix.next_hop(BoxId(0), BoxId(3)), None);
    }

    #[test]
    fn equal_length_paths_prefer_lower_first_hop() {
        // 0 on top, 1 and 2 side by side below, 3 below both.
        let store = BoxStore::new(
            vec![
                WalkBox::new(BoxCoords::rect(0, 0, 200, 50)),
                WalkBox::new(BoxCoords::rect(0, 50, 100, 100)),
                WalkBox::new(BoxCoords::rect(100, 50, 200, 100)),
                WalkBox::new(BoxCoords::rect(0, 100, 200, 150)),
            ],
            Vec::new(),
        )
        .unwrap();
        let matrix = PathMatrix::compile(&store);
        assert_eq!(matrix.next_hop(BoxId(0), BoxId(3)), Some(BoxId(1)));
        assert_eq!(matrix.next_hop(BoxId(3), BoxId(0)), Some(BoxId(1)));
    }
}
