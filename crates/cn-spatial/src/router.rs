//! Routing trait and budgeted Dijkstra over edge length.
//!
//! # Cost units
//!
//! Edge lengths are stored as `f32` metres.  The search accumulates integer
//! millimetres (`u64`) so heap ordering is total and deterministic; results
//! are reported back in metres.
//!
//! # Budget
//!
//! Every search carries a [`SearchBudget`].  A query against a disconnected
//! or pathological target would otherwise settle the whole component before
//! giving up; with a budget it stops after `max_settled_nodes` and reports
//! [`SpatialError::BudgetExceeded`], which callers treat exactly like
//! "unreachable".

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use cn_core::{EdgeId, NodeId};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── SearchBudget ──────────────────────────────────────────────────────────────

/// Upper bound on the work a single shortest-path query may do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchBudget {
    /// Maximum number of nodes popped from the heap and expanded.
    pub max_settled_nodes: usize,
}

impl SearchBudget {
    pub const UNLIMITED: SearchBudget = SearchBudget { max_settled_nodes: usize::MAX };
}

impl Default for SearchBudget {
    fn default() -> Self {
        // A city-scale drive graph has a few hundred thousand nodes; the
        // default lets a query cover most of one.
        Self { max_settled_nodes: 200_000 }
    }
}

// ── RoadPath ──────────────────────────────────────────────────────────────────

/// The result of a routing query: an ordered list of `EdgeId`s and the total
/// length.
#[derive(Debug, Clone)]
pub struct RoadPath {
    /// Edges to traverse in order, from source to destination.
    pub edges:    Vec<EdgeId>,
    pub length_m: f64,
}

impl RoadPath {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must be `Send + Sync`: one router instance serves every
/// concurrent request against the shared graph.
pub trait Router: Send + Sync {
    /// Shortest path from `from` to `to` by edge length.
    fn route(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        budget: SearchBudget,
    ) -> SpatialResult<RoadPath>;

    /// Shortest-path lengths from `from` to each of `targets`, `None` where
    /// unreachable within `budget`.
    ///
    /// The default runs one query per target; implementations should
    /// override it with a single multi-target search.
    fn lengths_from(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        targets: &[NodeId],
        budget: SearchBudget,
    ) -> Vec<Option<f64>> {
        targets
            .iter()
            .map(|&to| self.route(network, from, to, budget).ok().map(|p| p.length_m))
            .collect()
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR road graph, weighted by
/// `edge_length_m`.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        budget: SearchBudget,
    ) -> SpatialResult<RoadPath> {
        check_node(network, from)?;
        check_node(network, to)?;
        if from == to {
            return Ok(RoadPath { edges: vec![], length_m: 0.0 });
        }

        let mut search = Search::new(network, from);
        match search.run_until(|node, _| node == to, budget) {
            Stop::Reached(cost) => Ok(reconstruct(network, &search.prev_edge, to, cost)),
            Stop::Exhausted => Err(SpatialError::NoRoute { from, to }),
            Stop::OverBudget => Err(SpatialError::BudgetExceeded { settled: search.settled }),
        }
    }

    fn lengths_from(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        targets: &[NodeId],
        budget: SearchBudget,
    ) -> Vec<Option<f64>> {
        if check_node(network, from).is_err() {
            return vec![None; targets.len()];
        }

        // Several targets may snap to the same node.
        let mut pending: HashSet<NodeId> = targets
            .iter()
            .copied()
            .filter(|&t| check_node(network, t).is_ok())
            .collect();

        let mut found: HashMap<NodeId, u64> = HashMap::with_capacity(pending.len());
        let mut search = Search::new(network, from);
        let mut remaining = pending.len();
        if remaining > 0 {
            search.run_until(
                |node, cost| {
                    if pending.remove(&node) {
                        found.insert(node, cost);
                        remaining -= 1;
                    }
                    remaining == 0
                },
                budget,
            );
        }

        targets
            .iter()
            .map(|t| found.get(t).map(|&mm| mm as f64 / 1000.0))
            .collect()
    }
}

fn check_node(network: &RoadNetwork, node: NodeId) -> SpatialResult<()> {
    if node.index() < network.node_count() {
        Ok(())
    } else {
        Err(SpatialError::NodeNotFound(node))
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

#[inline]
fn edge_cost_mm(network: &RoadNetwork, edge: EdgeId) -> u64 {
    let len = network.edge_length_m[edge.index()];
    if len.is_finite() && len > 0.0 {
        (len as f64 * 1000.0).round() as u64
    } else {
        0
    }
}

enum Stop {
    Reached(u64),
    Exhausted,
    OverBudget,
}

struct Search<'a> {
    network:   &'a RoadNetwork,
    /// dist[v] = best known cost (mm) to reach v.
    dist:      Vec<u64>,
    /// prev_edge[v] = EdgeId that reached v; INVALID for unreached nodes.
    prev_edge: Vec<EdgeId>,
    heap:      BinaryHeap<Reverse<(u64, NodeId)>>,
    settled:   usize,
}

impl<'a> Search<'a> {
    fn new(network: &'a RoadNetwork, from: NodeId) -> Self {
        let n = network.node_count();
        let mut dist = vec![u64::MAX; n];
        dist[from.index()] = 0;
        let mut heap = BinaryHeap::new();
        heap.push(Reverse((0, from)));
        Self { network, dist, prev_edge: vec![EdgeId::INVALID; n], heap, settled: 0 }
    }

    /// Settle nodes in cost order until `done(node, cost)` returns `true`,
    /// the heap drains, or the budget runs out.
    fn run_until(&mut self, mut done: impl FnMut(NodeId, u64) -> bool, budget: SearchBudget) -> Stop {
        while let Some(Reverse((cost, node))) = self.heap.pop() {
            // Skip stale heap entries.
            if cost > self.dist[node.index()] {
                continue;
            }
            if done(node, cost) {
                return Stop::Reached(cost);
            }
            if self.settled >= budget.max_settled_nodes {
                return Stop::OverBudget;
            }
            self.settled += 1;

            for edge in self.network.out_edges(node) {
                let neighbor = self.network.edge_to[edge.index()];
                let new_cost = cost.saturating_add(edge_cost_mm(self.network, edge));
                if new_cost < self.dist[neighbor.index()] {
                    self.dist[neighbor.index()] = new_cost;
                    self.prev_edge[neighbor.index()] = edge;
                    // Secondary key NodeId keeps tie-breaking deterministic.
                    self.heap.push(Reverse((new_cost, neighbor)));
                }
            }
        }
        Stop::Exhausted
    }
}

fn reconstruct(network: &RoadNetwork, prev_edge: &[EdgeId], to: NodeId, total_mm: u64) -> RoadPath {
    let mut edges = Vec::new();
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();
    RoadPath { edges, length_m: total_mm as f64 / 1000.0 }
}
