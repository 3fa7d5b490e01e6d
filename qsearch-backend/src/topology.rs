//! Physical qubit connectivity and named topologies

use crate::{BackendError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

/// Qubit connectivity graph for hardware with limited connectivity
///
/// Adjacency is kept in ordered sets so neighbour iteration, and therefore
/// every shortest path, is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityGraph {
    /// Number of physical qubits
    num_qubits: usize,

    /// Adjacency list: qubit -> connected qubits
    edges: BTreeMap<usize, BTreeSet<usize>>,
}

impl ConnectivityGraph {
    /// Create a graph with no edges
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            edges: BTreeMap::new(),
        }
    }

    /// Create an all-to-all connectivity graph
    pub fn all_to_all(num_qubits: usize) -> Self {
        let mut graph = Self::new(num_qubits);
        for i in 0..num_qubits {
            for j in (i + 1)..num_qubits {
                graph.add_edge(i, j);
            }
        }
        graph
    }

    /// Create a linear chain connectivity (nearest-neighbor only)
    pub fn linear_chain(num_qubits: usize) -> Self {
        let mut graph = Self::new(num_qubits);
        for i in 1..num_qubits {
            graph.add_edge(i - 1, i);
        }
        graph
    }

    /// Linear chain closed into a cycle
    pub fn ring(num_qubits: usize) -> Self {
        let mut graph = Self::linear_chain(num_qubits);
        if num_qubits > 2 {
            graph.add_edge(num_qubits - 1, 0);
        }
        graph
    }

    /// Qubit 0 connected to every other qubit
    pub fn star(num_qubits: usize) -> Self {
        let mut graph = Self::new(num_qubits);
        for i in 1..num_qubits {
            graph.add_edge(0, i);
        }
        graph
    }

    /// Create a grid connectivity
    pub fn grid(rows: usize, cols: usize) -> Self {
        let mut graph = Self::new(rows * cols);

        for row in 0..rows {
            for col in 0..cols {
                let qubit = row * cols + col;

                // Connect to right neighbor
                if col + 1 < cols {
                    graph.add_edge(qubit, qubit + 1);
                }

                // Connect to bottom neighbor
                if row + 1 < rows {
                    graph.add_edge(qubit, qubit + cols);
                }
            }
        }

        graph
    }

    /// Add an undirected edge between two qubits
    pub fn add_edge(&mut self, q1: usize, q2: usize) {
        if q1 == q2 {
            return;
        }
        self.num_qubits = self.num_qubits.max(q1.max(q2) + 1);
        self.edges.entry(q1).or_default().insert(q2);
        self.edges.entry(q2).or_default().insert(q1);
    }

    /// Check if two qubits are connected
    pub fn are_connected(&self, q1: usize, q2: usize) -> bool {
        self.edges
            .get(&q1)
            .map_or(false, |neighbors| neighbors.contains(&q2))
    }

    /// Neighbours of a qubit in ascending order
    pub fn neighbors(&self, qubit: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges.get(&qubit).into_iter().flatten().copied()
    }

    /// Get the number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the degree (number of connections) of a qubit
    pub fn degree(&self, qubit: usize) -> usize {
        self.edges.get(&qubit).map_or(0, BTreeSet::len)
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Find the shortest path between two qubits (for SWAP chain calculation)
    pub fn shortest_path(&self, start: usize, end: usize) -> Option<Vec<usize>> {
        self.shortest_path_within(start, end, self.num_qubits)
    }

    /// Shortest path that only visits physical qubits below `limit`
    ///
    /// Breadth-first with neighbours expanded in ascending order, so ties
    /// always resolve to the same path.
    pub fn shortest_path_within(&self, start: usize, end: usize, limit: usize) -> Option<Vec<usize>> {
        if start >= limit || end >= limit {
            return None;
        }
        if start == end {
            return Some(vec![start]);
        }

        let mut parent: BTreeMap<usize, usize> = BTreeMap::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if current == end {
                // Reconstruct path
                let mut path = vec![end];
                let mut node = end;
                while let Some(&prev) = parent.get(&node) {
                    path.push(prev);
                    node = prev;
                }
                path.reverse();
                return Some(path);
            }

            for neighbor in self.neighbors(current) {
                if neighbor < limit && neighbor != start && !parent.contains_key(&neighbor) {
                    parent.insert(neighbor, current);
                    queue.push_back(neighbor);
                }
            }
        }

        None // No path found
    }
}

/// Named interconnect topology
///
/// A topology is a family of graphs: [`graph`](Self::graph) instantiates it
/// for a given register width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// Every pair of qubits directly coupled
    AllToAll,

    /// Nearest-neighbour cycle
    Ring,

    /// Nearest-neighbour chain
    Linear,

    /// Hub qubit 0 coupled to all others
    Star,

    /// Two-row grid
    Ladder,

    /// Caller-supplied coupling graph
    Custom {
        name: String,
        graph: ConnectivityGraph,
    },
}

impl Topology {
    /// The built-in topologies, densest first
    pub fn standard() -> Vec<Topology> {
        vec![
            Topology::AllToAll,
            Topology::Ladder,
            Topology::Ring,
            Topology::Star,
            Topology::Linear,
        ]
    }

    /// Display name
    pub fn name(&self) -> &str {
        match self {
            Topology::AllToAll => "all-to-all",
            Topology::Ring => "ring",
            Topology::Linear => "linear",
            Topology::Star => "star",
            Topology::Ladder => "ladder",
            Topology::Custom { name, .. } => name,
        }
    }

    /// Connectivity graph for a register of `num_qubits` qubits
    ///
    /// # Errors
    /// Returns error if a custom graph has fewer than `num_qubits` qubits
    pub fn graph(&self, num_qubits: usize) -> Result<ConnectivityGraph> {
        let graph = match self {
            Topology::AllToAll => ConnectivityGraph::all_to_all(num_qubits),
            Topology::Ring => ConnectivityGraph::ring(num_qubits),
            Topology::Linear => ConnectivityGraph::linear_chain(num_qubits),
            Topology::Star => ConnectivityGraph::star(num_qubits),
            Topology::Ladder => ConnectivityGraph::grid(2, (num_qubits + 1) / 2),
            Topology::Custom { graph, .. } => {
                if graph.num_qubits() < num_qubits {
                    return Err(BackendError::TopologyTooSmall {
                        required: num_qubits,
                        available: graph.num_qubits(),
                    });
                }
                graph.clone()
            },
        };
        Ok(graph)
    }
}

impl Default for Topology {
    fn default() -> Self {
        Topology::AllToAll
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_to_all_connectivity() {
        let graph = ConnectivityGraph::all_to_all(5);
        assert!(graph.are_connected(0, 1));
        assert!(graph.are_connected(0, 4));
        assert!(graph.are_connected(2, 3));
        assert_eq!(graph.edge_count(), 10);
    }

    #[test]
    fn test_linear_chain() {
        let graph = ConnectivityGraph::linear_chain(5);
        assert!(graph.are_connected(0, 1));
        assert!(graph.are_connected(1, 2));
        assert!(!graph.are_connected(0, 2));
        assert!(!graph.are_connected(0, 4));
    }

    #[test]
    fn test_ring_and_star() {
        let ring = ConnectivityGraph::ring(4);
        assert!(ring.are_connected(3, 0));
        assert_eq!(ring.edge_count(), 4);

        let star = ConnectivityGraph::star(4);
        assert_eq!(star.degree(0), 3);
        assert_eq!(star.degree(2), 1);
        assert!(!star.are_connected(1, 2));
    }

    #[test]
    fn test_grid_connectivity() {
        let graph = ConnectivityGraph::grid(3, 3);
        // 0-1-2
        // | | |
        // 3-4-5
        // | | |
        // 6-7-8

        assert!(graph.are_connected(0, 1));
        assert!(graph.are_connected(0, 3));
        assert!(!graph.are_connected(0, 2));
        assert!(!graph.are_connected(0, 4));
    }

    #[test]
    fn test_shortest_path() {
        let graph = ConnectivityGraph::linear_chain(5);
        let path = graph.shortest_path(0, 4).unwrap();
        assert_eq!(path, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_shortest_path_prefers_low_neighbours() {
        let graph = ConnectivityGraph::grid(2, 2);
        // 0-1
        // | |
        // 2-3
        assert_eq!(graph.shortest_path(0, 3), Some(vec![0, 1, 3]));
    }

    #[test]
    fn test_shortest_path_within_limit() {
        // Ladder for 3 qubits has an unused fourth site
        let graph = ConnectivityGraph::grid(2, 2);
        assert_eq!(graph.shortest_path_within(1, 2, 3), Some(vec![1, 0, 2]));
        assert_eq!(graph.shortest_path_within(1, 3, 3), None);

        let mut split = ConnectivityGraph::new(4);
        split.add_edge(0, 1);
        split.add_edge(2, 3);
        assert_eq!(split.shortest_path(0, 3), None);
    }

    #[test]
    fn test_topology_graphs() {
        assert_eq!(Topology::Ladder.graph(5).unwrap().num_qubits(), 6);
        assert_eq!(Topology::Ring.graph(6).unwrap().edge_count(), 6);
        assert_eq!(Topology::Linear.name(), "linear");

        let custom = Topology::Custom {
            name: "pair".to_string(),
            graph: ConnectivityGraph::linear_chain(2),
        };
        assert_eq!(custom.to_string(), "pair");
        assert_eq!(
            custom.graph(3),
            Err(BackendError::TopologyTooSmall {
                required: 3,
                available: 2
            })
        );
    }
}
