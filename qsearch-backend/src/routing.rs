//! Qubit routing and SWAP insertion
//!
//! A multi-controlled gate interacts every pair of its qubits. For each pair
//! that is not adjacent under the current placement, the first qubit is
//! walked along a shortest path until it neighbours the second, one SWAP per
//! step. The gate is then emitted on the moved placement and the SWAPs are
//! undone in reverse, so every routed gate starts and ends on the identity
//! placement and the routed circuit implements the same unitary as the input.

use crate::{BackendError, ConnectivityGraph, Result};
use qsearch_core::{Circuit, GateOp};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Logical-to-physical qubit assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    physical: Vec<usize>,
    logical: Vec<usize>,
}

impl Placement {
    /// Logical qubit i on physical qubit i
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            physical: (0..num_qubits).collect(),
            logical: (0..num_qubits).collect(),
        }
    }

    /// Physical position of a logical qubit
    #[inline]
    pub fn physical(&self, logical: usize) -> usize {
        self.physical[logical]
    }

    /// Exchange the contents of two physical positions
    pub fn swap(&mut self, p1: usize, p2: usize) {
        let (l1, l2) = (self.logical[p1], self.logical[p2]);
        self.logical.swap(p1, p2);
        self.physical[l1] = p2;
        self.physical[l2] = p1;
    }

    /// Number of placed qubits
    #[inline]
    pub fn len(&self) -> usize {
        self.physical.len()
    }

    /// Whether no qubit is placed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.physical.is_empty()
    }

    /// Whether every logical qubit sits on its own index
    pub fn is_identity(&self) -> bool {
        self.physical.iter().enumerate().all(|(l, &p)| l == p)
    }
}

/// Router for handling qubit connectivity constraints
///
/// # Example
/// ```
/// use qsearch_backend::{ConnectivityGraph, Router};
/// use qsearch_core::{Circuit, GateOp};
///
/// let mut circuit = Circuit::new(3).unwrap();
/// circuit.add(GateOp::mcx(&[0, 1], 2)).unwrap();
///
/// let router = Router::new(ConnectivityGraph::linear_chain(3));
/// let routed = router.route(&circuit).unwrap();
/// assert_eq!(routed.stats.swap_count, 4);
/// assert_eq!(routed.circuit.elementary_gate_count(), 15 + 4 * 3);
/// ```
#[derive(Debug, Clone)]
pub struct Router {
    connectivity: ConnectivityGraph,
}

impl Router {
    /// Create a router for a connectivity graph
    pub fn new(connectivity: ConnectivityGraph) -> Self {
        Self { connectivity }
    }

    /// The graph routed against
    pub fn connectivity(&self) -> &ConnectivityGraph {
        &self.connectivity
    }

    /// Route a circuit onto the first `circuit.num_qubits()` physical qubits
    ///
    /// # Errors
    /// Returns error if the graph is too small or two interacting qubits
    /// have no connecting path
    pub fn route(&self, circuit: &Circuit) -> Result<RoutedCircuit> {
        let num_qubits = circuit.num_qubits();
        if self.connectivity.num_qubits() < num_qubits {
            return Err(BackendError::TopologyTooSmall {
                required: num_qubits,
                available: self.connectivity.num_qubits(),
            });
        }

        let mut routed = Circuit::with_capacity(num_qubits, circuit.len())?;
        let mut placement = Placement::identity(num_qubits);
        let mut swap_count = 0;

        for gate in circuit.operations() {
            if !gate.is_multi_qubit() {
                routed.add(gate.clone())?;
                continue;
            }

            let qubits = gate.qubits();
            let mut swaps = Vec::new();
            for i in 0..qubits.len() {
                for j in (i + 1)..qubits.len() {
                    let chain = self.find_swap_chain(&placement, qubits[i], qubits[j])?;
                    for &(p1, p2) in &chain {
                        placement.swap(p1, p2);
                    }
                    swaps.extend(chain);
                }
            }

            if !swaps.is_empty() {
                debug!(gate = %gate, swaps = swaps.len(), "routed gate");
            }

            for &(p1, p2) in &swaps {
                routed.add(GateOp::Swap(p1, p2))?;
            }
            routed.add(gate.remap(|q| placement.physical(q)))?;
            for &(p1, p2) in swaps.iter().rev() {
                routed.add(GateOp::Swap(p1, p2))?;
                placement.swap(p1, p2);
            }
            debug_assert!(placement.is_identity());
            swap_count += 2 * swaps.len();
        }

        let stats = RoutingStats::new(swap_count, circuit, &routed);
        Ok(RoutedCircuit {
            circuit: routed,
            stats,
        })
    }

    /// Find SWAP chain to connect two qubits
    ///
    /// Returns the physical SWAPs that walk `logical_q1` towards `logical_q2`
    /// until the two are adjacent; empty when they already are.
    pub fn find_swap_chain(
        &self,
        placement: &Placement,
        logical_q1: usize,
        logical_q2: usize,
    ) -> Result<Vec<(usize, usize)>> {
        let phys_q1 = placement.physical(logical_q1);
        let phys_q2 = placement.physical(logical_q2);

        // Check if already connected
        if self.connectivity.are_connected(phys_q1, phys_q2) {
            return Ok(vec![]);
        }

        let path = self
            .connectivity
            .shortest_path_within(phys_q1, phys_q2, placement.len())
            .ok_or(BackendError::NoPath {
                from: phys_q1,
                to: phys_q2,
            })?;

        Ok(path
            .windows(2)
            .take(path.len().saturating_sub(2))
            .map(|w| (w[0], w[1]))
            .collect())
    }
}

/// A routed circuit with its overhead accounting
#[derive(Debug, Clone)]
pub struct RoutedCircuit {
    /// Circuit over physical qubits, SWAPs included
    pub circuit: Circuit,

    /// Overhead introduced by routing
    pub stats: RoutingStats,
}

/// Routing statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingStats {
    /// Number of SWAP gates inserted
    pub swap_count: usize,

    /// CNOTs contributed by the inserted SWAPs (3 each)
    pub cnot_count: usize,

    /// Layers added relative to the unrouted circuit
    pub depth_increase: usize,
}

impl RoutingStats {
    fn new(swap_count: usize, original: &Circuit, routed: &Circuit) -> Self {
        Self {
            swap_count,
            cnot_count: swap_count * 3,
            depth_increase: routed.depth().saturating_sub(original.depth()),
        }
    }
}
