//! Topology routing and noise model for qsearch
//!
//! This crate turns a logical circuit into what a constrained, noisy device
//! would actually run:
//!
//! - [`Topology`] / [`ConnectivityGraph`]: which physical qubits may interact
//! - [`Router`]: SWAP insertion along shortest paths, with [`RoutingStats`]
//! - [`NoiseModel`]: survival probability from gate error exposure, the
//!   resulting noisy distribution, and readout bit flips
//!
//! # Example
//!
//! ```
//! use qsearch_backend::{NoiseConfig, NoiseModel, Topology};
//! use qsearch_core::{Circuit, GateOp};
//!
//! let mut circuit = Circuit::new(4).unwrap();
//! circuit.add(GateOp::mcz(&[0, 1, 2], 3)).unwrap();
//!
//! let ring = NoiseModel::new(NoiseConfig::new(0.001, 0.0).with_topology(Topology::Ring)).unwrap();
//! let line = NoiseModel::new(NoiseConfig::new(0.001, 0.0).with_topology(Topology::Linear)).unwrap();
//!
//! let on_ring = ring.apply_noise(&circuit).unwrap();
//! let on_line = line.apply_noise(&circuit).unwrap();
//! assert!(on_ring.routing.swap_count <= on_line.routing.swap_count);
//! ```

pub mod error;
pub mod noise;
pub mod routing;
pub mod topology;

pub use error::{BackendError, Result};
pub use noise::{
    apply_readout, depolarize, route_for_topology, survival_probability, NoiseConfig, NoiseModel,
    NoisyCircuit,
};
pub use routing::{Placement, RoutedCircuit, Router, RoutingStats};
pub use topology::{ConnectivityGraph, Topology};
