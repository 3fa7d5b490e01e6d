//! Sweep driver
//!
//! Runs the benchmark pipeline over every combination of register width,
//! topology and error rate. Configurations are independent: each one
//! derives its own seed from the context seed and its position in the
//! enumeration, so parallel and sequential runs produce identical records.
//!
//! Results are merged into the [`SweepContext`] in enumeration order once
//! every worker has finished.

use crate::benchmark::run_benchmark;
use crate::config::{BenchmarkConfig, SweepConfig};
use crate::error::{Result, SimulatorError};
use crate::result::{BenchmarkRecord, FailedConfiguration, ScalabilityRow, SweepPoint, SweepRow, SweepSummary};
use qsearch_backend::{NoiseConfig, Topology};
use qsearch_core::TargetPattern;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Mix a base seed with a per-configuration key (SplitMix64)
///
/// # Example
/// ```
/// use qsearch_sim::derive_seed;
///
/// assert_eq!(derive_seed(42, 3), derive_seed(42, 3));
/// assert_ne!(derive_seed(42, 3), derive_seed(42, 4));
/// ```
pub fn derive_seed(seed: u64, key: u64) -> u64 {
    let mut z = seed
        .wrapping_add(key.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Cooperative cancellation flag shared between threads
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that has not been cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; configurations not yet started are skipped
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Explicit state threaded through a sweep
///
/// Holds the base seed, the cancellation token and the accumulated
/// records and failures. Records from earlier runs are never removed.
#[derive(Debug, Clone, Default)]
pub struct SweepContext {
    /// Base seed mixed with each configuration index
    pub seed: u64,

    /// Checked before each configuration starts
    pub cancel: CancellationToken,

    /// Completed configurations in enumeration order
    pub records: Vec<BenchmarkRecord>,

    /// Configurations that failed without stopping the sweep
    pub failures: Vec<FailedConfiguration>,
}

impl SweepContext {
    /// Empty context with the given base seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Width-scaling export, one row per record
    pub fn scalability_rows(&self) -> Vec<ScalabilityRow> {
        self.records.iter().map(BenchmarkRecord::scalability_row).collect()
    }

    /// Topology / error-rate export, one row per record
    pub fn sweep_rows(&self) -> Vec<SweepRow> {
        self.records.iter().map(BenchmarkRecord::sweep_row).collect()
    }

    /// Record with the highest Hellinger fidelity
    pub fn best_topology(&self) -> Option<&BenchmarkRecord> {
        self.records
            .iter()
            .max_by(|a, b| a.hellinger_fidelity.total_cmp(&b.hellinger_fidelity))
    }
}

/// Runs a [`SweepConfig`]
#[derive(Debug, Clone)]
pub struct SweepDriver {
    config: SweepConfig,
}

impl SweepDriver {
    /// Create a driver
    ///
    /// # Errors
    /// Returns a validation error if any dimension of the sweep is empty
    pub fn new(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated sweep configuration
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Fresh context seeded from the configuration
    pub fn context(&self) -> SweepContext {
        SweepContext::new(self.config.seed)
    }

    /// Configurations in enumeration order: width, then topology, then error rate
    pub fn points(&self) -> Vec<(SweepPoint, Topology)> {
        let mut points = Vec::with_capacity(self.config.num_configurations());
        for &qubit_count in &self.config.qubit_counts {
            for topology in &self.config.topologies {
                for &error_rate in &self.config.error_rates {
                    let point = SweepPoint {
                        index: points.len(),
                        qubit_count,
                        topology: topology.name().to_string(),
                        error_rate,
                        target: self.config.target.resolve(qubit_count),
                    };
                    points.push((point, topology.clone()));
                }
            }
        }
        points
    }

    /// Run every configuration and merge the outcomes into `ctx`
    ///
    /// Validation and configuration errors are recorded as failures and the
    /// sweep continues. A fatal internal error stops configurations that have
    /// not started yet and is returned after the completed records are merged.
    pub fn run(&self, ctx: &mut SweepContext) -> Result<SweepSummary> {
        self.run_with(ctx, |point, topology, seed| self.run_point(point, topology, seed))
    }

    fn run_with<F>(&self, ctx: &mut SweepContext, runner: F) -> Result<SweepSummary>
    where
        F: Fn(&SweepPoint, Topology, u64) -> Result<BenchmarkRecord> + Sync,
    {
        let points = self.points();
        let abort = AtomicBool::new(false);
        let seed = ctx.seed;
        let cancel = ctx.cancel.clone();

        let execute = |(point, topology): (SweepPoint, Topology)| {
            if cancel.is_cancelled() || abort.load(Ordering::SeqCst) {
                return (point, None);
            }
            let outcome = runner(&point, topology, derive_seed(seed, point.index as u64));
            if matches!(&outcome, Err(e) if e.is_fatal()) {
                abort.store(true, Ordering::SeqCst);
            }
            (point, Some(outcome))
        };

        let outcomes: Vec<(SweepPoint, Option<Result<BenchmarkRecord>>)> = if self.config.parallel {
            points.into_par_iter().map(execute).collect()
        } else {
            points.into_iter().map(execute).collect()
        };

        let mut summary = SweepSummary::default();
        let mut fatal = None;
        for (point, outcome) in outcomes {
            match outcome {
                Some(Ok(record)) => {
                    ctx.records.push(record);
                    summary.completed += 1;
                },
                Some(Err(err)) if err.is_fatal() => {
                    if fatal.is_none() {
                        fatal = Some(err);
                    }
                },
                Some(Err(err)) => {
                    warn!(
                        qubits = point.qubit_count,
                        topology = %point.topology,
                        error_rate = point.error_rate,
                        category = %err.category(),
                        "configuration failed: {}",
                        err
                    );
                    ctx.failures.push(FailedConfiguration::new(point, &err));
                    summary.failed += 1;
                },
                None => summary.skipped += 1,
            }
        }

        if summary.skipped > 0 && fatal.is_none() {
            warn!(skipped = summary.skipped, "sweep cancelled");
        }

        match fatal {
            Some(err) => Err(err),
            None => {
                info!(
                    completed = summary.completed,
                    failed = summary.failed,
                    skipped = summary.skipped,
                    "sweep finished"
                );
                Ok(summary)
            },
        }
    }

    fn run_point(&self, point: &SweepPoint, topology: Topology, seed: u64) -> Result<BenchmarkRecord> {
        TargetPattern::new(&point.target, point.qubit_count)?;

        let noise = NoiseConfig::new(point.error_rate, self.config.readout_flip).with_topology(topology);
        let config = BenchmarkConfig::new(point.target.clone())
            .with_noise(noise)
            .with_shots(self.config.shots)
            .with_seed(seed);

        run_benchmark(&config)
            .map(|report| report.record)
            .map_err(|err| match err {
                SimulatorError::FatalInternal(msg) => SimulatorError::FatalInternal(format!(
                    "{} (configuration {})",
                    msg, point.index
                )),
                other => other,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetChoice;
    use crate::error::ErrorCategory;

    #[test]
    fn test_derive_seed_spreads() {
        let seeds: std::collections::BTreeSet<u64> = (0..100).map(|k| derive_seed(7, k)).collect();
        assert_eq!(seeds.len(), 100);
        assert_ne!(derive_seed(1, 0), derive_seed(2, 0));
    }

    #[test]
    fn test_enumeration_order() {
        let driver = SweepDriver::new(
            SweepConfig::new()
                .with_qubit_counts(vec![4, 3])
                .with_topologies(vec![Topology::Ring, Topology::Star])
                .with_error_rates(vec![0.01, 0.001]),
        )
        .unwrap();

        let points: Vec<(usize, String, f64)> = driver
            .points()
            .into_iter()
            .map(|(p, _)| (p.qubit_count, p.topology, p.error_rate))
            .collect();
        assert_eq!(points.len(), 8);
        assert_eq!(points[0], (4, "ring".to_string(), 0.01));
        assert_eq!(points[1], (4, "ring".to_string(), 0.001));
        assert_eq!(points[2], (4, "star".to_string(), 0.01));
        assert_eq!(points[4], (3, "ring".to_string(), 0.01));
    }

    #[test]
    fn test_failures_are_recorded() {
        let driver = SweepDriver::new(
            SweepConfig::new()
                .with_qubit_counts(vec![3, 4])
                .with_error_rates(vec![0.01, 1.5])
                .with_target(TargetChoice::Pattern("101".to_string()))
                .with_shots(0),
        )
        .unwrap();
        let mut ctx = driver.context();
        let summary = driver.run(&mut ctx).unwrap();

        assert_eq!(summary.completed, 1);
        assert_eq!(summary.failed, 3);
        assert_eq!(ctx.records[0].qubit_count, 3);
        assert!(ctx.failures.iter().all(|f| f.category == ErrorCategory::Validation));
        assert_eq!(ctx.failures[0].point.error_rate, 1.5);
        assert_eq!(ctx.failures[1].point.qubit_count, 4);
    }

    #[test]
    fn test_cancelled_context_keeps_records() {
        let driver = SweepDriver::new(SweepConfig::new().with_qubit_counts(vec![3]).with_shots(0)).unwrap();
        let mut ctx = driver.context();
        driver.run(&mut ctx).unwrap();
        assert_eq!(ctx.records.len(), 1);

        ctx.cancel.cancel();
        let summary = driver.run(&mut ctx).unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.completed, 0);
        assert_eq!(ctx.records.len(), 1);
    }

    fn width_driver(qubit_counts: Vec<usize>, parallel: bool) -> SweepDriver {
        SweepDriver::new(
            SweepConfig::new()
                .with_qubit_counts(qubit_counts)
                .with_shots(0)
                .with_parallel(parallel),
        )
        .unwrap()
    }

    fn fail_third_point(driver: &SweepDriver, ctx: &mut SweepContext) -> Result<SweepSummary> {
        driver.run_with(ctx, |point, topology, seed| {
            if point.index == 2 {
                return Err(SimulatorError::FatalInternal("state lost normalization".to_string()));
            }
            driver.run_point(point, topology, seed)
        })
    }

    #[test]
    fn test_fatal_error_stops_sequential_sweep() {
        let driver = width_driver(vec![3, 4, 5, 6], false);
        let mut ctx = driver.context();

        let err = fail_third_point(&driver, &mut ctx).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("normalization"));

        // Earlier configurations are merged, the one after the failure never runs
        let widths: Vec<usize> = ctx.records.iter().map(|r| r.qubit_count).collect();
        assert_eq!(widths, vec![3, 4]);
        assert!(ctx.failures.is_empty());
    }

    #[test]
    fn test_fatal_error_stops_parallel_sweep() {
        let driver = width_driver(vec![3, 4, 5, 6], true);
        let mut ctx = driver.context();

        let err = fail_third_point(&driver, &mut ctx).unwrap_err();
        assert!(err.is_fatal());

        let widths: Vec<usize> = ctx.records.iter().map(|r| r.qubit_count).collect();
        assert!(!widths.contains(&5));
        assert!(widths.windows(2).all(|w| w[0] < w[1]));
        assert!(ctx.failures.is_empty());
    }

    #[test]
    fn test_cancel_mid_sweep() {
        let driver = width_driver(vec![3, 4, 5], false);
        let mut ctx = driver.context();
        let token = ctx.cancel.clone();

        let summary = driver
            .run_with(&mut ctx, |point, topology, seed| {
                let record = driver.run_point(point, topology, seed);
                token.cancel();
                record
            })
            .unwrap();

        assert_eq!(summary.completed, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(ctx.records.len(), 1);
        assert_eq!(ctx.records[0].qubit_count, 3);
    }

    #[test]
    fn test_empty_dimension_rejected() {
        assert!(SweepDriver::new(SweepConfig::new().with_qubit_counts(vec![])).is_err());
    }
}
