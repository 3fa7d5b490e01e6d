//! Property tests for the search operators and the fidelity metric

use num_complex::Complex64;
use proptest::prelude::*;
use qsearch_core::TargetPattern;
use qsearch_sim::{build_diffusion, build_oracle, grover_operator, hellinger_fidelity};
use qsearch_state::{Distribution, StateVector, NORM_TOLERANCE};

fn arb_state(n: usize) -> impl Strategy<Value = StateVector> {
    prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1 << n).prop_filter_map(
        "zero vector",
        move |raw| {
            let norm = raw.iter().map(|(re, im)| re * re + im * im).sum::<f64>().sqrt();
            if norm < 1e-3 {
                return None;
            }
            let amplitudes = raw
                .into_iter()
                .map(|(re, im)| Complex64::new(re / norm, im / norm))
                .collect();
            StateVector::from_amplitudes(n, amplitudes).ok()
        },
    )
}

fn state_and_target() -> impl Strategy<Value = (StateVector, TargetPattern)> {
    (1usize..=6).prop_flat_map(|n| {
        let target = (0u64..(1 << n)).prop_map(move |index| TargetPattern::from_index(index, n).unwrap());
        (arb_state(n), target)
    })
}

fn arb_distribution(n: usize) -> impl Strategy<Value = Distribution> {
    prop::collection::vec(0.0f64..1.0, 1 << n).prop_filter_map("zero mass", move |weights| {
        let total: f64 = weights.iter().sum();
        if total < 1e-3 {
            return None;
        }
        Distribution::new(n, weights.into_iter().map(|w| w / total).collect()).ok()
    })
}

fn distribution_pair() -> impl Strategy<Value = (Distribution, Distribution)> {
    (1usize..=5).prop_flat_map(|n| (arb_distribution(n), arb_distribution(n)))
}

fn assert_same_state(a: &StateVector, b: &StateVector) -> Result<(), TestCaseError> {
    for (x, y) in a.amplitudes().iter().zip(b.amplitudes()) {
        prop_assert!((x - y).norm() < 1e-10, "{} != {}", x, y);
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_oracle_is_involution((state, target) in state_and_target()) {
        let oracle = build_oracle(&target).unwrap();
        let mut evolved = state.clone();
        evolved.apply_circuit(&oracle).unwrap();
        evolved.apply_circuit(&oracle).unwrap();
        assert_same_state(&evolved, &state)?;
    }

    #[test]
    fn prop_oracle_negates_exactly_the_target((state, target) in state_and_target()) {
        let mut evolved = state.clone();
        evolved.apply_circuit(&build_oracle(&target).unwrap()).unwrap();

        for (index, (after, before)) in evolved.amplitudes().iter().zip(state.amplitudes()).enumerate() {
            let expected = if index as u64 == target.index() { -*before } else { *before };
            prop_assert!((*after - expected).norm() < 1e-10);
        }
    }

    #[test]
    fn prop_diffusion_is_involution((state, target) in state_and_target()) {
        let diffusion = build_diffusion(target.num_qubits()).unwrap();
        let mut evolved = state.clone();
        evolved.apply_circuit(&diffusion).unwrap();
        evolved.apply_circuit(&diffusion).unwrap();
        assert_same_state(&evolved, &state)?;
    }

    #[test]
    fn prop_diffusion_reflects_about_mean((state, target) in state_and_target()) {
        let n = target.num_qubits();
        let dim = (1usize << n) as f64;
        let mean: Complex64 = state.amplitudes().iter().sum::<Complex64>() / dim;

        let mut evolved = state.clone();
        evolved.apply_circuit(&build_diffusion(n).unwrap()).unwrap();

        // Equal to 2·mean − a up to a global sign
        for (after, before) in evolved.amplitudes().iter().zip(state.amplitudes()) {
            let reflected = 2.0 * mean - *before;
            prop_assert!((*after + reflected).norm() < 1e-10);
        }
    }

    #[test]
    fn prop_norm_preserved_over_rounds((state, target) in state_and_target(), rounds in 1usize..8) {
        let round = grover_operator(&target).unwrap();
        let mut evolved = state;
        for _ in 0..rounds {
            evolved.apply_circuit(&round).unwrap();
            prop_assert!((evolved.norm_sqr() - 1.0).abs() < NORM_TOLERANCE);
        }
    }

    #[test]
    fn prop_hellinger_self_identity((p, _) in distribution_pair()) {
        prop_assert_eq!(hellinger_fidelity(&p, &p), 1.0);
    }

    #[test]
    fn prop_hellinger_symmetric_and_bounded((p, q) in distribution_pair()) {
        let pq = hellinger_fidelity(&p, &q);
        prop_assert_eq!(pq, hellinger_fidelity(&q, &p));
        prop_assert!((0.0..=1.0).contains(&pq));
    }
}
