//! End-to-end holdout validation of the interpolation strategies.
//!
//! Builds a synthetic spatially-correlated field, withholds a fraction
//! of it, and checks that every strategy predicts the held-out samples
//! substantially better than the same field with its values shuffled
//! (i.e. with the spatial structure destroyed).

use geokrig_algorithms::interpolation::{FitStrategy, IdwParams, KrigingParams, TpsParams};
use geokrig_algorithms::validation::{cross_validate, evaluate, split};
use geokrig_core::{SamplePoint, SampleSet};

struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as f64 / (1u64 << 31) as f64
    }
}

/// Smooth trend + sinusoidal structure + small noise over [0, 100]².
fn correlated_field(n: usize, seed: u64) -> SampleSet {
    let mut rng = Lcg(seed);
    let mut points = Vec::with_capacity(n);
    for _ in 0..n {
        let x = rng.next_f64() * 100.0;
        let y = rng.next_f64() * 100.0;
        let value = 0.5 * x + 0.3 * y + 10.0 * ((x / 20.0).sin() + (y / 20.0).sin());
        let noise = rng.next_f64() * 2.0 - 1.0;
        points.push(SamplePoint::xy(x, y, value + noise));
    }
    SampleSet::new(points).unwrap()
}

/// The same coordinates with values reassigned at random: no spatial
/// structure left to exploit.
fn shuffled_values(samples: &SampleSet, seed: u64) -> SampleSet {
    let mut rng = Lcg(seed);
    let mut values: Vec<f64> = samples.values().collect();
    for i in (1..values.len()).rev() {
        let j = ((rng.next_f64() * (i + 1) as f64) as usize).min(i);
        values.swap(i, j);
    }
    SampleSet::new(
        samples
            .iter()
            .zip(values)
            .map(|(p, v)| SamplePoint::new(p.coords.clone(), v))
            .collect(),
    )
    .unwrap()
}

fn strategies() -> Vec<FitStrategy> {
    vec![
        FitStrategy::Idw(IdwParams::default()),
        FitStrategy::Tps(TpsParams { smoothing: 0.0 }),
        FitStrategy::OrdinaryKriging(KrigingParams::default()),
    ]
}

#[test]
fn holdout_accuracy_on_correlated_field() {
    let samples = correlated_field(120, 42);
    let (train, test) = split(&samples, 0.2, 7).unwrap();
    assert_eq!(test.len(), 24);
    assert_eq!(train.len(), 96);

    for strategy in strategies() {
        let report = evaluate(|t| strategy.fit(t), &train, &test).unwrap();

        assert_eq!(report.n_test, 24, "{}", strategy.name());
        assert!(
            report.r_squared > 0.6,
            "{} should track the smooth field: r² = {:.3}",
            strategy.name(),
            report.r_squared
        );
        assert!(
            report.rmse < 15.0,
            "{} rmse = {:.3}",
            strategy.name(),
            report.rmse
        );
        assert!(report.mae <= report.rmse + 1e-12);
    }
}

#[test]
fn shuffled_field_scores_worse() {
    let samples = correlated_field(120, 42);
    let shuffled = shuffled_values(&samples, 1234);

    let strategy = FitStrategy::Idw(IdwParams::default());

    let (train, test) = split(&samples, 0.2, 7).unwrap();
    let real = evaluate(|t| strategy.fit(t), &train, &test).unwrap();

    let (strain, stest) = split(&shuffled, 0.2, 7).unwrap();
    let broken = evaluate(|t| strategy.fit(t), &strain, &stest).unwrap();

    assert!(
        real.r_squared > broken.r_squared,
        "spatial structure must matter: real r² = {:.3}, shuffled r² = {:.3}",
        real.r_squared,
        broken.r_squared
    );
}

#[test]
fn reports_are_reproducible() {
    let samples = correlated_field(80, 9);
    let strategy = FitStrategy::Idw(IdwParams::default());

    let (train_a, test_a) = split(&samples, 0.25, 3).unwrap();
    let (train_b, test_b) = split(&samples, 0.25, 3).unwrap();
    assert_eq!(train_a, train_b);
    assert_eq!(test_a, test_b);

    let a = evaluate(|t| strategy.fit(t), &train_a, &test_a).unwrap();
    let b = evaluate(|t| strategy.fit(t), &train_b, &test_b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn k_fold_runs_every_strategy() {
    let samples = correlated_field(100, 21);

    for strategy in strategies() {
        let report = cross_validate(&strategy, &samples, 5, 13).unwrap();
        assert_eq!(report.n_test, 100, "{}", strategy.name());
        assert!(
            (0.0..=1.0).contains(&report.r_squared),
            "{}: r² = {}",
            strategy.name(),
            report.r_squared
        );
        assert!(report.rmse.is_finite());
    }
}
