//! Synthetic loan-level datasets.
//!
//! These stand in for the default pricing / underwriting files so the tool is
//! usable without any input. The generators are seeded (same seed, same
//! rows) and take a single group effect (`SampleSpec::gap`) applied to the
//! disadvantaged segment, so both null and disparate datasets can be produced.

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Analysis, SampleSpec};
use crate::error::AppError;
use crate::io::ingest::Dataset;

pub const RACES: [&str; 4] = ["Asian", "Black", "Hispanic", "White"];
const RACE_WEIGHTS: [f64; 4] = [0.10, 0.15, 0.15, 0.60];
pub const SEXES: [&str; 2] = ["Female", "Male"];

/// Segment that receives the injected group effect.
pub const DISADVANTAGED: &str = "Black";

const BASE_RATE: f64 = 6.5;
const RATE_SD: f64 = 0.6;
const APR_SPREAD: f64 = 0.15;
const BASE_APPROVAL: f64 = 0.75;
const SCORE_MEAN: f64 = 700.0;
const SCORE_SD: f64 = 50.0;

/// Generate the sample dataset for an analysis.
pub fn generate(analysis: Analysis, spec: &SampleSpec) -> Result<Dataset, AppError> {
    match analysis {
        Analysis::Pricing => generate_pricing(spec),
        Analysis::Underwriting => generate_underwriting(spec),
    }
}

/// Pricing sample: `loan_id, race, sex, rate, apr, loan_amount`.
pub fn generate_pricing(spec: &SampleSpec) -> Result<Dataset, AppError> {
    validate(spec)?;
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let races = race_distribution()?;
    let rate_noise = normal(0.0, RATE_SD)?;
    let apr_noise = normal(0.0, 0.05)?;

    let mut rows = Vec::with_capacity(spec.rows);
    for i in 0..spec.rows {
        let race = RACES[races.sample(&mut rng)];
        let sex = SEXES[rng.gen_range(0..SEXES.len())];
        let loan_amount = (rng.gen_range(50_000.0..500_000.0_f64) / 1_000.0).round() * 1_000.0;

        let effect = if race == DISADVANTAGED { spec.gap } else { 0.0 };
        let rate = (BASE_RATE + effect + rate_noise.sample(&mut rng)).max(0.0);
        let apr = rate + APR_SPREAD + apr_noise.sample(&mut rng).abs();

        rows.push(vec![
            format!("L{:05}", i + 1),
            race.to_string(),
            sex.to_string(),
            format!("{rate:.3}"),
            format!("{apr:.3}"),
            format!("{loan_amount:.0}"),
        ]);
    }

    Dataset::from_records(
        Analysis::Pricing.sample_file_name(),
        headers(&["loan_id", "race", "sex", "rate", "apr", "loan_amount"]),
        rows,
    )
}

/// Underwriting sample: `app_id, race, sex, credit_score, decision`.
pub fn generate_underwriting(spec: &SampleSpec) -> Result<Dataset, AppError> {
    validate(spec)?;
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let races = race_distribution()?;
    let scores = normal(SCORE_MEAN, SCORE_SD)?;

    let mut rows = Vec::with_capacity(spec.rows);
    for i in 0..spec.rows {
        let race = RACES[races.sample(&mut rng)];
        let sex = SEXES[rng.gen_range(0..SEXES.len())];
        let score = scores.sample(&mut rng).clamp(300.0, 850.0).round();

        // Score shifts approval odds the same way for every segment; only the
        // injected gap differs by race.
        let effect = if race == DISADVANTAGED { spec.gap } else { 0.0 };
        let p = (BASE_APPROVAL + (score - SCORE_MEAN) / 400.0 - effect).clamp(0.01, 0.99);
        let decision = if rng.gen_bool(p) { "Approved" } else { "Denied" };

        rows.push(vec![
            format!("A{:05}", i + 1),
            race.to_string(),
            sex.to_string(),
            format!("{score:.0}"),
            decision.to_string(),
        ]);
    }

    Dataset::from_records(
        Analysis::Underwriting.sample_file_name(),
        headers(&["app_id", "race", "sex", "credit_score", "decision"]),
        rows,
    )
}

fn validate(spec: &SampleSpec) -> Result<(), AppError> {
    if spec.rows == 0 {
        return Err(AppError::usage("Sample row count must be > 0."));
    }
    if !spec.gap.is_finite() {
        return Err(AppError::usage("Sample gap must be finite."));
    }
    Ok(())
}

fn race_distribution() -> Result<WeightedIndex<f64>, AppError> {
    WeightedIndex::new(RACE_WEIGHTS)
        .map_err(|e| AppError::runtime(format!("Race distribution error: {e}")))
}

fn normal(mean: f64, sd: f64) -> Result<Normal<f64>, AppError> {
    Normal::new(mean, sd).map_err(|e| AppError::runtime(format!("Noise distribution error: {e}")))
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ColumnKind;

    fn spec(seed: u64, gap: f64) -> SampleSpec {
        SampleSpec { seed, rows: 200, gap }
    }

    #[test]
    fn pricing_sample_is_deterministic_per_seed() {
        let a = generate_pricing(&spec(7, 0.0)).unwrap();
        let b = generate_pricing(&spec(7, 0.0)).unwrap();
        let c = generate_pricing(&spec(8, 0.0)).unwrap();
        assert_eq!(a.rows, b.rows);
        assert_ne!(a.rows, c.rows);
    }

    #[test]
    fn pricing_sample_column_kinds() {
        let ds = generate_pricing(&spec(1, 0.0)).unwrap();
        assert_eq!(ds.n_rows(), 200);
        assert_eq!(ds.categorical_columns(), vec!["loan_id", "race", "sex"]);
        assert_eq!(ds.numeric_columns(), vec!["rate", "apr", "loan_amount"]);
        assert_eq!(ds.column_kind(3), ColumnKind::Numeric);
        assert_eq!(ds.factor_columns(), vec!["race", "sex"]);
    }

    #[test]
    fn underwriting_decisions_are_two_levels() {
        let ds = generate_underwriting(&spec(3, 0.3)).unwrap();
        let col = ds.column_index("decision").unwrap();
        for r in 0..ds.n_rows() {
            let d = ds.cell(r, col).unwrap();
            assert!(d == "Approved" || d == "Denied");
        }
    }

    #[test]
    fn zero_rows_are_rejected() {
        let err = generate(Analysis::Pricing, &SampleSpec { seed: 0, rows: 0, gap: 0.0 }).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }
}
