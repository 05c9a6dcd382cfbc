use crate::errors::UptakeModelError;
use crate::features::{FeatureRow, TrainingRow, FEATURE_NAMES, N_FEATURES};
use itertools::Itertools;
use nalgebra::{DMatrix, DVector};
use statrs::statistics::Statistics;
use std::array;
use tracing::info;

/// Anything that can produce a quarterly installation estimate for a row of features.
pub trait Predictor {
    fn predict(&self, features: &FeatureRow) -> f64;
}

/// Ordinary least squares model of installations against the regression features.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedModel {
    coefficients: [f64; N_FEATURES],
    intercept: f64,
}

impl FittedModel {
    /// Fits the model to the training table.
    ///
    /// Features and target are centred, the centred least-squares problem is solved by SVD and the
    /// intercept recovered from the means. Singular values below `max(n, p) * eps * sigma_max` are
    /// treated as zero so that rank-deficient data yields the minimum-norm solution.
    pub fn fit(rows: &[TrainingRow]) -> Result<Self, UptakeModelError> {
        if rows.is_empty() {
            return Err(UptakeModelError::EmptyTrainingSet);
        }

        let n_rows = rows.len();
        let feature_means: [f64; N_FEATURES] =
            array::from_fn(|j| rows.iter().map(|row| row.features.values()[j]).mean());
        let target_mean = rows.iter().map(|row| row.installations).mean();

        let x = DMatrix::from_fn(n_rows, N_FEATURES, |i, j| {
            rows[i].features.values()[j] - feature_means[j]
        });
        let y = DVector::from_iterator(n_rows, rows.iter().map(|row| row.installations - target_mean));

        let svd = x.svd(true, true);
        let tolerance = n_rows.max(N_FEATURES) as f64 * f64::EPSILON * svd.singular_values.amax();
        let beta = svd
            .solve(&y, tolerance)
            .map_err(|e| UptakeModelError::RegressionFailed(e.to_string()))?;

        if !beta.iter().all(|value| value.is_finite()) {
            return Err(UptakeModelError::RegressionFailed(
                "least squares solution is not finite".to_string(),
            ));
        }

        let coefficients: [f64; N_FEATURES] = array::from_fn(|j| beta[j]);
        let intercept = target_mean
            - feature_means
                .iter()
                .zip(coefficients.iter())
                .map(|(mean, coefficient)| mean * coefficient)
                .sum::<f64>();

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    pub fn coefficients(&self) -> [f64; N_FEATURES] {
        self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Feature names with their coefficients, largest magnitude first.
    pub fn ranked_coefficients(&self) -> Vec<(&'static str, f64)> {
        FEATURE_NAMES
            .into_iter()
            .zip(self.coefficients)
            .sorted_by(|(_, a), (_, b)| b.abs().total_cmp(&a.abs()))
            .collect()
    }

    /// Summarises the in-sample fit of the model on the rows it was fitted to.
    pub fn summarise(&self, rows: &[TrainingRow]) -> RegressionSummary {
        let actual: Vec<f64> = rows.iter().map(|row| row.installations).collect();
        let predicted: Vec<f64> = rows.iter().map(|row| self.predict(&row.features)).collect();
        let r2 = r2_score(&actual, &predicted);

        info!("Fitted regression on {} rows, R² = {r2:.3}", rows.len());

        RegressionSummary {
            ranked_coefficients: self.ranked_coefficients(),
            intercept: self.intercept,
            r2,
            training_rows: rows.len(),
        }
    }
}

impl Predictor for FittedModel {
    fn predict(&self, features: &FeatureRow) -> f64 {
        self.intercept
            + features
                .values()
                .iter()
                .zip(self.coefficients.iter())
                .map(|(value, coefficient)| value * coefficient)
                .sum::<f64>()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RegressionSummary {
    pub ranked_coefficients: Vec<(&'static str, f64)>,
    pub intercept: f64,
    pub r2: f64,
    pub training_rows: usize,
}

/// Coefficient of determination of `predicted` against `actual`.
///
/// Where `actual` has no variance the score is 1.0 for a perfect prediction and 0.0 otherwise.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    let mean = actual.iter().mean();

    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();

    if ss_tot == 0. {
        return if ss_res == 0. { 1. } else { 0. };
    }

    1. - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn row(elec: f64, gas: f64, subsidy: f64, installations: f64) -> TrainingRow {
        TrainingRow {
            features: FeatureRow {
                elec_price_recent: elec,
                gas_price_recent: gas,
                subsidy_level: subsidy,
            },
            installations,
        }
    }

    fn exact_installations(elec: f64, gas: f64, subsidy: f64) -> f64 {
        1200. + 35. * elec - 80. * gas + 0.3 * subsidy
    }

    #[fixture]
    fn exact_rows() -> Vec<TrainingRow> {
        (0..30)
            .map(|i| {
                let elec = 20. + (i % 7) as f64;
                let gas = 5. + 0.5 * ((3 * i) % 11) as f64;
                let subsidy = 5000. + 100. * ((5 * i) % 13) as f64;
                row(elec, gas, subsidy, exact_installations(elec, gas, subsidy))
            })
            .collect()
    }

    #[fixture]
    fn noisy_rows(exact_rows: Vec<TrainingRow>) -> Vec<TrainingRow> {
        exact_rows
            .into_iter()
            .enumerate()
            .map(|(i, mut row)| {
                row.installations += if i % 2 == 0 { 150. } else { -150. };
                row
            })
            .collect()
    }

    #[rstest]
    fn should_recover_exact_linear_relationship(exact_rows: Vec<TrainingRow>) {
        let model = FittedModel::fit(&exact_rows).unwrap();

        let [elec, gas, subsidy] = model.coefficients();
        assert_relative_eq!(elec, 35., max_relative = 1e-6);
        assert_relative_eq!(gas, -80., max_relative = 1e-6);
        assert_relative_eq!(subsidy, 0.3, max_relative = 1e-6);
        assert_relative_eq!(model.intercept(), 1200., max_relative = 1e-6);

        let summary = model.summarise(&exact_rows);
        assert_relative_eq!(summary.r2, 1., epsilon = 1e-9);
        assert_eq!(summary.training_rows, 30);
    }

    #[rstest]
    fn should_predict_with_intercept_and_coefficients(exact_rows: Vec<TrainingRow>) {
        let model = FittedModel::fit(&exact_rows).unwrap();
        let features = FeatureRow {
            elec_price_recent: 24.5,
            gas_price_recent: 6.25457,
            subsidy_level: 7500.,
        };

        assert_relative_eq!(
            model.predict(&features),
            exact_installations(24.5, 6.25457, 7500.),
            max_relative = 1e-6
        );
    }

    #[rstest]
    fn should_rank_coefficients_by_descending_magnitude(exact_rows: Vec<TrainingRow>) {
        let model = FittedModel::fit(&exact_rows).unwrap();

        let names: Vec<&str> = model
            .ranked_coefficients()
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        assert_eq!(
            names,
            vec!["gas_price_recent", "elec_price_recent", "subsidy_level"]
        );
    }

    #[rstest]
    fn should_bound_r2_for_noisy_fit(noisy_rows: Vec<TrainingRow>) {
        let model = FittedModel::fit(&noisy_rows).unwrap();
        let r2 = model.summarise(&noisy_rows).r2;

        assert!((0. ..=1.).contains(&r2), "R² out of bounds: {r2}");
        assert!(r2 < 1.);
    }

    #[rstest]
    fn should_fit_identically_when_repeated(noisy_rows: Vec<TrainingRow>) {
        let first = FittedModel::fit(&noisy_rows).unwrap();
        let second = FittedModel::fit(&noisy_rows).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.summarise(&noisy_rows), second.summarise(&noisy_rows));
    }

    #[rstest]
    fn should_fail_to_fit_empty_training_set() {
        assert!(matches!(
            FittedModel::fit(&[]),
            Err(UptakeModelError::EmptyTrainingSet)
        ));
    }

    #[rstest]
    fn should_fit_constant_features_to_mean_installations() {
        let rows = vec![
            row(20., 5., 5000., 100.),
            row(20., 5., 5000., 200.),
            row(20., 5., 5000., 300.),
        ];

        let model = FittedModel::fit(&rows).unwrap();

        assert_eq!(model.coefficients(), [0., 0., 0.]);
        assert_relative_eq!(model.intercept(), 200.);
    }

    #[rstest]
    fn should_calc_r2_score() {
        assert_relative_eq!(
            r2_score(&[3., -0.5, 2., 7.], &[2.5, 0.0, 2., 8.]),
            0.948608,
            epsilon = 1e-6
        );
        assert_eq!(r2_score(&[1., 1., 1.], &[1., 1., 1.]), 1.);
        assert_eq!(r2_score(&[1., 1., 1.], &[1., 2., 1.]), 0.);
    }
}
