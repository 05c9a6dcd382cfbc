//! This module derives the regression features from the raw historical data: lagged prices are
//! smoothed into "recent" prices, the periods without enough lag history are removed, and rows
//! that are still incomplete are dropped.
use crate::input::HistoricalRecord;
use statrs::statistics::Statistics;
use tracing::{info, warn};

/// Number of leading periods without enough lag history to be used for fitting.
pub const LAG_HISTORY_PERIODS: usize = 13;

pub const N_FEATURES: usize = 3;

/// Names of the regression features, in the order used by [`FeatureRow::values`].
pub const FEATURE_NAMES: [&str; N_FEATURES] =
    ["elec_price_recent", "gas_price_recent", "subsidy_level"];

/// Explanatory variables for a single period (or a single hypothetical scenario).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureRow {
    pub elec_price_recent: f64,
    pub gas_price_recent: f64,
    pub subsidy_level: f64,
}

impl FeatureRow {
    pub fn values(&self) -> [f64; N_FEATURES] {
        [
            self.elec_price_recent,
            self.gas_price_recent,
            self.subsidy_level,
        ]
    }
}

/// A complete row of the cleaned training table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingRow {
    pub features: FeatureRow,
    pub installations: f64,
}

/// A historical period after averaging, before incomplete rows are dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreparedRecord {
    pub elec_price_recent: Option<f64>,
    pub gas_price_recent: Option<f64>,
    pub subsidy_level: Option<f64>,
    pub installations: Option<f64>,
}

impl From<&HistoricalRecord> for PreparedRecord {
    fn from(record: &HistoricalRecord) -> Self {
        Self {
            elec_price_recent: mean_of_present(&[
                record.elec_price,
                record.elec_price_lag1,
                record.elec_price_lag2,
            ]),
            gas_price_recent: mean_of_present(&[
                record.gas_price,
                record.gas_price_lag1,
                record.gas_price_lag2,
            ]),
            subsidy_level: record.subsidy_level,
            installations: record.installations,
        }
    }
}

impl PreparedRecord {
    pub fn into_training_row(self) -> Option<TrainingRow> {
        Some(TrainingRow {
            features: FeatureRow {
                elec_price_recent: self.elec_price_recent?,
                gas_price_recent: self.gas_price_recent?,
                subsidy_level: self.subsidy_level?,
            },
            installations: self.installations?,
        })
    }
}

/// Arithmetic mean of the values that are present, or `None` if all of them are missing.
pub fn mean_of_present(values: &[Option<f64>]) -> Option<f64> {
    let mean = values.iter().flatten().mean();

    (!mean.is_nan()).then_some(mean)
}

/// Builds the training table from the historical records.
pub fn prepare_training_data(records: &[HistoricalRecord]) -> Vec<TrainingRow> {
    let eligible = records.iter().skip(LAG_HISTORY_PERIODS);
    let eligible_count = eligible.len();

    let rows: Vec<TrainingRow> = eligible
        .filter_map(|record| PreparedRecord::from(record).into_training_row())
        .collect();

    let dropped = eligible_count - rows.len();
    if dropped > 0 {
        warn!("Dropped {dropped} historical rows with missing values");
    }
    info!(
        "Prepared {} training rows ({} lag history rows skipped)",
        rows.len(),
        records.len().min(LAG_HISTORY_PERIODS)
    );

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn complete_record(value: f64) -> HistoricalRecord {
        HistoricalRecord {
            elec_price: Some(value),
            elec_price_lag1: Some(value),
            elec_price_lag2: Some(value),
            gas_price: Some(value),
            gas_price_lag1: Some(value),
            gas_price_lag2: Some(value),
            subsidy_level: Some(value),
            installations: Some(value),
        }
    }

    #[fixture]
    fn records() -> Vec<HistoricalRecord> {
        (0..20).map(|i| complete_record(i as f64)).collect()
    }

    #[rstest]
    fn should_average_current_and_lagged_prices() {
        let record = HistoricalRecord {
            elec_price: Some(30.),
            elec_price_lag1: Some(27.),
            elec_price_lag2: Some(24.6),
            gas_price: Some(7.1),
            gas_price_lag1: Some(6.5),
            gas_price_lag2: Some(5.),
            subsidy_level: Some(5000.),
            installations: Some(9000.),
        };

        let prepared = PreparedRecord::from(&record);

        assert_relative_eq!(
            prepared.elec_price_recent.unwrap(),
            (30. + 27. + 24.6) / 3.,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            prepared.gas_price_recent.unwrap(),
            (7.1 + 6.5 + 5.) / 3.,
            max_relative = 1e-12
        );
        assert_eq!(prepared.subsidy_level, Some(5000.));
        assert_eq!(prepared.installations, Some(9000.));
    }

    #[rstest]
    fn should_average_only_present_values() {
        assert_eq!(mean_of_present(&[Some(3.), None, Some(5.)]), Some(4.));
        assert_eq!(mean_of_present(&[None, None, Some(5.)]), Some(5.));
        assert_eq!(mean_of_present(&[None, None, None]), None);
    }

    #[rstest]
    fn should_skip_lag_history_periods_even_when_complete(records: Vec<HistoricalRecord>) {
        let rows = prepare_training_data(&records);

        assert_eq!(rows.len(), 20 - LAG_HISTORY_PERIODS);
        assert_eq!(rows[0].installations, LAG_HISTORY_PERIODS as f64);
    }

    #[rstest]
    fn should_drop_rows_missing_required_values(mut records: Vec<HistoricalRecord>) {
        records[14].installations = None;
        records[15].subsidy_level = None;
        records[16].gas_price = None;
        records[16].gas_price_lag1 = None;
        records[16].gas_price_lag2 = None;
        // a single missing lag is averaged over and does not drop the row
        records[17].elec_price_lag2 = None;

        let rows = prepare_training_data(&records);

        let installations: Vec<f64> = rows.iter().map(|row| row.installations).collect();
        assert_eq!(installations, vec![13., 17., 18., 19.]);
    }

    #[rstest]
    fn should_return_no_rows_for_short_history(records: Vec<HistoricalRecord>) {
        assert!(prepare_training_data(&records[..LAG_HISTORY_PERIODS]).is_empty());
    }
}
