use crate::regression::Predictor;
use crate::scenario::Scenario;
use tracing::debug;

pub const QUARTERS_PER_YEAR: u32 = 4;
/// Scale-up bringing yearly figures in line with the external reference model.
pub const REFERENCE_MODEL_SCALE_FACTOR: i64 = 2;
/// New-build heat pump installations per year, not captured by the regression.
pub const NEW_BUILD_INSTALLATIONS_PER_YEAR: i64 = 250_000;

/// Adjustments applied when turning a quarterly model prediction into yearly installations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionAssumptions {
    pub quarters_per_year: u32,
    pub reference_model_scale_factor: i64,
    pub new_build_installations_per_year: i64,
}

impl Default for ProjectionAssumptions {
    fn default() -> Self {
        Self {
            quarters_per_year: QUARTERS_PER_YEAR,
            reference_model_scale_factor: REFERENCE_MODEL_SCALE_FACTOR,
            new_build_installations_per_year: NEW_BUILD_INSTALLATIONS_PER_YEAR,
        }
    }
}

impl ProjectionAssumptions {
    pub fn quarterly_installations(&self, prediction: f64) -> i64 {
        prediction.round_ties_even() as i64
    }

    pub fn yearly_installations(&self, prediction: f64) -> i64 {
        let retrofit = (prediction * self.quarters_per_year as f64).round_ties_even() as i64;

        retrofit * self.reference_model_scale_factor + self.new_build_installations_per_year
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectionResult {
    pub label: String,
    pub gas_price_pretax: f64,
    pub gas_price_posttax: f64,
    pub elec_price: f64,
    pub subsidy: f64,
    /// in £/tCO2
    pub co2_tax_t: f64,
    /// Raw model prediction, on a quarterly scale
    pub prediction: f64,
    pub quarterly_installations: i64,
    pub yearly_installations: i64,
}

pub fn project_scenario(
    model: &impl Predictor,
    scenario: &Scenario,
    assumptions: &ProjectionAssumptions,
) -> ProjectionResult {
    let prediction = model.predict(&scenario.feature_row());
    debug!("{}: raw prediction {prediction}", scenario.label());

    ProjectionResult {
        label: scenario.label().to_string(),
        gas_price_pretax: scenario.gas_price_pretax(),
        gas_price_posttax: scenario.gas_price_posttax(),
        elec_price: scenario.elec_price(),
        subsidy: scenario.subsidy(),
        co2_tax_t: scenario.co2_tax_t(),
        prediction,
        quarterly_installations: assumptions.quarterly_installations(prediction),
        yearly_installations: assumptions.yearly_installations(prediction),
    }
}

pub fn project_scenarios(
    model: &impl Predictor,
    scenarios: &[Scenario],
    assumptions: &ProjectionAssumptions,
) -> Vec<ProjectionResult> {
    scenarios
        .iter()
        .map(|scenario| project_scenario(model, scenario, assumptions))
        .collect()
}
